use lexis_core::{DictionarySource, FetchError, FetchOutcome, RawResponse};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::{network_error, url_with_segments};

/// freedictionaryapi.com, returning structured JSON records
pub struct FreeDictionarySource {
    http: Client,
    base_url: String,
}

impl FreeDictionarySource {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim().to_string(),
        }
    }
}

#[async_trait::async_trait]
impl DictionarySource for FreeDictionarySource {
    async fn fetch_raw(&self, word: &str, language: &str) -> Result<FetchOutcome, FetchError> {
        let url = url_with_segments(&self.base_url, &[language, word])?;
        debug!(%url, "querying free dictionary");

        let response = self.http.get(url).send().await.map_err(network_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotPresent);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(network_error)?;
        parse_free_dictionary_body(&body)
    }

    fn name(&self) -> &str {
        "free-dictionary"
    }
}

/// Parse a 2xx body. Empty payloads count as "not present".
pub fn parse_free_dictionary_body(body: &str) -> Result<FetchOutcome, FetchError> {
    let record: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let empty = match &record {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => return Err(FetchError::Malformed("expected a JSON object".to_string())),
    };
    if empty {
        return Ok(FetchOutcome::NotPresent);
    }

    let headword = record
        .get("word")
        .and_then(Value::as_str)
        .map(str::to_string);
    let mut response = RawResponse::structured(record);
    if let Some(headword) = headword {
        response = response.with_headword(headword);
    }
    Ok(FetchOutcome::Present(response))
}
