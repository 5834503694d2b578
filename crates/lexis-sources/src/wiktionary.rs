use lexis_core::language::find_language;
use lexis_core::{DictionarySource, FetchError, FetchOutcome, RawResponse};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::{network_error, parse_url, url_with_segments};

/// MediaWiki API of the per-language Wiktionary, returning raw page markup
pub struct WiktionarySource {
    http: Client,
    host: String,
}

impl WiktionarySource {
    pub fn new(http: Client, host: &str) -> Self {
        Self {
            http,
            host: host.trim().trim_matches('.').to_string(),
        }
    }

    fn api_url(&self, language: &str, word: &str) -> Result<Url, FetchError> {
        let mut url = parse_url(&format!("https://{language}.{}/w/api.php", self.host))?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("titles", word)
            .append_pair("prop", "revisions|extracts")
            .append_pair("rvprop", "content")
            .append_pair("rvslots", "main")
            .append_pair("exintro", "1")
            .append_pair("explaintext", "1")
            .append_pair("format", "json");
        Ok(url)
    }

    /// Human-facing page for `word`
    pub fn page_url(&self, language: &str, word: &str) -> Result<Url, FetchError> {
        url_with_segments(&format!("https://{language}.{}/wiki", self.host), &[word])
    }
}

#[async_trait::async_trait]
impl DictionarySource for WiktionarySource {
    async fn fetch_raw(&self, word: &str, language: &str) -> Result<FetchOutcome, FetchError> {
        let lang = find_language(language)
            .ok_or_else(|| FetchError::UnsupportedLanguage(language.to_string()))?;

        let url = self.api_url(lang.code, word)?;
        debug!(%url, "querying wiktionary");

        let response = self.http.get(url).send().await.map_err(network_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;
        let page_url = self.page_url(lang.code, word)?;
        parse_wiktionary_response(&payload, page_url.as_str())
    }

    fn name(&self) -> &str {
        "wiktionary"
    }
}

/// Turn a `action=query` payload into a fetch outcome.
///
/// Missing pages and pages without wikitext are [`FetchOutcome::NotPresent`].
pub fn parse_wiktionary_response(
    payload: &Value,
    source_url: &str,
) -> Result<FetchOutcome, FetchError> {
    if let Some(error) = payload.get("error") {
        let info = error
            .get("info")
            .and_then(Value::as_str)
            .unwrap_or("unknown API error");
        return Err(FetchError::Malformed(info.to_string()));
    }

    let pages = payload
        .pointer("/query/pages")
        .ok_or_else(|| FetchError::Malformed("response has no query.pages".to_string()))?;

    // formatversion 1 keys pages by id, formatversion 2 lists them
    let page = match pages {
        Value::Object(by_id) => by_id.iter().next().map(|(id, page)| (id.as_str(), page)),
        Value::Array(list) => list.first().map(|page| ("", page)),
        _ => None,
    };
    let Some((id, page)) = page else {
        return Ok(FetchOutcome::NotPresent);
    };
    if id == "-1" || page.get("missing").is_some() || page.get("invalid").is_some() {
        return Ok(FetchOutcome::NotPresent);
    }

    let text = page
        .pointer("/revisions/0/slots/main")
        .and_then(|main| main.get("*").or_else(|| main.get("content")))
        .or_else(|| page.pointer("/revisions/0/*"))
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty());
    let Some(text) = text else {
        return Ok(FetchOutcome::NotPresent);
    };

    let mut response = RawResponse::markup(text).with_source_url(source_url);
    if let Some(title) = page.get("title").and_then(Value::as_str) {
        response = response.with_headword(title);
    }
    if let Some(extract) = page
        .get("extract")
        .and_then(Value::as_str)
        .filter(|extract| !extract.trim().is_empty())
    {
        response = response.with_extract(extract);
    }
    Ok(FetchOutcome::Present(response))
}

#[cfg(test)]
mod tests {
    use lexis_core::RawBody;
    use serde_json::json;

    use super::*;

    const PAGE_URL: &str = "https://es.wiktionary.org/wiki/perro";

    fn source() -> WiktionarySource {
        WiktionarySource::new(Client::new(), "wiktionary.org")
    }

    #[test]
    fn test_api_url() {
        let url = source().api_url("es", "niño").unwrap();
        assert_eq!(url.host_str(), Some("es.wiktionary.org"));
        assert_eq!(url.path(), "/w/api.php");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("titles".to_string(), "niño".to_string())));
        assert!(pairs.contains(&("prop".to_string(), "revisions|extracts".to_string())));
        assert!(pairs.contains(&("rvslots".to_string(), "main".to_string())));
    }

    #[test]
    fn test_page_url() {
        assert_eq!(source().page_url("es", "perro").unwrap().as_str(), PAGE_URL);
    }

    #[test]
    fn test_present_page() {
        let payload = json!({
            "batchcomplete": "",
            "query": { "pages": { "12345": {
                "pageid": 12345,
                "ns": 0,
                "title": "perro",
                "revisions": [{ "slots": { "main": {
                    "contentmodel": "wikitext",
                    "*": "== {{lengua|es}} ==\n;1: Mamífero doméstico."
                } } }],
                "extract": "perro\nMamífero doméstico de la familia de los cánidos."
            } } }
        });

        let FetchOutcome::Present(response) = parse_wiktionary_response(&payload, PAGE_URL).unwrap()
        else {
            panic!("expected a page");
        };
        assert_eq!(response.headword.as_deref(), Some("perro"));
        assert_eq!(response.source_url.as_deref(), Some(PAGE_URL));
        match response.body {
            RawBody::Markup { text, extract } => {
                assert!(text.starts_with("== {{lengua|es}} =="));
                assert!(extract.unwrap().contains("cánidos"));
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_formatversion_2_page() {
        let payload = json!({
            "query": { "pages": [{
                "title": "run",
                "revisions": [{ "slots": { "main": { "content": "===Verb===\n# To move fast." } } }]
            }] }
        });
        assert!(matches!(
            parse_wiktionary_response(&payload, "u").unwrap(),
            FetchOutcome::Present(_)
        ));
    }

    #[test]
    fn test_missing_page() {
        let payload = json!({ "query": { "pages": { "-1": { "ns": 0, "title": "zzxq", "missing": "" } } } });
        assert_eq!(
            parse_wiktionary_response(&payload, PAGE_URL).unwrap(),
            FetchOutcome::NotPresent
        );
    }

    #[test]
    fn test_page_without_wikitext() {
        let payload = json!({ "query": { "pages": { "7": { "title": "perro", "revisions": [] } } } });
        assert_eq!(
            parse_wiktionary_response(&payload, PAGE_URL).unwrap(),
            FetchOutcome::NotPresent
        );
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            parse_wiktionary_response(&json!({ "batchcomplete": "" }), PAGE_URL),
            Err(FetchError::Malformed(_))
        ));

        let payload = json!({ "error": { "code": "badvalue", "info": "Unrecognized value" } });
        match parse_wiktionary_response(&payload, PAGE_URL) {
            Err(FetchError::Malformed(info)) => assert_eq!(info, "Unrecognized value"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unsupported_language_fails_before_request() {
        let result = source().fetch_raw("perro", "xx").await;
        assert!(matches!(result, Err(FetchError::UnsupportedLanguage(code)) if code == "xx"));
    }
}
