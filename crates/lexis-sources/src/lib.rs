//! HTTP-backed dictionary sources for the lookup engine.

use std::sync::Arc;
use std::time::Duration;

use lexis_config::source::{SourceConfig, SourceProvider};
use lexis_core::{DictionarySource, FetchError};
use reqwest::{Client, Url};

mod free_dictionary;
mod wiktionary;

pub use free_dictionary::{FreeDictionarySource, parse_free_dictionary_body};
pub use wiktionary::{WiktionarySource, parse_wiktionary_response};

/// Shared client carrying the configured timeout and user agent
pub fn http_client(config: &SourceConfig) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(network_error)
}

/// Build the source selected by `config.provider`
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn DictionarySource>, FetchError> {
    let http = http_client(config)?;
    let source: Arc<dyn DictionarySource> = match config.provider {
        SourceProvider::Wiktionary => {
            Arc::new(WiktionarySource::new(http, &config.wiktionary_host))
        }
        SourceProvider::FreeDictionary => {
            Arc::new(FreeDictionarySource::new(http, &config.free_dictionary_url))
        }
    };
    tracing::debug!(provider = source.name(), "built dictionary source");
    Ok(source)
}

fn network_error(err: reqwest::Error) -> FetchError {
    FetchError::Network(err.to_string())
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|e| FetchError::Malformed(format!("invalid url {raw}: {e}")))
}

/// `base` with each of `segments` appended as an encoded path segment
fn url_with_segments(base: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = parse_url(base)?;
    url.path_segments_mut()
        .map_err(|_| FetchError::Malformed(format!("url cannot take a path: {base}")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
