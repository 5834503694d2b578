use serde_json::Value;

/// Dictionary provider interface
#[async_trait::async_trait]
pub trait DictionarySource: Send + Sync {
    /// Fetch the upstream response for `word` in `language`
    async fn fetch_raw(&self, word: &str, language: &str) -> Result<FetchOutcome, FetchError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Present(RawResponse),
    /// The upstream answered but has no entry for the word
    NotPresent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub body: RawBody,
    /// Page title or headword the upstream reported, if any
    pub headword: Option<String>,
    pub source_url: Option<String>,
}

/// Discriminates which extraction path a response takes
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// Pre-structured record, fed to the schema normalizer
    Structured(Value),
    /// Wiki markup document, fed to the section extractor
    Markup {
        text: String,
        /// Plain-text summary some upstreams send alongside the markup
        extract: Option<String>,
    },
}

impl RawResponse {
    pub fn structured(record: Value) -> Self {
        Self {
            body: RawBody::Structured(record),
            headword: None,
            source_url: None,
        }
    }

    pub fn markup(text: impl Into<String>) -> Self {
        Self {
            body: RawBody::Markup {
                text: text.into(),
                extract: None,
            },
            headword: None,
            source_url: None,
        }
    }

    pub fn with_headword(mut self, headword: impl Into<String>) -> Self {
        self.headword = Some(headword.into());
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Attach an upstream plain-text extract. No effect on structured bodies.
    pub fn with_extract(mut self, summary: impl Into<String>) -> Self {
        if let RawBody::Markup { extract, .. } = &mut self.body {
            *extract = Some(summary.into());
        }
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}
