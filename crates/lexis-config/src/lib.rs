use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod dictionary;
pub mod source;

pub use self::dictionary::DictionaryConfig;
pub use self::source::{SourceConfig, SourceProvider};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub source: SourceConfig,
}

impl Config {
    /// Defaults overridden by `LEXIS_*` environment variables
    pub fn new() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load a JSON profile; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        Ok(config)
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(language) = var("LEXIS_DEFAULT_LANGUAGE") {
            let language = language.trim().to_lowercase();
            if !language.is_empty() {
                config.dictionary.default_language = language;
            }
        }

        config.dictionary.letters_only = var("LEXIS_LETTERS_ONLY")
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(config.dictionary.letters_only);

        if let Some(provider) = var("LEXIS_SOURCE").and_then(|v| SourceProvider::parse(&v)) {
            config.source.provider = provider;
        }

        config.source.timeout_seconds = var("LEXIS_TIMEOUT_SECONDS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.source.timeout_seconds);

        config
    }
}
