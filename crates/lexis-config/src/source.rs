use serde::{Deserialize, Serialize};

/// Upstream dictionary the lookup engine talks to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SourceProvider {
    /// MediaWiki API of the per-language Wiktionary, returns raw markup
    #[default]
    Wiktionary,
    /// freedictionaryapi.com, returns structured JSON
    FreeDictionary,
}

impl SourceProvider {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "wiktionary" | "wiki" => Some(Self::Wiktionary),
            "free-dictionary" | "freedictionary" | "free_dictionary" => {
                Some(Self::FreeDictionary)
            }
            _ => None,
        }
    }
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("lexis/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_free_dictionary_url() -> String {
    "https://freedictionaryapi.com/api/v1/entries".to_string()
}

fn default_wiktionary_host() -> String {
    "wiktionary.org".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    #[serde(default)]
    pub provider: SourceProvider,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_free_dictionary_url")]
    pub free_dictionary_url: String,
    /// Base host, each language lives on its own subdomain
    #[serde(default = "default_wiktionary_host")]
    pub wiktionary_host: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            provider: SourceProvider::default(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
            free_dictionary_url: default_free_dictionary_url(),
            wiktionary_host: default_wiktionary_host(),
        }
    }
}
