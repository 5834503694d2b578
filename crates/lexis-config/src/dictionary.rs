use serde::{Deserialize, Serialize};

fn default_language() -> String {
    "en".to_string()
}

fn default_letters_only() -> bool {
    false
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Language retried when the requested one yields nothing
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Reject queries containing anything but letters
    #[serde(default = "default_letters_only")]
    pub letters_only: bool,
    /// Extra borrowing phrases appended to the built-in list
    #[serde(default)]
    pub extra_loanword_indicators: Vec<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            letters_only: default_letters_only(),
            extra_loanword_indicators: vec![],
        }
    }
}
