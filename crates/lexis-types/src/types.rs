use serde::{Deserialize, Serialize};

/// ISO 639-1 language code ("en", "es", "ja", ...)
pub type LanguageCode = String;

/// Canonical dictionary entry handed to the UI and history layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    /// Headword as returned by the source, not necessarily the query
    pub word: String,
    pub language: LanguageCode,
    pub pronunciations: Vec<String>,
    pub etymology: Option<String>,
    pub senses: Vec<Sense>,
    /// Prose summary, only set when no senses could be produced
    pub raw_extract: Option<String>,
    pub source_url: Option<String>,
    /// Entry was produced against the default language instead of the requested one
    pub is_fallback: bool,
}

impl WordEntry {
    /// Whether the entry has anything worth showing
    pub fn has_content(&self) -> bool {
        !self.senses.is_empty()
            || self
                .raw_extract
                .as_deref()
                .is_some_and(|extract| !extract.trim().is_empty())
    }

    /// Iterate over every definition of every sense
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> {
        self.senses.iter().flat_map(|sense| sense.definitions.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sense {
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Definition {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            example: None,
            synonyms: vec![],
        }
    }
}

/// Outcome of a single dictionary lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LookupResult {
    Found { entry: WordEntry },
    NotFound,
    /// Entry exists but is a borrowing into `language`
    RejectedAsLoanword { language: LanguageCode },
    SourceError { reason: String },
}

impl LookupResult {
    pub fn entry(&self) -> Option<&WordEntry> {
        match self {
            LookupResult::Found { entry } => Some(entry),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }
}
