use lexis_types::WordEntry;

use crate::sanitize::sanitize;

/// Everyday default-language words that never count as native vocabulary
/// of another language
pub const COMMON_DEFAULT_WORDS: &[&str] = &[
    "hello", "hi", "ok", "okay", "yes", "no", "bye", "thanks", "please", "sorry", "wow", "hey",
    "yeah", "yep", "nope",
];

/// Phrases in a definition that mark the word as borrowed
pub const DEFINITION_INDICATORS: &[&str] = &[
    "anglicism",
    "borrowed from",
    "loanword",
    "from english",
    "from french",
    "from spanish",
    "from german",
    "from italian",
    "from latin",
    "from greek",
    "imported from",
    "adopted from",
    "taken from",
    "derived from english",
    "english word",
    "english term",
    "(anglicism)",
    "[anglicism]",
];

/// Narrow subset checked against the whole serialized entry. Etymologies
/// routinely say "from Latin", so the broad phrases stay out of this list.
pub const ENTRY_INDICATORS: &[&str] = &["anglicism", "borrowed from", "loanword"];

/// Heuristic that tells native entries apart from borrowed ones.
///
/// Misses are acceptable, false alarms are not, so the phrase lists are
/// literal substrings matched case-insensitively.
#[derive(Debug, Clone)]
pub struct BorrowedWordClassifier {
    default_language: String,
    common_words: Vec<String>,
    definition_indicators: Vec<String>,
    entry_indicators: Vec<String>,
}

impl BorrowedWordClassifier {
    pub fn new(default_language: &str) -> Self {
        let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            default_language: default_language.trim().to_lowercase(),
            common_words: owned(COMMON_DEFAULT_WORDS),
            definition_indicators: owned(DEFINITION_INDICATORS),
            entry_indicators: owned(ENTRY_INDICATORS),
        }
    }

    /// Add definition phrases on top of the built-in table
    pub fn with_extra_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for indicator in indicators {
            let indicator = indicator.as_ref().trim().to_lowercase();
            if !indicator.is_empty() && !self.definition_indicators.contains(&indicator) {
                self.definition_indicators.push(indicator);
            }
        }
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn is_loanword(&self, entry: &WordEntry, target_language: &str, queried_word: &str) -> bool {
        if target_language.eq_ignore_ascii_case(&self.default_language) {
            return false;
        }

        let queried = queried_word.trim().to_lowercase();
        if self.common_words.iter().any(|word| *word == queried) {
            tracing::debug!(word = %queried_word, "common default-language word");
            return true;
        }

        if let Some(indicator) = entry.definitions().find_map(|definition| {
            let text = sanitize(&definition.text).to_lowercase();
            self.definition_indicators
                .iter()
                .find(|indicator| text.contains(indicator.as_str()))
        }) {
            tracing::debug!(word = %queried_word, %indicator, "borrowing indicator in definition");
            return true;
        }

        let serialized = match serde_json::to_string(entry) {
            Ok(json) => json.to_lowercase(),
            Err(err) => {
                tracing::warn!("could not serialize entry for loanword scan: {err}");
                return false;
            }
        };
        if let Some(indicator) = self
            .entry_indicators
            .iter()
            .find(|indicator| serialized.contains(indicator.as_str()))
        {
            tracing::debug!(word = %queried_word, %indicator, "borrowing indicator in entry");
            return true;
        }

        false
    }
}
