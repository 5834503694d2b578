use std::sync::Arc;

use lexis_config::DictionaryConfig;
use lexis_types::{LookupResult, WordEntry};
use tracing::{debug, info, warn};

use crate::extract::{MAX_RAW_EXTRACT_CHARS, SectionExtractor};
use crate::loanword::BorrowedWordClassifier;
use crate::normalize::normalize;
use crate::preprocess::{DefaultPreprocessor, Preprocessor, is_letters_only, normalize_language};
use crate::sanitize::{collapse_whitespace, truncate_chars};
use crate::source::{DictionarySource, FetchOutcome, RawBody, RawResponse};

/// Upstream extracts this short are usually a bare title, not a summary
const MIN_UPSTREAM_EXTRACT_CHARS: usize = 20;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Query must contain letters only: {0}")]
    InvalidQuery(String),
}

/// Entry point of the engine: fetch, shape, classify, fall back once.
pub struct LookupOrchestrator {
    source: Arc<dyn DictionarySource>,
    default_language: String,
    letters_only: bool,
    classifier: BorrowedWordClassifier,
}

/// What a single fetch against one language produced
enum Attempt {
    Entry(WordEntry),
    Empty,
    Failed(String),
}

impl LookupOrchestrator {
    pub fn new(source: Arc<dyn DictionarySource>, default_language: &str) -> Self {
        let default_language = normalize_language(default_language);
        Self {
            source,
            classifier: BorrowedWordClassifier::new(&default_language),
            default_language,
            letters_only: false,
        }
    }

    pub fn from_config(source: Arc<dyn DictionarySource>, config: &DictionaryConfig) -> Self {
        let mut orchestrator = Self::new(source, &config.default_language);
        orchestrator.letters_only = config.letters_only;
        orchestrator.classifier = orchestrator
            .classifier
            .with_extra_indicators(&config.extra_loanword_indicators);
        orchestrator
    }

    pub fn with_letters_only(mut self, letters_only: bool) -> Self {
        self.letters_only = letters_only;
        self
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Look `word` up in `language`, retrying once in the default language
    /// when the requested one has nothing usable.
    pub async fn lookup(&self, word: &str, language: &str) -> Result<LookupResult, LookupError> {
        let query = DefaultPreprocessor.process(word);
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        if self.letters_only && !is_letters_only(&query) {
            return Err(LookupError::InvalidQuery(query));
        }

        let requested = match normalize_language(language) {
            code if code.is_empty() => self.default_language.clone(),
            code => code,
        };
        info!(word = %query, language = %requested, source = self.source.name(), "lookup");

        match self.attempt(&query, &requested).await {
            Attempt::Entry(entry) => return Ok(self.classify(entry, &query, &requested)),
            Attempt::Failed(reason) => {
                warn!(word = %query, language = %requested, %reason, "source failed");
                return Ok(LookupResult::SourceError { reason });
            }
            Attempt::Empty => {
                debug!(word = %query, language = %requested, "nothing usable");
            }
        }

        if requested == self.default_language {
            return Ok(LookupResult::NotFound);
        }

        let fallback = self.default_language.as_str();
        info!(word = %query, language = %fallback, "falling back to default language");
        match self.attempt(&query, fallback).await {
            Attempt::Entry(mut entry) => {
                entry.is_fallback = true;
                Ok(self.classify(entry, &query, &requested))
            }
            Attempt::Empty => Ok(LookupResult::NotFound),
            Attempt::Failed(reason) => {
                // The primary attempt already said "not present", keep that answer
                warn!(word = %query, language = %fallback, %reason, "fallback source failed");
                Ok(LookupResult::NotFound)
            }
        }
    }

    async fn attempt(&self, word: &str, language: &str) -> Attempt {
        match self.source.fetch_raw(word, language).await {
            Err(err) => Attempt::Failed(err.to_string()),
            Ok(FetchOutcome::NotPresent) => Attempt::Empty,
            Ok(FetchOutcome::Present(response)) => match entry_from_response(&response, word, language) {
                Some(entry) if entry.has_content() => Attempt::Entry(entry),
                _ => Attempt::Empty,
            },
        }
    }

    fn classify(&self, entry: WordEntry, query: &str, requested: &str) -> LookupResult {
        if self.classifier.is_loanword(&entry, requested, query) {
            info!(word = %query, language = %requested, "rejected as loanword");
            return LookupResult::RejectedAsLoanword {
                language: requested.to_string(),
            };
        }
        info!(
            word = %entry.word,
            language = %entry.language,
            senses = entry.senses.len(),
            fallback = entry.is_fallback,
            "found"
        );
        LookupResult::Found { entry }
    }
}

/// Route a response to the normalizer or the extractor by its shape.
///
/// `None` only for structured records without a headword. Entries may still
/// lack content; callers check [`WordEntry::has_content`].
pub fn entry_from_response(response: &RawResponse, word: &str, language: &str) -> Option<WordEntry> {
    let mut entry = match &response.body {
        RawBody::Structured(record) => normalize(record, language)?,
        RawBody::Markup { text, extract } => {
            let extraction = SectionExtractor::new(language).extract(text);
            let raw_extract = match extraction.raw_extract {
                None if extraction.senses.is_empty() => extract.as_deref().and_then(upstream_extract),
                raw => raw,
            };
            WordEntry {
                word: response
                    .headword
                    .clone()
                    .filter(|headword| !headword.trim().is_empty())
                    .unwrap_or_else(|| word.to_string()),
                language: language.to_string(),
                pronunciations: extraction.pronunciations,
                etymology: extraction.etymology,
                senses: extraction.senses,
                raw_extract,
                source_url: None,
                is_fallback: false,
            }
        }
    };

    if response.source_url.is_some() {
        entry.source_url = response.source_url.clone();
    }
    Some(entry)
}

fn upstream_extract(extract: &str) -> Option<String> {
    let text = collapse_whitespace(extract);
    (text.chars().count() > MIN_UPSTREAM_EXTRACT_CHARS)
        .then(|| truncate_chars(&text, MAX_RAW_EXTRACT_CHARS))
}
