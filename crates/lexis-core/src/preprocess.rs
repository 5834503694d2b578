use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Default query cleanup: trim, NFC, drop line breaks
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // NFC keeps composed accents ("é") comparable with upstream headwords
        let text: String = text.nfc().collect();

        text.replace(['\n', '\r'], " ").trim().to_string()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

/// Whether every character is alphabetic in any script
pub fn is_letters_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphabetic)
}

/// Normalize a language code the way every component compares them
pub fn normalize_language(code: &str) -> String {
    code.trim().to_lowercase()
}
