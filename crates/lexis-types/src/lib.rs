mod types;

pub use types::{Definition, LanguageCode, LookupResult, Sense, WordEntry};
