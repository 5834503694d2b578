pub mod extract;
pub mod language;
pub mod loanword;
pub mod lookup;
pub mod normalize;
pub mod pos;
pub mod preprocess;
pub mod sanitize;
pub mod source;

pub use extract::{Extraction, SectionExtractor};
pub use loanword::BorrowedWordClassifier;
pub use lookup::{LookupError, LookupOrchestrator, entry_from_response};
pub use normalize::normalize;
pub use sanitize::sanitize;
pub use source::{DictionarySource, FetchError, FetchOutcome, RawBody, RawResponse};
