use lexis_core::language::language_name;
use lexis_types::{LookupResult, WordEntry};

fn display_language(code: &str) -> &str {
    language_name(code).unwrap_or(code)
}

/// Human-readable rendering of a lookup result
pub fn render(result: &LookupResult, word: &str, requested: &str) -> String {
    match result {
        LookupResult::Found { entry } => render_entry(entry, requested),
        LookupResult::NotFound => format!(
            "No entry found for \"{word}\" in {}.",
            display_language(requested)
        ),
        LookupResult::RejectedAsLoanword { language } => {
            let language = display_language(language);
            format!(
                "\"{word}\" is not a native {language} word. It looks borrowed, \
                 try looking it up in its original language."
            )
        }
        LookupResult::SourceError { reason } => {
            format!("The dictionary could not be reached ({reason}). Please try again.")
        }
    }
}

fn render_entry(entry: &WordEntry, requested: &str) -> String {
    let mut lines = Vec::new();

    if entry.is_fallback {
        lines.push(format!(
            "No {} entry found, showing the {} entry instead.",
            display_language(requested),
            display_language(&entry.language)
        ));
        lines.push(String::new());
    }

    let mut heading = entry.word.clone();
    if !entry.pronunciations.is_empty() {
        heading.push_str(&format!("  {}", entry.pronunciations.join(", ")));
    }
    lines.push(heading);

    if let Some(etymology) = &entry.etymology {
        lines.push(format!("Etymology: {etymology}"));
    }

    for sense in &entry.senses {
        lines.push(String::new());
        if !sense.part_of_speech.is_empty() {
            lines.push(sense.part_of_speech.clone());
        }
        for (n, definition) in sense.definitions.iter().enumerate() {
            lines.push(format!("  {}. {}", n + 1, definition.text));
            if let Some(example) = &definition.example {
                lines.push(format!("     \"{example}\""));
            }
            if !definition.synonyms.is_empty() {
                lines.push(format!("     synonyms: {}", definition.synonyms.join(", ")));
            }
        }
    }

    if entry.senses.is_empty() {
        if let Some(extract) = &entry.raw_extract {
            lines.push(String::new());
            lines.push(extract.clone());
        }
    }

    if let Some(url) = &entry.source_url {
        lines.push(String::new());
        lines.push(format!("Source: {url}"));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use lexis_types::{Definition, Sense};

    use super::*;

    fn entry() -> WordEntry {
        WordEntry {
            word: "run".to_string(),
            language: "en".to_string(),
            pronunciations: vec!["/rʌn/".to_string()],
            etymology: Some("From Old English rinnan.".to_string()),
            senses: vec![Sense {
                part_of_speech: "verb".to_string(),
                definitions: vec![Definition {
                    text: "to move fast".to_string(),
                    example: Some("She runs every day.".to_string()),
                    synonyms: vec!["sprint".to_string(), "dash".to_string()],
                }],
            }],
            raw_extract: None,
            source_url: Some("https://en.wiktionary.org/wiki/run".to_string()),
            is_fallback: false,
        }
    }

    #[test]
    fn test_render_found() {
        let text = render(&LookupResult::Found { entry: entry() }, "run", "en");
        assert!(text.starts_with("run  /rʌn/"));
        assert!(text.contains("Etymology: From Old English rinnan."));
        assert!(text.contains("verb\n  1. to move fast"));
        assert!(text.contains("synonyms: sprint, dash"));
        assert!(text.ends_with("Source: https://en.wiktionary.org/wiki/run"));
        assert!(!text.contains("instead"));
    }

    #[test]
    fn test_render_fallback_notice() {
        let mut fallback = entry();
        fallback.is_fallback = true;
        let text = render(&LookupResult::Found { entry: fallback }, "run", "es");
        assert!(text.starts_with("No Spanish entry found, showing the English entry instead."));
    }

    #[test]
    fn test_not_found_and_loanword_copy_differ() {
        let not_found = render(&LookupResult::NotFound, "zzxq", "es");
        assert_eq!(not_found, "No entry found for \"zzxq\" in Spanish.");

        let loanword = render(
            &LookupResult::RejectedAsLoanword {
                language: "es".to_string(),
            },
            "hello",
            "es",
        );
        assert!(loanword.contains("not a native Spanish word"));
        assert!(loanword.contains("original language"));
    }

    #[test]
    fn test_raw_extract_only_entry() {
        let mut summary = entry();
        summary.senses.clear();
        summary.raw_extract = Some("A prose summary of the word.".to_string());
        let text = render(&LookupResult::Found { entry: summary }, "run", "en");
        assert!(text.contains("\n\nA prose summary of the word."));
    }

    #[test]
    fn test_unknown_language_code_is_shown_verbatim() {
        assert_eq!(
            render(&LookupResult::NotFound, "x", "eo"),
            "No entry found for \"x\" in eo."
        );
    }
}
