//! Best-effort extraction of pronunciations, etymology and senses from raw
//! wiki markup. Nothing here fails: missing data comes back empty.

use lexis_types::{Definition, Sense};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::pos::{english_headings, normalize_part_of_speech};
use crate::sanitize::{sanitize, split_template_args, truncate_chars};

pub const MAX_DEFINITIONS_PER_SENSE: usize = 5;
pub const MAX_ETYMOLOGY_CHARS: usize = 500;
pub const MAX_RAW_EXTRACT_CHARS: usize = 300;

const MIN_ETYMOLOGY_CHARS: usize = 10;
const MIN_RAW_LINE_CHARS: usize = 20;
const MIN_RAW_EXTRACT_CHARS: usize = 20;
const MIN_UNLABELED_DEFINITION_CHARS: usize = 5;
const RAW_EXTRACT_LINES: usize = 3;

/// Etymology section labels per document language
const ETYMOLOGY_LABELS: &[(&str, &[&str])] = &[
    ("es", &["Etimología"]),
    ("en", &["Etymology"]),
    ("fr", &["Étymologie"]),
    ("pt", &["Etimologia"]),
    ("it", &["Etimologia"]),
    ("de", &["Herkunft"]),
];

/// Lines that never count as prose for the raw extract
const NON_PROSE_PREFIXES: &[&str] = &["=", "{{", "{|", "|", "!", "*", "#", ":", ";"];

static IPA_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\{\{IPA\|([^{}]*)\}\}").expect("valid IPA regex"));
static SLASH_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/[^/\n]{2,20}/").expect("valid slash span regex"));
static NUMBERED_GLOSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^;\s*\d+[^:]*:\s*(.+)$").expect("valid gloss regex"));
static TEMPLATE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{\{([^{}]+)\}\}$").expect("valid heading template regex"));

/// Everything the extractor could find in one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub pronunciations: Vec<String>,
    pub etymology: Option<String>,
    pub senses: Vec<Sense>,
    pub raw_extract: Option<String>,
}

type SenseStrategy = fn(&Document) -> Vec<Sense>;

/// Sense strategies in priority order, first non-empty result wins
const SENSE_STRATEGIES: &[(&str, SenseStrategy)] = &[
    ("template-headings", template_heading_senses),
    ("plain-headings", plain_heading_senses),
    ("numbered-lines", numbered_line_senses),
];

/// Names of the sense strategies, in the order they are tried
pub fn sense_strategy_names() -> impl Iterator<Item = &'static str> {
    SENSE_STRATEGIES.iter().map(|(name, _)| *name)
}

#[derive(Debug, Clone)]
pub struct SectionExtractor {
    language: String,
}

impl SectionExtractor {
    /// `language` is the document's declared language; it decides which
    /// etymology labels are tried first.
    pub fn new(language: &str) -> Self {
        Self {
            language: language.trim().to_lowercase(),
        }
    }

    pub fn extract(&self, markup: &str) -> Extraction {
        let doc = Document::parse(markup);

        let pronunciations = extract_pronunciations(markup);
        let etymology = self.extract_etymology(&doc);

        let senses = SENSE_STRATEGIES
            .iter()
            .find_map(|(name, strategy)| {
                let senses = strategy(&doc);
                if senses.is_empty() {
                    None
                } else {
                    tracing::debug!(strategy = *name, senses = senses.len(), "extracted senses");
                    Some(senses)
                }
            })
            .unwrap_or_default();

        let raw_extract = if senses.is_empty() {
            extract_raw_prose(&doc)
        } else {
            None
        };

        Extraction {
            pronunciations,
            etymology,
            senses,
            raw_extract,
        }
    }

    fn etymology_labels(&self) -> Vec<&'static str> {
        let declared = ETYMOLOGY_LABELS
            .iter()
            .filter(|(lang, _)| *lang == self.language);
        let others = ETYMOLOGY_LABELS
            .iter()
            .filter(|(lang, _)| *lang != self.language);

        let mut labels: Vec<&'static str> = Vec::new();
        for (_, group) in declared.chain(others) {
            for label in group.iter().copied() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    fn extract_etymology(&self, doc: &Document) -> Option<String> {
        for label in self.etymology_labels() {
            for (idx, heading) in doc.headings.iter().enumerate() {
                if !is_etymology_heading(&heading.text, label) {
                    continue;
                }
                // Prose ends at the first child heading, e.g. the `====Verb====`
                // sections nested under `===Etymology 1===`
                let body: Vec<&str> = doc
                    .body(idx, SectionEnd::SameOrHigherLevel)
                    .iter()
                    .copied()
                    .take_while(|line| parse_heading(line).is_none())
                    .collect();
                let text = sanitize(&body.join("\n"));
                if text.chars().count() > MIN_ETYMOLOGY_CHARS {
                    return Some(truncate_chars(&text, MAX_ETYMOLOGY_CHARS));
                }
            }
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Heading {
    line: usize,
    level: usize,
    text: String,
}

#[derive(Debug, Clone, Copy)]
enum SectionEnd {
    AnyHeading,
    SameOrHigherLevel,
}

/// Markup split into lines with its headings located
struct Document<'a> {
    lines: Vec<&'a str>,
    headings: Vec<Heading>,
}

impl<'a> Document<'a> {
    fn parse(markup: &'a str) -> Self {
        let lines: Vec<&str> = markup.lines().map(|l| l.trim_end_matches('\r')).collect();
        let headings = lines
            .iter()
            .enumerate()
            .filter_map(|(line, raw)| {
                parse_heading(raw).map(|(level, text)| Heading { line, level, text })
            })
            .collect();
        Self { lines, headings }
    }

    /// Lines belonging to the section opened by heading `idx`
    fn body(&self, idx: usize, end: SectionEnd) -> &[&'a str] {
        let heading = &self.headings[idx];
        let stop = self.headings[idx + 1..]
            .iter()
            .find(|next| match end {
                SectionEnd::AnyHeading => true,
                SectionEnd::SameOrHigherLevel => next.level <= heading.level,
            })
            .map(|next| next.line)
            .unwrap_or(self.lines.len());
        &self.lines[heading.line + 1..stop]
    }
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    let trimmed = line.trim();
    if !trimmed.starts_with('=') || !trimmed.ends_with('=') {
        return None;
    }
    let leading = trimmed.chars().take_while(|c| *c == '=').count();
    let trailing = trimmed.chars().rev().take_while(|c| *c == '=').count();
    let level = leading.min(trailing);
    if level * 2 >= trimmed.len() {
        return None;
    }
    let text = trimmed.trim_matches('=').trim();
    if text.is_empty() {
        return None;
    }
    Some((level, text.to_string()))
}

fn extract_pronunciations(markup: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut push = |candidate: &str| {
        let candidate = candidate.trim();
        if !candidate.is_empty() && !found.iter().any(|p| p == candidate) {
            found.push(candidate.to_string());
        }
    };

    for caps in IPA_TEMPLATE.captures_iter(markup) {
        let args: Vec<String> = split_template_args(&caps[1])
            .into_iter()
            .filter(|arg| !arg.contains('='))
            .collect();
        let transcriptions = match args.split_first() {
            Some((first, rest)) if is_language_code(first) => rest,
            _ => &args[..],
        };
        for arg in transcriptions {
            push(arg.as_str());
        }
    }

    for m in SLASH_SPAN.find_iter(markup) {
        if looks_like_transcription(markup, m.start(), m.as_str()) {
            push(m.as_str());
        }
    }

    found
}

/// `en`, `pt-br`, `zh-min-nan` style codes, never a transcription
fn is_language_code(arg: &str) -> bool {
    let mut parts = arg.trim().split('-');
    let primary_ok = parts
        .next()
        .is_some_and(|p| (2..=3).contains(&p.len()) && p.chars().all(|c| c.is_ascii_lowercase()));
    primary_ok && parts.all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn looks_like_transcription(markup: &str, start: usize, span: &str) -> bool {
    let preceded_ok = markup[..start]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_alphanumeric() || c == '/' || c == ':'));
    let inner = &span[1..span.len() - 1];
    preceded_ok
        && !inner.starts_with(char::is_whitespace)
        && !inner.ends_with(char::is_whitespace)
        && !inner.contains(['<', '>', '{', '}', '[', ']', '|', '='])
}

fn is_etymology_heading(heading: &str, label: &str) -> bool {
    let label = label.to_lowercase();
    heading_candidates(heading).iter().any(|candidate| {
        let candidate = candidate
            .trim()
            .trim_end_matches(|c: char| c.is_ascii_digit() || c.is_whitespace())
            .to_lowercase();
        candidate == label
    })
}

/// Plain heading text, or the name and arguments of a heading template
fn heading_candidates(heading: &str) -> Vec<String> {
    match TEMPLATE_HEADING.captures(heading) {
        Some(caps) => split_template_args(&caps[1]),
        None => vec![heading.to_string()],
    }
}

fn capped(definitions: impl Iterator<Item = String>) -> Vec<Definition> {
    definitions
        .filter(|text| !text.trim().is_empty())
        .take(MAX_DEFINITIONS_PER_SENSE)
        .map(Definition::new)
        .collect()
}

/// `#` item that is not a nested `##`, `#:` or `#*` marker
fn numbered_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?.trim_start();
    if rest.is_empty() || rest.starts_with(['#', '*', ':']) {
        None
    } else {
        Some(rest)
    }
}

/// `=== {{sustantivo|es}} ===` sections holding `;1: gloss` lines
fn template_heading_senses(doc: &Document) -> Vec<Sense> {
    let mut senses = Vec::new();
    for (idx, heading) in doc.headings.iter().enumerate() {
        let Some(caps) = TEMPLATE_HEADING.captures(&heading.text) else {
            continue;
        };
        let args = split_template_args(&caps[1]);
        let category = args.first().map(|name| name.trim()).unwrap_or_default();
        if category.is_empty() {
            continue;
        }

        let definitions = capped(
            doc.body(idx, SectionEnd::AnyHeading)
                .iter()
                .filter_map(|line| NUMBERED_GLOSS.captures(line.trim()))
                .map(|caps| sanitize(&caps[1])),
        );
        if !definitions.is_empty() {
            senses.push(Sense {
                part_of_speech: normalize_part_of_speech(category),
                definitions,
            });
        }
    }
    senses
}

/// `===Noun===` sections holding `# gloss` lines
fn plain_heading_senses(doc: &Document) -> Vec<Sense> {
    let mut senses = Vec::new();
    for label in english_headings() {
        for (idx, heading) in doc.headings.iter().enumerate() {
            if !heading.text.eq_ignore_ascii_case(label) {
                continue;
            }
            let definitions = capped(
                doc.body(idx, SectionEnd::AnyHeading)
                    .iter()
                    .filter_map(|line| numbered_item(line))
                    .map(sanitize),
            );
            if !definitions.is_empty() {
                senses.push(Sense {
                    part_of_speech: normalize_part_of_speech(label),
                    definitions,
                });
            }
        }
    }
    senses
}

/// Any `# gloss` line in the document, under a generic label
fn numbered_line_senses(doc: &Document) -> Vec<Sense> {
    let definitions = capped(
        doc.lines
            .iter()
            .filter_map(|line| numbered_item(line))
            .map(sanitize)
            .filter(|text| text.chars().count() > MIN_UNLABELED_DEFINITION_CHARS),
    );
    if definitions.is_empty() {
        return vec![];
    }
    vec![Sense {
        part_of_speech: "definition".to_string(),
        definitions,
    }]
}

fn extract_raw_prose(doc: &Document) -> Option<String> {
    let joined = doc
        .lines
        .iter()
        .filter(|line| line.chars().count() > MIN_RAW_LINE_CHARS)
        .filter(|line| {
            let start = line.trim_start();
            !NON_PROSE_PREFIXES.iter().any(|prefix| start.starts_with(prefix))
        })
        .take(RAW_EXTRACT_LINES)
        .map(|line| sanitize(line))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.chars().count() > MIN_RAW_EXTRACT_CHARS {
        Some(truncate_chars(&joined, MAX_RAW_EXTRACT_CHARS))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGLISH_PAGE: &str = "\
==English==
===Etymology===
From {{inh|en|enm|rennen}}, from [[Old English]] ''rinnan''.

===Pronunciation===
* {{IPA|en|/ɹʌn/}}

===Verb===
{{en-verb|runs|running|ran|run}}
# To [[move]] swiftly on foot.
#: ''He '''ran''' home.''
# To [[flow]].
## Of a liquid: to leak.
#* 1900, Some Author, quote text here

====Synonyms====
* [[sprint]]

===Noun===
# An act of running.
";

    const SPANISH_PAGE: &str = "\
== {{lengua|es}} ==
{{pron-graf|fone=ˈpe.ro}}

=== Etimología ===
{{etimología|la|perrus}}. Del latín vulgar, de origen incierto.

=== {{sustantivo masculino|es}} ===
;1 {{csem|zoología}}: Mamífero doméstico de la familia de los cánidos. {{sinónimo|can|chucho}}
;2: Persona despreciable.
;3: [[terco|Persona terca]].

=== {{verbo|es}} ===
;1: Sin glosas definidas aquí.
";

    #[test]
    fn test_scenario_c_pronunciation_only() {
        let extraction = SectionExtractor::new("en").extract("{{IPA|en|/rʌn/}}");
        assert_eq!(extraction.pronunciations, vec!["/rʌn/"]);
        assert!(extraction.senses.is_empty());
        assert_eq!(extraction.raw_extract, None);
        assert_eq!(extraction.etymology, None);
    }

    #[test]
    fn test_scenario_e_unlabeled_numbered_lines() {
        let markup = "==Overview==\n# The first numbered sense\n# The second numbered sense\n# The third numbered sense\n";
        let extraction = SectionExtractor::new("en").extract(markup);
        assert_eq!(extraction.senses.len(), 1);
        assert_eq!(extraction.senses[0].part_of_speech, "definition");
        assert_eq!(extraction.senses[0].definitions.len(), 3);
        assert_eq!(extraction.senses[0].definitions[0].text, "The first numbered sense");
        assert_eq!(extraction.raw_extract, None);
    }

    #[test]
    fn test_english_plain_headings() {
        let extraction = SectionExtractor::new("en").extract(ENGLISH_PAGE);
        assert_eq!(extraction.senses.len(), 2);

        // Heading table order, not document order
        let noun = &extraction.senses[0];
        assert_eq!(noun.part_of_speech, "noun");
        assert_eq!(noun.definitions.len(), 1);
        assert_eq!(noun.definitions[0].text, "An act of running.");

        let verb = &extraction.senses[1];
        assert_eq!(verb.part_of_speech, "verb");
        let texts: Vec<_> = verb.definitions.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["To move swiftly on foot.", "To flow."]);
    }

    #[test]
    fn test_english_pronunciation_and_etymology() {
        let extraction = SectionExtractor::new("en").extract(ENGLISH_PAGE);
        assert_eq!(extraction.pronunciations, vec!["/ɹʌn/"]);
        assert_eq!(
            extraction.etymology.as_deref(),
            Some("From , from Old English rinnan.")
        );
    }

    #[test]
    fn test_spanish_template_headings() {
        let extraction = SectionExtractor::new("es").extract(SPANISH_PAGE);
        assert_eq!(extraction.senses.len(), 2);

        let noun = &extraction.senses[0];
        assert_eq!(noun.part_of_speech, "noun");
        let texts: Vec<_> = noun.definitions.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Mamífero doméstico de la familia de los cánidos.",
                "Persona despreciable.",
                "Persona terca.",
            ]
        );
        assert_eq!(extraction.senses[1].part_of_speech, "verb");
        assert_eq!(
            extraction.etymology.as_deref(),
            Some(". Del latín vulgar, de origen incierto.")
        );
    }

    #[test]
    fn test_template_headings_win_over_plain_headings() {
        let markup = format!("{SPANISH_PAGE}\n===Noun===\n# An English gloss that should be ignored.\n");
        let extraction = SectionExtractor::new("es").extract(&markup);
        assert!(extraction.senses.iter().all(|s| s.part_of_speech != "definition"));
        assert!(
            extraction
                .senses
                .iter()
                .flat_map(|s| &s.definitions)
                .all(|d| !d.text.contains("English gloss"))
        );
    }

    #[test]
    fn test_definitions_capped_at_five() {
        let mut markup = String::from("===Noun===\n");
        for i in 1..=8 {
            markup.push_str(&format!("# Definition number {i}\n"));
        }
        let extraction = SectionExtractor::new("en").extract(&markup);
        assert_eq!(extraction.senses[0].definitions.len(), MAX_DEFINITIONS_PER_SENSE);
        assert_eq!(extraction.senses[0].definitions[4].text, "Definition number 5");
    }

    #[test]
    fn test_empty_definitions_are_dropped() {
        let markup = "===Verb===\n# {{lb|en|transitive}}\n# To walk.\n";
        let extraction = SectionExtractor::new("en").extract(markup);
        assert_eq!(extraction.senses[0].definitions.len(), 1);
        assert_eq!(extraction.senses[0].definitions[0].text, "To walk.");
    }

    #[test]
    fn test_unlabeled_lines_must_be_long_enough() {
        let markup = "# tiny\n# [[a]]\n# Long enough definition\n";
        let extraction = SectionExtractor::new("en").extract(markup);
        assert_eq!(extraction.senses.len(), 1);
        assert_eq!(extraction.senses[0].definitions.len(), 1);
    }

    #[test]
    fn test_raw_extract_fallback() {
        let markup = "\
{{wikipedia}}
== Overview ==
'''Run''' is a [[word]] with a very long history indeed.
* a list item that is long enough to count
: an indented line that is long enough too
short line
Second prose line that is definitely long enough.
Third prose line, also long enough to be used.
Fourth prose line is past the three line limit.
";
        let extraction = SectionExtractor::new("en").extract(markup);
        assert!(extraction.senses.is_empty());
        assert_eq!(
            extraction.raw_extract.as_deref(),
            Some(
                "Run is a word with a very long history indeed. \
                 Second prose line that is definitely long enough. \
                 Third prose line, also long enough to be used."
            )
        );
    }

    #[test]
    fn test_raw_extract_is_truncated() {
        let line = "word ".repeat(100);
        let extraction = SectionExtractor::new("en").extract(&line);
        let extract = extraction.raw_extract.unwrap();
        assert_eq!(extract.chars().count(), MAX_RAW_EXTRACT_CHARS);
    }

    #[test]
    fn test_raw_extract_requires_enough_text() {
        let markup = "This line has {{many|templates}} {{in|it}} {{a|b}} {{c|d}}";
        let extraction = SectionExtractor::new("en").extract(markup);
        assert_eq!(extraction.raw_extract, None);
    }

    #[test]
    fn test_etymology_language_priority() {
        let markup = "\
===Etymology===
From the English side of the page, long enough.
===Étymologie===
Du côté français de la page, assez long.
";
        let fr = SectionExtractor::new("fr").extract(markup);
        assert_eq!(fr.etymology.as_deref(), Some("Du côté français de la page, assez long."));

        let en = SectionExtractor::new("en").extract(markup);
        assert_eq!(en.etymology.as_deref(), Some("From the English side of the page, long enough."));
    }

    #[test]
    fn test_etymology_numbered_and_templated_headings() {
        let numbered = "===Etymology 2===\nBorrowed from somewhere far away.\n===Noun===\n# x";
        assert_eq!(
            SectionExtractor::new("en").extract(numbered).etymology.as_deref(),
            Some("Borrowed from somewhere far away.")
        );

        let templated = "=== {{S|étymologie}} ===\n: Du latin ''canis'', chien domestique.\n=== {{S|nom|fr}} ===";
        assert_eq!(
            SectionExtractor::new("fr").extract(templated).etymology.as_deref(),
            Some(": Du latin canis, chien domestique.")
        );
    }

    #[test]
    fn test_etymology_stops_at_same_level_heading() {
        let markup = "==Etymology==\nFrom Latin currere.\n===Note===\nA nested remark.\n==Verb==\n# to run";
        let etymology = SectionExtractor::new("en").extract(markup).etymology.unwrap();
        assert_eq!(etymology, "From Latin currere.");
        assert!(!etymology.contains("to run"));
    }

    #[test]
    fn test_numbered_etymology_excludes_nested_sections() {
        let markup = "\
===Etymology 1===
From Old English rinnan.

====Verb====
# To move swiftly on foot.
#: He ran home.

===Etymology 2===
From Middle English ronne.

====Noun====
# An act of running.
";
        let extraction = SectionExtractor::new("en").extract(markup);
        assert_eq!(extraction.etymology.as_deref(), Some("From Old English rinnan."));
        assert_eq!(extraction.senses.len(), 2);
    }

    #[test]
    fn test_ipa_template_language_code_is_not_a_pronunciation() {
        let extraction = SectionExtractor::new("en").extract("{{IPA|en}}");
        assert!(extraction.pronunciations.is_empty());

        let extraction = SectionExtractor::new("en").extract("{{IPA|/ɹʌn/}}");
        assert_eq!(extraction.pronunciations, vec!["/ɹʌn/"]);

        let extraction = SectionExtractor::new("pt").extract("{{IPA|pt-br|[ˈkaʁu]}}");
        assert_eq!(extraction.pronunciations, vec!["[ˈkaʁu]"]);

        assert!(is_language_code("zh-min-nan"));
        assert!(!is_language_code("/en/"));
    }

    #[test]
    fn test_short_etymology_rejected_and_long_truncated() {
        let short = "===Etymology===\nUnknown.\n";
        assert_eq!(SectionExtractor::new("en").extract(short).etymology, None);

        let long = format!("===Etymology===\n{}\n", "origin ".repeat(120));
        let etymology = SectionExtractor::new("en").extract(&long).etymology.unwrap();
        assert_eq!(etymology.chars().count(), MAX_ETYMOLOGY_CHARS);
    }

    #[test]
    fn test_pronunciations_deduplicated_in_order() {
        let markup = "{{IPA|es|/ˈpe.ro/|/ˈpe.r̄o/}} and /ˈpe.ro/ again, plus http://example.org/path/ and and/or/so";
        let extraction = SectionExtractor::new("es").extract(markup);
        assert_eq!(extraction.pronunciations, vec!["/ˈpe.ro/", "/ˈpe.r̄o/"]);
    }

    #[test]
    fn test_heading_parsing() {
        assert_eq!(parse_heading("===Noun==="), Some((3, "Noun".to_string())));
        assert_eq!(parse_heading("== {{lengua|es}} =="), Some((2, "{{lengua|es}}".to_string())));
        assert_eq!(parse_heading("===="), None);
        assert_eq!(parse_heading("= x"), None);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = SectionExtractor::new("es");
        assert_eq!(extractor.extract(SPANISH_PAGE), extractor.extract(SPANISH_PAGE));
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = sense_strategy_names().collect();
        assert_eq!(names, vec!["template-headings", "plain-headings", "numbered-lines"]);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(SectionExtractor::new("en").extract(""), Extraction::default());
    }
}
