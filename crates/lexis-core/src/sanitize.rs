//! Markup-to-plain-text cleanup for single fragments of wiki markup.

use once_cell::sync::Lazy;
use regex::Regex;

/// Templates whose only job is to wrap a display value.
/// The index is the positional argument that holds that value.
const DISPLAY_TEMPLATES: &[(&str, usize)] = &[
    ("impropia", 0),
    ("plm", 0),
    ("l", 1),
    ("m", 1),
    ("link", 1),
    ("term", 1),
];

/// Name prefixes of pure cross-reference templates, dropped with their arguments
const ANNOTATION_TEMPLATES: &[&str] = &[
    "sinónimo",
    "antónimo",
    "relacionado",
    "hipónimo",
    "hiperónimo",
    "syn",
    "ant",
    "rel",
];

static INNER_TEMPLATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid template regex"));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[(?:[^\]|]+\|)?([^\]]+)\]\]").expect("valid link regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"'''([^']+)'''").expect("valid bold regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"''([^']+)''").expect("valid italic regex"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("valid tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip wiki markup from a fragment, leaving readable prose.
///
/// Templates are resolved innermost first. The output never contains
/// `{{`, `}}`, `[[`, `]]` or anything tag-shaped.
pub fn sanitize(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }

    let mut text = resolve_templates(raw);

    text = LINK.replace_all(&text, "$1").into_owned();
    text = BOLD.replace_all(&text, "$1").into_owned();
    text = ITALIC.replace_all(&text, "$1").into_owned();

    // Unbalanced input can leave markers behind, and removing one kind can
    // join the halves of another, so repeat until nothing changes.
    loop {
        let stripped = strip_leftovers(&TAG.replace_all(&text, ""));
        if stripped == text {
            break;
        }
        text = stripped;
    }

    collapse_whitespace(&text)
}

/// Collapse whitespace runs to one space and trim
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

fn resolve_templates(raw: &str) -> String {
    let mut text = raw.to_string();
    while INNER_TEMPLATE.is_match(&text) {
        text = INNER_TEMPLATE
            .replace_all(&text, |caps: &regex::Captures| resolve_template(&caps[1]))
            .into_owned();
    }
    text
}

enum TemplateKind {
    Display(usize),
    Annotation,
    Unknown,
}

impl TemplateKind {
    fn classify(name: &str) -> Self {
        if let Some(&(_, index)) = DISPLAY_TEMPLATES.iter().find(|(n, _)| *n == name) {
            TemplateKind::Display(index)
        } else if ANNOTATION_TEMPLATES
            .iter()
            .any(|prefix| name.starts_with(prefix))
        {
            TemplateKind::Annotation
        } else {
            TemplateKind::Unknown
        }
    }
}

fn resolve_template(body: &str) -> String {
    let args = split_template_args(body);
    let Some((name, rest)) = args.split_first() else {
        return String::new();
    };

    match TemplateKind::classify(&name.trim().to_lowercase()) {
        TemplateKind::Display(index) => rest
            .iter()
            .filter(|arg| !is_named_arg(arg))
            .nth(index)
            .map(|arg| arg.trim().to_string())
            .unwrap_or_default(),
        TemplateKind::Annotation | TemplateKind::Unknown => String::new(),
    }
}

/// Split a template body on `|`, ignoring pipes inside `[[...]]` links
pub(crate) fn split_template_args(body: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '[' if chars.peek() == Some(&'[') => {
                chars.next();
                depth += 1;
                current.push_str("[[");
            }
            ']' if chars.peek() == Some(&']') && depth > 0 => {
                chars.next();
                depth -= 1;
                current.push_str("]]");
            }
            '|' if depth == 0 => args.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    args.push(current);
    args
}

fn is_named_arg(arg: &str) -> bool {
    arg.split_once('=')
        .is_some_and(|(key, _)| !key.trim().is_empty() && !key.contains(' '))
}

fn strip_leftovers(text: &str) -> String {
    text.replace("{{", "")
        .replace("}}", "")
        .replace("[[", "")
        .replace("]]", "")
}
