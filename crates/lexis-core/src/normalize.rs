//! Reshapes structured dictionary records into [`WordEntry`] whatever field
//! names the upstream happened to use.

use lexis_types::{Definition, Sense, WordEntry};
use serde_json::{Map, Value};

use crate::extract::{MAX_DEFINITIONS_PER_SENSE, MAX_ETYMOLOGY_CHARS};
use crate::pos::normalize_part_of_speech;
use crate::sanitize::truncate_chars;

const HEADWORD_FIELDS: &[&str] = &["word", "headword"];
const PART_OF_SPEECH_FIELDS: &[&str] = &["partOfSpeech", "part_of_speech", "pos"];
/// Fields that may hold a definition's text, first non-empty wins
const DEFINITION_FIELDS: &[&str] = &["definition", "text", "meaning", "value", "content"];
/// Top-level lists of sense groups, each carrying its own definitions
const GROUP_FIELDS: &[&str] = &["entries", "meanings"];
const ETYMOLOGY_FIELDS: &[&str] = &["etymology", "origin"];

type Fields = Map<String, Value>;
type SenseStrategy = fn(&Fields) -> Vec<Sense>;

/// Sense layouts in priority order, first non-empty result wins
const SENSE_STRATEGIES: &[(&str, SenseStrategy)] = &[
    ("grouped", grouped_senses),
    ("flat-definitions", flat_definition_senses),
    ("sense-list", sense_list_senses),
    ("single-definition", single_definition_sense),
];

type PronunciationShape = fn(&Fields) -> Option<String>;

/// Where a pronunciation may live, first hit wins
const PRONUNCIATION_SHAPES: &[(&str, PronunciationShape)] = &[
    ("pronunciation", pronunciation_field),
    ("phonetic", phonetic_field),
    ("phonetics", phonetics_field),
    ("pronunciations", pronunciations_field),
    ("group-pronunciations", group_pronunciation),
];

/// Names of the sense layouts, in the order they are tried
pub fn sense_strategy_names() -> impl Iterator<Item = &'static str> {
    SENSE_STRATEGIES.iter().map(|(name, _)| *name)
}

/// Normalize one upstream record.
///
/// Returns `None` only when the record carries no headword. A record that is
/// a list is reduced to its first element that has one.
pub fn normalize(record: &Value, language: &str) -> Option<WordEntry> {
    let fields = root_fields(record)?;
    let word = first_str(fields, HEADWORD_FIELDS)?.to_string();

    let senses = SENSE_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let senses = strategy(fields);
            if senses.is_empty() {
                None
            } else {
                tracing::debug!(strategy = *name, senses = senses.len(), "normalized senses");
                Some(senses)
            }
        })
        .unwrap_or_default();

    let pronunciations = PRONUNCIATION_SHAPES
        .iter()
        .find_map(|(_, shape)| shape(fields))
        .into_iter()
        .collect();

    let etymology =
        first_str(fields, ETYMOLOGY_FIELDS).map(|text| truncate_chars(text, MAX_ETYMOLOGY_CHARS));

    Some(WordEntry {
        word,
        language: language.to_string(),
        pronunciations,
        etymology,
        senses,
        raw_extract: None,
        source_url: source_url(fields),
        is_fallback: false,
    })
}

fn root_fields(record: &Value) -> Option<&Fields> {
    match record {
        Value::Object(fields) => Some(fields),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_object)
            .find(|fields| first_str(fields, HEADWORD_FIELDS).is_some()),
        _ => None,
    }
}

/// First of `names` holding a non-blank string, trimmed
fn first_str<'a>(fields: &'a Fields, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| fields.get(*name).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
}

fn part_of_speech<'a>(fields: &'a Fields, default: &'a str) -> &'a str {
    first_str(fields, PART_OF_SPEECH_FIELDS).unwrap_or(default)
}

fn sense(part_of_speech: &str, definitions: Vec<Definition>) -> Option<Sense> {
    let definitions: Vec<Definition> = definitions
        .into_iter()
        .take(MAX_DEFINITIONS_PER_SENSE)
        .collect();
    if definitions.is_empty() {
        return None;
    }
    Some(Sense {
        part_of_speech: normalize_part_of_speech(part_of_speech),
        definitions,
    })
}

fn grouped_senses(fields: &Fields) -> Vec<Sense> {
    let top_pos = part_of_speech(fields, "");
    GROUP_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name).and_then(Value::as_array))
        .map(|groups| {
            groups
                .iter()
                .filter_map(|group| sense_from_group(group, top_pos))
                .collect::<Vec<_>>()
        })
        .find(|senses| !senses.is_empty())
        .unwrap_or_default()
}

fn flat_definition_senses(fields: &Fields) -> Vec<Sense> {
    let Some(items) = fields.get("definitions").and_then(Value::as_array) else {
        return vec![];
    };
    let definitions = items.iter().filter_map(definition_from_item).collect();
    sense(part_of_speech(fields, ""), definitions)
        .into_iter()
        .collect()
}

fn sense_list_senses(fields: &Fields) -> Vec<Sense> {
    let Some(items) = fields.get("senses").and_then(Value::as_array) else {
        return vec![];
    };
    let top_pos = part_of_speech(fields, "");
    items
        .iter()
        .filter_map(|item| sense_from_group(item, top_pos))
        .collect()
}

fn single_definition_sense(fields: &Fields) -> Vec<Sense> {
    let Some(text) = fields.get("definition").and_then(Value::as_str) else {
        return vec![];
    };
    let definitions = definition_from_item(&Value::String(text.to_string()))
        .into_iter()
        .collect();
    sense(part_of_speech(fields, ""), definitions)
        .into_iter()
        .collect()
}

/// A sense-like record: its own definitions list, a non-list `definitions`,
/// nested `senses`, or a definition carried on the record itself
fn sense_from_group(group: &Value, default_pos: &str) -> Option<Sense> {
    let fields = group.as_object()?;
    let pos = part_of_speech(fields, default_pos);

    let mut definitions: Vec<Definition> = match fields.get("definitions") {
        Some(Value::Array(items)) => items.iter().filter_map(definition_from_item).collect(),
        Some(other) => definition_from_item(other).into_iter().collect(),
        None => vec![],
    };
    if definitions.is_empty() {
        if let Some(items) = fields.get("senses").and_then(Value::as_array) {
            definitions = items.iter().filter_map(definition_from_item).collect();
        }
    }
    if definitions.is_empty() {
        definitions = definition_from_item(group).into_iter().collect();
    }

    sense(pos, definitions)
}

fn definition_from_item(item: &Value) -> Option<Definition> {
    let (text, fields) = match item {
        Value::String(text) => (text.trim(), None),
        Value::Object(fields) => (first_str(fields, DEFINITION_FIELDS)?, Some(fields)),
        _ => return None,
    };
    if text.is_empty() {
        return None;
    }

    let example = fields.and_then(|f| {
        f.get("example")
            .and_then(Value::as_str)
            .or_else(|| {
                f.get("examples")
                    .and_then(Value::as_array)
                    .and_then(|examples| examples.iter().find_map(Value::as_str))
            })
            .map(str::to_string)
    });

    let synonyms = fields
        .and_then(|f| f.get("synonyms"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(Definition {
        text: text.to_string(),
        example,
        synonyms,
    })
}

/// A bare string, an object with `text`, or the first usable list element
fn pronunciation_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Object(fields) => first_str(fields, &["text", "ipa"]).map(str::to_string),
        Value::Array(items) => items.iter().find_map(pronunciation_of),
        _ => None,
    }
}

fn pronunciation_field(fields: &Fields) -> Option<String> {
    fields.get("pronunciation").and_then(pronunciation_of)
}

fn phonetic_field(fields: &Fields) -> Option<String> {
    fields.get("phonetic").and_then(pronunciation_of)
}

fn phonetics_field(fields: &Fields) -> Option<String> {
    fields.get("phonetics").and_then(pronunciation_of)
}

fn pronunciations_field(fields: &Fields) -> Option<String> {
    fields.get("pronunciations").and_then(pronunciation_of)
}

fn group_pronunciation(fields: &Fields) -> Option<String> {
    GROUP_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name).and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_object)
        .find_map(|group| group.get("pronunciations").and_then(pronunciation_of))
}

fn source_url(fields: &Fields) -> Option<String> {
    fields
        .get("source")
        .and_then(Value::as_object)
        .and_then(|source| first_str(source, &["url"]))
        .or_else(|| {
            fields
                .get("sourceUrls")
                .and_then(Value::as_array)
                .and_then(|urls| urls.iter().filter_map(Value::as_str).next())
        })
        .map(str::to_string)
}
