/// Part-of-speech labels as they appear upstream, mapped to canonical tags.
///
/// Capitalized keys double as the English section headings the extractor
/// looks for, so keep other languages' labels lower-case.
pub const POS_ALIASES: &[(&str, &str)] = &[
    // English
    ("Noun", "noun"),
    ("Proper noun", "proper noun"),
    ("Verb", "verb"),
    ("Adjective", "adjective"),
    ("Adverb", "adverb"),
    ("Pronoun", "pronoun"),
    ("Preposition", "preposition"),
    ("Conjunction", "conjunction"),
    ("Interjection", "interjection"),
    ("Article", "article"),
    ("Determiner", "determiner"),
    ("Numeral", "numeral"),
    ("Particle", "particle"),
    // Spanish
    ("sustantivo", "noun"),
    ("verbo", "verb"),
    ("adjetivo", "adjective"),
    ("adverbio", "adverb"),
    ("pronombre", "pronoun"),
    ("preposición", "preposition"),
    ("conjunción", "conjunction"),
    ("interjección", "interjection"),
    ("artículo", "article"),
    // Portuguese
    ("substantivo", "noun"),
    ("advérbio", "adverb"),
    ("preposição", "preposition"),
    ("conjunção", "conjunction"),
    ("interjeição", "interjection"),
    // Italian
    ("sostantivo", "noun"),
    ("aggettivo", "adjective"),
    ("avverbio", "adverb"),
    ("pronome", "pronoun"),
    ("preposizione", "preposition"),
    ("congiunzione", "conjunction"),
    ("interiezione", "interjection"),
    // French
    ("nom", "noun"),
    ("verbe", "verb"),
    ("adjectif", "adjective"),
    ("adverbe", "adverb"),
    ("pronom", "pronoun"),
    ("préposition", "preposition"),
    ("conjonction", "conjunction"),
];

/// English headings (`===Noun===`) in table order
pub fn english_headings() -> impl Iterator<Item = &'static str> {
    POS_ALIASES
        .iter()
        .map(|(label, _)| *label)
        .filter(|label| label.starts_with(|c: char| c.is_ascii_uppercase()))
}

/// Exact match first, then case-insensitive
pub fn lookup_alias(label: &str) -> Option<&'static str> {
    POS_ALIASES
        .iter()
        .find(|(key, _)| *key == label)
        .or_else(|| {
            let lower = label.to_lowercase();
            POS_ALIASES.iter().find(|(key, _)| key.to_lowercase() == lower)
        })
        .map(|(_, tag)| *tag)
}

/// Canonical tag for a raw label, or the label lower-cased when unmapped
pub fn normalize_part_of_speech(label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        return String::new();
    }

    lookup_alias(label)
        .or_else(|| label.split_whitespace().next().and_then(lookup_alias))
        .map(str::to_string)
        .unwrap_or_else(|| label.to_lowercase())
}
