//! Text transforms applied to raw city names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::corrections::CorrectionTable;

/// Two-word connectives folded into a single token once punctuation is gone.
const CONNECTIVE_FOLDS: &[(&str, &str)] = &[
    ("DO OESTE", "DOESTE"),
    ("D OESTE", "DOESTE"),
    ("DA PRAIA", "DAPRAIA"),
    ("D PRAIA", "DAPRAIA"),
    ("DE GOIAS", "DEGOIAS"),
    ("D GOIAS", "DEGOIAS"),
];

/// Remove diacritics, keeping case and punctuation.
///
/// The text is NFKD-decomposed and every combining mark dropped, so `"Cuiabá"`
/// becomes `"Cuiaba"` and `"Poxoréu"` becomes `"Poxoreu"`.
pub fn strip_accents(text: &str) -> String {
    text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Upper-case and trim, nothing else.
pub fn upper_trimmed(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Upper-cased with accents removed and whitespace runs collapsed.
pub fn without_accents(raw: &str) -> String {
    collapse_whitespace(&strip_accents(&upper_trimmed(raw)))
}

/// Upper-cased with punctuation removed and connectives folded. Accents stay.
pub fn without_punctuation(raw: &str) -> String {
    fold_punctuation(&upper_trimmed(raw))
}

/// Accent-free, punctuation-free, with the correction table applied.
pub fn fully_normalized(raw: &str, corrections: &CorrectionTable) -> String {
    let folded = fold_punctuation(&strip_accents(&upper_trimmed(raw)));
    corrections.apply(&folded).trim().to_string()
}

fn fold_punctuation(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect();

    CONNECTIVE_FOLDS
        .iter()
        .fold(collapse_whitespace(&cleaned), |acc, (from, to)| {
            acc.replace(from, to)
        })
        .trim()
        .to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
