//! Search-pattern generation.

use indexmap::IndexSet;

use crate::corrections::CorrectionTable;
use crate::normalize;

/// How a detected connective expands into extra spellings.
enum Expansion {
    /// `<base> <form>` for each form, then `<base>%<suffix>`.
    Suffix {
        forms: &'static [&'static str],
        wildcard_suffix: &'static str,
    },
    /// Fixed candidates, independent of the rest of the name.
    Fixed(&'static [&'static str]),
}

/// Connectives checked against the original spelling, first match wins.
const CONNECTIVES: &[(&str, Expansion)] = &[
    (
        "D'OESTE",
        Expansion::Suffix {
            forms: &["D'OESTE", "DO OESTE", "D OESTE"],
            wildcard_suffix: "OESTE",
        },
    ),
    (
        "DO OESTE",
        Expansion::Suffix {
            forms: &["DO OESTE", "D'OESTE", "D OESTE"],
            wildcard_suffix: "OESTE",
        },
    ),
    (
        "DA PRAIA",
        Expansion::Suffix {
            forms: &["DA PRAIA", "D PRAIA"],
            wildcard_suffix: "PRAIA",
        },
    ),
    (
        "DE GOIAS",
        Expansion::Suffix {
            forms: &["DE GOIAS", "D GOIAS"],
            wildcard_suffix: "GOIAS",
        },
    ),
    ("POXORÉU", Expansion::Fixed(&["POXOREO", "POXORÉU", "%POXOR%"])),
    ("POXOREU", Expansion::Fixed(&["POXOREO", "POXORÉU", "%POXOR%"])),
];

/// The four base spellings derived from one raw name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseForms {
    /// Upper-cased and trimmed, punctuation and accents kept.
    pub original: String,
    /// Accents stripped, punctuation kept.
    pub no_accents: String,
    /// Punctuation stripped and connectives folded, accents kept.
    pub no_punctuation: String,
    /// Accents and punctuation stripped, corrections applied.
    pub fully_normalized: String,
}

impl BaseForms {
    fn as_array(&self) -> [&str; 4] {
        [
            &self.original,
            &self.no_accents,
            &self.no_punctuation,
            &self.fully_normalized,
        ]
    }
}

/// Generates ranked candidate spellings for city names.
#[derive(Debug, Clone, Default)]
pub struct CityNormalizer {
    corrections: CorrectionTable,
}

impl CityNormalizer {
    pub fn new(corrections: CorrectionTable) -> Self {
        Self { corrections }
    }

    pub fn corrections(&self) -> &CorrectionTable {
        &self.corrections
    }

    /// Compute the four base spellings of `raw`.
    pub fn base_forms(&self, raw: &str) -> BaseForms {
        BaseForms {
            original: normalize::upper_trimmed(raw),
            no_accents: normalize::without_accents(raw),
            no_punctuation: normalize::without_punctuation(raw),
            fully_normalized: normalize::fully_normalized(raw, &self.corrections),
        }
    }

    /// Candidate strings for an `ILIKE` lookup, most specific first.
    ///
    /// The sequence is the four base forms, then connective variants of the
    /// original spelling (if one is present), then each base form wrapped in
    /// `%…%`. Duplicates keep their first position.
    ///
    /// Blank input yields no candidates. Its wildcard form would be `%%`,
    /// which matches every city, so an empty name never reaches a lookup.
    pub fn search_patterns(&self, raw: &str) -> Vec<String> {
        if raw.trim().is_empty() {
            return Vec::new();
        }

        let forms = self.base_forms(raw);
        let mut patterns: IndexSet<String> = IndexSet::new();

        for form in forms.as_array() {
            patterns.insert(form.to_string());
        }

        patterns.extend(connective_variants(&forms.original));

        for form in forms.as_array() {
            patterns.insert(format!("%{form}%"));
        }

        patterns.into_iter().collect()
    }
}

/// Candidate strings for `raw` using the built-in correction table.
pub fn generate_search_patterns(raw: &str) -> Vec<String> {
    CityNormalizer::default().search_patterns(raw)
}

fn connective_variants(original: &str) -> Vec<String> {
    let Some((needle, expansion)) = CONNECTIVES
        .iter()
        .find(|(needle, _)| original.contains(needle))
    else {
        return Vec::new();
    };

    match expansion {
        Expansion::Suffix {
            forms,
            wildcard_suffix,
        } => {
            let base = original.replace(needle, "");
            let base = base.trim();
            forms
                .iter()
                .map(|form| format!("{base} {form}"))
                .chain(std::iter::once(format!("{base}%{wildcard_suffix}")))
                .collect()
        }
        Expansion::Fixed(candidates) => candidates.iter().map(|c| c.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_original_first_and_unique() {
        for raw in [
            "Cuiabá",
            "  lambari do oeste ",
            "Mirassol D'Oeste",
            "Poxoréu",
            "Sinop",
            "Várzea Grande",
            "Ponte da Praia",
        ] {
            let patterns = generate_search_patterns(raw);
            assert!(!patterns.is_empty());
            assert_eq!(patterns[0], raw.trim().to_uppercase());
            let unique: HashSet<_> = patterns.iter().collect();
            assert_eq!(unique.len(), patterns.len(), "duplicates for {raw:?}");
        }
    }

    #[test]
    fn test_blank_input() {
        assert!(generate_search_patterns("").is_empty());
        assert!(generate_search_patterns("   ").is_empty());
    }

    #[test]
    fn test_do_oeste_variants() {
        let patterns = generate_search_patterns("Lambari do Oeste");
        assert_eq!(
            patterns,
            vec![
                "LAMBARI DO OESTE",
                "LAMBARI DOESTE",
                "LAMBARI D'OESTE",
                "LAMBARI D OESTE",
                "LAMBARI%OESTE",
                "%LAMBARI DO OESTE%",
                "%LAMBARI DOESTE%",
            ]
        );
    }

    #[test]
    fn test_lambari_do_oeste_reaches_canonical_spelling() {
        let patterns = generate_search_patterns("  lambari do oeste ");
        assert!(patterns.iter().any(|p| p == "LAMBARI D'OESTE"));
        assert!(!patterns.iter().any(|p| p == "%%"));
    }

    #[test]
    fn test_apostrophe_oeste_variants() {
        let patterns = generate_search_patterns("Mirassol D'Oeste");
        assert!(patterns.contains(&"MIRASSOL D'OESTE".to_string()));
        assert!(patterns.contains(&"MIRASSOL DO OESTE".to_string()));
        assert!(patterns.contains(&"MIRASSOL%OESTE".to_string()));
    }

    #[test]
    fn test_apostrophe_wins_over_do() {
        // Only the first matching connective expands.
        let patterns = generate_search_patterns("GLORIA D'OESTE");
        let apostrophe = patterns.iter().position(|p| p == "GLORIA D'OESTE").unwrap();
        let spelled = patterns.iter().position(|p| p == "GLORIA DO OESTE").unwrap();
        assert!(apostrophe < spelled);
    }

    #[test]
    fn test_accented_city() {
        assert_eq!(
            generate_search_patterns("Cuiabá"),
            vec!["CUIABÁ", "CUIABA", "%CUIABÁ%", "%CUIABA%"]
        );
    }

    #[test]
    fn test_poxoreu_fixed_variants() {
        assert_eq!(
            generate_search_patterns("Poxoréu"),
            vec![
                "POXORÉU",
                "POXOREU",
                "POXOREO",
                "%POXOR%",
                "%POXORÉU%",
                "%POXOREU%",
                "%POXOREO%",
            ]
        );
    }

    #[test]
    fn test_da_praia_variants() {
        let patterns = generate_search_patterns("Ponte da Praia");
        assert!(patterns.contains(&"PONTE D PRAIA".to_string()));
        assert!(patterns.contains(&"PONTE%PRAIA".to_string()));
        assert!(patterns.contains(&"PONTE DAPRAIA".to_string()));
    }

    #[test]
    fn test_wildcards_last() {
        let patterns = generate_search_patterns("Nova Olímpia");
        let first_wildcard = patterns.iter().position(|p| p.starts_with('%')).unwrap();
        assert!(patterns[first_wildcard..]
            .iter()
            .all(|p| p.starts_with('%') && p.ends_with('%')));
    }

    #[test]
    fn test_custom_corrections() {
        let table = CorrectionTable::from_json(r#"[{"from": "OLIMPIA", "to": "OLÍMPIA"}]"#).unwrap();
        let normalizer = CityNormalizer::new(table);
        let forms = normalizer.base_forms("nova olimpia");
        assert_eq!(forms.fully_normalized, "NOVA OLÍMPIA");
    }
}
