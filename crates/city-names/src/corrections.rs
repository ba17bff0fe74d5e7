//! Known city-name spelling corrections.
//!
//! The table is data: the built-in entries mirror `data/city_corrections.json`,
//! and a deployment can point `CITY_CORRECTIONS_PATH` at its own copy of that
//! file to add spellings without a rebuild.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CorrectionError;

/// Built-in corrections, applied in order.
const DEFAULT_CORRECTIONS: &[(&str, &str)] = &[
    ("POXOREU", "POXOREO"),
    ("CUIABA", "CUIABÁ"),
    ("VARZEA", "VÁRZEA"),
];

/// A single substring replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Upper-case, accent-free text to look for.
    pub from: String,
    /// Canonical spelling that replaces it.
    pub to: String,
}

/// Ordered list of corrections applied to fully-normalized city names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionTable {
    entries: Vec<Correction>,
}

impl CorrectionTable {
    /// Build a table from explicit entries.
    pub fn new(entries: Vec<Correction>) -> Result<Self, CorrectionError> {
        if let Some(index) = entries.iter().position(|c| c.from.is_empty()) {
            return Err(CorrectionError::EmptyFrom { index });
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{"from": …, "to": …}` objects.
    pub fn from_json(json: &str) -> Result<Self, CorrectionError> {
        let entries: Vec<Correction> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Load a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorrectionError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CorrectionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            "Loaded city correction table"
        );
        Ok(table)
    }

    /// Apply every correction in order.
    pub fn apply(&self, text: &str) -> String {
        self.entries
            .iter()
            .fold(text.to_string(), |acc, c| acc.replace(&c.from, &c.to))
    }

    pub fn entries(&self) -> &[Correction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CorrectionTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_CORRECTIONS
                .iter()
                .map(|(from, to)| Correction {
                    from: (*from).to_string(),
                    to: (*to).to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_shipped_file() {
        let shipped = CorrectionTable::from_json(include_str!("../data/city_corrections.json"))
            .unwrap();
        assert_eq!(shipped, CorrectionTable::default());
    }

    #[test]
    fn test_apply_in_order() {
        let table = CorrectionTable::default();
        assert_eq!(table.apply("POXOREU"), "POXOREO");
        assert_eq!(table.apply("VARZEA GRANDE"), "VÁRZEA GRANDE");
        assert_eq!(table.apply("SINOP"), "SINOP");
    }

    #[test]
    fn test_custom_table() {
        let table = CorrectionTable::from_json(
            r#"[{"from": "NORTELANDIA", "to": "NORTELÂNDIA"}]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.apply("NORTELANDIA"), "NORTELÂNDIA");
        assert_eq!(table.apply("CUIABA"), "CUIABA");
    }

    #[test]
    fn test_empty_from_rejected() {
        let err = CorrectionTable::from_json(r#"[{"from": "A", "to": "B"}, {"from": "", "to": "X"}]"#)
            .unwrap_err();
        assert!(matches!(err, CorrectionError::EmptyFrom { index: 1 }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = CorrectionTable::from_json(r#"{"POXOREU": "POXOREO"}"#).unwrap_err();
        assert!(matches!(err, CorrectionError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = CorrectionTable::load("/nonexistent/city_corrections.json").unwrap_err();
        assert!(matches!(err, CorrectionError::Io { .. }));
    }
}
