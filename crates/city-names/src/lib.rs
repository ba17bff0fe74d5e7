//! City-name matching for the PMMT reporting API.
//!
//! Municipality names arrive from free-text sources with inconsistent
//! apostrophes, accents and spacing ("Lambari do Oeste", "LAMBARI D'OESTE",
//! "Cuiaba"). This crate turns one raw name into an ordered list of candidate
//! strings to try against the canonical city column, most specific first and
//! ending in `%…%` wildcard fallbacks.
//!
//! # Example
//!
//! ```
//! use city_names::generate_search_patterns;
//!
//! let patterns = generate_search_patterns("Lambari do Oeste");
//! assert_eq!(patterns[0], "LAMBARI DO OESTE");
//! assert!(patterns.contains(&"LAMBARI D'OESTE".to_string()));
//! ```

pub mod corrections;
pub mod error;
pub mod normalize;
pub mod patterns;

pub use corrections::{Correction, CorrectionTable};
pub use error::CorrectionError;
pub use normalize::strip_accents;
pub use patterns::{generate_search_patterns, BaseForms, CityNormalizer};
