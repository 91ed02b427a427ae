//! Persona and curriculum lookup tables.
//!
//! Both tables are plain values handed to the tutoring engine at
//! construction time: a mapping from subject name to a tutor persona, and
//! from `(subject name, grade)` to a structured curriculum outline. Each
//! ships with built-in Lithuanian data and can be extended (or replaced)
//! from TOML, so new subjects and grades are a configuration change rather
//! than a code change.

pub mod outline;
pub mod persona;

pub use outline::{CurriculumCatalog, CurriculumOutline, CurriculumUnit};
pub use persona::{Persona, PersonaCatalog};

use thiserror::Error;

/// Errors from loading a catalog out of TOML.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to parse catalog TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
