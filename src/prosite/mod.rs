//! PROSITE motif patterns, catalog loading and peptide scanning.

pub mod catalog;
pub mod pattern;
pub mod scan;

pub use catalog::{Motif, MotifCatalog};
pub use pattern::Pattern;
pub use scan::{MotifMatches, scan};
