//! Commit analysis - derives the next version from classified commits

pub mod version_analyzer;

pub use version_analyzer::{BumpPolicy, VersionAnalyzer};
