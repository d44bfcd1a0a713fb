// DeckQC Core Library
//
// Parses ECLIPSE-style reservoir simulation decks into a structured model,
// runs QC rules over that structure, and emits findings, reports, and
// retrieval-ready documents.

pub mod types;
pub mod error;
pub mod parsers;
pub mod deck;
pub mod rules;
pub mod config;
pub mod index;
pub mod plan;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use deck::{content_fingerprint, DeckBuilder};
pub use error::DeckError;
pub use index::DocumentIndex;
pub use parsers::{SectionTokenizer, TableExtractor, DEFAULT_SECTION_KEYWORDS};
pub use plan::build_plan;
pub use processor::{DeckProcessor, PipelineStages, StepProfiler};
pub use rules::{QcEngine, QcRule};
pub use config::{QcConfig, QcConfigManager, RuleConfig};
