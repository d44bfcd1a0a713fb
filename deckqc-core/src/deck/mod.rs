// Structured deck layer:
// - builder.rs: raw text -> StructuredDeck assembly, the one failure point
// - summary.rs: mechanical per-section statistics
// - serialization.rs: report assembly, retrieval hand-off, save paths

pub mod builder;
pub mod serialization;
pub mod summary;

pub use builder::{content_fingerprint, DeckBuilder};
