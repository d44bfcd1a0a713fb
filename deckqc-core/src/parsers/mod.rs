// Deck parsing layer - delegates to the two scanners:
// - sections.rs: keyword-delimited section tokenizer
// - tables.rs: numbered VFP/PVT block extractor
//
// Both are pure line scanners over in-memory text. Neither performs I/O and
// neither rejects input; malformed text degrades to "nothing recognized".

pub mod sections;
pub mod tables;

pub use sections::{SectionTokenizer, DEFAULT_SECTION_KEYWORDS};
pub use tables::TableExtractor;
