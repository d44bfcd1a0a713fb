use crate::error::{DeckError, Result};
use crate::parsers::{SectionTokenizer, TableExtractor};
use crate::types::{RawDeck, StructuredDeck};
use sha2::{Digest, Sha256};

/// Assembles a `StructuredDeck` from raw text: one tokenizer pass for
/// sections, one extractor pass per table kind, plus a content fingerprint.
///
/// This is the single failure point of the parsing pipeline. The scanners
/// themselves accept anything; a deck that yields no named sections is
/// rejected here so garbage input cannot sail through QC as "no findings".
pub struct DeckBuilder {
    tokenizer: SectionTokenizer,
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckBuilder {
    pub fn new() -> Self {
        Self {
            tokenizer: SectionTokenizer::new(),
        }
    }

    /// Builder with a non-standard section keyword list.
    pub fn with_tokenizer(tokenizer: SectionTokenizer) -> Self {
        Self { tokenizer }
    }

    pub fn build(&self, raw: &RawDeck) -> Result<StructuredDeck> {
        let sections = self.tokenizer.tokenize(&raw.content);
        let vfp = TableExtractor::vfp().extract(&raw.content);
        let pvt = TableExtractor::pvt().extract(&raw.content);

        let deck = StructuredDeck {
            name: raw.name.clone(),
            content_hash: content_fingerprint(&raw.content),
            sections,
            vfp,
            pvt,
        };

        // A preamble alone does not count: it means no recognized keyword
        // appeared anywhere in the file.
        if deck.named_sections().next().is_none() {
            return Err(DeckError::EmptyDeck {
                deck: raw.name.clone(),
            });
        }

        Ok(deck)
    }
}

/// sha256 over the full raw text, for report provenance.
pub fn content_fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TableKind;

    const DECK: &str = "\
-- demo deck
RUNSPEC
TITLE demo
GRID
DX 100
VFP1
1000 2000
PVT2
500 1.1
SCHEDULE
WELSPECS
END";

    #[test]
    fn test_build_assembles_sections_and_tables() {
        let raw = RawDeck::new("demo", DECK);
        let deck = DeckBuilder::new().build(&raw).unwrap();

        assert_eq!(deck.name, "demo");
        assert!(deck.has_section("RUNSPEC"));
        assert!(deck.has_section("GRID"));
        assert!(deck.section("_PREAMBLE").is_some());
        assert_eq!(deck.tables(TableKind::Vfp).numbers(), vec!["1"]);
        assert_eq!(deck.tables(TableKind::Pvt).numbers(), vec!["2"]);
        assert_eq!(deck.content_hash.len(), 64);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let err = DeckBuilder::new()
            .build(&RawDeck::new("empty", ""))
            .unwrap_err();
        assert!(matches!(err, DeckError::EmptyDeck { .. }));
    }

    #[test]
    fn test_preamble_only_deck_is_rejected() {
        let err = DeckBuilder::new()
            .build(&RawDeck::new("notes", "no keywords here\njust prose"))
            .unwrap_err();
        assert!(err.to_string().contains("notes"));
    }

    #[test]
    fn test_fingerprint_is_stable_and_content_sensitive() {
        assert_eq!(content_fingerprint("abc"), content_fingerprint("abc"));
        assert_ne!(content_fingerprint("abc"), content_fingerprint("abd"));
    }

    #[test]
    fn test_table_headers_do_not_create_sections() {
        let raw = RawDeck::new("t", "RUNSPEC\nVFP3\nrow");
        let deck = DeckBuilder::new().build(&raw).unwrap();

        // VFP3 lives inside RUNSPEC's line range for the tokenizer and as
        // table 3 for the extractor; the two views share the same lines.
        assert_eq!(deck.sections.len(), 1);
        assert_eq!(deck.section("RUNSPEC").unwrap().content, "VFP3\nrow");
        assert_eq!(deck.vfp.get("3").unwrap().content, "row");
    }
}
