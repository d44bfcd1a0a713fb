use super::engine::QcRule;
use crate::config::QcConfig;
use crate::types::{Finding, StructuredDeck};
use anyhow::Result;

/// Flags required sections absent for the deck's declared simulation mode.
/// The required list comes from config, so restart decks are not punished
/// for omitting SOLUTION.
pub struct MissingRequiredSection;

impl QcRule for MissingRequiredSection {
    fn name(&self) -> &str {
        "missing-required-section"
    }

    fn evaluate(&self, deck: &StructuredDeck, config: &QcConfig) -> Result<Vec<Finding>> {
        let findings = config
            .required_sections
            .iter()
            .filter(|name| !deck.has_section(name))
            .map(|name| {
                Finding::error(
                    self.name(),
                    format!("required section {} is missing for {} mode", name, config.mode),
                )
            })
            .collect();
        Ok(findings)
    }
}

/// Flags named sections whose body is empty or whitespace-only. END is
/// exempt: it is a bare terminator and an empty body is its normal shape.
pub struct EmptySection;

impl QcRule for EmptySection {
    fn name(&self) -> &str {
        "empty-section"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        let findings = deck
            .named_sections()
            .filter(|s| s.name != "END" && s.is_blank())
            .map(|s| {
                Finding::warning(self.name(), format!("section {} is empty", s.name))
                    .in_section(&s.name)
            })
            .collect();
        Ok(findings)
    }
}

/// Flags decks with no END keyword. A deck without a terminator usually
/// means a truncated file or an include that was never closed out.
pub struct MissingEndKeyword;

impl QcRule for MissingEndKeyword {
    fn name(&self) -> &str {
        "missing-end-keyword"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        if deck.has_section("END") {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::warning(
            self.name(),
            "deck has no END keyword",
        )])
    }
}
