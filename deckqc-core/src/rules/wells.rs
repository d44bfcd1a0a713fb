use super::engine::QcRule;
use crate::config::QcConfig;
use crate::types::{Finding, StructuredDeck};
use anyhow::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static WELL_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']+)'").unwrap());

/// First single-quoted token per line, the position ECLIPSE well records
/// put the well name in. A sorted set keeps downstream messages stable.
pub fn extract_well_names(block: &str) -> BTreeSet<String> {
    block
        .lines()
        .filter_map(|line| WELL_NAME_REGEX.captures(line))
        .map(|captures| captures[1].to_string())
        .collect()
}

/// Cross-checks well control sections against WELSPECS: controls for a well
/// that was never declared will abort a simulator run at startup.
pub struct WellspecsConsistency;

impl QcRule for WellspecsConsistency {
    fn name(&self) -> &str {
        "wellspecs-consistency"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        let mut controls = String::new();
        for name in ["WCONPROD", "WCONINJE"] {
            if let Some(section) = deck.section(name) {
                controls.push_str(&section.content);
                controls.push('\n');
            }
        }
        if controls.trim().is_empty() {
            return Ok(Vec::new());
        }

        // a WELSPECS section with a blank body declares nothing
        let declared = match deck.section("WELSPECS").filter(|s| !s.is_blank()) {
            Some(section) => extract_well_names(&section.content),
            None => {
                return Ok(vec![Finding::error(
                    self.name(),
                    "well controls found but no WELSPECS section",
                )]);
            }
        };

        let referenced = extract_well_names(&controls);
        let missing: Vec<String> = referenced.difference(&declared).cloned().collect();
        if missing.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::error(
            self.name(),
            format!("wells missing from WELSPECS: {}", missing.join(", ")),
        )
        .in_section("WELSPECS")])
    }
}

/// Flags COMPDAT completion records that state no OPEN/SHUT status. Blank
/// lines, comments, and the record terminator are not completion records.
pub struct CompdatOpenFlag;

impl QcRule for CompdatOpenFlag {
    fn name(&self) -> &str {
        "compdat-open-flag"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        let Some(compdat) = deck.section("COMPDAT") else {
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        for line in compdat.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") || trimmed == "/" {
                continue;
            }
            let upper = trimmed.to_uppercase();
            if !upper.contains("OPEN") && !upper.contains("SHUT") {
                findings.push(
                    Finding::warning(
                        self.name(),
                        format!("COMPDAT entry has no OPEN/SHUT status: {trimmed}"),
                    )
                    .in_section("COMPDAT"),
                );
            }
        }

        Ok(findings)
    }
}
