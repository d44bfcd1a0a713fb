use super::engine::QcRule;
use crate::config::QcConfig;
use crate::types::{Finding, StructuredDeck, TableKind};
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

// Spaced references like `VFP 7` in section bodies. Fused forms like `VFP7`
// are table definitions, not references, and are left to the extractor.
static VFP_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bVFP\s+(\d+)\b").unwrap());

static PVT_REF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPVT\s+(\d+)\b").unwrap());

/// Flags table numbers referenced in section bodies that no extracted table
/// defines. Comparison is numeric, so a reference `VFP 7` is satisfied by a
/// table headed `VFP07`.
pub struct OrphanTableReference;

impl QcRule for OrphanTableReference {
    fn name(&self) -> &str {
        "orphan-table-reference"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for section in &deck.sections {
            for (kind, regex) in [
                (TableKind::Vfp, &*VFP_REF_REGEX),
                (TableKind::Pvt, &*PVT_REF_REGEX),
            ] {
                for captures in regex.captures_iter(&section.content) {
                    let number = &captures[1];
                    let Ok(value) = number.parse::<u64>() else {
                        continue;
                    };
                    if !deck.tables(kind).contains_value(value) {
                        findings.push(
                            Finding::error(
                                self.name(),
                                format!(
                                    "section {} references {} table {} which is never defined",
                                    section.name, kind, number
                                ),
                            )
                            .in_table(kind, number),
                        );
                    }
                }
            }
        }

        Ok(findings)
    }
}

/// Flags last-wins overwrites that actually discarded different data. The
/// extractor records every displaced block; an overwrite whose normalized
/// text matches the survivor is a harmless re-statement and stays silent.
pub struct DuplicateTableNumber;

impl QcRule for DuplicateTableNumber {
    fn name(&self) -> &str {
        "duplicate-table-number"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        let mut findings = Vec::new();

        for kind in [TableKind::Vfp, TableKind::Pvt] {
            let set = deck.tables(kind);
            for displaced in &set.overwritten {
                let survivor = match set.get(&displaced.number) {
                    Some(table) => table,
                    None => continue,
                };
                if normalize_block(&displaced.content) != normalize_block(&survivor.content) {
                    findings.push(
                        Finding::warning(
                            self.name(),
                            format!(
                                "table {}{} is defined more than once with different content; the last definition wins",
                                kind, displaced.number
                            ),
                        )
                        .in_table(kind, &displaced.number),
                    );
                }
            }
        }

        Ok(findings)
    }
}

// Per-line trailing whitespace and surrounding blank lines do not count as
// a content difference.
fn normalize_block(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Flags a PROPS section that lacks any of the PVT property keywords a
/// black-oil run needs. One finding lists everything missing.
pub struct PvtKeywordCoverage;

const PVT_KEYWORDS: [&str; 3] = ["PVTO", "PVTW", "PVTG"];

impl QcRule for PvtKeywordCoverage {
    fn name(&self) -> &str {
        "pvt-keyword-coverage"
    }

    fn evaluate(&self, deck: &StructuredDeck, _config: &QcConfig) -> Result<Vec<Finding>> {
        // a missing PROPS section is missing-required-section's business
        let Some(props) = deck.section("PROPS") else {
            return Ok(Vec::new());
        };

        let missing: Vec<&str> = PVT_KEYWORDS
            .iter()
            .filter(|kw| !props.content.contains(**kw))
            .copied()
            .collect();

        if missing.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![Finding::warning(
            self.name(),
            format!("PROPS is missing PVT keywords: {}", missing.join(", ")),
        )
        .in_section("PROPS")])
    }
}
