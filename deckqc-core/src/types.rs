use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The schema version stamped on every report output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Name of the synthetic section that collects lines appearing before the
/// first recognized keyword header. The leading underscore keeps it apart
/// from real ECLIPSE keywords and it never appears in a recognized-keyword
/// list.
pub const PREAMBLE_SECTION: &str = "_PREAMBLE";

// ===== RAW INPUT =====

/// Unparsed deck text plus a display name (usually the file stem).
/// Loaded once; all downstream structure is built from it in single passes.
#[derive(Debug, Clone)]
pub struct RawDeck {
    pub name: String,
    pub content: String,
}

impl RawDeck {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

// ===== STRUCTURED DECK =====

/// A named region of the deck opened by an ECLIPSE-style keyword header.
///
/// `header_line` is the raw header line exactly as written (it may carry
/// trailing text past the keyword), so the original deck text can be
/// reconstructed from sections alone. `content` is every line between this
/// header and the next recognized header, joined with `\n`, blank lines
/// included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub name: String,
    pub header_line: String,
    pub content: String,
    /// 0-based line number of the header line (the preamble uses 0).
    pub start_line: usize,
}

impl Section {
    pub fn is_preamble(&self) -> bool {
        self.name == PREAMBLE_SECTION
    }

    /// Empty or whitespace-only content.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn line_count(&self) -> usize {
        if self.content.is_empty() {
            0
        } else {
            self.content.lines().count()
        }
    }
}

/// The two table families the extractor understands. Each kind has its own
/// header prefix and its own number space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    Vfp,
    Pvt,
}

impl TableKind {
    /// Keyword letters a header of this kind starts with, e.g. `VFP` in `VFP7`.
    pub fn prefix(&self) -> &'static str {
        match self {
            TableKind::Vfp => "VFP",
            TableKind::Pvt => "PVT",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One numbered table block. `number` is the digit run captured exactly as
/// written in the header, leading zeros preserved, which is why it is a
/// String and not an integer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    pub kind: TableKind,
    pub number: String,
    pub content: String,
    /// 0-based line number of the header line that opened this block.
    pub start_line: usize,
}

/// Result of one extractor pass over a deck for a single table kind.
///
/// `tables` holds the surviving block per number under the last-wins policy.
/// `overwritten` records every earlier block a repeated header displaced, in
/// deck order, so QC can tell whether an overwrite actually discarded
/// different data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSet {
    pub tables: BTreeMap<String, Table>,
    pub overwritten: Vec<Table>,
}

impl TableSet {
    pub fn get(&self, number: &str) -> Option<&Table> {
        self.tables.get(number)
    }

    /// Whether any stored number equals `value` numerically, so a reference
    /// written `VFP 7` still resolves against a table headed `VFP07`.
    pub fn contains_value(&self, value: u64) -> bool {
        self.tables
            .keys()
            .any(|n| n.parse::<u64>().map(|k| k == value).unwrap_or(false))
    }

    /// Table numbers as written, in sorted key order.
    pub fn numbers(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// The assembled in-memory deck: ordered sections plus one table set per
/// kind. Built by a single parse invocation and never mutated afterwards.
/// QC rules and report builders only ever borrow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredDeck {
    pub name: String,
    /// sha256 fingerprint of the raw text, for report provenance.
    pub content_hash: String,
    /// Sections in document order, preamble (if any) first.
    pub sections: Vec<Section>,
    pub vfp: TableSet,
    pub pvt: TableSet,
}

impl StructuredDeck {
    /// Look up a section by keyword. When a keyword re-occurs the LAST
    /// occurrence wins, matching the last-wins policy for table numbers.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().rev().find(|s| s.name == name)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    /// Sections carrying a real keyword, i.e. everything but the preamble.
    pub fn named_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| !s.is_preamble())
    }

    pub fn tables(&self, kind: TableKind) -> &TableSet {
        match kind {
            TableKind::Vfp => &self.vfp,
            TableKind::Pvt => &self.pvt,
        }
    }
}

// ===== QC FINDINGS =====

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// What a finding points at, when it points at anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FindingTarget {
    Section { name: String },
    Table { kind: TableKind, number: String },
}

/// A single QC observation. The engine collects findings in rule
/// registration order, and within a rule in the order the rule found them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<FindingTarget>,
}

impl Finding {
    pub fn new(rule: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.into(),
            target: None,
        }
    }

    pub fn info(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Info, message)
    }

    pub fn warning(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Warning, message)
    }

    pub fn error(rule: &str, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Error, message)
    }

    pub fn in_section(mut self, name: &str) -> Self {
        self.target = Some(FindingTarget::Section {
            name: name.to_string(),
        });
        self
    }

    pub fn in_table(mut self, kind: TableKind, number: &str) -> Self {
        self.target = Some(FindingTarget::Table {
            kind,
            number: number.to_string(),
        });
        self
    }
}

// ===== SIMULATION MODE =====

/// The deck's declared run mode. Drives which sections QC requires: restart
/// runs take their initial state from a restart file, so SOLUTION is not
/// expected there.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    #[default]
    Standard,
    Restart,
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SimulationMode::Standard => "standard",
            SimulationMode::Restart => "restart",
        };
        f.write_str(s)
    }
}

// ===== REPORT / HAND-OFF TYPES =====

/// Per-section line statistics for the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionSummary {
    pub name: String,
    pub lines: usize,
    pub blank: bool,
}

/// Deck-level statistics computed from the structured deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSummary {
    pub sections: Vec<SectionSummary>,
    pub vfp_tables: Vec<String>,
    pub pvt_tables: Vec<String>,
    pub total_lines: usize,
}

/// A text+id pair emitted for the retrieval side to index. The core builds
/// these; it never queries the index itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeckDocument {
    pub id: String,
    pub text: String,
}

/// The serialization-ready output of one analysis run. Carries a schema
/// version so consumers can detect and handle shape changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckReport {
    pub schema_version: String,
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub deck: String,
    pub content_hash: String,
    pub mode: SimulationMode,
    pub summary: DeckSummary,
    pub findings: Vec<Finding>,
    pub plan: Vec<String>,
}

impl DeckReport {
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
