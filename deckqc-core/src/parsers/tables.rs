//! VFP/PVT Block Extractor
//!
//! Segments deck text into numbered table blocks. A header is a line that
//! starts (after optional leading whitespace) with the kind's keyword
//! letters followed immediately by a digit run, e.g. `VFP7` or `PVT12`. The
//! digit run is the table number and is captured exactly as written, so
//! `VFP07` keys as `"07"`. A trailing word character disqualifies the line
//! (`VFP7X` is content, not a header), as does a non-digit after the prefix
//! (`VFPPROD` and `PVTO` are ordinary keywords, not numbered tables).
//!
//! Unlike the section tokenizer, lines before the first header are dropped:
//! this scanner only cares about table bodies. Repeated numbers follow the
//! last-wins policy, with every displaced block recorded for QC.

use crate::types::{Table, TableKind, TableSet};
use regex::Regex;
use std::sync::LazyLock;

static VFP_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*VFP(\d+)\b").unwrap());

static PVT_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*PVT(\d+)\b").unwrap());

/// Line-scan extractor for one table kind.
pub struct TableExtractor {
    kind: TableKind,
}

// Table being accumulated during the scan.
struct OpenTable<'a> {
    number: String,
    start_line: usize,
    lines: Vec<&'a str>,
}

impl<'a> OpenTable<'a> {
    fn close(self, kind: TableKind) -> Table {
        Table {
            kind,
            number: self.number,
            content: self.lines.join("\n"),
            start_line: self.start_line,
        }
    }
}

impl TableExtractor {
    pub fn new(kind: TableKind) -> Self {
        Self { kind }
    }

    pub fn vfp() -> Self {
        Self::new(TableKind::Vfp)
    }

    pub fn pvt() -> Self {
        Self::new(TableKind::Pvt)
    }

    fn header_regex(&self) -> &'static Regex {
        match self.kind {
            TableKind::Vfp => &VFP_HEADER_REGEX,
            TableKind::Pvt => &PVT_HEADER_REGEX,
        }
    }

    /// The table number that makes `line` a header of this kind, if any,
    /// exactly as written (leading zeros preserved).
    pub fn header_number<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = self.header_regex().captures(line)?;
        Some(captures.get(1)?.as_str())
    }

    /// Scan `text` into a table set.
    ///
    /// A block runs from its header (exclusive) to the next header of the
    /// same kind or end-of-input. The still-open block at end-of-input is
    /// always finalized, so the last table is never lost. No headers at all
    /// yields an empty set, never an error.
    pub fn extract(&self, text: &str) -> TableSet {
        let mut set = TableSet::default();
        let mut open: Option<OpenTable> = None;

        for (idx, line) in text.lines().enumerate() {
            if let Some(number) = self.header_number(line) {
                if let Some(table) = open.take() {
                    finalize(&mut set, table.close(self.kind));
                }
                open = Some(OpenTable {
                    number: number.to_string(),
                    start_line: idx,
                    lines: Vec::new(),
                });
            } else if let Some(table) = open.as_mut() {
                table.lines.push(line);
            }
            // not inside any block: dropped
        }

        if let Some(table) = open.take() {
            finalize(&mut set, table.close(self.kind));
        }

        set
    }
}

// Last-wins insertion: a displaced earlier block goes to `overwritten` in
// deck order instead of vanishing.
fn finalize(set: &mut TableSet, table: Table) {
    if let Some(previous) = set.tables.insert(table.number.clone(), table) {
        set.overwritten.push(previous);
    }
}
