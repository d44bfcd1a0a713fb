//! Deck Section Tokenizer
//!
//! Splits raw deck text into keyword-delimited sections. A line opens a new
//! section when it starts (after optional leading whitespace) with a token
//! from the recognized keyword list; every other line is content of whatever
//! section is currently open. Lines before the first header are preserved in
//! a synthetic `_PREAMBLE` section so that no input line is ever lost.
//!
//! The tokenizer is purely segmenting. It never rejects input: a file with
//! no recognized headers comes back as a single preamble, and an empty file
//! comes back as no sections at all. Whether that is acceptable is decided
//! at deck assembly, not here.

use crate::types::{Section, PREAMBLE_SECTION};
use regex::Regex;
use std::sync::LazyLock;

// Pre-compiled header pattern: optional leading whitespace, then an
// uppercase keyword token ending at a word boundary. Whether the token is
// actually a header depends on the recognized keyword list.
static HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Z0-9_]+)\b").unwrap());

/// Keywords recognized as section headers by default. Covers the standard
/// ECLIPSE deck skeleton plus the well keywords QC cares about.
pub const DEFAULT_SECTION_KEYWORDS: [&str; 13] = [
    "RUNSPEC", "GRID", "EDIT", "PROPS", "REGIONS", "SOLUTION", "SUMMARY", "SCHEDULE", "WELSPECS",
    "WCONPROD", "WCONINJE", "COMPDAT", "END",
];

/// Line-scan tokenizer over a configurable keyword list.
pub struct SectionTokenizer {
    keywords: Vec<String>,
}

impl Default for SectionTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

// Section being accumulated during the scan. Borrows content lines from the
// input and joins them once on close.
struct OpenSection<'a> {
    name: String,
    header_line: String,
    start_line: usize,
    lines: Vec<&'a str>,
}

impl<'a> OpenSection<'a> {
    fn close(self) -> Section {
        Section {
            name: self.name,
            header_line: self.header_line,
            content: self.lines.join("\n"),
            start_line: self.start_line,
        }
    }
}

impl SectionTokenizer {
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_SECTION_KEYWORDS)
    }

    /// Tokenizer over a caller-supplied keyword list, for decks using
    /// non-standard section names.
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_recognized(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    /// The keyword that makes `line` a header, if any. Trailing text after
    /// the keyword does not disqualify the line; the raw line is kept on the
    /// section so nothing is dropped.
    pub fn header_keyword<'a>(&self, line: &'a str) -> Option<&'a str> {
        let captures = HEADER_REGEX.captures(line)?;
        let candidate = captures.get(1)?.as_str();
        if self.is_recognized(candidate) {
            Some(candidate)
        } else {
            None
        }
    }

    /// Scan `text` top to bottom into an ordered sequence of sections.
    ///
    /// Exactly one section per recognized header, in document order, plus at
    /// most one leading `_PREAMBLE` holding everything before the first
    /// header. A repeated keyword opens a fresh section; interpreting
    /// repeats is the caller's business.
    pub fn tokenize(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut preamble: Vec<&str> = Vec::new();
        let mut open: Option<OpenSection> = None;

        for (idx, line) in text.lines().enumerate() {
            if let Some(keyword) = self.header_keyword(line) {
                match open.take() {
                    Some(section) => sections.push(section.close()),
                    None => {
                        if idx > 0 {
                            sections.push(Section {
                                name: PREAMBLE_SECTION.to_string(),
                                header_line: String::new(),
                                content: preamble.join("\n"),
                                start_line: 0,
                            });
                        }
                    }
                }
                open = Some(OpenSection {
                    name: keyword.to_string(),
                    header_line: line.to_string(),
                    start_line: idx,
                    lines: Vec::new(),
                });
            } else {
                match open.as_mut() {
                    Some(section) => section.lines.push(line),
                    None => preamble.push(line),
                }
            }
        }

        match open {
            Some(section) => sections.push(section.close()),
            None => {
                // No headers anywhere. Non-empty input becomes one preamble.
                if !preamble.is_empty() {
                    sections.push(Section {
                        name: PREAMBLE_SECTION.to_string(),
                        header_line: String::new(),
                        content: preamble.join("\n"),
                        start_line: 0,
                    });
                }
            }
        }

        sections
    }
}
