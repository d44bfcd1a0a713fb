use crate::types::{DeckSummary, SectionSummary, StructuredDeck, TableKind};

impl StructuredDeck {
    /// Mechanical statistics over the assembled deck: per-section line
    /// counts, extracted table numbers, and the total line count. Since
    /// sections cover the whole input, the total equals the line count of
    /// the original text.
    pub fn summarize(&self) -> DeckSummary {
        let sections: Vec<SectionSummary> = self
            .sections
            .iter()
            .map(|s| SectionSummary {
                name: s.name.clone(),
                lines: s.line_count(),
                blank: s.is_blank(),
            })
            .collect();

        let total_lines = self
            .sections
            .iter()
            .map(|s| s.line_count() + usize::from(!s.is_preamble()))
            .sum();

        DeckSummary {
            sections,
            vfp_tables: self.tables(TableKind::Vfp).numbers(),
            pvt_tables: self.tables(TableKind::Pvt).numbers(),
            total_lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::deck::DeckBuilder;
    use crate::types::RawDeck;

    #[test]
    fn test_summary_counts_lines_per_section() {
        let text = "RUNSPEC\nTITLE demo\nGRID\nDX 100\nDY 100\nSCHEDULE";
        let deck = DeckBuilder::new()
            .build(&RawDeck::new("s", text))
            .unwrap();
        let summary = deck.summarize();

        let lines: Vec<(&str, usize)> = summary
            .sections
            .iter()
            .map(|s| (s.name.as_str(), s.lines))
            .collect();
        assert_eq!(
            lines,
            vec![("RUNSPEC", 1), ("GRID", 2), ("SCHEDULE", 0)]
        );
        assert!(summary.sections[2].blank);
        assert_eq!(summary.total_lines, text.lines().count());
    }

    #[test]
    fn test_summary_lists_table_numbers_sorted() {
        let text = "RUNSPEC\nVFP2\nb\nVFP10\nc\nVFP1\na\nPVT3\nx";
        let deck = DeckBuilder::new()
            .build(&RawDeck::new("s", text))
            .unwrap();
        let summary = deck.summarize();

        // lexicographic key order, numbers kept as written
        assert_eq!(summary.vfp_tables, vec!["1", "10", "2"]);
        assert_eq!(summary.pvt_tables, vec!["3"]);
    }

    #[test]
    fn test_summary_includes_preamble_without_header_line() {
        let text = "-- note\nRUNSPEC\nbody";
        let deck = DeckBuilder::new()
            .build(&RawDeck::new("s", text))
            .unwrap();
        let summary = deck.summarize();

        assert_eq!(summary.sections[0].name, "_PREAMBLE");
        assert_eq!(summary.sections[0].lines, 1);
        // preamble has no header line of its own
        assert_eq!(summary.total_lines, 3);
    }
}
