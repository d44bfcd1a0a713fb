//! Whole-pipeline tests over the example fixture deck.
//!
//! These run the real processor end to end and pin down the boundaries:
//!
//! - Deck structure: section order, preamble policy, table extraction
//! - Report schema: field names, version, lowercase wire casing
//! - QC outcomes: which rules fire on the fixture, and in what order
//! - Round-trip, determinism, and the retrieval document hand-off
//!
//! The fixture deck is deliberately flawed; every expected finding below
//! corresponds to a planted defect in `test_fixtures/example_deck.DATA`.

use deckqc_core::{
    build_plan, content_fingerprint, DeckBuilder, DeckProcessor, DeckReport, DocumentIndex,
    FindingTarget, QcConfig, QcEngine, RawDeck, SimulationMode, StructuredDeck, TableKind,
    SCHEMA_VERSION,
};
use serde_json::Value;
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn fixture_text() -> String {
    let path = fixtures_dir().join("example_deck.DATA");
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()))
}

fn build_deck() -> StructuredDeck {
    DeckBuilder::new()
        .build(&RawDeck::new("example_deck", fixture_text()))
        .expect("fixture deck should assemble")
}

fn analyze() -> DeckReport {
    DeckProcessor::new()
        .with_quiet(true)
        .analyze_text("example_deck", &fixture_text(), SimulationMode::Standard)
        .expect("fixture deck should analyze")
}

fn report_json() -> Value {
    serde_json::to_value(analyze()).expect("report should serialize")
}

// ============================================================================
// Deck structure
// ============================================================================

mod deck_structure {
    use super::*;

    #[test]
    fn section_names_follow_deck_order() {
        let deck = build_deck();
        let names: Vec<&str> = deck.named_sections().map(|s| s.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "RUNSPEC", "GRID", "EDIT", "PROPS", "REGIONS", "SOLUTION", "SUMMARY", "SCHEDULE",
                "WELSPECS", "COMPDAT", "WCONPROD", "WCONINJE", "END",
            ]
        );
    }

    #[test]
    fn preamble_keeps_leading_comment() {
        let deck = build_deck();
        let first = &deck.sections[0];

        assert!(first.is_preamble());
        assert!(first.content.contains("Example field model"));
    }

    #[test]
    fn repeated_vfp_header_resolves_last_wins() {
        let deck = build_deck();

        assert_eq!(deck.vfp.numbers(), vec!["1"]);
        assert_eq!(deck.vfp.overwritten.len(), 1);
        // the second VFP1 block runs to end of input
        assert_eq!(deck.vfp.get("1").unwrap().content, "1500 2500 3500\nEND");
        assert!(deck.vfp.overwritten[0].content.starts_with("1000 2000 3000"));
    }

    #[test]
    fn pvt_number_preserved_as_written() {
        let deck = build_deck();

        assert_eq!(deck.pvt.numbers(), vec!["07"]);
        assert!(deck.pvt.contains_value(7));
        assert!(deck.pvt.get("07").unwrap().content.starts_with("0.8 120 1.10 /"));
    }

    #[test]
    fn summary_line_count_matches_file() {
        let report = analyze();
        assert_eq!(report.summary.total_lines, fixture_text().lines().count());
        assert_eq!(report.summary.vfp_tables, vec!["1"]);
        assert_eq!(report.summary.pvt_tables, vec!["07"]);
    }
}

// ============================================================================
// Report schema contract
// ============================================================================

mod schema_contract {
    use super::*;

    #[test]
    fn report_has_required_top_level_fields() {
        let json = report_json();

        assert!(json["schema_version"].is_string(), "Missing schema_version");
        assert!(json["run_id"].is_string(), "Missing run_id");
        assert!(json["created_at"].is_string(), "Missing created_at");
        assert!(json["deck"].is_string(), "Missing deck");
        assert!(json["content_hash"].is_string(), "Missing content_hash");
        assert!(json["mode"].is_string(), "Missing mode");
        assert!(json["summary"].is_object(), "Missing summary");
        assert!(json["findings"].is_array(), "Missing findings array");
        assert!(json["plan"].is_array(), "Missing plan array");
    }

    #[test]
    fn schema_version_is_current() {
        let json = report_json();
        assert_eq!(json["schema_version"].as_str().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn wire_casing_is_lowercase() {
        let json = report_json();

        assert_eq!(json["mode"].as_str().unwrap(), "standard");
        let severities: Vec<&str> = json["findings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["severity"].as_str().unwrap())
            .collect();
        assert!(severities.iter().all(|s| ["info", "warning", "error"].contains(s)));
    }

    #[test]
    fn table_targets_carry_kind_and_number() {
        let json = report_json();
        let orphan = json["findings"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["rule"] == "orphan-table-reference")
            .expect("orphan finding should be present");

        assert_eq!(orphan["target"]["table"]["kind"].as_str().unwrap(), "vfp");
        assert_eq!(orphan["target"]["table"]["number"].as_str().unwrap(), "9");
    }

    #[test]
    fn untargeted_findings_omit_the_field() {
        let report = DeckProcessor::new()
            .with_quiet(true)
            .analyze_text("bare", "RUNSPEC\nTITLE bare", SimulationMode::Standard)
            .unwrap();
        let json = serde_json::to_value(report).unwrap();

        let missing_end = json["findings"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["rule"] == "missing-end-keyword")
            .expect("missing-end finding should be present");
        assert!(missing_end.get("target").is_none());
    }

    #[test]
    fn content_hash_is_sha256_hex() {
        let json = report_json();
        let hash = json["content_hash"].as_str().unwrap();

        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

// ============================================================================
// QC outcomes on the fixture
// ============================================================================

mod qc_outcomes {
    use super::*;

    #[test]
    fn findings_follow_rule_registration_order() {
        let report = analyze();
        let rules: Vec<&str> = report.findings.iter().map(|f| f.rule.as_str()).collect();

        assert_eq!(
            rules,
            vec![
                "empty-section",
                "orphan-table-reference",
                "duplicate-table-number",
                "pvt-keyword-coverage",
                "wellspecs-consistency",
                "compdat-open-flag",
                "initial-pressure-range",
            ]
        );
    }

    #[test]
    fn severity_split_matches_planted_defects() {
        let report = analyze();

        assert_eq!(report.error_count(), 2);
        assert_eq!(report.warning_count(), 5);
        assert!(report.has_errors());
    }

    #[test]
    fn empty_section_points_at_regions() {
        let report = analyze();
        let finding = &report.findings[0];

        assert!(finding.message.contains("REGIONS"));
        assert_eq!(
            finding.target,
            Some(FindingTarget::Section {
                name: "REGIONS".to_string()
            })
        );
    }

    #[test]
    fn orphan_reference_names_the_undefined_table() {
        let report = analyze();
        let finding = &report.findings[1];

        assert!(finding.message.contains("VFP table 9"));
        assert_eq!(
            finding.target,
            Some(FindingTarget::Table {
                kind: TableKind::Vfp,
                number: "9".to_string()
            })
        );
    }

    #[test]
    fn wellspecs_rule_lists_the_missing_well() {
        let report = analyze();
        assert_eq!(
            report.findings[4].message,
            "wells missing from WELSPECS: I1"
        );
    }

    #[test]
    fn compdat_rule_quotes_the_offending_record() {
        let report = analyze();
        assert!(report.findings[5].message.contains("'P2' 6 6 1 1 /"));
    }

    #[test]
    fn pressure_rule_reports_the_low_value() {
        let report = analyze();
        assert_eq!(
            report.findings[6].message,
            "unrealistic initial pressure: 250 psi"
        );
    }

    #[test]
    fn plan_lists_one_action_per_failed_rule() {
        let report = analyze();

        assert_eq!(
            report.plan,
            vec![
                "Populate or remove the empty sections.",
                "Define the referenced VFP/PVT tables or fix the references.",
                "Remove or reconcile conflicting table definitions.",
                "Complete PROPS with the missing PVT keywords.",
                "Verify well definitions and coordinate locations.",
                "Set an OPEN/SHUT status on every COMPDAT completion.",
                "Review SOLUTION initial pressures for realism.",
            ]
        );
        assert_eq!(report.plan, build_plan(&report.findings));
    }

    #[test]
    fn disabling_a_rule_suppresses_its_findings() {
        let deck = build_deck();
        let engine = QcEngine::with_default_rules();
        let mut config = QcConfig::standard();
        config.disable_rule("empty-section");

        let findings = engine.run(&deck, &config);

        assert!(findings.iter().all(|f| f.rule != "empty-section"));
        assert!(findings.iter().any(|f| f.rule == "orphan-table-reference"));
    }
}

// ============================================================================
// Round-trip and determinism
// ============================================================================

mod round_trip {
    use super::*;

    #[test]
    fn reconstruction_reproduces_the_file() {
        let text = fixture_text();
        let deck = build_deck();

        assert_eq!(deck.reconstruct_text(), text.trim_end_matches('\n'));
    }

    #[test]
    fn content_hash_matches_raw_fingerprint() {
        let report = analyze();
        assert_eq!(report.content_hash, content_fingerprint(&fixture_text()));
    }

    #[test]
    fn repeated_runs_yield_identical_findings() {
        let first = analyze();
        let second = analyze();

        assert_eq!(first.findings, second.findings);
        assert_eq!(first.plan, second.plan);
        assert_eq!(first.content_hash, second.content_hash);
        // each run is stamped with its own id
        assert_ne!(first.run_id, second.run_id);
    }
}

// ============================================================================
// Retrieval document hand-off
// ============================================================================

mod retrieval_documents {
    use super::*;

    #[test]
    fn documents_cover_every_boundary() {
        let deck = build_deck();
        let docs = deck.documents();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();

        // whole deck + 14 sections (preamble included) + 1 VFP + 1 PVT
        assert_eq!(docs.len(), 17);
        assert!(ids.contains(&"deck:example_deck"));
        assert!(ids.contains(&"section:_PREAMBLE"));
        assert!(ids.contains(&"section:SCHEDULE"));
        assert!(ids.contains(&"vfp:1"));
        assert!(ids.contains(&"pvt:07"));
    }

    #[test]
    fn index_lookup_is_case_insensitive() {
        let mut index = DocumentIndex::new();
        for doc in build_deck().documents() {
            index.add_document(doc);
        }

        let upper: Vec<&str> = index.search("DIMENS").iter().map(|d| d.id.as_str()).collect();
        let lower: Vec<&str> = index.search("dimens").iter().map(|d| d.id.as_str()).collect();

        assert_eq!(upper, vec!["deck:example_deck", "section:RUNSPEC"]);
        assert_eq!(upper, lower);
    }
}
