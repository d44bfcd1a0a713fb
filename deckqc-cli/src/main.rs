use anyhow::Result;
use clap::Parser;
use std::path::Path;

use deckqc_core::{
    DeckBuilder, DeckProcessor, DeckReport, DocumentIndex, PipelineStages, RawDeck,
    SimulationMode, StructuredDeck,
};

#[derive(Parser)]
#[command(name = "deckqc")]
#[command(about = "Structural QC for ECLIPSE-style reservoir simulation decks")]
struct Args {
    /// Path to the deck file to analyze
    deck: String,

    /// Path to custom QC config file (YAML format)
    #[arg(short, long)]
    config: Option<String>,

    /// Simulation mode the deck is meant for: standard or restart
    #[arg(short, long, default_value = "standard")]
    mode: String,

    /// Output file path (if not specified, auto-generated based on input)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format: report, findings, or plan
    #[arg(short = 'f', long, default_value = "report")]
    format: String,

    /// Dump all intermediate pipeline stage outputs to a directory
    /// Captures: sections, VFP/PVT tables, findings, and the final report
    #[arg(long)]
    dump_stages: bool,

    /// Directory for stage dump output
    #[arg(long, default_value = "qc_outputs/stages")]
    stages_dir: String,

    /// Search the deck's indexed documents and print matching ids
    #[arg(short, long)]
    query: Option<String>,

    /// Enable detailed profiling of all pipeline steps
    #[arg(long)]
    profile: bool,

    /// Suppress progress output (findings and plan still print)
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.quiet {
        println!("🛢️  DeckQC Reservoir Deck Analyzer");
    }

    if !Path::new(&args.deck).exists() {
        eprintln!("⚠️  Deck file not found at: {}", args.deck);
        std::process::exit(2);
    }

    let mode = match parse_mode(&args.mode) {
        Some(mode) => mode,
        None => {
            eprintln!("❌ Unknown mode '{}', expected standard or restart", args.mode);
            std::process::exit(2);
        }
    };

    let mut processor = DeckProcessor::new().with_quiet(args.quiet);
    if let Some(config_path) = &args.config {
        match processor.load_config_file(config_path) {
            Ok(()) => {
                if !args.quiet {
                    println!("📋 Loaded config from: {}", config_path);
                }
            }
            Err(e) => eprintln!("⚠️  {e}, using defaults"),
        }
    } else if !args.quiet {
        println!("📋 Using default config");
    }

    let text = match std::fs::read_to_string(&args.deck) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("❌ Failed to read deck {}: {e}", args.deck);
            std::process::exit(2);
        }
    };
    let name = deck_stem(&args.deck);

    if !args.quiet {
        println!("📄 Processing: {}", args.deck);
    }

    // Stage dump mode: capture and save all intermediates
    if args.dump_stages {
        if !args.quiet {
            println!("\n🔬 Pipeline stage dump mode");
        }
        match processor.capture_stages(&name, &text, mode) {
            Ok(stages) => {
                save_stages(&stages, &args.stages_dir, &args.deck)?;
                println!("\n✅ All stages dumped to: {}", args.stages_dir);
                std::process::exit(exit_code(&stages.report));
            }
            Err(e) => {
                eprintln!("❌ Stage dump failed: {e}");
                std::process::exit(2);
            }
        }
    }

    let report = match processor.analyze_text_with_profiling(&name, &text, mode, args.profile) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Analysis failed: {e}");
            std::process::exit(2);
        }
    };

    if !args.quiet {
        println!(
            "✅ Analyzed deck: {} findings ({} errors, {} warnings)",
            report.findings.len(),
            report.error_count(),
            report.warning_count()
        );
    }

    print_findings(&report);
    print_plan(&report);

    if let Some(query) = &args.query {
        let deck = DeckBuilder::new().build(&RawDeck::new(name.as_str(), text.as_str()))?;
        run_query(&deck, query);
    }

    let output_path = args.output.clone().unwrap_or_else(|| {
        format!("{}_deckqc.json", deck_stem(&args.deck))
    });
    save_report(&report, &output_path, &args.format)?;

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_mode(raw: &str) -> Option<SimulationMode> {
    match raw.to_lowercase().as_str() {
        "standard" => Some(SimulationMode::Standard),
        "restart" => Some(SimulationMode::Restart),
        _ => None,
    }
}

fn deck_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("deck")
        .to_string()
}

fn exit_code(report: &DeckReport) -> i32 {
    if report.has_errors() {
        1
    } else {
        0
    }
}

fn print_findings(report: &DeckReport) {
    println!("\n=== QC Findings ===");
    if report.findings.is_empty() {
        println!("- none");
        return;
    }
    for finding in &report.findings {
        println!("- [{}] {}: {}", finding.severity, finding.rule, finding.message);
    }
}

fn print_plan(report: &DeckReport) {
    println!("\n=== Plan ===");
    for action in &report.plan {
        println!("- {}", action);
    }
}

fn run_query(deck: &StructuredDeck, query: &str) {
    let mut index = DocumentIndex::new();
    for doc in deck.documents() {
        index.add_document(doc);
    }

    let hits = index.search(query);
    println!("\n=== Matches for '{query}' ===");
    if hits.is_empty() {
        println!("- none");
        return;
    }
    for doc in hits {
        println!("- {}", doc.id);
    }
}

fn save_report(report: &DeckReport, output_path: &str, format: &str) -> Result<()> {
    match format {
        "findings" => {
            std::fs::write(output_path, serde_json::to_string_pretty(&report.findings)?)?;
            println!("💾 Findings saved to: {}", output_path);
        }
        "plan" => {
            std::fs::write(output_path, serde_json::to_string_pretty(&report.plan)?)?;
            println!("💾 Plan saved to: {}", output_path);
        }
        "report" => {
            report.save_to_json(output_path)?;
            println!("💾 Report saved to: {}", output_path);
        }
        _ => {
            println!("⚠️  Unknown output format '{}', using full report", format);
            report.save_to_json(output_path)?;
            println!("💾 Report saved to: {}", output_path);
        }
    }
    Ok(())
}

fn save_stages(stages: &PipelineStages, output_dir: &str, deck_path: &str) -> Result<()> {
    use std::fs;
    fs::create_dir_all(output_dir)?;

    // Stage 1: sections
    let sections_path = format!("{}/stage1_sections.json", output_dir);
    fs::write(&sections_path, serde_json::to_string_pretty(&stages.sections)?)?;
    println!("  💾 {} ({} sections)", sections_path, stages.sections.len());

    // Stage 2: extracted tables
    let vfp_path = format!("{}/stage2_vfp_tables.json", output_dir);
    fs::write(&vfp_path, serde_json::to_string_pretty(&stages.vfp)?)?;
    println!("  💾 {} ({} tables)", vfp_path, stages.vfp.len());

    let pvt_path = format!("{}/stage2_pvt_tables.json", output_dir);
    fs::write(&pvt_path, serde_json::to_string_pretty(&stages.pvt)?)?;
    println!("  💾 {} ({} tables)", pvt_path, stages.pvt.len());

    // Stage 3: QC findings
    let findings_path = format!("{}/stage3_findings.json", output_dir);
    fs::write(&findings_path, serde_json::to_string_pretty(&stages.findings)?)?;
    println!("  💾 {} ({} findings)", findings_path, stages.findings.len());

    // Stage 4: final report
    let report_path = format!("{}/stage4_report.json", output_dir);
    stages.report.save_to_json(&report_path)?;
    println!("  💾 {}", report_path);

    // Summary file: quick reference for validation scripts
    let summary = serde_json::json!({
        "input_deck": deck_path,
        "captured_at": chrono::Utc::now().to_rfc3339(),
        "stage_counts": {
            "sections": stages.sections.len(),
            "vfp_tables": stages.vfp.len(),
            "pvt_tables": stages.pvt.len(),
            "findings": stages.findings.len(),
        }
    });
    let summary_path = format!("{}/summary.json", output_dir);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    println!("  💾 {}", summary_path);

    Ok(())
}
