use crate::config::QcConfigManager;
use crate::deck::DeckBuilder;
use crate::error::{DeckError, Result};
use crate::plan::build_plan;
use crate::rules::QcEngine;
use crate::types::{DeckReport, Finding, RawDeck, Section, SimulationMode, TableSet};
use std::path::Path;
use std::time::{Duration, Instant};

/// Captured output at each pipeline boundary.
/// Used for stage dumps and diagnostics when a report alone is too coarse.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PipelineStages {
    pub sections: Vec<Section>,
    pub vfp: TableSet,
    pub pvt: TableSet,
    pub findings: Vec<Finding>,
    pub report: DeckReport,
}

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = (duration.as_secs_f64() / total.as_secs_f64()) * 100.0;
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

fn deck_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("deck")
        .to_string()
}

/// Runs the full deck pipeline: read, parse, QC, plan, report.
///
/// File reading happens here and nowhere deeper; the parsers and rules work
/// on in-memory text only, so callers may process many decks concurrently
/// with independent processors.
pub struct DeckProcessor {
    builder: DeckBuilder,
    engine: QcEngine,
    configs: QcConfigManager,
    quiet: bool,
}

impl Default for DeckProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckProcessor {
    /// Processor with the default tokenizer, rule set, and per-mode configs.
    pub fn new() -> Self {
        Self::with_dependencies(
            DeckBuilder::new(),
            QcEngine::with_default_rules(),
            QcConfigManager::new(),
        )
    }

    /// Create a DeckProcessor with full dependency injection.
    pub fn with_dependencies(
        builder: DeckBuilder,
        engine: QcEngine,
        configs: QcConfigManager,
    ) -> Self {
        Self {
            builder,
            engine,
            configs,
            quiet: false,
        }
    }

    /// Suppress progress output. Findings still come back in the report.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Replace the config for whichever mode the file declares.
    pub fn load_config_file(&mut self, path: &str) -> Result<()> {
        self.configs.load_config_from_file(path)
    }

    pub fn analyze_file(&self, path: &str, mode: SimulationMode) -> Result<DeckReport> {
        self.analyze_file_with_profiling(path, mode, false)
    }

    /// Analyze a deck file with optional per-step timing output.
    pub fn analyze_file_with_profiling(
        &self,
        path: &str,
        mode: SimulationMode,
        enable_profiling: bool,
    ) -> Result<DeckReport> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(enable_profiling);

        if !self.quiet {
            println!("📄 Processing deck: {}", path);
        }

        let text = profiler.time_step("1. Read Deck", || {
            std::fs::read_to_string(path).map_err(|source| DeckError::Io {
                path: path.into(),
                source,
            })
        })?;

        let name = deck_name(Path::new(path));
        let report = self.analyze_text_with_profiler(&name, &text, mode, &mut profiler)?;

        profiler.print_summary();
        if !self.quiet {
            println!(
                "⏱️  Total processing time: {:.0}ms",
                start_time.elapsed().as_millis()
            );
        }
        Ok(report)
    }

    /// Analyze in-memory deck text under a caller-supplied display name.
    pub fn analyze_text(&self, name: &str, text: &str, mode: SimulationMode) -> Result<DeckReport> {
        self.analyze_text_with_profiling(name, text, mode, false)
    }

    pub fn analyze_text_with_profiling(
        &self,
        name: &str,
        text: &str,
        mode: SimulationMode,
        enable_profiling: bool,
    ) -> Result<DeckReport> {
        let mut profiler = StepProfiler::new(enable_profiling);
        let report = self.analyze_text_with_profiler(name, text, mode, &mut profiler)?;
        profiler.print_summary();
        Ok(report)
    }

    fn analyze_text_with_profiler(
        &self,
        name: &str,
        text: &str,
        mode: SimulationMode,
        profiler: &mut StepProfiler,
    ) -> Result<DeckReport> {
        let raw = RawDeck::new(name, text);

        let deck = profiler.time_step("2. Parse Structure", || self.builder.build(&raw))?;
        if !self.quiet {
            println!(
                "📋 Parsed {} sections, {} VFP tables, {} PVT tables",
                deck.named_sections().count(),
                deck.vfp.len(),
                deck.pvt.len()
            );
        }

        let config = self.configs.get_config(&mode);
        let findings = profiler.time_step("3. QC Rules", || self.engine.run(&deck, config));
        if profiler.is_enabled() {
            for (rule, duration) in self.engine.rule_timings.borrow().iter() {
                println!("   ⏱️  {}: {:.2}ms", rule, duration.as_secs_f64() * 1000.0);
            }
        }

        let plan = profiler.time_step("4. Build Plan", || build_plan(&findings));
        Ok(DeckReport::assemble(&deck, mode, findings, plan))
    }

    /// Run the pipeline and keep every boundary output alongside the report.
    pub fn capture_stages(
        &self,
        name: &str,
        text: &str,
        mode: SimulationMode,
    ) -> Result<PipelineStages> {
        let raw = RawDeck::new(name, text);
        let deck = self.builder.build(&raw)?;
        if !self.quiet {
            println!("📋 Stage 1: {} sections captured", deck.sections.len());
            println!(
                "📋 Stage 2: {} VFP + {} PVT tables captured",
                deck.vfp.len(),
                deck.pvt.len()
            );
        }

        let config = self.configs.get_config(&mode);
        let findings = self.engine.run(&deck, config);
        if !self.quiet {
            println!("📋 Stage 3: {} findings captured", findings.len());
        }

        let plan = build_plan(&findings);
        let report = DeckReport::assemble(&deck, mode, findings.clone(), plan);
        Ok(PipelineStages {
            sections: deck.sections.clone(),
            vfp: deck.vfp.clone(),
            pvt: deck.pvt.clone(),
            findings,
            report,
        })
    }
}
