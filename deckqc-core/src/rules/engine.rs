use crate::config::QcConfig;
use crate::types::{Finding, StructuredDeck};
use anyhow::Result;
use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use super::solution::InitialPressureRange;
use super::structure::{EmptySection, MissingEndKeyword, MissingRequiredSection};
use super::tables::{DuplicateTableNumber, OrphanTableReference, PvtKeywordCoverage};
use super::wells::{CompdatOpenFlag, WellspecsConsistency};

/// A named check over a structured deck.
///
/// Rules are read-only: they borrow the deck and the active config and
/// return findings. A rule signals its own malfunction by returning `Err`;
/// the engine turns that into a finding instead of aborting the run.
pub trait QcRule {
    fn name(&self) -> &str;
    fn evaluate(&self, deck: &StructuredDeck, config: &QcConfig) -> Result<Vec<Finding>>;
}

/// Runs registered rules in registration order and collects their findings.
///
/// Ordering is an explicit contract: findings come back in (registration
/// order, discovery order within a rule), so two runs over the same deck
/// and config are identical. A rule that returns `Err` or panics yields a
/// single error-severity finding naming it and the run continues; one bad
/// rule must not mask the rest.
pub struct QcEngine {
    rules: Vec<Box<dyn QcRule>>,
    pub rule_timings: RefCell<Vec<(String, Duration)>>,
}

impl Default for QcEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl QcEngine {
    /// Engine with no rules registered.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            rule_timings: RefCell::new(Vec::new()),
        }
    }

    /// Engine carrying the built-in rule set, in its documented order.
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(MissingRequiredSection));
        engine.register(Box::new(EmptySection));
        engine.register(Box::new(MissingEndKeyword));
        engine.register(Box::new(OrphanTableReference));
        engine.register(Box::new(DuplicateTableNumber));
        engine.register(Box::new(PvtKeywordCoverage));
        engine.register(Box::new(WellspecsConsistency));
        engine.register(Box::new(CompdatOpenFlag));
        engine.register(Box::new(InitialPressureRange));
        engine
    }

    pub fn register(&mut self, rule: Box<dyn QcRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn run(&self, deck: &StructuredDeck, config: &QcConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.rule_timings.borrow_mut().clear();

        for rule in &self.rules {
            if !config.is_rule_enabled(rule.name()) {
                println!("   ⏭️  Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_start = Instant::now();
            let outcome = catch_unwind(AssertUnwindSafe(|| rule.evaluate(deck, config)));
            match outcome {
                Ok(Ok(mut found)) => findings.append(&mut found),
                Ok(Err(err)) => {
                    findings.push(Finding::error(
                        rule.name(),
                        format!("rule evaluation failed: {err}"),
                    ));
                }
                Err(payload) => {
                    let text = panic_payload_to_string(payload.as_ref());
                    findings.push(Finding::error(
                        rule.name(),
                        format!("rule panicked: {text}"),
                    ));
                }
            }
            self.rule_timings
                .borrow_mut()
                .push((rule.name().to_string(), rule_start.elapsed()));
        }

        findings
    }
}

fn panic_payload_to_string(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
