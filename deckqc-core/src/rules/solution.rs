use super::engine::QcRule;
use crate::config::QcConfig;
use crate::types::{Finding, StructuredDeck};
use anyhow::Result;

/// Scans SOLUTION for equilibration pressures below the configured floor.
/// Initial pressures near atmospheric almost always mean a unit mix-up.
pub struct InitialPressureRange;

impl QcRule for InitialPressureRange {
    fn name(&self) -> &str {
        "initial-pressure-range"
    }

    fn evaluate(&self, deck: &StructuredDeck, config: &QcConfig) -> Result<Vec<Finding>> {
        let Some(solution) = deck.section("SOLUTION") else {
            return Ok(Vec::new());
        };

        let mut findings = Vec::new();
        for line in solution.content.lines() {
            // keyword lines like PRESSURE / RPTRST carry no values of their own
            if line.to_uppercase().contains("PRESSURE") {
                continue;
            }
            let Some(first) = line.split_whitespace().next() else {
                continue;
            };
            let Ok(pressure) = first.parse::<f64>() else {
                continue;
            };
            if pressure < config.min_initial_pressure {
                findings.push(
                    Finding::warning(
                        self.name(),
                        format!("unrealistic initial pressure: {pressure} psi"),
                    )
                    .in_section("SOLUTION"),
                );
            }
        }

        Ok(findings)
    }
}
