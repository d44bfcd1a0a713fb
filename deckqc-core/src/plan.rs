//! Turns QC findings into an ordered list of corrective actions.
//!
//! Each rule maps to one action; repeats collapse to the first occurrence
//! so the plan stays short no matter how many findings a rule produced.

use crate::types::Finding;

fn action_for(rule: &str) -> &'static str {
    match rule {
        "missing-required-section" => "Restore the missing required sections before simulation.",
        "empty-section" => "Populate or remove the empty sections.",
        "missing-end-keyword" => "Add END keyword at bottom of deck.",
        "orphan-table-reference" => "Define the referenced VFP/PVT tables or fix the references.",
        "duplicate-table-number" => "Remove or reconcile conflicting table definitions.",
        "pvt-keyword-coverage" => "Complete PROPS with the missing PVT keywords.",
        "wellspecs-consistency" => "Verify well definitions and coordinate locations.",
        "compdat-open-flag" => "Set an OPEN/SHUT status on every COMPDAT completion.",
        "initial-pressure-range" => "Review SOLUTION initial pressures for realism.",
        _ => "Address the remaining QC findings.",
    }
}

/// One action per finding category, in finding order, de-duplicated.
/// A clean run yields a single ready-for-simulation line.
pub fn build_plan(findings: &[Finding]) -> Vec<String> {
    if findings.is_empty() {
        return vec!["Input deck passed QC. Ready for simulation.".to_string()];
    }

    let mut plan: Vec<String> = Vec::new();
    for finding in findings {
        let action = action_for(&finding.rule);
        if !plan.iter().any(|existing| existing == action) {
            plan.push(action.to_string());
        }
    }
    plan
}
