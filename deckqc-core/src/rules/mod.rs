// Main rules module - delegates to semantic sub-modules
// This file coordinates the rule system but actual implementations are in:
// - engine.rs: QcRule trait and the QcEngine runner
// - structure.rs: section presence and shape checks
// - tables.rs: VFP/PVT table checks
// - wells.rs: well definition vs control checks
// - solution.rs: initial-state plausibility checks

pub mod engine;
pub mod solution;
pub mod structure;
pub mod tables;
pub mod wells;

pub use engine::{QcEngine, QcRule};
