use crate::error::{DeckError, Result};
use crate::types::SimulationMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_min_initial_pressure() -> f64 {
    500.0
}

fn default_required_sections() -> Vec<String> {
    standard_required_sections()
}

fn standard_required_sections() -> Vec<String> {
    ["RUNSPEC", "GRID", "PROPS", "SOLUTION", "SCHEDULE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn restart_required_sections() -> Vec<String> {
    // restart runs take initial state from the restart file
    ["RUNSPEC", "GRID", "PROPS", "SCHEDULE"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Tunable knobs for one QC run. Every field has a default so a config file
/// only needs to state what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcConfig {
    #[serde(default)]
    pub mode: SimulationMode,
    /// Sections the missing-required-section rule demands for this mode.
    #[serde(default = "default_required_sections")]
    pub required_sections: Vec<String>,
    /// Plausibility floor for initial pressure values, in psi.
    #[serde(default = "default_min_initial_pressure")]
    pub min_initial_pressure: f64,
    /// Per-rule toggles. A rule not listed here stays enabled.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name of the rule
    pub name: String,
    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl QcConfig {
    pub fn standard() -> Self {
        Self {
            mode: SimulationMode::Standard,
            required_sections: standard_required_sections(),
            min_initial_pressure: default_min_initial_pressure(),
            rules: Vec::new(),
        }
    }

    pub fn restart() -> Self {
        Self {
            mode: SimulationMode::Restart,
            required_sections: restart_required_sections(),
            min_initial_pressure: default_min_initial_pressure(),
            rules: Vec::new(),
        }
    }

    pub fn for_mode(mode: SimulationMode) -> Self {
        match mode {
            SimulationMode::Standard => Self::standard(),
            SimulationMode::Restart => Self::restart(),
        }
    }

    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.rules
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.enabled)
            .unwrap_or(true)
    }

    pub fn disable_rule(&mut self, name: &str) {
        match self.rules.iter_mut().find(|r| r.name == name) {
            Some(rule) => rule.enabled = false,
            None => self.rules.push(RuleConfig {
                name: name.to_string(),
                enabled: false,
            }),
        }
    }

    /// Load config from a YAML file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| DeckError::Config {
            path: PathBuf::from(path),
            message: e.to_string(),
        })?;
        let config: QcConfig = serde_yaml::from_str(&content).map_err(|e| DeckError::Config {
            path: PathBuf::from(path),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Load config with fallback to mode defaults
    pub fn load_with_fallback(path: Option<&str>, mode: SimulationMode) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {p}, using defaults");
                Self::for_mode(mode)
            }),
            None => Self::for_mode(mode),
        }
    }
}

/// Holds the built-in per-mode configs plus any loaded from files, keyed by
/// simulation mode.
#[derive(Debug, Clone)]
pub struct QcConfigManager {
    configs: HashMap<SimulationMode, QcConfig>,
    default_config: QcConfig,
}

impl QcConfigManager {
    pub fn new() -> Self {
        let mut configs = HashMap::new();
        configs.insert(SimulationMode::Standard, QcConfig::standard());
        configs.insert(SimulationMode::Restart, QcConfig::restart());

        Self {
            configs,
            default_config: QcConfig::standard(),
        }
    }

    pub fn get_config(&self, mode: &SimulationMode) -> &QcConfig {
        self.configs.get(mode).unwrap_or(&self.default_config)
    }

    /// Load a config file and register it under its declared mode.
    pub fn load_config_from_file(&mut self, path: &str) -> Result<()> {
        let config = QcConfig::load_from_file(path)?;
        self.configs.insert(config.mode, config);
        Ok(())
    }
}

impl Default for QcConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_default_to_enabled() {
        let config = QcConfig::default();
        assert!(config.is_rule_enabled("anything-at-all"));
    }

    #[test]
    fn test_disable_rule_toggles_by_name() {
        let mut config = QcConfig::default();
        config.disable_rule("empty-section");

        assert!(!config.is_rule_enabled("empty-section"));
        assert!(config.is_rule_enabled("missing-end-keyword"));
    }

    #[test]
    fn test_restart_mode_does_not_require_solution() {
        let standard = QcConfig::standard();
        let restart = QcConfig::restart();

        assert!(standard.required_sections.contains(&"SOLUTION".to_string()));
        assert!(!restart.required_sections.contains(&"SOLUTION".to_string()));
    }

    #[test]
    fn test_manager_serves_per_mode_configs() {
        let manager = QcConfigManager::new();

        assert_eq!(
            manager.get_config(&SimulationMode::Standard).mode,
            SimulationMode::Standard
        );
        assert_eq!(
            manager.get_config(&SimulationMode::Restart).mode,
            SimulationMode::Restart
        );
    }

    #[test]
    fn test_load_from_yaml_file() {
        let path = std::env::temp_dir().join("deckqc_test_config.yaml");
        let yaml = "mode: restart\nmin_initial_pressure: 800.0\nrules:\n  - name: empty-section\n    enabled: false\n";
        std::fs::write(&path, yaml).unwrap();

        let config = QcConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.mode, SimulationMode::Restart);
        assert_eq!(config.min_initial_pressure, 800.0);
        assert!(!config.is_rule_enabled("empty-section"));
        // unset fields fall back to their defaults
        assert_eq!(config.required_sections, standard_required_sections());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = QcConfig::load_from_file("/nonexistent/deckqc.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/deckqc.yaml"));
    }

    #[test]
    fn test_load_with_fallback_keeps_mode_defaults() {
        let config = QcConfig::load_with_fallback(None, SimulationMode::Restart);
        assert_eq!(config.mode, SimulationMode::Restart);
        assert_eq!(config.required_sections, restart_required_sections());
    }
}
