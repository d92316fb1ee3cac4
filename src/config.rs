use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::Integrator;
use crate::error::SimError;
use crate::io::{ColumnSchema, ParseOptions};

/// One scenario input: the label used in output column names and its CSV path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSource {
    pub label: String,
    pub path: PathBuf,
}

impl ScenarioSource {
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
        }
    }
}

impl std::str::FromStr for ScenarioSource {
    type Err = SimError;

    /// Parse `label=path`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((label, path)) if !label.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self::new(label.trim(), path.trim()))
            }
            _ => Err(SimError::ValidationError(format!(
                "Expected LABEL=PATH, got '{s}'"
            ))),
        }
    }
}

/// Everything a combined scenario run needs.
///
/// Loaded from TOML; omitted keys take the defaults, which reproduce the
/// conventional rising/falling/constant file layout:
///
/// ```toml
/// output = "ndvi_futur_combined.csv"
///
/// [integrator]
/// kind = "analytic"
///
/// [[scenarios]]
/// label = "up"
/// path = "scenario_P_up.csv"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scenarios in output order; the first one is the primary for year ordering
    pub scenarios: Vec<ScenarioSource>,
    /// Report path; a `.json` extension selects JSON output
    pub output: PathBuf,
    pub integrator: Integrator,
    /// Seed every scenario from this state instead of its first `B0`
    pub initial_state: Option<f64>,
    /// Pretty-print JSON output
    pub pretty: bool,
    pub columns: ColumnSchema,
    pub parse: ParseOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::three_way(
            "scenario_P_up.csv",
            "scenario_P_down.csv",
            "scenario_P_constant.csv",
            "ndvi_futur_combined.csv",
        )
    }
}

impl PipelineConfig {
    /// Rising, falling and constant forcing scenarios labelled `up`, `down`, `cst`.
    pub fn three_way(
        up: impl Into<PathBuf>,
        down: impl Into<PathBuf>,
        constant: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            scenarios: vec![
                ScenarioSource::new("up", up),
                ScenarioSource::new("down", down),
                ScenarioSource::new("cst", constant),
            ],
            output: output.into(),
            integrator: Integrator::Analytic,
            initial_state: None,
            pretty: false,
            columns: ColumnSchema::default(),
            parse: ParseOptions::default(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config; relative paths inside it are resolved against the
    /// config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SimError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            for scenario in &mut config.scenarios {
                if scenario.path.is_relative() {
                    scenario.path = base.join(&scenario.path);
                }
            }
            if config.output.is_relative() {
                config.output = base.join(&config.output);
            }
        }
        Ok(config)
    }

    /// Check the configuration is usable before any file is touched.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.scenarios.is_empty() {
            return Err(SimError::ValidationError(
                "At least one scenario is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if scenario.label.trim().is_empty() {
                return Err(SimError::ValidationError(format!(
                    "Scenario {} has an empty label",
                    scenario.path.display()
                )));
            }
            if !seen.insert(scenario.label.as_str()) {
                return Err(SimError::ValidationError(format!(
                    "Duplicate scenario label '{}'",
                    scenario.label
                )));
            }
        }

        if let Some(b0) = self.initial_state {
            if !b0.is_finite() {
                return Err(SimError::ValidationError(format!(
                    "Initial state must be finite, got {b0}"
                )));
            }
        }
        if self.parse.max_rows == Some(0) {
            return Err(SimError::ValidationError(
                "max_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the report should be written as JSON.
    pub fn writes_json(&self) -> bool {
        self.output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    }
}
