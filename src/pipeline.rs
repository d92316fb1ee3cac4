use std::path::Path;

use crate::analysis::{merge_scenarios, simulate_series, ScenarioRun};
use crate::config::{PipelineConfig, ScenarioSource};
use crate::error::SimError;
use crate::io::{read_table_with_issues, CsvFormat, JsonFormat, ReportWriter, RowIssue};
use crate::models::MergedReport;

/// Outcome of a combined run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: MergedReport,
    /// Rows skipped while reading each scenario, by label
    pub skipped: Vec<(String, Vec<RowIssue>)>,
}

impl RunSummary {
    pub fn num_skipped(&self) -> usize {
        self.skipped.iter().map(|(_, issues)| issues.len()).sum()
    }
}

/// Parse → simulate → merge → write, driven by an explicit configuration.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load and simulate one scenario.
    pub fn run_scenario(
        &self,
        source: &ScenarioSource,
    ) -> Result<(ScenarioRun, Vec<RowIssue>), SimError> {
        let (table, issues) =
            read_table_with_issues(&source.path, &self.config.columns, &self.config.parse)?;
        let series = simulate_series(&table, &self.config.integrator, self.config.initial_state);
        tracing::info!(
            scenario = %source.label,
            rows = table.len(),
            skipped = issues.len(),
            "scenario simulated"
        );
        Ok((ScenarioRun::new(&source.label, table, series), issues))
    }

    /// Load, simulate and merge every scenario without writing anything.
    /// Stops at the first scenario that cannot be loaded.
    pub fn merge(&self) -> Result<RunSummary, SimError> {
        let mut runs = Vec::with_capacity(self.config.scenarios.len());
        let mut skipped = Vec::new();
        for source in &self.config.scenarios {
            let (run, issues) = self.run_scenario(source)?;
            skipped.push((source.label.clone(), issues));
            runs.push(run);
        }

        let report = merge_scenarios(&runs)?;
        Ok(RunSummary { report, skipped })
    }

    /// Run the whole pipeline and write the report to the configured output.
    pub fn run(&self) -> Result<RunSummary, SimError> {
        let summary = self.merge()?;
        let writer = report_writer(&self.config);
        writer.write(&summary.report, &self.config.output)?;
        tracing::info!(
            output = %self.config.output.display(),
            years = summary.report.len(),
            "report written"
        );
        Ok(summary)
    }
}

/// Writer matching the configured output's extension.
pub fn report_writer(config: &PipelineConfig) -> Box<dyn ReportWriter> {
    if config.writes_json() {
        Box::new(JsonFormat {
            pretty: config.pretty,
        })
    } else {
        Box::new(CsvFormat {
            schema: config.columns.clone(),
            options: config.parse.clone(),
        })
    }
}

/// Run the conventional three-scenario comparison (`up`, `down`, `cst`).
pub fn combine_three(
    up: impl AsRef<Path>,
    down: impl AsRef<Path>,
    constant: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<RunSummary, SimError> {
    let config = PipelineConfig::three_way(
        up.as_ref(),
        down.as_ref(),
        constant.as_ref(),
        output.as_ref(),
    );
    Pipeline::new(config)?.run()
}
