use crate::error::SimError;
use crate::models::{MergedRecord, MergedReport, ScenarioPoint, ScenarioTable, SimulatedSeries};

/// A simulated scenario: its label, source table, and the series derived from it.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub label: String,
    pub table: ScenarioTable,
    pub series: SimulatedSeries,
}

impl ScenarioRun {
    pub fn new(label: impl Into<String>, table: ScenarioTable, series: SimulatedSeries) -> Self {
        Self {
            label: label.into(),
            table,
            series,
        }
    }
}

/// Join scenarios on the years present in all of them.
///
/// Rows follow the year order of the first (primary) scenario; matching rows in
/// the other scenarios are found by binary search on year.
pub fn merge_scenarios(runs: &[ScenarioRun]) -> Result<MergedReport, SimError> {
    let Some(primary) = runs.first() else {
        return Err(SimError::InsufficientData(
            "No scenarios to merge".to_string(),
        ));
    };

    if let Some(run) = runs.iter().find(|r| r.table.len() != r.series.len()) {
        return Err(SimError::ValidationError(format!(
            "scenario '{}': {} records but {} simulated values",
            run.label,
            run.table.len(),
            run.series.len()
        )));
    }

    let mut records = Vec::with_capacity(primary.table.len());
    'years: for record in &primary.table {
        let mut points = Vec::with_capacity(runs.len());
        for run in runs {
            let Some(idx) = run.table.index_of_year(record.year) else {
                continue 'years;
            };
            points.push(ScenarioPoint {
                forcing: run.table.records()[idx].forcing,
                state: run.series.values[idx],
            });
        }
        records.push(MergedRecord {
            year: record.year,
            points,
        });
    }

    tracing::info!(
        scenarios = runs.len(),
        shared_years = records.len(),
        primary_years = primary.table.len(),
        "merged scenarios"
    );

    Ok(MergedReport {
        labels: runs.iter().map(|r| r.label.clone()).collect(),
        records,
    })
}
