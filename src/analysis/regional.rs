use crate::analysis::{project_rows, simulate_series, Integrator};
use crate::io::RegionalTable;
use crate::models::RegionalPrediction;

/// Sub-stepped integrator configured with the table's global `alpha`.
pub fn regional_integrator(table: &RegionalTable, steps_per_year: u32) -> Integrator {
    Integrator::SubStepped {
        steps_per_year,
        alpha: table.alpha,
    }
}

/// Simulate every region independently, re-seeding from each region's own
/// first `B0` and using its own capacity.
pub fn simulate_regions(table: &RegionalTable, integrator: &Integrator) -> Vec<RegionalPrediction> {
    let mut predictions = Vec::with_capacity(table.num_rows());
    for group in &table.groups {
        let series = simulate_series(&group.table, integrator, None);
        predictions.extend(group.table.iter().zip(series.values).map(|(record, predicted)| {
            RegionalPrediction {
                region: group.region.clone(),
                year: record.year,
                predicted,
            }
        }));
    }

    tracing::info!(
        source = %table.name,
        regions = table.num_regions(),
        rows = predictions.len(),
        "simulated regions"
    );
    predictions
}

/// Project every row of every region one year ahead from its own `B0`, with
/// no state carried between rows.
pub fn project_regions(table: &RegionalTable, integrator: &Integrator) -> Vec<RegionalPrediction> {
    let mut predictions = Vec::with_capacity(table.num_rows());
    for group in &table.groups {
        let projected = project_rows(&group.table, integrator);
        predictions.extend(group.table.iter().zip(projected.values).map(|(record, predicted)| {
            RegionalPrediction {
                region: group.region.clone(),
                year: record.year,
                predicted,
            }
        }));
    }

    tracing::info!(
        source = %table.name,
        regions = table.num_regions(),
        rows = predictions.len(),
        "projected region rows"
    );
    predictions
}
