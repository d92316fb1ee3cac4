use crate::analysis::Integrator;
use crate::models::{ScenarioTable, SimulatedSeries};

/// Simulate a table year by year, carrying the state from one row to the next.
///
/// The first value is one step from the seeded initial state: `initial_state`
/// when given, otherwise the first record's `B0`. Every row supplies its own
/// forcing, growth rate and capacity. An empty table gives an empty series.
///
/// # Examples
///
/// ```
/// use ndvi_scenario_simulator::analysis::{simulate_series, Integrator};
/// use ndvi_scenario_simulator::{ParameterRecord, ScenarioTable};
///
/// let table = ScenarioTable::new("flat", vec![ParameterRecord::new(2020, 0.0, 0.0, 1.0, 0.4)]);
/// let series = simulate_series(&table, &Integrator::Analytic, None);
/// assert!((series.values[0] - 0.4).abs() < 1e-12);
/// ```
pub fn simulate_series(
    table: &ScenarioTable,
    integrator: &Integrator,
    initial_state: Option<f64>,
) -> SimulatedSeries {
    let mut series = SimulatedSeries::with_capacity(table.len());
    let Some(first) = table.first() else {
        return series;
    };

    let mut state = integrator.seed(initial_state.unwrap_or(first.initial_state));
    for record in table {
        state = integrator.step(state, record);
        series.push(state);
    }

    tracing::debug!(
        source = %table.name,
        integrator = %integrator,
        rows = series.len(),
        last = series.last(),
        "simulated series"
    );
    series
}

/// Project every row one year ahead from its own `B0`, independently of the
/// other rows.
pub fn project_rows(table: &ScenarioTable, integrator: &Integrator) -> SimulatedSeries {
    table
        .iter()
        .map(|record| integrator.step(integrator.seed(record.initial_state), record))
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analytic_step;
    use crate::models::ParameterRecord;

    fn table(records: Vec<ParameterRecord>) -> ScenarioTable {
        ScenarioTable::new("sim", records)
    }

    #[test]
    fn test_empty_table_gives_empty_series() {
        let series = simulate_series(&table(vec![]), &Integrator::Analytic, None);
        assert!(series.is_empty());
    }

    #[test]
    fn test_one_value_per_row() {
        let t = table(
            (2019..2051)
                .map(|y| ParameterRecord::new(y, 1.0, 0.05, 0.9, 0.57))
                .collect(),
        );
        let series = simulate_series(&t, &Integrator::Analytic, None);
        assert_eq!(series.len(), 32);
    }

    #[test]
    fn test_state_carries_between_rows() {
        let t = table(vec![
            ParameterRecord::new(2020, 0.2, 0.1, 1.0, 0.3),
            ParameterRecord::new(2021, 0.4, 0.2, 0.8, 0.9),
        ]);
        let series = simulate_series(&t, &Integrator::Analytic, None);
        let first = analytic_step(0.3, 0.1, 0.2, 1.0);
        let second = analytic_step(first, 0.2, 0.4, 0.8);
        assert_eq!(series.values, vec![first, second]);
    }

    #[test]
    fn test_only_first_b0_seeds() {
        let a = table(vec![
            ParameterRecord::new(2020, 0.0, 0.1, 1.0, 0.3),
            ParameterRecord::new(2021, 0.0, 0.1, 1.0, 0.3),
        ]);
        let b = table(vec![
            ParameterRecord::new(2020, 0.0, 0.1, 1.0, 0.3),
            ParameterRecord::new(2021, 0.0, 0.1, 1.0, 0.9),
        ]);
        let sa = simulate_series(&a, &Integrator::Analytic, None);
        let sb = simulate_series(&b, &Integrator::Analytic, None);
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_analytic_seed_is_clamped() {
        let t = table(vec![ParameterRecord::new(2020, 0.0, 0.0, 1.0, 1.8)]);
        let series = simulate_series(&t, &Integrator::Analytic, None);
        assert!((series.values[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_initial_state_override() {
        let t = table(vec![ParameterRecord::new(2020, 0.0, 0.0, 1.0, 0.9)]);
        let series = simulate_series(&t, &Integrator::Analytic, Some(0.2));
        assert!((series.values[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_substep_series_grows_toward_capacity() {
        let t = table(
            (0..50)
                .map(|i| ParameterRecord::new(2000 + i, 0.0, 0.3, 0.8, 0.1))
                .collect(),
        );
        let series = simulate_series(&t, &Integrator::euler(0.0), None);
        for pair in series.values.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!((series.last().unwrap() - 0.8).abs() < 0.01);
    }

    #[test]
    fn test_project_rows_reseeds_each_row() {
        let t = table(vec![
            ParameterRecord::new(2020, 0.0, 0.1, 1.0, 0.3),
            ParameterRecord::new(2021, 0.0, 0.1, 1.0, 0.6),
        ]);
        let integrator = Integrator::euler(0.0);
        let series = project_rows(&t, &integrator);
        assert_eq!(series.len(), 2);
        assert_eq!(series.values[0], integrator.step(0.3, &t.records()[0]));
        assert_eq!(series.values[1], integrator.step(0.6, &t.records()[1]));
    }
}
