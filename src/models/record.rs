use serde::{Deserialize, Serialize};

/// One row of a scenario table: the forcing and growth parameters for a year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Simulation time key
    pub year: i32,
    /// Exogenous driver (P) for this year
    pub forcing: f64,
    /// Baseline intrinsic growth rate (r0)
    pub growth_rate0: f64,
    /// Upper asymptote of the state variable (K)
    pub carrying_capacity: f64,
    /// State at the first simulated year (B0); only the seeding record's value is used
    pub initial_state: f64,
}

impl ParameterRecord {
    pub fn new(
        year: i32,
        forcing: f64,
        growth_rate0: f64,
        carrying_capacity: f64,
        initial_state: f64,
    ) -> Self {
        Self {
            year,
            forcing,
            growth_rate0,
            carrying_capacity,
            initial_state,
        }
    }
}

impl std::fmt::Display for ParameterRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: P={} r0={} K={} B0={}",
            self.year, self.forcing, self.growth_rate0, self.carrying_capacity, self.initial_state
        )
    }
}
