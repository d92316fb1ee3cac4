mod integrator;
mod merge;
mod regional;
mod simulator;

pub use integrator::{
    analytic_step, discrete_step, substep_year, Integrator, DEFAULT_STEPS_PER_YEAR, EPSILON,
};
pub use merge::{merge_scenarios, ScenarioRun};
pub use regional::{project_regions, regional_integrator, simulate_regions};
pub use simulator::{project_rows, simulate_series};
