use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::models::ParameterRecord;

/// Floor applied to the state before dividing by it, and the smallest
/// carrying capacity the analytic step will integrate against.
pub const EPSILON: f64 = 1e-12;

/// Euler sub-steps per simulated year used when none is configured.
pub const DEFAULT_STEPS_PER_YEAR: u32 = 100;

fn default_steps_per_year() -> u32 {
    DEFAULT_STEPS_PER_YEAR
}

/// One-year update rule for the logistic state `dB/dt = r(P) * B * (1 - B/K)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Integrator {
    /// Exact solution over one year with `r = r0 * e^P`, clamped to [0, 1].
    #[default]
    Analytic,
    /// Forward Euler with `r = r0 * e^(-alpha * P)`, unclamped.
    #[serde(rename = "substep")]
    SubStepped {
        #[serde(default = "default_steps_per_year")]
        steps_per_year: u32,
        #[serde(default)]
        alpha: f64,
    },
    /// Annual logistic map `B + r * B * (1 - B/K)` with `r = r0 * e^(-P)`, clamped to [0, 1].
    Discrete,
}

impl Integrator {
    /// Sub-stepped Euler integration with the default step count.
    pub fn euler(alpha: f64) -> Self {
        Integrator::SubStepped {
            steps_per_year: DEFAULT_STEPS_PER_YEAR,
            alpha,
        }
    }

    /// Replace the sub-stepping parameters that are given.
    ///
    /// Fails when either is given for a strategy that does not sub-step.
    pub fn with_substeps(
        self,
        steps_per_year: Option<u32>,
        alpha: Option<f64>,
    ) -> Result<Self, SimError> {
        match self {
            Integrator::SubStepped {
                steps_per_year: steps,
                alpha: a,
            } => Ok(Integrator::SubStepped {
                steps_per_year: steps_per_year.unwrap_or(steps),
                alpha: alpha.unwrap_or(a),
            }),
            other if steps_per_year.is_none() && alpha.is_none() => Ok(other),
            other => Err(SimError::ValidationError(format!(
                "steps per year and alpha only apply to the substep integrator, not {other}"
            ))),
        }
    }

    /// State the first step starts from, given a series' declared initial state.
    pub fn seed(&self, initial_state: f64) -> f64 {
        match self {
            Integrator::Analytic => initial_state.clamp(0.0, 1.0),
            Integrator::SubStepped { .. } | Integrator::Discrete => initial_state,
        }
    }

    /// Forcing-adjusted growth rate for a record.
    pub fn effective_rate(&self, record: &ParameterRecord) -> f64 {
        match self {
            Integrator::Analytic => record.growth_rate0 * record.forcing.exp(),
            Integrator::SubStepped { alpha, .. } => {
                record.growth_rate0 * (-alpha * record.forcing).exp()
            }
            Integrator::Discrete => record.growth_rate0 * (-record.forcing).exp(),
        }
    }

    /// Advance `state` by one year using the record's parameters.
    pub fn step(&self, state: f64, record: &ParameterRecord) -> f64 {
        match *self {
            Integrator::Analytic => analytic_step(
                state,
                record.growth_rate0,
                record.forcing,
                record.carrying_capacity,
            ),
            Integrator::SubStepped {
                steps_per_year,
                alpha,
            } => substep_year(
                state,
                record.forcing,
                record.growth_rate0,
                alpha,
                record.carrying_capacity,
                steps_per_year,
            ),
            Integrator::Discrete => discrete_step(
                state,
                record.growth_rate0,
                record.forcing,
                record.carrying_capacity,
            ),
        }
    }
}

impl std::fmt::Display for Integrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Integrator::Analytic => write!(f, "analytic"),
            Integrator::SubStepped {
                steps_per_year,
                alpha,
            } => write!(f, "substep ({steps_per_year} steps/yr, alpha={alpha})"),
            Integrator::Discrete => write!(f, "discrete"),
        }
    }
}

impl std::str::FromStr for Integrator {
    type Err = SimError;

    /// Parse `analytic`, `discrete`, or `substep[:ALPHA[:STEPS]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let mut parts = lower.split(':');
        let kind = parts.next().unwrap_or_default();
        let params: Vec<&str> = parts.collect();

        let invalid = || {
            SimError::ValidationError(format!(
                "Unknown integrator: '{s}'. Use analytic, discrete, or substep[:ALPHA[:STEPS]]"
            ))
        };

        match (kind, params.as_slice()) {
            ("analytic" | "exact", []) => Ok(Integrator::Analytic),
            ("discrete" | "map", []) => Ok(Integrator::Discrete),
            ("substep" | "euler", rest) if rest.len() <= 2 => {
                let alpha = match rest.first() {
                    Some(a) => a.parse::<f64>().map_err(|_| invalid())?,
                    None => 0.0,
                };
                let steps_per_year = match rest.get(1) {
                    Some(n) => n.parse::<u32>().map_err(|_| invalid())?,
                    None => DEFAULT_STEPS_PER_YEAR,
                };
                Ok(Integrator::SubStepped {
                    steps_per_year,
                    alpha,
                })
            }
            _ => Err(invalid()),
        }
    }
}

/// Exact one-year logistic update with `r = r0 * e^P`.
///
/// `B_next = K / (1 + (K/B - 1) * e^(-r))`, with `B` floored at [`EPSILON`].
/// A capacity at or below [`EPSILON`] leaves the state unchanged. The result
/// is clamped to [0, 1].
pub fn analytic_step(state: f64, growth_rate0: f64, forcing: f64, capacity: f64) -> f64 {
    if capacity <= EPSILON {
        return state.clamp(0.0, 1.0);
    }
    let r = growth_rate0 * forcing.exp();
    let safe = state.max(EPSILON);
    let next = capacity / (1.0 + (capacity / safe - 1.0) * (-r).exp());
    next.clamp(0.0, 1.0)
}

/// One year of forward Euler in `steps_per_year` equal sub-steps, with
/// `r = r0 * e^(-alpha * P)`. No clamping is applied.
///
/// A step count of zero is treated as one.
pub fn substep_year(
    state: f64,
    forcing: f64,
    growth_rate0: f64,
    alpha: f64,
    capacity: f64,
    steps_per_year: u32,
) -> f64 {
    let steps = steps_per_year.max(1);
    let dt = 1.0 / steps as f64;
    let r = growth_rate0 * (-alpha * forcing).exp();
    (0..steps).fold(state, |b, _| b + dt * r * b * (1.0 - b / capacity))
}

/// Annual logistic map with `r = r0 * e^(-P)`, clamped to [0, 1].
pub fn discrete_step(state: f64, growth_rate0: f64, forcing: f64, capacity: f64) -> f64 {
    let r = growth_rate0 * (-forcing).exp();
    let next = state + r * state * (1.0 - state / capacity);
    next.clamp(0.0, 1.0)
}
