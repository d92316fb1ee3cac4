pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod visualization;

pub use analysis::Integrator;
pub use config::{PipelineConfig, ScenarioSource};
pub use error::SimError;
pub use io::{ReportWriter, TableReader};
pub use models::{
    MergedRecord, MergedReport, ParameterRecord, RegionalPrediction, ScenarioPoint, ScenarioTable,
    SimulatedSeries,
};
pub use pipeline::{Pipeline, RunSummary};
