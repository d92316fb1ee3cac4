mod record;
mod report;
mod series;
mod table;

pub use record::ParameterRecord;
pub use report::{MergedRecord, MergedReport, RegionalPrediction, ScenarioPoint};
pub use series::SimulatedSeries;
pub use table::ScenarioTable;
