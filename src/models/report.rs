use serde::{Deserialize, Serialize};

/// Forcing and simulated state of one scenario in one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub forcing: f64,
    pub state: f64,
}

/// One merged output row: a year shared by every scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub year: i32,
    /// One point per scenario, in the report's label order
    pub points: Vec<ScenarioPoint>,
}

/// Merged comparison of several scenarios on their shared years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedReport {
    pub labels: Vec<String>,
    pub records: Vec<MergedRecord>,
}

impl MergedReport {
    /// Output column names: `Year`, then `P_<label>,NDVI_<label>` per scenario.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(1 + 2 * self.labels.len());
        header.push("Year".to_string());
        for label in &self.labels {
            header.push(format!("P_{label}"));
            header.push(format!("NDVI_{label}"));
        }
        header
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Simulated trajectory of the scenario at `index`, as `(year, state)` pairs.
    pub fn trajectory(&self, index: usize) -> Vec<(i32, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.points.get(index).map(|p| (r.year, p.state)))
            .collect()
    }
}

/// Predicted state for one region and year in a region-batched run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPrediction {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "B_predicted")]
    pub predicted: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> MergedReport {
        MergedReport {
            labels: vec!["up".to_string(), "down".to_string()],
            records: vec![
                MergedRecord {
                    year: 2020,
                    points: vec![
                        ScenarioPoint { forcing: 1.0, state: 0.5 },
                        ScenarioPoint { forcing: 0.9, state: 0.6 },
                    ],
                },
                MergedRecord {
                    year: 2021,
                    points: vec![
                        ScenarioPoint { forcing: 1.1, state: 0.55 },
                        ScenarioPoint { forcing: 0.8, state: 0.65 },
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_header_pairs_per_label() {
        let report = sample_report();
        assert_eq!(
            report.header(),
            vec!["Year", "P_up", "NDVI_up", "P_down", "NDVI_down"]
        );
    }

    #[test]
    fn test_trajectory_extracts_states() {
        let report = sample_report();
        assert_eq!(report.trajectory(1), vec![(2020, 0.6), (2021, 0.65)]);
        assert!(report.trajectory(5).is_empty());
    }

    #[test]
    fn test_report_json_roundtrip() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: MergedReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
