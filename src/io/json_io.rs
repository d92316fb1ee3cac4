use std::path::Path;

use super::write_atomically;
use crate::error::SimError;
use crate::models::MergedReport;

/// Read a merged report previously written as JSON.
pub fn read_report_json(path: impl AsRef<Path>) -> Result<MergedReport, SimError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let report: MergedReport = serde_json::from_str(&content)?;
    let width = report.labels.len();
    if let Some(bad) = report.records.iter().find(|r| r.points.len() != width) {
        return Err(SimError::ValidationError(format!(
            "year {} has {} scenario values, expected {width}",
            bad.year,
            bad.points.len()
        )));
    }
    Ok(report)
}

/// Write a merged report as JSON.
///
/// JSON has no representation for NaN or infinity, so a report holding a
/// non-finite value is rejected before anything is written.
pub fn write_report_json(
    report: &MergedReport,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), SimError> {
    for record in &report.records {
        for (label, point) in report.labels.iter().zip(&record.points) {
            if !point.forcing.is_finite() || !point.state.is_finite() {
                return Err(SimError::ValidationError(format!(
                    "scenario '{label}' year {}: non-finite value (P={}, NDVI={}) cannot be written as JSON",
                    record.year, point.forcing, point.state
                )));
            }
        }
    }

    write_atomically(path.as_ref(), |out| {
        if pretty {
            serde_json::to_writer_pretty(&mut *out, report)?;
        } else {
            serde_json::to_writer(&mut *out, report)?;
        }
        out.write_all(b"\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergedRecord, ScenarioPoint};

    fn sample_report() -> MergedReport {
        MergedReport {
            labels: vec!["up".into(), "cst".into()],
            records: vec![MergedRecord {
                year: 2040,
                points: vec![
                    ScenarioPoint { forcing: 14.2, state: 0.61 },
                    ScenarioPoint { forcing: 12.0, state: 0.63 },
                ],
            }],
        }
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&sample_report(), &path, true).unwrap();
        let loaded = read_report_json(&path).unwrap();
        assert_eq!(loaded, sample_report());
    }

    #[test]
    fn test_non_finite_state_rejected_before_writing() {
        let mut report = sample_report();
        report.records[0].points[1].state = f64::NAN;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let err = write_report_json(&report, &path, false).unwrap_err();
        assert!(matches!(err, SimError::ValidationError(_)));
        assert!(err.to_string().contains("'cst' year 2040"));
        assert!(!path.exists());

        report.records[0].points[1].state = f64::INFINITY;
        assert!(write_report_json(&report, &path, false).is_err());
    }

    #[test]
    fn test_compact_json_is_single_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_report_json(&sample_report(), &path, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end().lines().count(), 1);
    }

    #[test]
    fn test_read_rejects_ragged_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"labels":["a","b"],"records":[{"year":2020,"points":[{"forcing":1.0,"state":0.5}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            read_report_json(&path),
            Err(SimError::ValidationError(_))
        ));
    }
}
