use colored::Colorize;

use crate::models::MergedReport;

const BAR_WIDTH: usize = 40;

/// Format a text chart of each scenario's simulated NDVI per shared year.
///
/// Bars are scaled to the [0, 1] NDVI range, not to the data maximum, so
/// charts from different runs are comparable.
pub fn format_trajectory_chart(report: &MergedReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "NDVI Trajectories".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if report.is_empty() {
        output.push_str("  No data available.\n");
        return output;
    }

    let label_width = report.labels.iter().map(|l| l.len()).max().unwrap_or(0);

    for (index, label) in report.labels.iter().enumerate() {
        output.push_str(&format!("\n  {}\n", label.bold()));
        for (year, state) in report.trajectory(index) {
            let bar_len = (state.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
            let bar = "\u{2588}".repeat(bar_len);
            output.push_str(&format!(
                "  {:>w$} {:>6}  {:>7.4}  {}\n",
                "",
                year,
                state,
                bar.green(),
                w = label_width
            ));
        }
    }

    output.push('\n');
    output
}

/// Print a text chart of each scenario's simulated NDVI.
pub fn print_trajectory_chart(report: &MergedReport) {
    print!("{}", format_trajectory_chart(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergedRecord, ScenarioPoint};

    #[test]
    fn test_chart_empty() {
        let report = MergedReport {
            labels: vec!["up".into()],
            records: vec![],
        };
        let output = format_trajectory_chart(&report);
        assert!(output.contains("No data available."));
    }

    #[test]
    fn test_chart_one_section_per_scenario() {
        colored::control::set_override(false);
        let report = MergedReport {
            labels: vec!["up".into(), "down".into()],
            records: vec![MergedRecord {
                year: 2040,
                points: vec![
                    ScenarioPoint { forcing: 1.0, state: 1.0 },
                    ScenarioPoint { forcing: 1.0, state: 0.5 },
                ],
            }],
        };
        let output = format_trajectory_chart(&report);
        assert!(output.contains("up"));
        assert!(output.contains("down"));
        assert!(output.contains("2040"));
        assert!(output.contains(&"\u{2588}".repeat(BAR_WIDTH)));
        assert!(output.contains("0.5000"));
    }
}
