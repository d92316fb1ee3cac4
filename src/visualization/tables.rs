use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table};

use crate::io::{ColumnSchema, RowIssue};
use crate::models::{MergedReport, RegionalPrediction, ScenarioTable};

fn new_table(header: Vec<String>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Format the merged scenario comparison as a string.
pub fn format_report_table(report: &MergedReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Scenario Comparison".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    if report.is_empty() {
        output.push_str("  No year is shared by every scenario.\n");
        return output;
    }

    let mut table = new_table(report.header());
    for record in &report.records {
        let mut row = vec![Cell::new(record.year)];
        for point in &record.points {
            row.push(Cell::new(format!("{:.3}", point.forcing)));
            row.push(Cell::new(format!("{:.4}", point.state)));
        }
        table.add_row(row);
    }

    output.push_str(&format!("{table}\n"));
    output
}

/// Print the merged scenario comparison.
pub fn print_report_table(report: &MergedReport) {
    print!("{}", format_report_table(report));
}

/// Format a parsed scenario table under the header names it was read with,
/// followed by any rows that were skipped.
pub fn format_scenario_table(
    table: &ScenarioTable,
    schema: &ColumnSchema,
    issues: &[RowIssue],
) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", table.name.as_str().bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut grid = new_table(schema.names().iter().map(|s| s.to_string()).collect());
    for rec in table {
        grid.add_row(vec![
            Cell::new(rec.year),
            Cell::new(format!("{:.4}", rec.forcing)),
            Cell::new(format!("{:.4}", rec.growth_rate0)),
            Cell::new(format!("{:.4}", rec.carrying_capacity)),
            Cell::new(format!("{:.4}", rec.initial_state)),
        ]);
    }
    output.push_str(&format!("{grid}\n"));
    output.push_str(&format!("  {} rows\n", table.len()));

    if !issues.is_empty() {
        output.push_str(&format!(
            "\n{} {} row(s) skipped:\n",
            "Warning:".yellow().bold(),
            issues.len()
        ));
        for issue in issues {
            output.push_str(&format!(
                "  line {}: {} ({})\n",
                issue.line, issue.content, issue.message
            ));
        }
    }
    output
}

/// Print a parsed scenario table.
pub fn print_scenario_table(table: &ScenarioTable, schema: &ColumnSchema, issues: &[RowIssue]) {
    print!("{}", format_scenario_table(table, schema, issues));
}

/// Format the last prediction of every region.
pub fn format_regional_summary(predictions: &[RegionalPrediction]) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Regional Projections".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(60)));

    let mut table = new_table(vec![
        "Region".to_string(),
        "Years".to_string(),
        "Final Year".to_string(),
        "B_predicted".to_string(),
    ]);

    let mut start = 0;
    while start < predictions.len() {
        let region = &predictions[start].region;
        let len = predictions[start..]
            .iter()
            .take_while(|p| &p.region == region)
            .count();
        let last = &predictions[start + len - 1];
        table.add_row(vec![
            Cell::new(region),
            Cell::new(len),
            Cell::new(last.year),
            Cell::new(format!("{:.4}", last.predicted)),
        ]);
        start += len;
    }

    output.push_str(&format!("{table}\n"));
    output
}

/// Print the last prediction of every region.
pub fn print_regional_summary(predictions: &[RegionalPrediction]) {
    print!("{}", format_regional_summary(predictions));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MergedRecord, ParameterRecord, ScenarioPoint};

    fn sample_report() -> MergedReport {
        MergedReport {
            labels: vec!["up".into(), "down".into()],
            records: vec![MergedRecord {
                year: 2030,
                points: vec![
                    ScenarioPoint { forcing: 1.105, state: 0.61234 },
                    ScenarioPoint { forcing: 0.904, state: 0.65432 },
                ],
            }],
        }
    }

    #[test]
    fn test_report_table_contains_headers_and_values() {
        let output = format_report_table(&sample_report());
        assert!(output.contains("Scenario Comparison"));
        assert!(output.contains("NDVI_up"));
        assert!(output.contains("P_down"));
        assert!(output.contains("2030"));
        assert!(output.contains("0.6123"));
    }

    #[test]
    fn test_report_table_empty() {
        let report = MergedReport {
            labels: vec!["a".into()],
            records: vec![],
        };
        let output = format_report_table(&report);
        assert!(output.contains("No year is shared"));
    }

    #[test]
    fn test_scenario_table_lists_rows_and_issues() {
        let table = ScenarioTable::new(
            "up.csv",
            vec![ParameterRecord::new(2020, 0.5, 0.1, 1.0, 0.3)],
        );
        let issues = vec![RowIssue {
            line: 3,
            content: "2021,0.5".into(),
            message: "expected 5 fields, found 2".into(),
        }];
        let output = format_scenario_table(&table, &ColumnSchema::default(), &issues);
        assert!(output.contains("up.csv"));
        assert!(output.contains("2020"));
        assert!(output.contains("1 rows"));
        assert!(output.contains("line 3: 2021,0.5"));
    }

    #[test]
    fn test_scenario_table_uses_schema_header_names() {
        let table = ScenarioTable::new(
            "no2.csv",
            vec![ParameterRecord::new(2020, 12.5, 0.1, 1.0, 0.3)],
        );
        let output = format_scenario_table(&table, &ColumnSchema::with_forcing("NO2"), &[]);
        assert!(output.contains("NO2"));
        assert!(!output.contains(" P "));
        assert!(output.contains("12.5000"));
    }

    #[test]
    fn test_regional_summary_one_row_per_region() {
        let preds = vec![
            RegionalPrediction { region: "Nord".into(), year: 2025, predicted: 0.5 },
            RegionalPrediction { region: "Nord".into(), year: 2026, predicted: 0.55 },
            RegionalPrediction { region: "Sud".into(), year: 2025, predicted: 0.42 },
        ];
        let output = format_regional_summary(&preds);
        assert!(output.contains("Nord"));
        assert!(output.contains("0.5500"));
        assert!(output.contains("Sud"));
        assert!(output.contains("0.4200"));
    }
}
