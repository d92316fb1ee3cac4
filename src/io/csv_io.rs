use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::schema::{csv_reader, parse_real, parse_year, scan_rows};
use super::{open_input, write_atomically, ColumnSchema, ParseOptions, RowIssue};
use crate::error::SimError;
use crate::models::{MergedReport, ParameterRecord, RegionalPrediction, ScenarioTable, SimulatedSeries};

/// Parse a scenario table from any reader, returning the skipped rows as well.
pub fn parse_table_with_issues<R: Read>(
    reader: R,
    name: &str,
    schema: &ColumnSchema,
    options: &ParseOptions,
) -> Result<(ScenarioTable, Vec<RowIssue>), SimError> {
    let mut rdr = csv_reader(reader);
    let names = schema.names();
    let mode = options.numeric;

    let (records, issues) = scan_rows(&mut rdr, name, &names, options, |record, pos, line| {
        Ok(ParameterRecord {
            year: parse_year(&record[pos[0]], mode, names[0], line)?,
            forcing: parse_real(&record[pos[1]], mode, names[1], line)?,
            growth_rate0: parse_real(&record[pos[2]], mode, names[2], line)?,
            carrying_capacity: parse_real(&record[pos[3]], mode, names[3], line)?,
            initial_state: parse_real(&record[pos[4]], mode, names[4], line)?,
        })
    })?;

    tracing::debug!(source = name, rows = records.len(), skipped = issues.len(), "parsed table");
    Ok((ScenarioTable::new(name, records), issues))
}

/// Read a scenario table from a CSV file, returning the skipped rows as well.
pub fn read_table_with_issues(
    path: impl AsRef<Path>,
    schema: &ColumnSchema,
    options: &ParseOptions,
) -> Result<(ScenarioTable, Vec<RowIssue>), SimError> {
    let path = path.as_ref();
    let file = open_input(path)?;
    parse_table_with_issues(file, &path.display().to_string(), schema, options)
}

/// Read a scenario table from a CSV file.
pub fn read_table(
    path: impl AsRef<Path>,
    schema: &ColumnSchema,
    options: &ParseOptions,
) -> Result<ScenarioTable, SimError> {
    read_table_with_issues(path, schema, options).map(|(table, _)| table)
}

/// Read a scenario table from CSV bytes.
pub fn read_table_from_bytes(
    data: &[u8],
    name: &str,
    schema: &ColumnSchema,
    options: &ParseOptions,
) -> Result<ScenarioTable, SimError> {
    parse_table_with_issues(data, name, schema, options).map(|(table, _)| table)
}

/// Write a merged scenario report as CSV.
///
/// The file only appears at `path` once every row has been written.
pub fn write_report_csv(report: &MergedReport, path: impl AsRef<Path>) -> Result<(), SimError> {
    write_atomically(path.as_ref(), |out| {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(report.header())?;
        for record in &report.records {
            let mut row = Vec::with_capacity(1 + 2 * record.points.len());
            row.push(record.year.to_string());
            for point in &record.points {
                row.push(point.forcing.to_string());
                row.push(point.state.to_string());
            }
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
        Ok(())
    })
}

/// Output row of a single simulated scenario.
#[derive(Debug, Serialize)]
struct SeriesRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "P")]
    forcing: f64,
    #[serde(rename = "NDVI")]
    state: f64,
    #[serde(rename = "K")]
    carrying_capacity: f64,
    #[serde(rename = "B0")]
    initial_state: f64,
    #[serde(rename = "r0")]
    growth_rate0: f64,
}

/// Write one scenario's simulated series next to its parameters.
pub fn write_series_csv(
    table: &ScenarioTable,
    series: &SimulatedSeries,
    path: impl AsRef<Path>,
) -> Result<(), SimError> {
    if table.len() != series.len() {
        return Err(SimError::ValidationError(format!(
            "{}: {} records but {} simulated values",
            table.name,
            table.len(),
            series.len()
        )));
    }

    write_atomically(path.as_ref(), |out| {
        let mut wtr = csv::Writer::from_writer(out);
        for (rec, state) in table.iter().zip(&series.values) {
            wtr.serialize(SeriesRow {
                year: rec.year,
                forcing: rec.forcing,
                state: *state,
                carrying_capacity: rec.carrying_capacity,
                initial_state: rec.initial_state,
                growth_rate0: rec.growth_rate0,
            })?;
        }
        wtr.flush()?;
        Ok(())
    })
}

/// Output row of an independent per-row projection.
#[derive(Debug, Serialize)]
struct ProjectionRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "P")]
    forcing: f64,
    #[serde(rename = "NDVI")]
    state: f64,
}

/// Write per-row projections (`Year,P,NDVI`).
pub fn write_projection_csv(
    table: &ScenarioTable,
    projected: &SimulatedSeries,
    path: impl AsRef<Path>,
) -> Result<(), SimError> {
    if table.len() != projected.len() {
        return Err(SimError::ValidationError(format!(
            "{}: {} records but {} projected values",
            table.name,
            table.len(),
            projected.len()
        )));
    }

    write_atomically(path.as_ref(), |out| {
        let mut wtr = csv::Writer::from_writer(out);
        for (rec, state) in table.iter().zip(&projected.values) {
            wtr.serialize(ProjectionRow {
                year: rec.year,
                forcing: rec.forcing,
                state: *state,
            })?;
        }
        wtr.flush()?;
        Ok(())
    })
}

/// Write region-batched predictions (`Region,Year,B_predicted`).
pub fn write_predictions_csv(
    predictions: &[RegionalPrediction],
    path: impl AsRef<Path>,
) -> Result<(), SimError> {
    write_atomically(path.as_ref(), |out| {
        let mut wtr = csv::Writer::from_writer(out);
        for prediction in predictions {
            wtr.serialize(prediction)?;
        }
        wtr.flush()?;
        Ok(())
    })
}
