use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Header names bound to the logical columns of a scenario table.
///
/// Matching is exact and case-sensitive after trimming; column order in the
/// file does not matter and unrecognised columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub year: String,
    pub forcing: String,
    pub growth_rate0: String,
    pub carrying_capacity: String,
    pub initial_state: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            year: "Year".to_string(),
            forcing: "P".to_string(),
            growth_rate0: "r0".to_string(),
            carrying_capacity: "K".to_string(),
            initial_state: "B0".to_string(),
        }
    }
}

impl ColumnSchema {
    /// Default schema with a differently named forcing column (e.g. `NO2`).
    pub fn with_forcing(forcing: impl Into<String>) -> Self {
        Self {
            forcing: forcing.into(),
            ..Self::default()
        }
    }

    pub(crate) fn names(&self) -> [&str; 5] {
        [
            &self.year,
            &self.forcing,
            &self.growth_rate0,
            &self.carrying_capacity,
            &self.initial_state,
        ]
    }
}

/// How numeric fields that fail to parse are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// An unparsable field rejects the whole row (the row is skipped).
    #[default]
    Strict,
    /// Use the longest numeric prefix of the field, or zero if there is none.
    Lenient,
}

/// Row-level parsing options shared by every table reader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub numeric: NumericMode,
    /// Optional ceiling on accepted data rows; exceeding it is fatal.
    pub max_rows: Option<usize>,
}

impl ParseOptions {
    pub fn lenient() -> Self {
        Self {
            numeric: NumericMode::Lenient,
            ..Self::default()
        }
    }
}

/// A data row that was skipped while reading a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 1-based line number in the source
    pub line: u64,
    /// The row as read, fields re-joined with commas
    pub content: String,
    pub message: String,
}

pub(crate) fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Resolve the position of every required column in the header.
pub(crate) fn bind_columns(
    headers: &csv::StringRecord,
    required: &[&str],
    source_name: &str,
) -> Result<Vec<usize>, SimError> {
    if headers.is_empty() {
        return Err(SimError::EmptyInput(source_name.to_string()));
    }

    let mut positions = Vec::with_capacity(required.len());
    let mut missing = Vec::new();
    for name in required {
        match headers.iter().position(|h| h == *name) {
            Some(idx) => positions.push(idx),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(SimError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        });
    }
    Ok(positions)
}

/// Read every data row, binding `required` columns by name and handing each
/// well-formed row to `parse`.
///
/// Rows shorter than the header and rows `parse` rejects with a row-level
/// error are skipped with a warning and reported as [`RowIssue`]s; any other
/// error aborts the scan.
pub(crate) fn scan_rows<R, T, F>(
    rdr: &mut csv::Reader<R>,
    source_name: &str,
    required: &[&str],
    options: &ParseOptions,
    mut parse: F,
) -> Result<(Vec<T>, Vec<RowIssue>), SimError>
where
    R: Read,
    F: FnMut(&csv::StringRecord, &[usize], u64) -> Result<T, SimError>,
{
    let headers = rdr.headers()?.clone();
    let positions = bind_columns(&headers, required, source_name)?;
    let width = headers.len();

    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(str::is_empty) {
            continue;
        }

        let content = record.iter().collect::<Vec<_>>().join(",");
        let parsed = if record.len() < width {
            Err(SimError::MalformedRow {
                line,
                reason: format!("expected {width} fields, found {}", record.len()),
            })
        } else {
            parse(&record, &positions, line)
        };

        match parsed {
            Ok(row) => {
                if let Some(limit) = options.max_rows {
                    if rows.len() >= limit {
                        return Err(SimError::TooManyRows {
                            source_name: source_name.to_string(),
                            limit,
                        });
                    }
                }
                rows.push(row);
            }
            Err(SimError::MalformedRow { line, reason }) => {
                tracing::warn!(source = source_name, line, row = %content, "skipping row: {reason}");
                issues.push(RowIssue {
                    line,
                    content,
                    message: reason,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok((rows, issues))
}

/// Parse a real-valued field according to `mode`.
pub(crate) fn parse_real(
    field: &str,
    mode: NumericMode,
    column: &str,
    line: u64,
) -> Result<f64, SimError> {
    if let Ok(value) = field.parse::<f64>() {
        return Ok(value);
    }
    match mode {
        NumericMode::Strict => Err(SimError::MalformedRow {
            line,
            reason: format!("column {column}: '{field}' is not a number"),
        }),
        NumericMode::Lenient => {
            let value = longest_prefix(field, |s| s.parse::<f64>().ok()).unwrap_or(0.0);
            tracing::warn!(line, column, field, value, "lenient numeric fallback");
            Ok(value)
        }
    }
}

/// Parse an integer year field according to `mode`.
pub(crate) fn parse_year(
    field: &str,
    mode: NumericMode,
    column: &str,
    line: u64,
) -> Result<i32, SimError> {
    if let Ok(value) = field.parse::<i32>() {
        return Ok(value);
    }
    match mode {
        NumericMode::Strict => Err(SimError::MalformedRow {
            line,
            reason: format!("column {column}: '{field}' is not an integer year"),
        }),
        NumericMode::Lenient => {
            let value = longest_prefix(field, |s| s.parse::<i32>().ok()).unwrap_or(0);
            tracing::warn!(line, column, field, value, "lenient numeric fallback");
            Ok(value)
        }
    }
}

fn longest_prefix<T>(field: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    std::iter::once(field.len())
        .chain(field.char_indices().rev().map(|(i, _)| i).filter(|&i| i > 0))
        .find_map(|end| parse(&field[..end]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(names.to_vec())
    }

    #[test]
    fn test_bind_columns_any_order() {
        let h = headers(&["B0", "K", "Year", "extra", "r0", "P"]);
        let schema = ColumnSchema::default();
        let pos = bind_columns(&h, &schema.names(), "t.csv").unwrap();
        assert_eq!(pos, vec![2, 5, 4, 1, 0]);
    }

    #[test]
    fn test_bind_columns_reports_every_missing_column() {
        let h = headers(&["Year", "P"]);
        let schema = ColumnSchema::default();
        match bind_columns(&h, &schema.names(), "t.csv") {
            Err(SimError::MissingColumns { columns, .. }) => {
                assert_eq!(columns, vec!["r0", "K", "B0"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_bind_columns_is_case_sensitive() {
        let h = headers(&["year", "P", "r0", "K", "B0"]);
        let schema = ColumnSchema::default();
        assert!(bind_columns(&h, &schema.names(), "t.csv").is_err());
    }

    #[test]
    fn test_bind_columns_empty_header() {
        let h = csv::StringRecord::new();
        assert!(matches!(
            bind_columns(&h, &["Year"], "t.csv"),
            Err(SimError::EmptyInput(_))
        ));
    }

    #[test]
    fn test_parse_real_strict_rejects_garbage() {
        let err = parse_real("0.5abc", NumericMode::Strict, "P", 3).unwrap_err();
        assert!(err.is_row_level());
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_parse_real_lenient_uses_prefix() {
        assert_eq!(parse_real("0.5abc", NumericMode::Lenient, "P", 1).unwrap(), 0.5);
        assert_eq!(parse_real("1e-3x", NumericMode::Lenient, "P", 1).unwrap(), 1e-3);
        assert_eq!(parse_real("abc", NumericMode::Lenient, "P", 1).unwrap(), 0.0);
        assert_eq!(parse_real("", NumericMode::Lenient, "P", 1).unwrap(), 0.0);
    }

    #[test]
    fn test_parse_real_lenient_multibyte_suffix() {
        assert_eq!(parse_real("0.5\u{e9}", NumericMode::Lenient, "P", 1).unwrap(), 0.5);
        assert_eq!(parse_real("0.25\u{b5}g", NumericMode::Lenient, "P", 1).unwrap(), 0.25);
        assert_eq!(parse_real("\u{e9}0.5", NumericMode::Lenient, "P", 1).unwrap(), 0.0);
        assert_eq!(parse_year("2021\u{e9}", NumericMode::Lenient, "Year", 1).unwrap(), 2021);
    }

    #[test]
    fn test_parse_real_exponent_notation() {
        assert_eq!(parse_real("2.5E+01", NumericMode::Strict, "P", 1).unwrap(), 25.0);
    }

    #[test]
    fn test_parse_year_lenient_truncates() {
        assert_eq!(parse_year("2020.0", NumericMode::Lenient, "Year", 1).unwrap(), 2020);
        assert!(parse_year("2020.0", NumericMode::Strict, "Year", 1).is_err());
    }

    #[test]
    fn test_schema_toml_partial_override() {
        let schema: ColumnSchema = toml::from_str("forcing = \"NO2\"").unwrap();
        assert_eq!(schema.forcing, "NO2");
        assert_eq!(schema.year, "Year");
        assert_eq!(schema, ColumnSchema::with_forcing("NO2"));
    }

    #[test]
    fn test_numeric_mode_default_is_strict() {
        assert_eq!(ParseOptions::default().numeric, NumericMode::Strict);
        assert_eq!(ParseOptions::lenient().numeric, NumericMode::Lenient);
    }
}
