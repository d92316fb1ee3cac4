mod csv_io;
mod json_io;
mod regional;
mod schema;

use std::fs::File;
use std::path::Path;

use crate::error::SimError;
use crate::models::{MergedReport, ScenarioTable};

pub use csv_io::{
    parse_table_with_issues, read_table, read_table_from_bytes, read_table_with_issues,
    write_predictions_csv, write_projection_csv, write_report_csv, write_series_csv,
};
pub use json_io::{read_report_json, write_report_json};
pub use regional::{
    parse_regional_with_issues, read_regional, RegionGroup, RegionalSchema, RegionalTable,
};
pub use schema::{ColumnSchema, NumericMode, ParseOptions, RowIssue};

/// Trait for reading a scenario table from a file.
pub trait TableReader {
    fn read(&self, path: &Path) -> Result<ScenarioTable, SimError>;
}

/// Trait for writing a merged scenario report to a file.
pub trait ReportWriter {
    fn write(&self, report: &MergedReport, path: &Path) -> Result<(), SimError>;
}

/// CSV format reader/writer.
#[derive(Debug, Clone, Default)]
pub struct CsvFormat {
    pub schema: ColumnSchema,
    pub options: ParseOptions,
}

impl TableReader for CsvFormat {
    fn read(&self, path: &Path) -> Result<ScenarioTable, SimError> {
        read_table(path, &self.schema, &self.options)
    }
}

impl ReportWriter for CsvFormat {
    fn write(&self, report: &MergedReport, path: &Path) -> Result<(), SimError> {
        write_report_csv(report, path)
    }
}

/// JSON report writer.
#[derive(Debug, Clone, Default)]
pub struct JsonFormat {
    pub pretty: bool,
}

impl ReportWriter for JsonFormat {
    fn write(&self, report: &MergedReport, path: &Path) -> Result<(), SimError> {
        write_report_json(report, path, self.pretty)
    }
}

pub(crate) fn open_input(path: &Path) -> Result<File, SimError> {
    File::open(path).map_err(|source| SimError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Write through a temporary file in the destination directory, then move it
/// into place, so `path` is either fully written or untouched.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), SimError>
where
    F: FnOnce(&mut dyn std::io::Write) -> std::io::Result<()>,
{
    let output_error = |source: std::io::Error| SimError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(output_error)?;
    write(&mut tmp).map_err(output_error)?;
    tmp.persist(path).map_err(|e| output_error(e.error))?;
    tracing::debug!(path = %path.display(), "wrote output");
    Ok(())
}
