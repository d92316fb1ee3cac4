use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, simulating, or writing scenarios.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Cannot open {}: {source}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty input: {0} has no header line")]
    EmptyInput(String),

    #[error("Missing columns in {source_name}: {}", columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    #[error("Too many rows in {source_name}: limit is {limit}")]
    TooManyRows { source_name: String, limit: usize },

    #[error("Cannot write output {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

impl SimError {
    /// Whether the error only affects a single row and the caller may continue.
    pub fn is_row_level(&self) -> bool {
        matches!(self, SimError::MalformedRow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_display_names_path() {
        let err = SimError::FileNotFound {
            path: PathBuf::from("scenario_P_up.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("scenario_P_up.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_empty_input_display() {
        let err = SimError::EmptyInput("empty.csv".to_string());
        assert_eq!(err.to_string(), "Empty input: empty.csv has no header line");
    }

    #[test]
    fn test_missing_columns_lists_all() {
        let err = SimError::MissingColumns {
            source_name: "down.csv".to_string(),
            columns: vec!["B0".to_string(), "K".to_string()],
        };
        assert_eq!(err.to_string(), "Missing columns in down.csv: B0, K");
    }

    #[test]
    fn test_malformed_row_is_row_level() {
        let err = SimError::MalformedRow {
            line: 4,
            reason: "expected 5 fields, found 3".to_string(),
        };
        assert!(err.is_row_level());
        assert_eq!(
            err.to_string(),
            "Malformed row at line 4: expected 5 fields, found 3"
        );
    }

    #[test]
    fn test_schema_errors_are_not_row_level() {
        let err = SimError::TooManyRows {
            source_name: "big.csv".to_string(),
            limit: 512,
        };
        assert!(!err.is_row_level());
        assert_eq!(err.to_string(), "Too many rows in big.csv: limit is 512");
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: SimError = io_err.into();
        assert!(matches!(err, SimError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_config_error_from_conversion() {
        let result: Result<toml::Value, _> = toml::from_str("output = ");
        let err: SimError = result.unwrap_err().into();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_json_error_from_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("not valid json{{{");
        let err: SimError = result.unwrap_err().into();
        assert!(err.to_string().contains("JSON error"));
    }
}
