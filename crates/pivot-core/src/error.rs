use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the pivot report crates.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The byte stream could not be decoded as a workbook.
    #[error("Unreadable workbook: {0}")]
    UnreadableFile(String),

    /// Neither of the expected pivot sheets exists in the workbook.
    #[error("Sheets not found: expected {units:?} or {cases:?}")]
    SheetNotFound { units: String, cases: String },

    /// The pivot sheets were located but contained no recognisable data.
    #[error("No pivot data found in sheets {0:?}")]
    EmptyResult(Vec<String>),

    /// Writing an exported artifact failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A CSV record could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReportError {
    /// Short text suitable for a status line shown to the person who loaded
    /// the file.
    pub fn status_message(&self) -> String {
        match self {
            ReportError::SheetNotFound { units, cases } => format!(
                "Could not find the pivot sheets \"{}\" or \"{}\" in this file.",
                units, cases
            ),
            ReportError::EmptyResult(_) => {
                "The pivot sheets were found but no USUÁRIO header or data rows were recognised."
                    .to_string()
            }
            ReportError::UnreadableFile(msg) => format!("Failed to process the file: {}", msg),
            ReportError::FileRead { path, source } => {
                format!("Failed to read {}: {}", path.display(), source)
            }
            other => format!("Failed to process the file: {}", other),
        }
    }
}

/// Convenience alias used throughout the pivot crates.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ReportError::FileRead {
            path: PathBuf::from("/some/turno.xlsx"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/turno.xlsx"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_sheet_not_found() {
        let err = ReportError::SheetNotFound {
            units: "UNIDADES".to_string(),
            cases: "CAIXAS".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Sheets not found: expected \"UNIDADES\" or \"CAIXAS\""
        );
    }

    #[test]
    fn test_error_display_empty_result() {
        let err = ReportError::EmptyResult(vec!["Pivot Unidades".to_string()]);
        assert_eq!(
            err.to_string(),
            "No pivot data found in sheets [\"Pivot Unidades\"]"
        );
    }

    #[test]
    fn test_error_display_unreadable() {
        let err = ReportError::UnreadableFile("invalid zip header".to_string());
        assert_eq!(err.to_string(), "Unreadable workbook: invalid zip header");
    }

    #[test]
    fn test_status_message_distinguishes_missing_and_empty() {
        let missing = ReportError::SheetNotFound {
            units: "UNIDADES".to_string(),
            cases: "CAIXAS".to_string(),
        };
        let empty = ReportError::EmptyResult(vec![]);
        assert!(missing.status_message().contains("Could not find"));
        assert!(empty.status_message().contains("USUÁRIO"));
        assert_ne!(missing.status_message(), empty.status_message());
    }

    #[test]
    fn test_status_message_carries_decoder_text() {
        let err = ReportError::UnreadableFile("bad signature".to_string());
        assert_eq!(
            err.status_message(),
            "Failed to process the file: bad signature"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_display_config() {
        let err = ReportError::Config("window must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: window must be positive"
        );
    }
}
