use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the stream-stats crates.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// The input path does not exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// A file exists but could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed, or is not an array of records.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A record is missing a required field or carries an unparsable
    /// timestamp. Identifies the record index and the offending field.
    #[error("Malformed event at record {index}: invalid or missing field `{field}`")]
    MalformedEvent { index: usize, field: &'static str },

    /// An aggregate that needs at least one event was asked of an empty list.
    #[error("Insufficient data for {0}: the event list is empty")]
    InsufficientData(&'static str),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the stream-stats crates.
pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_not_found() {
        let err = HistoryError::FileNotFound(PathBuf::from("/missing/history.json"));
        assert_eq!(err.to_string(), "File not found: /missing/history.json");
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = HistoryError::FileRead {
            path: PathBuf::from("/some/history.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/history.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display_malformed_event() {
        let err = HistoryError::MalformedEvent {
            index: 7,
            field: "ts",
        };
        assert_eq!(
            err.to_string(),
            "Malformed event at record 7: invalid or missing field `ts`"
        );
    }

    #[test]
    fn test_error_display_insufficient_data() {
        let err = HistoryError::InsufficientData("average duration");
        assert_eq!(
            err.to_string(),
            "Insufficient data for average duration: the event list is empty"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("[broken").unwrap_err();
        let err: HistoryError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: HistoryError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }
}
