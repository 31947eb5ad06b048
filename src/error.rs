//! Error types for the recommender.
//!
//! Each failure class the engine can surface has its own enum so host layers
//! can map them independently: a broken catalog file is fatal at startup, a
//! schema problem is reported to the caller, and a failed text-generation
//! call carries the upstream status. An empty result list is not an error.

use std::path::PathBuf;
use thiserror::Error;

/// The catalog source could not be turned into a catalog.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No file exists at the configured path.
    #[error("catalog not found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read catalog at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The contents are not a well-formed headered CSV table.
    #[error("malformed catalog {origin}: {source}")]
    Malformed {
        origin: String,
        #[source]
        source: csv::Error,
    },
}

/// The catalog loaded, but cannot be matched against.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Required columns are absent from the header row.
    #[error("catalog is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// Columns exist but some rows leave a required cell blank.
    /// Row numbers are 1-based data rows (header excluded).
    #[error("catalog rows {rows:?} are missing a name or category")]
    IncompleteItems { rows: Vec<usize> },
}

/// The evaluator was called with inputs for which the metrics are undefined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("expected set is empty; recall and precision are undefined")]
    EmptyExpected,

    #[error("k must be at least 1")]
    ZeroK,
}

/// Failure talking to the external text-generation service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("invalid generation config: {0}")]
    InvalidConfig(String),

    #[error("generation request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("generation request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-success HTTP status, with whatever body the service sent back.
    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected generation response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ServiceError {
    /// Strips the request URL so it never reaches logs or error chains.
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_column() {
        let err = SchemaError::MissingColumns {
            missing: vec!["Assessment Name".to_string(), "Test Type".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "catalog is missing required columns: Assessment Name, Test Type"
        );
    }

    #[test]
    fn not_found_mentions_path() {
        let err = LoadError::NotFound {
            path: PathBuf::from("/tmp/nope.csv"),
        };
        assert!(err.to_string().contains("/tmp/nope.csv"));
    }

    #[test]
    fn status_error_keeps_code_and_body() {
        let err = ServiceError::Status {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "generation service returned 429: quota exceeded"
        );
    }
}
