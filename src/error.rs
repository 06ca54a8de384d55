// src/error.rs
//! Error types for the fetch → parse → publish pipeline.
//!
//! None of these cross the lifecycle boundary: the loader logs and reports
//! them, and the previously published value stays current.

use std::path::PathBuf;
use thiserror::Error;

/// Failure retrieving the raw text for a source locator.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Transport failure talking to an HTTP(S) source.
    #[error("HTTP request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Reading a local file failed.
    #[error("reading {path:?} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The locator could not be understood as a URL or a path.
    #[error("invalid source locator {0:?}")]
    InvalidLocator(String),

    /// URL scheme other than http, https or file.
    #[error("unsupported scheme {scheme:?} in {locator}")]
    UnsupportedScheme { scheme: String, locator: String },
}

/// Failure turning retrieved text into records.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The reader rejected the input at the given (1-based) line.
    #[error("malformed input at line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// The payload exceeded the configured row limit.
    #[error("too many rows: {rows} (max {max_rows})")]
    TooManyRows { rows: usize, max_rows: usize },
}

/// Either half of a failed load attempt.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
}

impl LoadError {
    pub fn is_retrieval(&self) -> bool {
        matches!(self, LoadError::Retrieval(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_wraps_both_kinds() {
        let retrieval: LoadError = RetrievalError::InvalidLocator("::".into()).into();
        assert!(retrieval.is_retrieval());
        assert_eq!(
            retrieval.to_string(),
            "retrieval failed: invalid source locator \"::\""
        );

        let parse: LoadError = ParseError::TooManyRows {
            rows: 11,
            max_rows: 10,
        }
        .into();
        assert!(parse.is_parse());
        assert_eq!(parse.to_string(), "parse failed: too many rows: 11 (max 10)");
    }
}
