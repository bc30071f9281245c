//! Error types for the trade statistics normalizer.
//!
//! Errors are layered by stage:
//!
//! - [`CsvError`] - reading and decoding input files
//! - [`ExpandError`] - fixed-layout row expansion
//! - [`OutputError`] - writing the long-format table
//! - [`NormalizeError`] - top-level run errors, mapped to exit codes by `main`
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading an input CSV file.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to open or read the file.
    #[error("Failed to read file '{}': {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Malformed CSV (unequal column counts, unterminated quotes, ...).
    #[error("Invalid CSV format in '{input}': {error}")]
    Parse {
        input: String,
        #[source]
        error: csv::Error,
    },

    /// Quote misuse the csv reader would otherwise tolerate.
    #[error("Invalid CSV format in '{input}', line {line}: {kind}")]
    Quote {
        input: String,
        line: usize,
        kind: QuoteErrorKind,
    },
}

/// Ways a field can misuse `"`.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum QuoteErrorKind {
    /// A `"` inside a field that did not start with one.
    #[error("bare \" in non-quoted field")]
    Bare,

    /// A closing `"` followed by something other than a delimiter or newline.
    #[error("extraneous or missing \" in quoted field")]
    Extraneous,

    /// A quoted field still open at end of input.
    #[error("quoted field is never closed")]
    Unterminated,
}

// =============================================================================
// Expansion Errors
// =============================================================================

/// Errors raised while expanding a wide row into long rows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    /// Row has fewer columns than the fixed layout requires.
    #[error("{input}, row {row}: expected at least {expected} columns, found {found}")]
    RowTooShort {
        input: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// HS code cell cannot have its surrounding quotes removed.
    #[error("{input}, row {row}: HS code '{value}' is not wrapped in quotes")]
    HsCodeTooShort {
        input: String,
        row: usize,
        value: String,
    },
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the normalized table.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Failed to create the output file.
    #[error("Failed to create '{}': {error}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Flushing the destination failed.
    #[error("Failed to flush output: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Run Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::transform::pipeline::run`].
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// No input files were given.
    #[error("No input files given")]
    Usage,

    /// Input reading error.
    #[error("{0}")]
    Csv(#[from] CsvError),

    /// Row layout error.
    #[error("{0}")]
    Expand(#[from] ExpandError),

    /// Output error.
    #[error("{0}")]
    Output(#[from] OutputError),
}

impl NormalizeError {
    /// Process exit code for this error.
    ///
    /// Every failure is fatal and reported the same way.
    pub fn exit_code(&self) -> i32 {
        match self {
            NormalizeError::Usage
            | NormalizeError::Csv(_)
            | NormalizeError::Expand(_)
            | NormalizeError::Output(_) => 1,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input reading.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for row expansion.
pub type ExpandResult<T> = Result<T, ExpandError>;

/// Result type for output writing.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for a whole run.
pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let expand_err = ExpandError::RowTooShort {
            input: "2020.csv".into(),
            row: 3,
            expected: 44,
            found: 12,
        };
        let err: NormalizeError = expand_err.into();
        let msg = err.to_string();
        assert!(msg.contains("2020.csv"));
        assert!(msg.contains("row 3"));
        assert!(msg.contains("found 12"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: NormalizeError = CsvError::Io {
            path: PathBuf::from("missing.csv"),
            error: io,
        }
        .into();
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_quote_error_format() {
        let err = CsvError::Quote {
            input: "2020.csv".into(),
            line: 7,
            kind: QuoteErrorKind::Unterminated,
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid CSV format"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("never closed"));

        let msg = QuoteErrorKind::Bare.to_string();
        assert!(msg.contains("bare \""));
    }

    #[test]
    fn test_all_errors_exit_with_one() {
        assert_eq!(NormalizeError::Usage.exit_code(), 1);

        let err: NormalizeError = ExpandError::HsCodeTooShort {
            input: "a.csv".into(),
            row: 2,
            value: "1".into(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: NormalizeError = OutputError::Io(io).into();
        assert_eq!(err.exit_code(), 1);
    }
}
