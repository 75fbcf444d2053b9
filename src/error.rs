use std::path::PathBuf;

use thiserror::Error;

/// All errors produced while locating, reading, and totalling files.
///
/// Every error is fatal: a single bad row anywhere aborts the whole run.
#[derive(Debug, Error)]
pub enum Error {
    /// The data directory does not exist.
    #[error("data directory '{}' was not found", .0.display())]
    NotFound(PathBuf),

    /// The data directory path exists but is not a directory.
    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// The pattern matched no files under the data directory.
    #[error("no files matching pattern '{pattern}' were found in '{}'", .root.display())]
    NoMatchingFiles { pattern: String, root: PathBuf },

    /// The pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// A CSV header row has no `amount` column.
    #[error("CSV file '{}' must contain an 'amount' column", .0.display())]
    MissingColumn(PathBuf),

    #[error("missing amount value in '{}' on line {line}", .path.display())]
    MissingValue { path: PathBuf, line: usize },

    #[error(
        "could not convert amount value '{value}' to a number in '{}' (line {line})",
        .path.display()
    )]
    InvalidAmount {
        path: PathBuf,
        line: usize,
        value: String,
    },

    /// An amount is a number, but too large or too precise to hold exactly.
    #[error(
        "amount value '{value}' in '{}' (line {line}) is out of range",
        .path.display()
    )]
    AmountOutOfRange {
        path: PathBuf,
        line: usize,
        value: String,
    },

    /// The total left the representable decimal range.
    #[error("total overflowed while adding amounts from '{}'", .0.display())]
    Overflow(PathBuf),

    /// A file could not be opened, or is not well-formed CSV.
    #[error("reading '{}'", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Returns `true` if something the caller asked for does not exist: the
    /// data directory itself, or any file matching the pattern.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::NoMatchingFiles { .. })
    }

    /// Returns `true` if a file was found but its contents are unacceptable.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn(_)
                | Self::MissingValue { .. }
                | Self::InvalidAmount { .. }
                | Self::AmountOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_matching_files_is_a_not_found_error() {
        let err = Error::NoMatchingFiles {
            pattern: "*.csv".into(),
            root: "data".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "no files matching pattern '*.csv' were found in 'data'"
        );
    }

    #[test]
    fn missing_value_is_a_validation_error() {
        let err = Error::MissingValue {
            path: "data/bad.csv".into(),
            line: 3,
        };
        assert!(err.is_validation());
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "missing amount value in 'data/bad.csv' on line 3"
        );
    }

    #[test]
    fn amount_out_of_range_is_a_validation_error() {
        let err = Error::AmountOutOfRange {
            path: "data/big.csv".into(),
            line: 2,
            value: "1e40".into(),
        };
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "amount value '1e40' in 'data/big.csv' (line 2) is out of range"
        );
    }

    #[test]
    fn not_a_directory_is_neither_not_found_nor_validation() {
        let err = Error::NotADirectory("data".into());
        assert!(!err.is_not_found());
        assert!(!err.is_validation());
    }
}
