//! Error types for file loading.

use std::path::Path;
use thiserror::Error;

/// Result type for file loaders.
pub type FileResult<T> = Result<T, FileError>;

/// Errors raised while reading input files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    /// The file could not be opened or read.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// A record could not be parsed.
    #[error("Parse error in {path}{}: {message}", line_suffix(.line))]
    Parse {
        /// File path.
        path: String,
        /// 1-based line number, when known.
        line: Option<u64>,
        /// What went wrong.
        message: String,
    },

    /// The file parsed but its content is not usable.
    #[error("Invalid input in {path}: {message}")]
    InvalidInput {
        /// File path.
        path: String,
        /// What went wrong.
        message: String,
    },
}

fn line_suffix(line: &Option<u64>) -> String {
    line.map(|l| format!(" at line {l}")).unwrap_or_default()
}

impl FileError {
    /// Creates an I/O error.
    #[must_use]
    pub fn io(path: &Path, message: impl Into<String>) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(path: &Path, line: Option<u64>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.display().to_string(),
            line,
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid(path: &Path, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Maps a csv error, keeping I/O failures apart from bad records.
    #[must_use]
    pub fn from_csv(path: &Path, err: &csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(e) => Self::io(path, e.to_string()),
            _ => Self::parse(path, err.position().map(csv::Position::line), err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FileError::parse(Path::new("ratings.csv"), Some(4), "bad score");
        assert_eq!(err.to_string(), "Parse error in ratings.csv at line 4: bad score");

        let err = FileError::parse(Path::new("fx.csv"), None, "bad rate");
        assert_eq!(err.to_string(), "Parse error in fx.csv: bad rate");

        let err = FileError::io(Path::new("missing.csv"), "not found");
        assert!(err.to_string().contains("missing.csv"));
    }
}
