//! Error types for gridscore

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gridscore operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed ASCII grid text. `line` is 1-based.
    #[error("format error at line {line}: {reason}")]
    Format { line: usize, reason: String },

    /// Wraps an error with the file it came from
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("layer '{layer}' has shape {actual:?} but '{reference}' has shape {expected:?}")]
    Alignment {
        reference: String,
        layer: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("duplicate layer name '{0}'")]
    DuplicateLayer(String),

    #[error("unknown layer '{0}'")]
    UnknownLayer(String),

    #[error("No data value not set")]
    NoDataNotSet,

    #[error("{function} reshape of column '{column}' out of domain at ({row}, {col}): value {value} with shift {shift}")]
    Domain {
        column: String,
        function: &'static str,
        row: usize,
        col: usize,
        value: f64,
        shift: f64,
    },

    #[error("column '{0}' has zero variance and cannot be standardized")]
    DegenerateColumn(String),

    #[error("region selects no complete cells")]
    EmptyRegion,

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Error::Format {
            line,
            reason: reason.into(),
        }
    }

    /// Attach a file path to this error
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for gridscore operations
pub type Result<T> = std::result::Result<T, Error>;
