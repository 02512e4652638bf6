use std::fmt;
use std::panic::Location;

use thiserror::Error;

/// Errors the raster core can raise
///
/// Geometry never fails: out-of-bounds or degenerate shapes are clipped or
/// drawn as nothing. Only allocation and malformed boundary input end up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A pixel buffer or quantizer arena could not be reserved
    #[error("out of memory: failed to reserve {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// Input rejected at the API boundary
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Error::InvalidParameters(_) => ErrorKind::InvalidParameters,
        }
    }
}

/// Discriminant of [`Error`] handed to error hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OutOfMemory,
    InvalidParameters,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::OutOfMemory => f.write_str("OutOfMemory"),
            ErrorKind::InvalidParameters => f.write_str("InvalidParameters"),
        }
    }
}

/// What an [`ErrorHook`] receives for every failed call
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    /// Name of the failing operation
    pub operation: &'static str,
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorReport {
    pub fn new(error: &Error, operation: &'static str, location: &'static Location<'static>) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            operation,
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] from {}:{}:{} in {}() -- {}",
            self.kind, self.file, self.line, self.column, self.operation, self.message
        )
    }
}

/// Receiver for failures reported through [`crate::Graphics`]
pub trait ErrorHook: Send + Sync {
    fn on_error(&self, report: &ErrorReport);
}

impl<F> ErrorHook for F
where
    F: Fn(&ErrorReport) + Send + Sync,
{
    fn on_error(&self, report: &ErrorReport) {
        self(report)
    }
}

/// Errors from loading or saving a [`crate::RenderConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
