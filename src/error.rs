//! Error types for the board renderer

use crate::point::Point;
use thiserror::Error;

/// Result type alias for renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, diffing or rendering a board
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Two snapshots of different sizes were compared
    #[error("Snapshot dimensions differ: {previous}x{previous} vs {next}x{next}")]
    DimensionMismatch { previous: u32, next: u32 },

    /// A point outside the board was addressed
    #[error("Point {point} is outside a {size}x{size} board")]
    PointOutOfRange { point: Point, size: u32 },

    /// A label-bearing mark was supplied without its text
    #[error("Mark {0} requires a text label")]
    MissingLabel(String),

    /// A text label was attached to a mark that does not carry one
    #[error("Mark {0} does not carry a text label")]
    UnexpectedLabel(String),

    /// The host container cannot hold a board
    #[error("Container '{id}' has invalid dimensions: width {width}, height {height}")]
    InvalidContainer { id: String, width: f64, height: f64 },

    /// The host has no container with the given id
    #[error("Unknown container '{0}'")]
    UnknownContainer(String),

    /// An update was requested before the first draw
    #[error("Display has not been drawn")]
    NotDrawn,

    /// An update was requested after destroy
    #[error("Display has been destroyed")]
    Destroyed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Theme could not be loaded
    #[error("Theme error: {0}")]
    ThemeError(String),

    /// Host environment rejected an operation
    #[error("Host error: {0}")]
    HostError(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ThemeError(err.to_string())
    }
}
