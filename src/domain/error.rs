// Errors raised while turning a series into a chart description
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// The series has no data points, so its time and value ranges are undefined.
    #[error("series `{0}` has no data points")]
    EmptySeries(String),

    /// Width, height and aspect ratio cannot be reconciled.
    #[error("invalid chart dimensions: {0}")]
    InvalidDimensions(String),

    /// An interval tag other than month, quarter or year.
    #[error("unknown interval `{0}`")]
    UnknownInterval(String),

    /// A theme color is not a `#rrggbb` hex string.
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}
