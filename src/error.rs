//! Error types for contour generation.

use thiserror::Error;

use crate::point::Point;

/// Errors that can occur while contouring a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContourError {
    /// Inputs or options were rejected.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Ring tracing reached a state the segment graph cannot produce.
    ///
    /// `cell` is the padded-grid cell (column, row) that emitted the segment
    /// the broken chain was seeded from.
    #[error(
        "invariant violated at level {level}: chain ends at {point} without closing (seeded from cell {cell:?})"
    )]
    AlgorithmInvariantViolation {
        level: f64,
        point: Point,
        cell: (usize, usize),
    },

    /// A polygon sink refused the polygons of a level.
    #[error("sink rejected level {level}: {message}")]
    Sink { level: f64, message: String },
}

impl ContourError {
    /// Create a Configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a Sink error.
    pub fn sink(level: f64, msg: impl Into<String>) -> Self {
        Self::Sink {
            level,
            message: msg.into(),
        }
    }

    /// The level this error belongs to, if any.
    pub fn level(&self) -> Option<f64> {
        match self {
            Self::Configuration(_) => None,
            Self::AlgorithmInvariantViolation { level, .. } | Self::Sink { level, .. } => {
                Some(*level)
            }
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ContourError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = ContourError::configuration("levels list is empty");
        assert_eq!(err.to_string(), "configuration error: levels list is empty");
        assert_eq!(err.level(), None);
    }

    #[test]
    fn test_invariant_violation_names_level_and_cell() {
        let err = ContourError::AlgorithmInvariantViolation {
            level: 5.0,
            point: Point::new(1.5, 2.0),
            cell: (3, 4),
        };
        let msg = err.to_string();
        assert!(msg.contains("level 5"));
        assert!(msg.contains("(1.5, 2)"));
        assert!(msg.contains("(3, 4)"));
        assert_eq!(err.level(), Some(5.0));
    }

    #[test]
    fn test_sink_error() {
        let err = ContourError::sink(10.0, "disk full");
        assert_eq!(err.to_string(), "sink rejected level 10: disk full");
    }
}
