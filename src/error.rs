//! Unified error handling for the trackview library.
//!
//! Domain failures in this crate are terminal to the action that caused
//! them: the caller surfaces them and the pipeline stays usable. The one
//! case the original visualization code left unguarded - an empty sample
//! sequence hitting first/last-sample lookups - is reported here as
//! [`TrackViewError::InsufficientSamples`] instead.

use thiserror::Error;

/// Unified error type for trackview operations.
#[derive(Debug, Clone, Error)]
pub enum TrackViewError {
    /// The workout does not carry enough samples for the operation
    #[error("{seq} has {got} samples, minimum {needed} required", seq = sequence_label(.workout_id))]
    InsufficientSamples {
        /// Set when the caller knows which workout the sequence belongs to
        workout_id: Option<String>,
        needed: usize,
        got: usize,
    },

    /// A sample carries coordinates outside the valid WGS84 range
    #[error("invalid coordinates: {message}")]
    InvalidCoordinates { message: String },

    /// Sample store operation failed
    #[error("store error: {message}")]
    Store { message: String },

    /// Export failed; also delivered across the worker-thread boundary
    /// as [`crate::ExportEvent::Failed`]
    #[error("export failed: {message}")]
    Export { message: String },

    /// Tile source rejected the request (unknown source, zoom out of range)
    #[error("tile source error: {message}")]
    TileSource { message: String },
}

fn sequence_label(workout_id: &Option<String>) -> String {
    match workout_id {
        Some(id) => format!("workout '{}'", id),
        None => "sample sequence".to_string(),
    }
}

impl TrackViewError {
    /// Shorthand for the empty/short sequence case when no workout id is
    /// at hand.
    pub fn insufficient(needed: usize, got: usize) -> Self {
        TrackViewError::InsufficientSamples {
            workout_id: None,
            needed,
            got,
        }
    }

    /// Like [`TrackViewError::insufficient`], attributed to a workout.
    pub fn insufficient_for(workout_id: &str, needed: usize, got: usize) -> Self {
        TrackViewError::InsufficientSamples {
            workout_id: Some(workout_id.to_string()),
            needed,
            got,
        }
    }
}

/// Result type alias for trackview operations.
pub type Result<T> = std::result::Result<T, TrackViewError>;
