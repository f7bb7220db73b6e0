//! Simulation-specific error types.
//!
//! Systems propagate errors through these types rather than panicking, so a
//! bad vessel layout or a missing entity degrades gracefully instead of
//! taking the whole simulation down.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hullsim::error::SimError;
//!
//! fn build(walls: &[WallRect]) -> Result<(), SimError> {
//!     let outline = HullOutline::from_walls(walls)?;
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Top-level error enum for the vessel simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Hull construction found fewer than 3 distinct corners, or every corner
    /// lies on one line.  The vessel must not be registered.
    DegenerateGeometry {
        /// Number of distinct corners left after deduplication.
        corner_count: usize,
    },

    /// A non-finite value was offered to a guarded field.  The previous value
    /// is kept.
    InvalidInput {
        /// Name of the rejected field.
        field: &'static str,
    },

    /// A structural query resolved to nothing usable: the ray hit nothing, or
    /// hit a body that is not a wall segment.
    ResolutionMiss {
        /// Human-readable description of where the lookup occurred.
        context: &'static str,
    },

    /// An entity was referenced but could not be found in the world or the
    /// body registry.
    EntityNotFound {
        /// Human-readable description of where the lookup occurred.
        context: &'static str,
    },

    /// Tuning constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateGeometry { corner_count } => write!(
                f,
                "degenerate hull geometry: {} distinct corners, need at least 3 non-collinear",
                corner_count
            ),
            SimError::InvalidInput { field } => {
                write!(f, "rejected non-finite value for '{}'", field)
            }
            SimError::ResolutionMiss { context } => {
                write!(f, "structural query resolved nothing during '{}'", context)
            }
            SimError::EntityNotFound { context } => {
                write!(f, "entity not found during '{}'", context)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `value` is not strictly positive and finite.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if `value` is outside `[0.0, 1.0]`.
pub fn validate_unit_interval(name: &'static str, value: f32) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if `value` is not finite.
pub fn validate_finite(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "finite",
        })
    }
}
