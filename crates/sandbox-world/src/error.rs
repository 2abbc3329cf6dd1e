//! Error types for the `sandbox-world` crate.
//!
//! Invalid inputs are rejected before anything is mutated; backend failures
//! are wrapped so callers see a single [`WorldError`] type.

use crate::backend::BackendError;

/// Errors raised by [`World`](crate::World) operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A coordinate was NaN or infinite.
    #[error("{what} is not finite")]
    NonFinite {
        /// Which input was rejected.
        what: &'static str,
    },

    /// A numeric parameter was outside its accepted range.
    #[error("invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A text parameter was empty.
    #[error("{name} must not be empty")]
    EmptyParameter {
        /// Parameter name.
        name: &'static str,
    },

    /// The physics backend failed.
    #[error("physics backend: {source}")]
    Backend {
        /// Underlying backend error.
        #[from]
        source: BackendError,
    },
}
