//! Error types for muflow

use thiserror::Error;

/// muflow error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Event counts and flat buffers disagree (construction, filter or zip).
    #[error("shape error: {0}")]
    Shape(String),

    /// Two cutflow counters with different stage lists were merged.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Two histograms (or histogram sets) with different axes or keys were merged.
    #[error("axis mismatch: {0}")]
    AxisMismatch(String),

    /// A required column or record field is absent.
    #[error("missing field: '{0}'")]
    MissingField(String),

    /// Invalid axis definition or configuration value.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
