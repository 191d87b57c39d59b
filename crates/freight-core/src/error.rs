//! Error types for the freight core.

use thiserror::Error;

/// Failures surfaced by the core.
///
/// Illegal status transitions and non-finite ETAs are not errors; see
/// [`crate::lifecycle::can_transition`] and [`crate::geo::Eta`].
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown shipment status: {0}")]
    UnknownStatusKind(String),

    #[error("unknown report format: {0}")]
    UnknownReportFormat(String),

    #[error("invalid state vector: {0}")]
    InvalidStateVector(String),

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True when the caller supplied bad input and should report a client error.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::UnknownStatusKind(_)
                | CoreError::UnknownReportFormat(_)
                | CoreError::InvalidStateVector(_)
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
