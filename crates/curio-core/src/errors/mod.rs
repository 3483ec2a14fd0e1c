//! Error taxonomy for the curio workspace.
//!
//! Per-domain errors live in their own modules and are aggregated into
//! `CurioError` so crates can propagate with `?` across seams.

pub mod remote_error;
pub mod store_error;

pub use remote_error::RemoteError;
pub use store_error::StoreError;

/// Result alias used throughout the workspace.
pub type CurioResult<T> = Result<T, CurioError>;

/// Top-level error for all curio operations.
#[derive(Debug, thiserror::Error)]
pub enum CurioError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("not authenticated: {reason}")]
    NotAuthenticated { reason: String },

    #[error("config error: {reason}")]
    Config { reason: String },
}

impl CurioError {
    /// Whether this error indicates the operation already happened on the
    /// remote (duplicate insert). Treated as success by queue replay.
    pub fn is_already_applied(&self) -> bool {
        matches!(
            self,
            CurioError::Remote(RemoteError::UniqueViolation { .. })
        )
    }

    /// Whether the failed operation is worth retrying on a later drain.
    pub fn is_retryable(&self) -> bool {
        match self {
            CurioError::Remote(e) => e.is_retryable(),
            _ => false,
        }
    }
}
