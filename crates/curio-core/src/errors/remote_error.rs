//! Remote store errors.

/// Errors surfaced by the remote API collaborator.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("unique constraint violation on {table}: {id}")]
    UniqueViolation { table: String, id: String },

    #[error("remote api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("row not found in {table}: {id}")]
    NotFound { table: String, id: String },
}

impl RemoteError {
    /// Transport-level failures and remote 5xx responses are retryable;
    /// everything else reflects a state the retry would not change.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network { .. } => true,
            RemoteError::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_and_server_failures_retry() {
        let network = RemoteError::Network {
            reason: "timed out".into(),
        };
        let server = RemoteError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        let client = RemoteError::Api {
            status: 422,
            message: "bad row".into(),
        };
        let missing = RemoteError::NotFound {
            table: "items".into(),
            id: "x".into(),
        };
        assert!(network.is_retryable());
        assert!(server.is_retryable());
        assert!(!client.is_retryable());
        assert!(!missing.is_retryable());
    }
}
