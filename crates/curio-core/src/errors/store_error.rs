//! Local persistence errors.

/// Errors surfaced by the local collection store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt collection {key}: {reason}")]
    Corrupt { key: String, reason: String },
}
