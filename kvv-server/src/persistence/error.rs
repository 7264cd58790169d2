//! Persistence error types.

/// Errors from writing stops to the store. Never surfaced to HTTP callers.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// No store configured.
    #[error("no persistence target configured")]
    NotConfigured,

    /// Could not open a connection.
    #[error("database connection failed: {0}")]
    Connect(#[source] tokio_postgres::Error),

    /// A statement was rejected.
    #[error("database write failed: {0}")]
    Query(#[from] tokio_postgres::Error),
}
