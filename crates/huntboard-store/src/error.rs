use huntboard_core::csv::ImportError;

/// Failure from the remote transport, independent of which backend spoke it.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("remote request failed: {0}")]
    Request(String),
    #[error("remote returned status {0}")]
    Status(u16),
    #[error("failed to decode remote response: {0}")]
    Decode(String),
}

/// Errors surfaced by the store layer.
///
/// Callers at the action boundary log these and degrade; they are not
/// allowed to escape into rendering paths.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested record does not exist in the active scope. Treated by
    /// callers as "nothing to show", not a hard failure.
    #[error("application not found: {0}")]
    NotFound(String),
    /// A remote-backed operation was attempted without a signed-in
    /// identity. Raised before any network call.
    #[error("operation requires a signed-in identity")]
    AuthRequired,
    #[error(transparent)]
    Remote(#[from] TransportError),
    #[error("local database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("corrupt stored value for {field}: {reason}")]
    Corrupt { field: &'static str, reason: String },
}
