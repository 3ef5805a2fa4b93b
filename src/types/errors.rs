use thiserror::Error;

/// Failure of a single CatalogStore call.
///
/// The catalog lives behind a network RPC boundary, so every lookup can fail
/// either in transit or inside the catalog service itself. Store
/// implementations map their own error types onto this taxonomy; anything
/// that fits neither bucket goes through `Backend`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The call never completed (connection refused, timeout, TLS, ...).
    #[error("catalog transport error: {0}")]
    Transport(String),
    /// The catalog service answered with an application-level error.
    #[error("catalog rejected the request: {0}")]
    Application(String),
    /// Escape hatch for store implementations with richer error types.
    #[error("catalog backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
