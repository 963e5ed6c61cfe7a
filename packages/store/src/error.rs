use thiserror::Error;

/// Errors surfaced by a [`crate::Backend`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not authenticated")]
    Unauthenticated,

    /// A unique constraint rejected the write (PostgreSQL code `23505`).
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Message returned by the auth service, kept verbatim so the UI can map it.
    #[error("{0}")]
    Auth(String),

    #[error("Backend returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        StoreError::Network(e.to_string())
    }
}
