use thiserror::Error;

/// Failure raised while talking to a record store.
///
/// Deliberately flat: throttling, permissions, timeouts and malformed
/// responses all collapse into `Backend`, whose Display is the bare message
/// the backend reported.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),
    #[error("invalid seed data: {0}")]
    Seed(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound)
    }
}
