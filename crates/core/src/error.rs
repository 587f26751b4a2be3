/// Domain error type shared by the scheduler, the visit-sheet generator and
/// every [`DataStore`](crate::store::DataStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {reference}")]
    NotFound {
        entity: &'static str,
        reference: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store could not be reached or failed mid-query. Never
    /// retried by the core.
    #[error("Data store unavailable: {0}")]
    DataStoreUnavailable(String),
}

impl CoreError {
    /// Shorthand for a missing premises record.
    pub fn premises_not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Premises",
            reference: reference.into(),
        }
    }
}
