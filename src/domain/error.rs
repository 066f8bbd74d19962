use thiserror::Error;

/// Errors surfaced by the domain and repository layer
///
/// Zero matches and all-fields-absent search conditions are success cases
/// and never appear here; an empty result is an empty `Vec`, not an error.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The backing store could not be reached or rejected the operation.
    /// Not retried internally; reads are naturally re-executable by the caller.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A search condition is internally inconsistent (e.g. minimum age
    /// greater than maximum age). Reported before any query is issued.
    #[error("invalid search condition: {0}")]
    InvalidCondition(String),

    /// An entity or paging input failed validation.
    #[error("invalid {entity}: {reason}")]
    Validation {
        entity: &'static str,
        reason: String,
    },

    /// The targeted record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
