use thiserror::Error;

/// User input rejected before any state changes
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("amount must be a number greater than zero (got {0:?})")]
    InvalidAmount(String),
    #[error("date is required")]
    MissingDate,
    #[error("date must be YYYY-MM-DD (got {0:?})")]
    InvalidDate(String),
    #[error("income must be a number of at least zero (got {0:?})")]
    InvalidIncome(String),
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
    #[error("no free expense id left")]
    IdsExhausted,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("could not persist change: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
