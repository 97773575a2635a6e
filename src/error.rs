use crate::schema::CategoryKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Invalid month input '{0}': expected YYYY-MM")]
    InvalidMonthInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Grid invariant violation in {kind} parent #{parent_index}, subcategory #{sub_index}: expected {expected} values, found {actual}")]
    GridInvariantViolation {
        kind: CategoryKind,
        parent_index: usize,
        sub_index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BudgetError>;
