use crate::quiz_engine::models::MIN_ENTRIES;

/// Result type for quiz operations
pub type QuizResult<T> = Result<T, QuizError>;

/// Errors surfaced by dataset loading, the round engine and configuration.
///
/// None of these are fatal: the session turns each one into a status message
/// and keeps the previous round alive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("Need at least {min} valid rows with state + nickname (found {found}).", min = MIN_ENTRIES)]
    DatasetTooSmall { found: usize },

    #[error("Could not read {source_name}: {reason}")]
    SourceUnreadable { source_name: String, reason: String },

    #[error("Need at least {min} entries to build a question (have {available}).", min = MIN_ENTRIES)]
    InsufficientEntries { available: usize },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },
}

impl QuizError {
    pub fn unreadable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        QuizError::SourceUnreadable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}
