use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Card not found: {card} in column {column}")]
    CardNotFound { card: String, column: String },

    #[error("Invalid card order for column {column}: {reason}")]
    InvalidPermutation { column: String, reason: String },

    #[error("Column {column} is at capacity ({limit} cards)")]
    CapacityExceeded { column: String, limit: usize },

    #[error("Duplicate {kind} ID: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Invalid ID: {0:?}")]
    InvalidId(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BoardError {
    /// Returns true for stale-reference errors that operations absorb as no-ops
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ColumnNotFound(_) | Self::CardNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(BoardError::ColumnNotFound("todo".to_string()).is_not_found());
        assert!(BoardError::CardNotFound {
            card: "card-1".to_string(),
            column: "todo".to_string(),
        }
        .is_not_found());
        assert!(!BoardError::CapacityExceeded {
            column: "todo".to_string(),
            limit: 3,
        }
        .is_not_found());
    }

    #[test]
    fn test_error_messages() {
        let err = BoardError::InvalidPermutation {
            column: "todo".to_string(),
            reason: "missing card card-3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid card order for column todo: missing card card-3"
        );
    }
}
