use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Errors surfaced by the engine and the conversation service.
///
/// Extraction ambiguity is never an error, and neither is augmentation
/// failure; both degrade to rule-based output.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Profile not found: {0}")]
    ProfileNotFound(Uuid),

    #[error("Session already completed: {0}")]
    SessionCompleted(Uuid),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => EngineError::SessionNotFound(id),
            StoreError::ProfileNotFound(id) => EngineError::ProfileNotFound(id),
            StoreError::Persistence(msg) => EngineError::Persistence(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_unchanged() {
        let id = Uuid::new_v4();
        assert_eq!(
            EngineError::from(StoreError::NotFound(id)),
            EngineError::SessionNotFound(id)
        );
        assert_eq!(
            EngineError::from(StoreError::ProfileNotFound(id)),
            EngineError::ProfileNotFound(id)
        );
        assert_eq!(
            EngineError::from(StoreError::Persistence("disk full".into())),
            EngineError::Persistence("disk full".into())
        );
    }

    #[test]
    fn test_display() {
        let err = EngineError::InvalidInput("too short".into());
        assert_eq!(err.to_string(), "Invalid input: too short");
    }
}
