// Errors raised by the session, config and lexicon layers.
// The scoring core itself is infallible.
use crate::lexicon::Category;
use crate::signals::Slot;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiagnosticError {
    #[error("Answer for '{slot}' is too short: {actual} characters, need at least {min}")]
    AnswerTooShort { slot: Slot, min: usize, actual: usize },
    #[error("Session already has all four answers")]
    SessionComplete,
    #[error("Session is missing answers for: {}", .missing.iter().map(|s| s.id()).collect::<Vec<_>>().join(", "))]
    SessionIncomplete { missing: Vec<Slot> },
    #[error("Lexicon has no entry for category {0}")]
    IncompleteLexicon(Category),
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Unknown domain: {0}. Supported: business, personal, health")]
    UnknownDomain(String),
    #[error("Unknown answer slot: {0}. Supported: outcome, obstacle, pattern, cost")]
    UnknownSlot(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DiagnosticError::AnswerTooShort {
            slot: Slot::Obstacle,
            min: 20,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "Answer for 'obstacle' is too short: 4 characters, need at least 20"
        );

        let err = DiagnosticError::SessionIncomplete {
            missing: vec![Slot::Pattern, Slot::Cost],
        };
        assert_eq!(err.to_string(), "Session is missing answers for: pattern, cost");
    }
}
