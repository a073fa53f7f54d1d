//! Error taxonomy for lead operations.
//!
//! Errors are classified by how the caller should react:
//! - Surfaced: `DuplicateEmail`, `NotFound`, `Forbidden` — show the user a message
//! - Retryable: `Persistence`, `Unavailable` — transient storage trouble;
//!   background work swallows these and retries on the next tick

use thiserror::Error;

use crate::db::DbError;

/// Errors surfaced by the lead core.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("A lead with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Lead not found: {0}")]
    NotFound(String),

    #[error("Unrecognized status: {0}")]
    InvalidStatus(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Persistence(#[from] DbError),

    #[error("Lead store unavailable: {0}")]
    Unavailable(String),
}

impl LeadError {
    /// Returns true if retrying the same operation later can succeed.
    ///
    /// The auto-advance engine and scheduler log-and-skip retryable errors;
    /// user-initiated actions surface them so the user can retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeadError::Persistence(_) | LeadError::Unavailable(_))
    }

    /// Short message suitable for a toast/banner in the consuming UI.
    pub fn user_message(&self) -> String {
        match self {
            LeadError::DuplicateEmail(_) => {
                "A lead with this email already exists.".to_string()
            }
            LeadError::NotFound(_) => "That lead no longer exists.".to_string(),
            LeadError::InvalidStatus(s) => format!("'{s}' is not a pipeline stage."),
            LeadError::MissingField(_) => "Please fill in all required fields.".to_string(),
            LeadError::Forbidden(msg) => msg.clone(),
            LeadError::Persistence(_) | LeadError::Unavailable(_) => {
                "Could not reach the lead store. Try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(LeadError::Unavailable("lock poisoned".into()).is_retryable());
        assert!(!LeadError::DuplicateEmail("a@b.com".into()).is_retryable());
        assert!(!LeadError::NotFound("lead-1".into()).is_retryable());
        assert!(!LeadError::InvalidStatus("bogus".into()).is_retryable());
    }
}
