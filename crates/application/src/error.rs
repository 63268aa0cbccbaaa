//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A read from the calendar backend failed
    #[error("Failed to fetch {resource}: {reason}")]
    FetchFailed {
        resource: &'static str,
        reason: String,
    },

    /// Creating an event failed, locally or on the backend
    #[error("Failed to create event: {0}")]
    EventCreateFailed(String),

    /// Updating an event failed, locally or on the backend
    #[error("Failed to update event: {0}")]
    EventUpdateFailed(String),

    /// Deleting an event failed
    #[error("Failed to delete event: {0}")]
    EventDeleteFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    pub fn fetch_failed(resource: &'static str, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            resource,
            reason: reason.into(),
        }
    }

    /// Whether this error came from one of the event mutations
    pub const fn is_mutation_failure(&self) -> bool {
        matches!(
            self,
            Self::EventCreateFailed(_) | Self::EventUpdateFailed(_) | Self::EventDeleteFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failed_message_names_resource() {
        let err = ApplicationError::fetch_failed("calendar", "HTTP 500");
        assert_eq!(err.to_string(), "Failed to fetch calendar: HTTP 500");
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err: ApplicationError = DomainError::InvalidMonth(13).into();
        assert_eq!(err.to_string(), DomainError::InvalidMonth(13).to_string());
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[test]
    fn mutation_failures() {
        assert!(ApplicationError::EventCreateFailed("x".into()).is_mutation_failure());
        assert!(ApplicationError::EventUpdateFailed("x".into()).is_mutation_failure());
        assert!(ApplicationError::EventDeleteFailed("x".into()).is_mutation_failure());
        assert!(!ApplicationError::fetch_failed("events", "x").is_mutation_failure());
        assert!(!ApplicationError::Configuration("x".into()).is_mutation_failure());
    }

    #[test]
    fn mutation_messages() {
        assert_eq!(
            ApplicationError::EventDeleteFailed("HTTP 404".into()).to_string(),
            "Failed to delete event: HTTP 404"
        );
    }
}
