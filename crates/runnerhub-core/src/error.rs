//! Unified application error types for RunnerHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The rolling-window cap or lifetime quota was hit. Recoverable; the
    /// caller may retry after the window elapses.
    QuotaExceeded,
    /// The slot pool is exhausted. Recoverable and transient.
    NoSlotsAvailable,
    /// The user already holds an active session. The caller should redirect
    /// to the existing session rather than retry.
    AlreadyLeased,
    /// The slot id is unknown.
    SlotNotFound,
    /// The slot is occupied and cannot be bound (lost a race).
    SlotNotAvailable,
    /// Input validation failed.
    Validation,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal storage/transaction error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether this kind is an expected, recoverable denial rather than a
    /// defect. Used to pick log levels and surface distinct UI states.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::QuotaExceeded | Self::NoSlotsAvailable | Self::AlreadyLeased)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::NoSlotsAvailable => write!(f, "NO_SLOTS_AVAILABLE"),
            Self::AlreadyLeased => write!(f, "ALREADY_LEASED"),
            Self::SlotNotFound => write!(f, "SLOT_NOT_FOUND"),
            Self::SlotNotAvailable => write!(f, "SLOT_NOT_AVAILABLE"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout RunnerHub.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a quota-exceeded denial.
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QuotaExceeded, message)
    }

    /// Create a pool-exhausted denial.
    pub fn no_slots_available(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoSlotsAvailable, message)
    }

    /// Create an already-leased denial.
    pub fn already_leased(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyLeased, message)
    }

    /// Create a slot-not-found error.
    pub fn slot_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SlotNotFound, message)
    }

    /// Create a slot-not-available error.
    pub fn slot_not_available(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SlotNotAvailable, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is an expected, recoverable denial.
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_kinds() {
        assert!(AppError::quota_exceeded("cap hit").is_recoverable());
        assert!(AppError::no_slots_available("pool empty").is_recoverable());
        assert!(AppError::already_leased("active session").is_recoverable());
        assert!(!AppError::internal("boom").is_recoverable());
        assert!(!AppError::slot_not_available("race lost").is_recoverable());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = AppError::slot_not_found("slot 7 unknown");
        assert_eq!(err.to_string(), "SLOT_NOT_FOUND: slot 7 unknown");
    }
}
