use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DoctorDirectoryError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Account with email '{email}' already exists")]
    Conflict { email: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Account service unavailable")]
    AccountService,

    #[error("Internal error")]
    Internal,
}

impl DoctorDirectoryError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<DomainError> for DoctorDirectoryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::DoctorNotFound { id } => Self::not_found("Doctor", id),
            DomainError::AppointmentNotFound { id } => Self::not_found("Appointment", id),
            DomainError::EmailAlreadyExists { email } => Self::conflict(email),
            DomainError::PasswordMismatch
            | DomainError::PasswordTooShort { .. }
            | DomainError::DateInPast { .. }
            | DomainError::Validation { .. } => Self::validation(e.to_string()),
            DomainError::AccountService { .. } => Self::AccountService,
            DomainError::Database { .. } => Self::Internal,
        }
    }
}
