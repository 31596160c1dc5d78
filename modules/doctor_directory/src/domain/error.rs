use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Doctor not found: {id}")]
    DoctorNotFound { id: Uuid },

    #[error("Appointment not found: {id}")]
    AppointmentNotFound { id: Uuid },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Appointment date {date} is in the past")]
    DateInPast { date: NaiveDate },

    /// Missing or malformed form input; `message` is shown to the user as is.
    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Account with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Account service error: {message}")]
    AccountService { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn doctor_not_found(id: Uuid) -> Self {
        Self::DoctorNotFound { id }
    }

    pub fn appointment_not_found(id: Uuid) -> Self {
        Self::AppointmentNotFound { id }
    }

    pub fn password_too_short(min: usize) -> Self {
        Self::PasswordTooShort { min }
    }

    pub fn date_in_past(date: NaiveDate) -> Self {
        Self::DateInPast { date }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn account_service(message: impl Into<String>) -> Self {
        Self::AccountService {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// Form field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::PasswordMismatch => Some("confirm_password"),
            Self::PasswordTooShort { .. } => Some("password"),
            Self::DateInPast { .. } => Some("appointment_date"),
            Self::Validation { field, .. } => Some(field),
            Self::EmailAlreadyExists { .. } => Some("email"),
            _ => None,
        }
    }
}
