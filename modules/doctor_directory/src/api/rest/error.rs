use modkit::ProblemResponse;

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

/// Build a ProblemResponse from a catalog entry
pub fn from_code(code: ErrorCode, detail: impl Into<String>, instance: &str) -> ProblemResponse {
    let problem = code.to_problem(detail).with_instance(instance);

    let problem = if let Some(id) = tracing::Span::current().id() {
        problem.with_trace_id(id.into_u64().to_string())
    } else {
        problem
    };

    ProblemResponse(problem)
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    let code = match e {
        DomainError::DoctorNotFound { .. } => ErrorCode::doctor_directory_doctor_not_found_v1,
        DomainError::AppointmentNotFound { .. } => {
            ErrorCode::doctor_directory_appointment_not_found_v1
        }
        DomainError::PasswordMismatch | DomainError::PasswordTooShort { .. } => {
            ErrorCode::doctor_directory_registration_validation_v1
        }
        DomainError::DateInPast { .. } | DomainError::Validation { .. } => {
            ErrorCode::doctor_directory_booking_validation_v1
        }
        DomainError::EmailAlreadyExists { .. } => {
            ErrorCode::doctor_directory_account_email_conflict_v1
        }
        DomainError::AccountService { .. } => {
            tracing::error!(error = ?e, "Account service error");
            return from_code(
                ErrorCode::doctor_directory_account_service_v1,
                "The account service could not complete the request",
                instance,
            );
        }
        DomainError::Database { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Database error occurred");
            return from_code(
                ErrorCode::doctor_directory_internal_database_v1,
                "An internal database error occurred",
                instance,
            );
        }
    };

    let mut resp = from_code(code, e.to_string(), instance);
    if let Some(field) = e.field() {
        resp.0 = resp.0.with_field_error(field, e.to_string());
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_maps_to_404() {
        let id = Uuid::new_v4();
        let p = map_domain_error(&DomainError::doctor_not_found(id), "/doctors/x").0;
        assert_eq!(p.status, 404);
        assert_eq!(p.code, "doctor_directory.doctor.not_found.v1");
        assert_eq!(p.instance, "/doctors/x");
        assert!(p.errors.is_none());
    }

    #[test]
    fn validation_carries_field_pointer() {
        let p = map_domain_error(&DomainError::password_too_short(8), "/doctors/register").0;
        assert_eq!(p.status, 422);
        assert_eq!(p.detail, "Password must be at least 8 characters");
        let errors = p.errors.unwrap();
        assert_eq!(errors[0].pointer, "/password");
    }

    #[test]
    fn database_details_are_not_leaked() {
        let p = map_domain_error(&DomainError::database("no such table: doctors"), "/doctors").0;
        assert_eq!(p.status, 500);
        assert!(!p.detail.contains("no such table"));
    }
}
