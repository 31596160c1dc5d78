//! Error catalog of the doctor_directory module.

use modkit::{ErrDef, Problem};

macro_rules! catalog {
    ($( $variant:ident => ($status:expr, $title:expr, $code:expr) ),+ $(,)?) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ErrorCode {
            $( $variant, )+
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$( ErrorCode::$variant, )+];

            pub const fn def(&self) -> ErrDef {
                match self {
                    $( ErrorCode::$variant => ErrDef {
                        status: $status,
                        title: $title,
                        code: $code,
                        type_url: concat!("https://errors.clinic.local/", $code),
                    }, )+
                }
            }
        }
    };
}

catalog! {
    doctor_directory_doctor_not_found_v1 =>
        (404, "Doctor Not Found", "doctor_directory.doctor.not_found.v1"),
    doctor_directory_appointment_not_found_v1 =>
        (404, "Appointment Not Found", "doctor_directory.appointment.not_found.v1"),
    doctor_directory_registration_validation_v1 =>
        (422, "Registration Rejected", "doctor_directory.registration.validation.v1"),
    doctor_directory_booking_validation_v1 =>
        (422, "Booking Rejected", "doctor_directory.booking.validation.v1"),
    doctor_directory_account_email_conflict_v1 =>
        (409, "Email Already Registered", "doctor_directory.account.email_conflict.v1"),
    doctor_directory_account_service_v1 =>
        (502, "Account Service Error", "doctor_directory.account.service.v1"),
    doctor_directory_internal_database_v1 =>
        (500, "Internal Error", "doctor_directory.internal.database.v1"),
}

impl ErrorCode {
    pub fn status(&self) -> u16 {
        self.def().status
    }

    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        self.def().to_problem(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TYPE_BASE: &str = "https://errors.clinic.local/";

    #[test]
    fn type_urls_share_base_and_end_with_code() {
        for code in ErrorCode::ALL {
            let def = code.def();
            assert!(def.type_url.starts_with(TYPE_BASE));
            assert!(def.type_url.ends_with(def.code));
            assert!((400..=599).contains(&def.status));
        }
    }
}
