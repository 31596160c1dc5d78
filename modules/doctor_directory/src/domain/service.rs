use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::contract::model::{
    Appointment, AppointmentStatus, Doctor, DoctorQuery, DoctorRegistration, NewAppointment,
    TimeSlot,
};
use crate::domain::error::DomainError;
use crate::domain::ports::{AccountRole, AccountsPort, NewAccount};
use crate::domain::repo::{AppointmentsRepository, DoctorsRepository};

/// Domain service for the doctor directory: search, registration and booking.
/// Depends only on ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    doctors: Arc<dyn DoctorsRepository>,
    appointments: Arc<dyn AppointmentsRepository>,
    accounts: Arc<dyn AccountsPort>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Fee used when the entered consultation fee is not a number.
    pub fallback_fee: u32,
    pub default_rating: f64,
    pub default_availability: String,
    pub min_password_len: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fallback_fee: 500,
            default_rating: 4.0,
            default_availability: "Available Today".to_string(),
            min_password_len: 8,
        }
    }
}

impl Service {
    pub fn new(
        doctors: Arc<dyn DoctorsRepository>,
        appointments: Arc<dyn AppointmentsRepository>,
        accounts: Arc<dyn AccountsPort>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            doctors,
            appointments,
            accounts,
            config,
        }
    }

    #[instrument(
        name = "doctor_directory.service.search_doctors",
        skip(self),
        fields(sort = %query.sort)
    )]
    pub async fn search_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>, DomainError> {
        let doctors = self
            .doctors
            .search(&query)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        debug!("Found {} doctors", doctors.len());
        Ok(doctors)
    }

    #[instrument(name = "doctor_directory.service.get_doctor", skip(self), fields(doctor_id = %id))]
    pub async fn get_doctor(&self, id: Uuid) -> Result<Doctor, DomainError> {
        self.doctors
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::doctor_not_found(id))
    }

    /// Lookup for an optional identifier; `None` performs no fetch.
    pub async fn find_doctor(&self, id: Option<Uuid>) -> Result<Option<Doctor>, DomainError> {
        match id {
            Some(id) => self.get_doctor(id).await.map(Some),
            None => Ok(None),
        }
    }

    #[instrument(
        name = "doctor_directory.service.register_doctor",
        skip(self, registration),
        fields(email = %registration.email)
    )]
    pub async fn register_doctor(
        &self,
        registration: DoctorRegistration,
    ) -> Result<Doctor, DomainError> {
        info!("Registering doctor");
        self.validate_password(&registration.password, &registration.confirm_password)?;

        let name = doctor_display_name(&registration.name);
        let account = self
            .accounts
            .create_account(NewAccount {
                email: registration.email.trim().to_string(),
                password: registration.password,
                role: AccountRole::Doctor,
                full_name: name.clone(),
                phone: non_blank(registration.phone.clone()),
            })
            .await?;

        let doctor = Doctor {
            id: Uuid::new_v4(),
            user_id: Some(account.id),
            name,
            specialty: registration.specialty.trim().to_string(),
            experience: registration.experience.trim().parse().unwrap_or(0),
            region: registration.region.trim().to_string(),
            clinic_name: registration.clinic_name.trim().to_string(),
            address: non_blank(registration.clinic_address),
            rating: self.config.default_rating,
            reviews: 0,
            consultation_fee: registration
                .consultation_fee
                .trim()
                .parse()
                .unwrap_or(self.config.fallback_fee),
            availability: self.config.default_availability.clone(),
            qualifications: non_blank(registration.qualifications),
            about: non_blank(registration.about),
            phone: non_blank(registration.phone),
            created_at: Utc::now(),
        };

        if let Err(e) = self.doctors.insert(doctor.clone()).await {
            warn!(account_id = %account.id, "Doctor insert failed, removing new account");
            if let Err(cleanup) = self.accounts.delete_account(account.id).await {
                warn!(account_id = %account.id, error = %cleanup, "Account cleanup failed");
            }
            return Err(DomainError::database(e.to_string()));
        }

        info!("Registered doctor id={}", doctor.id);
        Ok(doctor)
    }

    #[instrument(
        name = "doctor_directory.service.book_appointment",
        skip(self, request),
        fields(doctor_id = %request.doctor_id, patient_id = %request.patient_id)
    )]
    pub async fn book_appointment(
        &self,
        request: NewAppointment,
    ) -> Result<Appointment, DomainError> {
        let (date, slot, reason) = validate_booking(&request)?;
        if date < Local::now().date_naive() {
            return Err(DomainError::date_in_past(date));
        }
        self.get_doctor(request.doctor_id).await?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            appointment_date: date,
            appointment_time: slot,
            reason: Some(reason),
            status: AppointmentStatus::Pending,
            created_at: Utc::now(),
        };
        self.appointments
            .insert(appointment.clone())
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        info!(
            "Booked appointment id={} on {} at {}",
            appointment.id, date, slot
        );
        Ok(appointment)
    }

    #[instrument(
        name = "doctor_directory.service.get_appointment",
        skip(self),
        fields(appointment_id = %id)
    )]
    pub async fn get_appointment(&self, id: Uuid) -> Result<Appointment, DomainError> {
        self.appointments
            .find_by_id(id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::appointment_not_found(id))
    }

    // --- validation helpers ---

    fn validate_password(&self, password: &str, confirm: &str) -> Result<(), DomainError> {
        if password != confirm {
            return Err(DomainError::PasswordMismatch);
        }
        if password.chars().count() < self.config.min_password_len {
            return Err(DomainError::password_too_short(self.config.min_password_len));
        }
        Ok(())
    }
}

/// Date, then time slot, then reason; the first failure is reported.
fn validate_booking(
    request: &NewAppointment,
) -> Result<(NaiveDate, TimeSlot, String), DomainError> {
    let date = request
        .appointment_date
        .ok_or_else(|| DomainError::validation("appointment_date", "Please select a date"))?;

    let raw_time = request
        .appointment_time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomainError::validation("appointment_time", "Please select a time slot"))?;
    let slot = TimeSlot::parse(raw_time).ok_or_else(|| {
        DomainError::validation(
            "appointment_time",
            format!("'{raw_time}' is not an available time slot"),
        )
    })?;

    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| DomainError::validation("reason", "Please provide a reason for visit"))?;

    Ok((date, slot, reason.to_string()))
}

fn doctor_display_name(raw: &str) -> String {
    let name = raw.trim();
    if name.starts_with("Dr.") {
        name.to_string()
    } else {
        format!("Dr. {name}")
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_gets_prefix_once() {
        assert_eq!(doctor_display_name("Ana Ruiz"), "Dr. Ana Ruiz");
        assert_eq!(doctor_display_name("  Dr. Ana Ruiz "), "Dr. Ana Ruiz");
        assert_eq!(doctor_display_name("Drake Bell"), "Dr. Drake Bell");
    }

    #[test]
    fn booking_checks_run_in_order() {
        let mut req = NewAppointment::default();
        let err = validate_booking(&req).unwrap_err();
        assert_eq!(err.to_string(), "Please select a date");

        req.appointment_date = NaiveDate::from_ymd_opt(2030, 1, 2);
        let err = validate_booking(&req).unwrap_err();
        assert_eq!(err.to_string(), "Please select a time slot");

        req.appointment_time = Some("10:30".into());
        req.reason = Some("   ".into());
        let err = validate_booking(&req).unwrap_err();
        assert_eq!(err.to_string(), "Please provide a reason for visit");
        assert_eq!(err.field(), Some("reason"));

        req.reason = Some(" checkup ".into());
        let (_, slot, reason) = validate_booking(&req).unwrap();
        assert_eq!(slot.as_hhmm(), "10:30");
        assert_eq!(reason, "checkup");
    }

    #[test]
    fn off_grid_time_is_rejected() {
        let req = NewAppointment {
            appointment_date: NaiveDate::from_ymd_opt(2030, 1, 2),
            appointment_time: Some("12:00".into()),
            reason: Some("x".into()),
            ..Default::default()
        };
        let err = validate_booking(&req).unwrap_err();
        assert_eq!(err.field(), Some("appointment_time"));
    }
}
