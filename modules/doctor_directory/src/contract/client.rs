use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::error::DoctorDirectoryError;
use crate::contract::model::{Appointment, Doctor, DoctorQuery, DoctorRegistration, NewAppointment};

/// Public API of the doctor_directory module for other in-process callers.
#[async_trait]
pub trait DoctorDirectoryApi: Send + Sync {
    /// Filtered, sorted doctor list.
    async fn search_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>, DoctorDirectoryError>;

    async fn get_doctor(&self, id: Uuid) -> Result<Doctor, DoctorDirectoryError>;

    /// Create the doctor's account and profile row.
    async fn register_doctor(
        &self,
        registration: DoctorRegistration,
    ) -> Result<Doctor, DoctorDirectoryError>;

    async fn book_appointment(
        &self,
        request: NewAppointment,
    ) -> Result<Appointment, DoctorDirectoryError>;

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, DoctorDirectoryError>;
}
