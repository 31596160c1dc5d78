use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Appointment, Doctor, DoctorQuery};

/// Port for the domain layer: doctor persistence.
#[async_trait]
pub trait DoctorsRepository: Send + Sync {
    /// Filtered, sorted list. Ties resolve by creation time ascending.
    async fn search(&self, query: &DoctorQuery) -> anyhow::Result<Vec<Doctor>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Doctor>>;
    /// Insert a fully-formed doctor; the service owns ids and defaults.
    async fn insert(&self, doctor: Doctor) -> anyhow::Result<()>;
    async fn count(&self) -> anyhow::Result<u64>;
}

/// Port for appointment persistence.
#[async_trait]
pub trait AppointmentsRepository: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> anyhow::Result<()>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>>;
}
