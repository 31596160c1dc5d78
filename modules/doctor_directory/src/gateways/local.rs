use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::DoctorDirectoryApi,
    error::DoctorDirectoryError,
    model::{Appointment, Doctor, DoctorQuery, DoctorRegistration, NewAppointment},
};
use crate::domain::service::Service;

/// Local implementation of [`DoctorDirectoryApi`] that delegates to the domain service.
pub struct DoctorDirectoryLocalClient {
    service: Arc<Service>,
}

impl DoctorDirectoryLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DoctorDirectoryApi for DoctorDirectoryLocalClient {
    async fn search_doctors(&self, query: DoctorQuery) -> Result<Vec<Doctor>, DoctorDirectoryError> {
        Ok(self.service.search_doctors(query).await?)
    }

    async fn get_doctor(&self, id: Uuid) -> Result<Doctor, DoctorDirectoryError> {
        Ok(self.service.get_doctor(id).await?)
    }

    async fn register_doctor(
        &self,
        registration: DoctorRegistration,
    ) -> Result<Doctor, DoctorDirectoryError> {
        Ok(self.service.register_doctor(registration).await?)
    }

    async fn book_appointment(
        &self,
        request: NewAppointment,
    ) -> Result<Appointment, DoctorDirectoryError> {
        Ok(self.service.book_appointment(request).await?)
    }

    async fn get_appointment(&self, id: Uuid) -> Result<Appointment, DoctorDirectoryError> {
        Ok(self.service.get_appointment(id).await?)
    }
}
