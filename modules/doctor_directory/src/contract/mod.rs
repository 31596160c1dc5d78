pub mod client;
pub mod error;
pub mod model;

pub use client::DoctorDirectoryApi;
pub use error::DoctorDirectoryError;
pub use model::{
    Appointment, AppointmentStatus, Doctor, DoctorQuery, DoctorRegistration, NewAppointment,
    SortKey, TimeSlot, ALL_REGIONS,
};
