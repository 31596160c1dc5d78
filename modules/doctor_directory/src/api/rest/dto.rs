use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    Appointment, Doctor, DoctorQuery, DoctorRegistration, SortKey, TimeSlot,
};

/// REST DTO for doctor representation with serde/utoipa
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorDto {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub specialty: String,
    pub experience: u32,
    pub region: String,
    pub clinic_name: String,
    pub address: Option<String>,
    pub rating: f64,
    pub reviews: u32,
    pub consultation_fee: u32,
    pub availability: String,
    pub qualifications: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DoctorListDto {
    pub doctors: Vec<DoctorDto>,
    pub total: usize,
    /// Sort key actually applied.
    pub sort: String,
}

/// Query string of `GET /doctors`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchDoctorsQuery {
    /// Matches specialty or name, case-insensitive. `disease` is accepted too.
    #[serde(alias = "disease")]
    pub q: Option<String>,
    /// Region code; `all` disables the filter.
    pub region: Option<String>,
    /// `rating` (default), `experience`, `fee-low` or `fee-high`.
    pub sort: Option<String>,
}

impl From<SearchDoctorsQuery> for DoctorQuery {
    fn from(q: SearchDoctorsQuery) -> Self {
        Self {
            search_text: q.q,
            region: q.region,
            sort: SortKey::from_param(q.sort.as_deref()),
        }
    }
}

/// Form fields posted either as JSON numbers or as text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FormNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Default for FormNumber {
    fn default() -> Self {
        FormNumber::Text(String::new())
    }
}

impl fmt::Display for FormNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormNumber::Int(n) => write!(f, "{n}"),
            FormNumber::Float(n) => write!(f, "{n}"),
            FormNumber::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterDoctorReq {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub specialty: String,
    #[serde(default)]
    pub experience: FormNumber,
    pub clinic_name: String,
    #[serde(default)]
    pub clinic_address: Option<String>,
    pub region: String,
    #[serde(default)]
    pub consultation_fee: FormNumber,
    #[serde(default)]
    pub qualifications: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookAppointmentReq {
    pub patient_id: Uuid,
    #[serde(default)]
    pub appointment_date: Option<NaiveDate>,
    /// "14:30" or "02:30 PM".
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDto {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    /// 24h "HH:MM".
    pub appointment_time: String,
    pub time_label: String,
    pub reason: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeSlotDto {
    pub value: String,
    pub label: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<Doctor> for DoctorDto {
    fn from(d: Doctor) -> Self {
        Self {
            id: d.id,
            user_id: d.user_id,
            name: d.name,
            specialty: d.specialty,
            experience: d.experience,
            region: d.region,
            clinic_name: d.clinic_name,
            address: d.address,
            rating: d.rating,
            reviews: d.reviews,
            consultation_fee: d.consultation_fee,
            availability: d.availability,
            qualifications: d.qualifications,
            about: d.about,
            phone: d.phone,
            created_at: d.created_at,
        }
    }
}

impl From<RegisterDoctorReq> for DoctorRegistration {
    fn from(req: RegisterDoctorReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            specialty: req.specialty,
            experience: req.experience.to_string(),
            clinic_name: req.clinic_name,
            clinic_address: req.clinic_address,
            region: req.region,
            consultation_fee: req.consultation_fee.to_string(),
            qualifications: req.qualifications,
            about: req.about,
            password: req.password,
            confirm_password: req.confirm_password,
        }
    }
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id,
            patient_id: a.patient_id,
            doctor_id: a.doctor_id,
            appointment_date: a.appointment_date,
            appointment_time: a.appointment_time.as_hhmm(),
            time_label: a.appointment_time.label(),
            reason: a.reason,
            status: a.status.as_str().to_string(),
            created_at: a.created_at,
        }
    }
}

impl From<TimeSlot> for TimeSlotDto {
    fn from(s: TimeSlot) -> Self {
        Self {
            value: s.as_hhmm(),
            label: s.label(),
        }
    }
}
