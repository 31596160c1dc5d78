use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

/// Pure doctor model for inter-module communication (no serde/schemas).
#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    /// Owning account, set for self-registered doctors.
    pub user_id: Option<Uuid>,
    pub name: String,
    pub specialty: String,
    /// Years of experience.
    pub experience: u32,
    pub region: String,
    pub clinic_name: String,
    pub address: Option<String>,
    /// 0.0 ..= 5.0
    pub rating: f64,
    pub reviews: u32,
    pub consultation_fee: u32,
    pub availability: String,
    pub qualifications: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Result ordering of a doctor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Rating,
    Experience,
    FeeLow,
    FeeHigh,
}

impl SortKey {
    /// Lenient parse used for query parameters: anything unrecognised means `Rating`.
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Experience => "experience",
            SortKey::FeeLow => "fee-low",
            SortKey::FeeHigh => "fee-high",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating" => Ok(SortKey::Rating),
            "experience" => Ok(SortKey::Experience),
            "fee-low" => Ok(SortKey::FeeLow),
            "fee-high" => Ok(SortKey::FeeHigh),
            other => Err(format!("unknown sort key '{other}'")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Region value meaning "no region filter".
pub const ALL_REGIONS: &str = "all";

/// Immutable search parameters: free text, region code and sort key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoctorQuery {
    pub search_text: Option<String>,
    pub region: Option<String>,
    pub sort: SortKey,
}

impl DoctorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Search text to match, `None` when absent or empty.
    pub fn effective_search_text(&self) -> Option<&str> {
        self.search_text.as_deref().filter(|s| !s.is_empty())
    }

    /// Region to filter on, `None` when absent or the "all" sentinel.
    pub fn effective_region(&self) -> Option<&str> {
        self.region
            .as_deref()
            .filter(|r| !r.is_empty() && *r != ALL_REGIONS)
    }
}

/// Self-registration form as entered by a doctor. Numeric fields stay raw text;
/// the service decides how to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: String,
    pub experience: String,
    pub clinic_name: String,
    pub clinic_address: Option<String>,
    pub region: String,
    pub consultation_fee: String,
    pub qualifications: Option<String>,
    pub about: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Half-hour appointment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// Display label, e.g. "02:30 PM".
    pub fn label(&self) -> String {
        self.0.format("%I:%M %p").to_string()
    }

    /// 24h form, e.g. "14:30".
    pub fn as_hhmm(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    pub(crate) const fn from_time(t: NaiveTime) -> Self {
        Self(t)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hhmm())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(format!("unknown appointment status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeSlot,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking request. Date and time are optional so "nothing selected yet" is
/// representable and rejected by validation rather than by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: Option<NaiveDate>,
    pub appointment_time: Option<String>,
    pub reason: Option<String>,
}
