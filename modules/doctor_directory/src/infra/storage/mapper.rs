use anyhow::{anyhow, Context};
use sea_orm::Set;

use crate::contract::model::{Appointment, Doctor, TimeSlot};
use crate::domain::query::fold_case;
use crate::infra::storage::entity::{appointment, doctor};

fn non_negative(v: i32) -> u32 {
    u32::try_from(v).unwrap_or(0)
}

fn to_column(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Convert a database entity to a contract model
pub fn doctor_to_contract(m: doctor::Model) -> Doctor {
    Doctor {
        id: m.id,
        user_id: m.user_id,
        name: m.name,
        specialty: m.specialty,
        experience: non_negative(m.experience),
        region: m.region,
        clinic_name: m.clinic_name,
        address: m.address,
        rating: m.rating,
        reviews: non_negative(m.reviews),
        consultation_fee: non_negative(m.consultation_fee),
        availability: m.availability,
        qualifications: m.qualifications,
        about: m.about,
        phone: m.phone,
        created_at: m.created_at,
    }
}

pub fn doctor_to_active(d: Doctor) -> doctor::ActiveModel {
    doctor::ActiveModel {
        name_folded: Set(fold_case(&d.name)),
        specialty_folded: Set(fold_case(&d.specialty)),
        id: Set(d.id),
        user_id: Set(d.user_id),
        name: Set(d.name),
        specialty: Set(d.specialty),
        experience: Set(to_column(d.experience)),
        region: Set(d.region),
        clinic_name: Set(d.clinic_name),
        address: Set(d.address),
        rating: Set(d.rating),
        reviews: Set(to_column(d.reviews)),
        consultation_fee: Set(to_column(d.consultation_fee)),
        availability: Set(d.availability),
        qualifications: Set(d.qualifications),
        about: Set(d.about),
        phone: Set(d.phone),
        created_at: Set(d.created_at),
    }
}

/// Rows written by other tools may carry a time or status this model can't represent.
pub fn appointment_to_contract(m: appointment::Model) -> anyhow::Result<Appointment> {
    let appointment_time = TimeSlot::parse(&m.appointment_time)
        .ok_or_else(|| anyhow!("invalid appointment_time '{}'", m.appointment_time))?;
    let status = m
        .status
        .parse()
        .map_err(|e: String| anyhow!(e))
        .with_context(|| format!("appointment {}", m.id))?;
    Ok(Appointment {
        id: m.id,
        patient_id: m.patient_id,
        doctor_id: m.doctor_id,
        appointment_date: m.appointment_date,
        appointment_time,
        reason: m.reason,
        status,
        created_at: m.created_at,
    })
}

pub fn appointment_to_active(a: Appointment) -> appointment::ActiveModel {
    appointment::ActiveModel {
        id: Set(a.id),
        patient_id: Set(a.patient_id),
        doctor_id: Set(a.doctor_id),
        appointment_date: Set(a.appointment_date),
        appointment_time: Set(a.appointment_time.as_hhmm()),
        reason: Set(a.reason),
        status: Set(a.status.as_str().to_string()),
        created_at: Set(a.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn row(time: &str, status: &str) -> appointment::Model {
        appointment::Model {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            appointment_date: NaiveDate::from_ymd_opt(2030, 5, 6).unwrap(),
            appointment_time: time.into(),
            reason: Some("checkup".into()),
            status: status.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn appointment_row_maps_slot_and_status() {
        let a = appointment_to_contract(row("15:30", "confirmed")).unwrap();
        assert_eq!(a.appointment_time.label(), "03:30 PM");
        assert_eq!(a.status.as_str(), "confirmed");
    }

    #[test]
    fn bad_rows_are_errors() {
        assert!(appointment_to_contract(row("13:00", "pending")).is_err());
        assert!(appointment_to_contract(row("09:00", "lost")).is_err());
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        assert_eq!(non_negative(-3), 0);
        assert_eq!(to_column(u32::MAX), i32::MAX);
    }
}
