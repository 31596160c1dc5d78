//! Starter doctor list inserted into an empty store.

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::contract::model::Doctor;
use crate::domain::repo::DoctorsRepository;

struct SeedRow {
    name: &'static str,
    specialty: &'static str,
    experience: u32,
    region: &'static str,
    clinic_name: &'static str,
    address: &'static str,
    rating: f64,
    reviews: u32,
    fee: u32,
    availability: &'static str,
    qualifications: &'static str,
    about: &'static str,
}

const SEED: [SeedRow; 6] = [
    SeedRow {
        name: "Dr. Sarah Johnson",
        specialty: "Cardiology",
        experience: 15,
        region: "north",
        clinic_name: "Heart Care Clinic",
        address: "123 Medical Plaza, North District",
        rating: 4.8,
        reviews: 120,
        fee: 75,
        availability: "Available Today",
        qualifications: "MBBS, MD - Cardiology",
        about: "Specialized in heart diseases and cardiovascular health with over 15 years of experience.",
    },
    SeedRow {
        name: "Dr. Michael Chen",
        specialty: "Dermatology",
        experience: 10,
        region: "south",
        clinic_name: "Skin & Beauty Center",
        address: "456 Health Avenue, South District",
        rating: 4.9,
        reviews: 95,
        fee: 60,
        availability: "Available Tomorrow",
        qualifications: "MBBS, MD - Dermatology",
        about: "Expert in skin conditions, cosmetic dermatology, and laser treatments.",
    },
    SeedRow {
        name: "Dr. Emily Williams",
        specialty: "Pediatrics",
        experience: 12,
        region: "east",
        clinic_name: "Children's Health Center",
        address: "789 Care Street, East District",
        rating: 5.0,
        reviews: 150,
        fee: 50,
        availability: "Available Today",
        qualifications: "MBBS, DCH - Pediatrics",
        about: "Passionate about child healthcare, vaccinations, and developmental monitoring.",
    },
    SeedRow {
        name: "Dr. James Wilson",
        specialty: "Orthopedics",
        experience: 18,
        region: "west",
        clinic_name: "Bone & Joint Institute",
        address: "321 Medical Center, West District",
        rating: 4.7,
        reviews: 88,
        fee: 80,
        availability: "Available on Mon, Wed",
        qualifications: "MBBS, MS - Orthopedics",
        about: "Specializing in sports injuries, joint replacements, and spine surgeries.",
    },
    SeedRow {
        name: "Dr. Priya Sharma",
        specialty: "General Physician",
        experience: 8,
        region: "central",
        clinic_name: "Family Wellness Clinic",
        address: "555 Community Road, Central District",
        rating: 4.6,
        reviews: 110,
        fee: 40,
        availability: "Available Today",
        qualifications: "MBBS, MD - General Medicine",
        about: "Providing comprehensive primary care for all ages with a focus on preventive medicine.",
    },
    SeedRow {
        name: "Dr. Robert Taylor",
        specialty: "Neurology",
        experience: 20,
        region: "north",
        clinic_name: "Brain & Nerve Center",
        address: "888 Neuroscience Blvd, North District",
        rating: 4.9,
        reviews: 75,
        fee: 90,
        availability: "By Appointment",
        qualifications: "MBBS, DM - Neurology",
        about: "Expert in treating neurological disorders, migraines, and epilepsy.",
    },
];

/// The seed list with creation times one second apart starting at `base`.
pub fn seed_doctors(base: DateTime<Utc>) -> Vec<Doctor> {
    SEED.iter()
        .zip(0i64..)
        .map(|(row, i)| Doctor {
            id: Uuid::new_v4(),
            user_id: None,
            name: row.name.to_string(),
            specialty: row.specialty.to_string(),
            experience: row.experience,
            region: row.region.to_string(),
            clinic_name: row.clinic_name.to_string(),
            address: Some(row.address.to_string()),
            rating: row.rating,
            reviews: row.reviews,
            consultation_fee: row.fee,
            availability: row.availability.to_string(),
            qualifications: Some(row.qualifications.to_string()),
            about: Some(row.about.to_string()),
            phone: None,
            created_at: base + Duration::seconds(i),
        })
        .collect()
}

/// Insert the seed list when the store has no doctors. Returns how many rows were written.
pub async fn seed_if_empty(repo: &dyn DoctorsRepository) -> anyhow::Result<usize> {
    if repo.count().await? > 0 {
        return Ok(0);
    }
    let doctors = seed_doctors(Utc::now());
    let n = doctors.len();
    for d in doctors {
        repo.insert(d).await?;
    }
    info!("Seeded {n} doctors");
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_ordered_by_creation_time() {
        let base = Utc::now();
        let doctors = seed_doctors(base);
        assert_eq!(doctors.len(), 6);
        assert_eq!(doctors[0].created_at, base);
        assert!(doctors.windows(2).all(|w| w[0].created_at < w[1].created_at));
        assert!(doctors.iter().all(|d| d.name.starts_with("Dr. ")));
    }
}
