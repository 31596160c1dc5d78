//! In-memory evaluation of a [`DoctorQuery`].
//!
//! The SQL repository pushes the same contract down to the store; this is the
//! reference used by tests and by callers that already hold a doctor list.

use std::cmp::Ordering;

use crate::contract::model::{Doctor, DoctorQuery, SortKey};

/// Case folding shared by the in-memory filter and the stored search columns.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

impl DoctorQuery {
    /// True when `doctor` passes both the text and the region filter.
    pub fn matches(&self, doctor: &Doctor) -> bool {
        if let Some(text) = self.effective_search_text() {
            let needle = fold_case(text);
            if !fold_case(&doctor.specialty).contains(&needle)
                && !fold_case(&doctor.name).contains(&needle)
            {
                return false;
            }
        }
        match self.effective_region() {
            Some(region) => doctor.region == region,
            None => true,
        }
    }

    /// Filter then sort into a fresh vector; `doctors` is left untouched.
    /// Equal keys keep their input order.
    pub fn apply(&self, doctors: &[Doctor]) -> Vec<Doctor> {
        let mut out: Vec<Doctor> = doctors.iter().filter(|d| self.matches(d)).cloned().collect();
        let sort = self.sort;
        out.sort_by(|a, b| compare(sort, a, b));
        out
    }
}

fn compare(sort: SortKey, a: &Doctor, b: &Doctor) -> Ordering {
    match sort {
        SortKey::Rating => b.rating.total_cmp(&a.rating),
        SortKey::Experience => b.experience.cmp(&a.experience),
        SortKey::FeeLow => a.consultation_fee.cmp(&b.consultation_fee),
        SortKey::FeeHigh => b.consultation_fee.cmp(&a.consultation_fee),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn doc(name: &str, specialty: &str, region: &str, rating: f64, exp: u32, fee: u32) -> Doctor {
        Doctor {
            id: Uuid::new_v4(),
            user_id: None,
            name: name.into(),
            specialty: specialty.into(),
            experience: exp,
            region: region.into(),
            clinic_name: "Clinic".into(),
            address: None,
            rating,
            reviews: 0,
            consultation_fee: fee,
            availability: "Available Today".into(),
            qualifications: None,
            about: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<Doctor> {
        vec![
            doc("Dr. Sarah Johnson", "Cardiology", "north", 4.8, 15, 75),
            doc("Dr. Michael Chen", "Dermatology", "south", 4.9, 10, 60),
            doc("Dr. Emily Williams", "Pediatrics", "east", 5.0, 12, 50),
            doc("Dr. Robert Taylor", "Neurology", "north", 4.9, 20, 90),
        ]
    }

    fn names(v: &[Doctor]) -> Vec<&str> {
        v.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn text_matches_specialty_or_name_ignoring_case() {
        let all = sample();
        let by_specialty = DoctorQuery::new().with_search_text("CARDIO").apply(&all);
        assert_eq!(names(&by_specialty), vec!["Dr. Sarah Johnson"]);

        let by_name = DoctorQuery::new().with_search_text("chen").apply(&all);
        assert_eq!(names(&by_name), vec!["Dr. Michael Chen"]);

        let none = DoctorQuery::new().with_search_text("dentist").apply(&all);
        assert!(none.is_empty());
    }

    #[test]
    fn empty_text_and_all_region_keep_everything() {
        let all = sample();
        let out = DoctorQuery::new()
            .with_search_text("")
            .with_region("all")
            .apply(&all);
        assert_eq!(out.len(), all.len());
    }

    #[test]
    fn region_is_exact_and_case_sensitive() {
        let all = sample();
        let north = DoctorQuery::new().with_region("north").apply(&all);
        assert!(north.iter().all(|d| d.region == "north"));
        assert_eq!(north.len(), 2);

        assert!(DoctorQuery::new().with_region("North").apply(&all).is_empty());
        assert!(DoctorQuery::new().with_region("nor").apply(&all).is_empty());
    }

    #[test]
    fn rating_sort_is_descending_and_stable() {
        let out = DoctorQuery::new().apply(&sample());
        // Chen and Taylor tie at 4.9 and keep input order.
        assert_eq!(
            names(&out),
            vec![
                "Dr. Emily Williams",
                "Dr. Michael Chen",
                "Dr. Robert Taylor",
                "Dr. Sarah Johnson"
            ]
        );
    }

    #[test]
    fn fee_orders_are_reverses_for_distinct_fees() {
        let all = sample();
        let low = DoctorQuery::new().with_sort(SortKey::FeeLow).apply(&all);
        let mut high = DoctorQuery::new().with_sort(SortKey::FeeHigh).apply(&all);
        high.reverse();
        assert_eq!(names(&low), names(&high));
        assert_eq!(low[0].consultation_fee, 50);
    }

    #[test]
    fn experience_sort_is_descending() {
        let out = DoctorQuery::new()
            .with_sort(SortKey::Experience)
            .apply(&sample());
        let exp: Vec<u32> = out.iter().map(|d| d.experience).collect();
        assert_eq!(exp, vec![20, 15, 12, 10]);
    }

    #[test]
    fn filters_apply_before_sort_and_source_is_untouched() {
        let all = sample();
        let before = names(&all).join(",");
        let out = DoctorQuery::new()
            .with_region("north")
            .with_sort(SortKey::FeeHigh)
            .apply(&all);
        assert_eq!(names(&out), vec!["Dr. Robert Taylor", "Dr. Sarah Johnson"]);
        assert_eq!(names(&all).join(","), before);
    }
}
