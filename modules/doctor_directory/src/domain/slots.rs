use chrono::NaiveTime;

use crate::contract::model::TimeSlot;

/// Bookable half-hour starts: a morning and an afternoon shift.
const SLOT_STARTS: [(u32, u32); 13] = [
    (9, 0),
    (9, 30),
    (10, 0),
    (10, 30),
    (11, 0),
    (11, 30),
    (14, 0),
    (14, 30),
    (15, 0),
    (15, 30),
    (16, 0),
    (16, 30),
    (17, 0),
];

impl TimeSlot {
    /// Every bookable slot in chronological order.
    pub fn all() -> Vec<TimeSlot> {
        SLOT_STARTS
            .iter()
            .filter_map(|&(h, m)| NaiveTime::from_hms_opt(h, m, 0))
            .map(TimeSlot::from_time)
            .collect()
    }

    /// Accepts "14:30" or "02:30 PM"; `None` unless the time is a bookable slot.
    pub fn parse(raw: &str) -> Option<TimeSlot> {
        let raw = raw.trim();
        let time = NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%I:%M %p"))
            .ok()?;
        let slot = TimeSlot::from_time(time);
        TimeSlot::all().contains(&slot).then_some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_slots_in_two_shifts() {
        let all = TimeSlot::all();
        assert_eq!(all.len(), 13);
        assert_eq!(all.first().map(TimeSlot::label).as_deref(), Some("09:00 AM"));
        assert_eq!(all.last().map(TimeSlot::label).as_deref(), Some("05:00 PM"));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert!(!all.iter().any(|s| s.as_hhmm() == "12:00"));
    }

    #[test]
    fn parse_accepts_both_notations() {
        let a = TimeSlot::parse("14:30").unwrap();
        let b = TimeSlot::parse("02:30 PM").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.label(), "02:30 PM");
        assert_eq!(TimeSlot::parse(" 09:00 ").map(|s| s.as_hhmm()).as_deref(), Some("09:00"));
    }

    #[test]
    fn parse_rejects_off_grid_and_garbage() {
        assert!(TimeSlot::parse("12:00").is_none());
        assert!(TimeSlot::parse("09:15").is_none());
        assert!(TimeSlot::parse("17:30").is_none());
        assert!(TimeSlot::parse("").is_none());
        assert!(TimeSlot::parse("soon").is_none());
    }
}
