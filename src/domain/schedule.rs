//! Doctor availability: doctor id → date → ordered time slots.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::FormatItem, macros::format_description};

use super::error::DomainError;

pub const SCHEDULE_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Bookable slots. Declaration order is the display and storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "09:00 AM")]
    NineAm,
    #[serde(rename = "10:00 AM")]
    TenAm,
    #[serde(rename = "11:00 AM")]
    ElevenAm,
    #[serde(rename = "12:00 PM")]
    Noon,
    #[serde(rename = "02:00 PM")]
    TwoPm,
    #[serde(rename = "03:00 PM")]
    ThreePm,
    #[serde(rename = "04:00 PM")]
    FourPm,
    #[serde(rename = "05:00 PM")]
    FivePm,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 8] = [
        TimeSlot::NineAm,
        TimeSlot::TenAm,
        TimeSlot::ElevenAm,
        TimeSlot::Noon,
        TimeSlot::TwoPm,
        TimeSlot::ThreePm,
        TimeSlot::FourPm,
        TimeSlot::FivePm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::NineAm => "09:00 AM",
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::Noon => "12:00 PM",
            TimeSlot::TwoPm => "02:00 PM",
            TimeSlot::ThreePm => "03:00 PM",
            TimeSlot::FourPm => "04:00 PM",
            TimeSlot::FivePm => "05:00 PM",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TimeSlot::ALL
            .into_iter()
            .find(|slot| slot.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::validation("slot", format!("unknown time slot `{s}`")))
    }
}

/// Validate a `YYYY-MM-DD` schedule date.
pub fn parse_schedule_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), SCHEDULE_DATE_FORMAT)
        .map_err(|err| DomainError::validation("date", format!("`{value}`: {err}")))
}

/// Whether a slot was switched on or off by [`DoctorSchedules::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotToggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DoctorSchedules(BTreeMap<String, BTreeMap<String, BTreeSet<TimeSlot>>>);

impl DoctorSchedules {
    pub fn slots(&self, doctor_id: &str, date: &str) -> Option<&BTreeSet<TimeSlot>> {
        self.0.get(doctor_id).and_then(|dates| dates.get(date))
    }

    pub fn available_slots(&self, doctor_id: &str, date: &str) -> Vec<TimeSlot> {
        self.slots(doctor_id, date)
            .map(|slots| slots.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_doctor(&self, doctor_id: &str) -> bool {
        self.0.contains_key(doctor_id)
    }

    /// Dates with at least one slot for the doctor, in calendar order.
    pub fn dates_for(&self, doctor_id: &str) -> Vec<&str> {
        self.0
            .get(doctor_id)
            .map(|dates| dates.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Flip a slot. Emptied dates and doctors are dropped, never stored empty.
    pub fn toggle(
        &mut self,
        doctor_id: &str,
        date: &str,
        slot: TimeSlot,
    ) -> Result<SlotToggle, DomainError> {
        if doctor_id.trim().is_empty() {
            return Err(DomainError::validation("doctor_id", "must not be empty"));
        }
        let date = parse_schedule_date(date)?
            .format(SCHEDULE_DATE_FORMAT)
            .map_err(|err| DomainError::validation("date", err.to_string()))?;

        let dates = self.0.entry(doctor_id.to_string()).or_default();
        let slots = dates.entry(date.clone()).or_default();

        let outcome = if slots.remove(&slot) {
            SlotToggle::Removed
        } else {
            slots.insert(slot);
            SlotToggle::Added
        };

        if slots.is_empty() {
            dates.remove(&date);
        }
        if dates.is_empty() {
            self.0.remove(doctor_id);
        }

        Ok(outcome)
    }

    /// Drop every schedule entry for a doctor.
    pub fn remove_doctor(&mut self, doctor_id: &str) -> bool {
        self.0.remove(doctor_id).is_some()
    }
}
