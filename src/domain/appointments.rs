//! Appointment requests submitted from the booking modal.

use serde::{Deserialize, Serialize};
use time::Date;

use super::content::ContentConfig;
use super::doctors::find_doctor;
use super::error::{DomainError, ensure_non_empty};
use super::schedule::{SCHEDULE_DATE_FORMAT, TimeSlot, parse_schedule_date};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
    #[serde(default)]
    pub doctor_id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub slot: Option<TimeSlot>,
    #[serde(default)]
    pub message: String,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAppointment {
    pub patient_name: String,
    pub email: String,
    pub specialty: String,
    pub doctor_name: Option<String>,
    pub date: Date,
    pub slot: Option<TimeSlot>,
}

impl AppointmentRequest {
    pub fn validate(&self, content: &ContentConfig) -> Result<ValidatedAppointment, DomainError> {
        ensure_non_empty(&self.patient_name, "patient_name")?;
        ensure_non_empty(&self.email, "email")?;
        ensure_non_empty(&self.phone, "phone")?;
        ensure_non_empty(&self.specialty, "specialty")?;
        if !self.email.contains('@') {
            return Err(DomainError::validation("email", "must contain `@`"));
        }
        let date = parse_schedule_date(&self.date)?;

        let doctor_name = match self.doctor_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                let doctors = content.doctors();
                let doctor =
                    find_doctor(&doctors, id).ok_or_else(|| DomainError::not_found("doctor", id))?;
                if doctor.specialty != self.specialty {
                    return Err(DomainError::validation(
                        "doctor_id",
                        format!("{} does not practice {}", doctor.name, self.specialty),
                    ));
                }

                let day = date
                    .format(SCHEDULE_DATE_FORMAT)
                    .map_err(|err| DomainError::validation("date", err.to_string()))?;
                let schedules = content.schedules();
                if let (Some(slot), Some(slots)) = (self.slot, schedules.slots(id, &day)) {
                    if !slots.contains(&slot) {
                        return Err(DomainError::validation(
                            "slot",
                            format!("{slot} is not available on {day}"),
                        ));
                    }
                }
                Some(doctor.name.clone())
            }
            None => None,
        };

        Ok(ValidatedAppointment {
            patient_name: self.patient_name.trim().to_string(),
            email: self.email.trim().to_string(),
            specialty: self.specialty.clone(),
            doctor_name,
            date,
            slot: self.slot,
        })
    }
}
