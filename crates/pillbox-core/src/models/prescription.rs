//! Prescription models: named, dated, recurring dosing schedules.

use chrono::{Days, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Medicine;

/// Maximum number of reminder times per prescription.
pub const MAX_REMINDER_TIMES: usize = 5;

/// A medicine entry inside a prescription, with an optional usage override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionMedicine {
    /// Id of the referenced medicine
    pub medicine_id: String,
    /// Dosage instructions for this prescription, when different from the
    /// medicine's own usage text
    pub custom_usage: Option<String>,
}

impl PrescriptionMedicine {
    /// Reference a medicine, defaulting the usage override to the
    /// medicine's own instructions.
    pub fn for_medicine(medicine: &Medicine) -> Self {
        let custom_usage = if medicine.usage.is_empty() {
            None
        } else {
            Some(medicine.usage.clone())
        };
        Self {
            medicine_id: medicine.id.clone(),
            custom_usage,
        }
    }
}

/// A recurring dosing schedule over one or more medicines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Opaque stable identifier
    pub id: String,
    /// Display name, unique across all prescriptions
    pub name: String,
    /// Medicines taken under this schedule (never empty once stored)
    pub medicines: Vec<PrescriptionMedicine>,
    /// Contact to share reminders with, cleared when the contact is deleted
    pub contact_id: Option<String>,
    /// First day of the schedule ("YYYY-MM-DD")
    pub start_date: String,
    /// Last day of the schedule, inclusive ("YYYY-MM-DD")
    pub end_date: String,
    /// Minute-precision times of day ("HH:MM"), 1 to 5 entries
    pub reminder_times: Vec<String>,
    /// Whether reminders currently fire for this schedule
    pub is_active: bool,
}

impl Prescription {
    /// Create a new prescription with the default one-week schedule and a
    /// single morning reminder.
    pub fn new(name: String) -> Self {
        let today = Local::now().date_naive();
        let week_out = today.checked_add_days(Days::new(7)).unwrap_or(today);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            medicines: Vec::new(),
            contact_id: None,
            start_date: today.format("%Y-%m-%d").to_string(),
            end_date: week_out.format("%Y-%m-%d").to_string(),
            reminder_times: vec!["08:00".into()],
            is_active: true,
        }
    }

    /// Check whether a calendar day falls within the schedule, inclusive.
    ///
    /// Dates are ISO strings, so lexical comparison is chronological.
    pub fn covers_date(&self, date: &str) -> bool {
        date >= self.start_date.as_str() && date <= self.end_date.as_str()
    }

    /// Check whether a wall-clock minute is one of the reminder times.
    pub fn has_reminder_at(&self, time: &str) -> bool {
        self.reminder_times.iter().any(|t| t == time)
    }
}

/// Validate a reminder time string as minute-precision "HH:MM".
pub fn parse_reminder_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Validate a schedule date string as "YYYY-MM-DD".
pub fn parse_schedule_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
