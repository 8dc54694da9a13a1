//! Reminder evaluation.
//!
//! A host timer ticks every [`TICK_INTERVAL`]; each tick asks the evaluator
//! whether any active prescription is due at the current wall-clock minute.
//! Up to six ticks land in one minute, so the evaluator keeps a minute
//! guard and emits at most one event per prescription per matching minute.

use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::store::AppState;

/// Period of the host-driven reminder tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(10);

/// A due reminder, ready for the notification sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderEvent {
    pub prescription_id: String,
    pub prescription_name: String,
    /// Resolved medicine names; dangling references are skipped
    pub medicine_names: Vec<String>,
    /// Display name of the linked contact, if any
    pub contact_name: Option<String>,
    /// The "HH:MM" minute that matched
    pub time: String,
}

impl ReminderEvent {
    /// Notification title: names the contact when the reminder is shared.
    pub fn title(&self) -> String {
        match &self.contact_name {
            Some(name) => format!("Remind {}: time for their medication!", name),
            None => "Time to take your medication!".to_string(),
        }
    }

    /// Notification body: the prescription and what to take.
    pub fn body(&self) -> String {
        format!(
            "Prescription: {}\nTake: {}",
            self.prescription_name,
            self.medicine_names.join(", ")
        )
    }
}

/// Destination for due reminders. The platform decides how to surface the
/// text (system notification, or a blocking alert when the capability is
/// denied or absent); the evaluator only emits.
pub trait NotificationSink {
    fn deliver(&self, title: &str, body: &str);
}

/// Decides, once per tick, which prescriptions are due right now.
#[derive(Debug, Default)]
pub struct ReminderEvaluator {
    /// Last minute a reminder fired. Holds the full date+minute instant so
    /// the same wall-clock minute fires again on the next calendar day;
    /// process-lifetime only, never persisted.
    last_fired: Option<NaiveDateTime>,
}

impl ReminderEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate against the local wall clock.
    pub fn tick(&mut self, state: &AppState) -> Vec<ReminderEvent> {
        self.evaluate_at(Local::now().naive_local(), state)
    }

    /// Evaluate at an explicit instant.
    ///
    /// One global minute guard, not per-prescription: every prescription
    /// due in the same minute fires in the same tick, and nothing fires
    /// twice for that minute afterwards. The guard is only advanced when
    /// something fires.
    pub fn evaluate_at(&mut self, now: NaiveDateTime, state: &AppState) -> Vec<ReminderEvent> {
        let minute = now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now);
        if self.last_fired == Some(minute) {
            return Vec::new();
        }

        let current_date = now.format("%Y-%m-%d").to_string();
        let current_time = now.format("%H:%M").to_string();

        let mut events = Vec::new();
        for prescription in &state.prescriptions {
            if !prescription.is_active {
                continue;
            }
            if !prescription.covers_date(&current_date) {
                continue;
            }
            if !prescription.has_reminder_at(&current_time) {
                continue;
            }

            self.last_fired = Some(minute);
            let medicine_names = prescription
                .medicines
                .iter()
                .filter_map(|pm| state.medicine(&pm.medicine_id))
                .map(|m| m.name.clone())
                .collect();
            let contact_name = prescription
                .contact_id
                .as_deref()
                .and_then(|id| state.contact(id))
                .map(|c| c.name.clone());

            events.push(ReminderEvent {
                prescription_id: prescription.id.clone(),
                prescription_name: prescription.name.clone(),
                medicine_names,
                contact_name,
                time: current_time.clone(),
            });
        }
        events
    }

    /// Deliver a batch of events to a sink.
    pub fn deliver_all(events: &[ReminderEvent], sink: &dyn NotificationSink) {
        for event in events {
            sink.deliver(&event.title(), &event.body());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, Medicine, Prescription, PrescriptionMedicine};
    use crate::presence::DigitParityPresence;
    use crate::store::{AppState, StoreEvent};
    use chrono::NaiveDate;

    fn at(date: (i32, u32, u32), time: (u32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(time.0, time.1, time.2)
            .unwrap()
    }

    fn state_with_schedule(reminder_times: &[&str], active: bool) -> (AppState, String) {
        let mut med = Medicine::new("Ibuprofen".into());
        med.usage = "One capsule".into();

        let mut presc = Prescription::new("Morning meds".into());
        presc.medicines = vec![PrescriptionMedicine::for_medicine(&med)];
        presc.start_date = "2025-06-01".into();
        presc.end_date = "2025-06-30".into();
        presc.reminder_times = reminder_times.iter().map(|s| s.to_string()).collect();
        presc.is_active = active;
        let id = presc.id.clone();

        let state = AppState::default()
            .apply(StoreEvent::UpsertMedicine(med))
            .unwrap()
            .apply(StoreEvent::UpsertPrescription(presc))
            .unwrap();
        (state, id)
    }

    #[test]
    fn test_fires_once_per_minute() {
        let (state, id) = state_with_schedule(&["08:00"], true);
        let mut evaluator = ReminderEvaluator::new();

        let events = evaluator.evaluate_at(at((2025, 6, 15), (8, 0, 3)), &state);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].prescription_id, id);
        assert_eq!(events[0].time, "08:00");

        // Second tick in the same minute is deduplicated
        let events = evaluator.evaluate_at(at((2025, 6, 15), (8, 0, 7)), &state);
        assert!(events.is_empty());

        // The same minute the next day fires again
        let events = evaluator.evaluate_at(at((2025, 6, 16), (8, 0, 3)), &state);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_inactive_never_fires() {
        let (state, _) = state_with_schedule(&["08:00"], false);
        let mut evaluator = ReminderEvaluator::new();
        let events = evaluator.evaluate_at(at((2025, 6, 15), (8, 0, 0)), &state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_outside_date_range_never_fires() {
        let (state, _) = state_with_schedule(&["08:00"], true);
        let mut evaluator = ReminderEvaluator::new();

        let events = evaluator.evaluate_at(at((2025, 5, 31), (8, 0, 0)), &state);
        assert!(events.is_empty());
        let events = evaluator.evaluate_at(at((2025, 7, 1), (8, 0, 0)), &state);
        assert!(events.is_empty());

        // Range endpoints are inclusive
        let events = evaluator.evaluate_at(at((2025, 6, 1), (8, 0, 0)), &state);
        assert_eq!(events.len(), 1);
        let events = evaluator.evaluate_at(at((2025, 6, 30), (8, 0, 0)), &state);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_non_matching_minute_never_fires() {
        let (state, _) = state_with_schedule(&["08:00"], true);
        let mut evaluator = ReminderEvaluator::new();
        let events = evaluator.evaluate_at(at((2025, 6, 15), (8, 1, 0)), &state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_shared_minute_fires_all_prescriptions() {
        let med = Medicine::new("Ibuprofen".into());
        let mut first = Prescription::new("First".into());
        first.medicines = vec![PrescriptionMedicine::for_medicine(&med)];
        first.start_date = "2025-06-01".into();
        first.end_date = "2025-06-30".into();
        first.reminder_times = vec!["12:00".into()];
        let mut second = Prescription::new("Second".into());
        second.medicines = vec![PrescriptionMedicine::for_medicine(&med)];
        second.start_date = "2025-06-01".into();
        second.end_date = "2025-06-30".into();
        second.reminder_times = vec!["12:00".into()];

        let state = AppState::default()
            .apply(StoreEvent::UpsertMedicine(med))
            .unwrap()
            .apply(StoreEvent::UpsertPrescription(first))
            .unwrap()
            .apply(StoreEvent::UpsertPrescription(second))
            .unwrap();

        let mut evaluator = ReminderEvaluator::new();
        let events = evaluator.evaluate_at(at((2025, 6, 15), (12, 0, 5)), &state);
        assert_eq!(events.len(), 2);

        let events = evaluator.evaluate_at(at((2025, 6, 15), (12, 0, 15)), &state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_guard_untouched_when_nothing_fires() {
        let (state, _) = state_with_schedule(&["08:00"], true);
        let mut evaluator = ReminderEvaluator::new();

        // A quiet minute does not advance the guard...
        let events = evaluator.evaluate_at(at((2025, 6, 15), (7, 59, 55)), &state);
        assert!(events.is_empty());

        // ...so the due minute right after still fires
        let events = evaluator.evaluate_at(at((2025, 6, 15), (8, 0, 5)), &state);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_payload_resolves_names() {
        let presence = DigitParityPresence;
        let contact = Contact::new("Mom".into(), "13800138000".into(), &presence);
        let med_a = Medicine::new("Ibuprofen".into());
        let med_b = Medicine::new("Vitamin C".into());

        let mut presc = Prescription::new("Evening meds".into());
        presc.medicines = vec![
            PrescriptionMedicine::for_medicine(&med_a),
            PrescriptionMedicine::for_medicine(&med_b),
        ];
        presc.contact_id = Some(contact.id.clone());
        presc.start_date = "2025-06-01".into();
        presc.end_date = "2025-06-30".into();
        presc.reminder_times = vec!["20:00".into()];

        let mut state = AppState::default()
            .apply(StoreEvent::UpsertMedicine(med_a.clone()))
            .unwrap()
            .apply(StoreEvent::UpsertMedicine(med_b))
            .unwrap()
            .apply(StoreEvent::UpsertContact(contact))
            .unwrap()
            .apply(StoreEvent::UpsertPrescription(presc))
            .unwrap();

        // Simulate a reference going stale between edits: drop one medicine
        // directly so the prescription still points at it.
        state.medicines.retain(|m| m.id != med_a.id);

        let mut evaluator = ReminderEvaluator::new();
        let events = evaluator.evaluate_at(at((2025, 6, 15), (20, 0, 0)), &state);
        assert_eq!(events.len(), 1);

        let event = &events[0];
        // The dangling reference is skipped, not an error
        assert_eq!(event.medicine_names, vec!["Vitamin C"]);
        assert_eq!(event.contact_name.as_deref(), Some("Mom"));
        assert_eq!(event.title(), "Remind Mom: time for their medication!");
        assert!(event.body().contains("Evening meds"));
        assert!(event.body().contains("Vitamin C"));
    }

    #[test]
    fn test_title_without_contact() {
        let event = ReminderEvent {
            prescription_id: "p1".into(),
            prescription_name: "Morning meds".into(),
            medicine_names: vec!["Ibuprofen".into()],
            contact_name: None,
            time: "08:00".into(),
        };
        assert_eq!(event.title(), "Time to take your medication!");
    }
}
