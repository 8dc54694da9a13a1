//! Application state and the pure reducer.

use crate::models::{
    parse_reminder_time, parse_schedule_date, Contact, Medicine, Prescription,
    MAX_REMINDER_TIMES,
};

use super::{StoreError, StoreEvent, StoreResult};

/// The three record collections, most-recently-created first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub medicines: Vec<Medicine>,
    pub prescriptions: Vec<Prescription>,
    pub contacts: Vec<Contact>,
}

impl AppState {
    /// Look up a medicine by id.
    pub fn medicine(&self, id: &str) -> Option<&Medicine> {
        self.medicines.iter().find(|m| m.id == id)
    }

    /// Look up a prescription by id.
    pub fn prescription(&self, id: &str) -> Option<&Prescription> {
        self.prescriptions.iter().find(|p| p.id == id)
    }

    /// Look up a contact by id.
    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    /// Apply an event, producing the next state.
    ///
    /// Validation failures leave the current state untouched and nothing
    /// else observable happens; referential repair on deletes is silent
    /// cascade, never an error.
    pub fn apply(&self, event: StoreEvent) -> StoreResult<AppState> {
        let mut next = self.clone();
        match event {
            StoreEvent::UpsertMedicine(medicine) => {
                validate_medicine(&medicine)?;
                upsert(&mut next.medicines, medicine, |m| m.id.clone());
            }
            StoreEvent::DeleteMedicine { id } => {
                next.medicines.retain(|m| m.id != id);
                // Cascade: drop dangling references. A prescription emptied
                // here is left as-is; the non-empty invariant applies only
                // at write time.
                for prescription in &mut next.prescriptions {
                    prescription.medicines.retain(|pm| pm.medicine_id != id);
                }
            }
            StoreEvent::UpsertPrescription(prescription) => {
                validate_prescription(&prescription, self)?;
                upsert(&mut next.prescriptions, prescription, |p| p.id.clone());
            }
            StoreEvent::DeletePrescription { id } => {
                next.prescriptions.retain(|p| p.id != id);
            }
            StoreEvent::ToggleActive { id } => {
                if let Some(prescription) =
                    next.prescriptions.iter_mut().find(|p| p.id == id)
                {
                    prescription.is_active = !prescription.is_active;
                }
            }
            StoreEvent::UpsertContact(contact) => {
                validate_contact(&contact)?;
                upsert(&mut next.contacts, contact, |c| c.id.clone());
            }
            StoreEvent::DeleteContact { id } => {
                next.contacts.retain(|c| c.id != id);
                // Cascade: unset the link, nothing else changes.
                for prescription in &mut next.prescriptions {
                    if prescription.contact_id.as_deref() == Some(id.as_str()) {
                        prescription.contact_id = None;
                    }
                }
            }
        }
        Ok(next)
    }
}

/// Replace in place when the id already exists, otherwise prepend.
fn upsert<T>(records: &mut Vec<T>, record: T, id_of: impl Fn(&T) -> String) {
    let id = id_of(&record);
    match records.iter().position(|r| id_of(r) == id) {
        Some(pos) => records[pos] = record,
        None => records.insert(0, record),
    }
}

fn validate_medicine(medicine: &Medicine) -> StoreResult<()> {
    if medicine.id.is_empty() {
        return Err(StoreError::MissingField("id"));
    }
    if medicine.name.trim().is_empty() {
        return Err(StoreError::MissingField("name"));
    }
    Ok(())
}

fn validate_prescription(prescription: &Prescription, state: &AppState) -> StoreResult<()> {
    if prescription.id.is_empty() {
        return Err(StoreError::MissingField("id"));
    }
    if prescription.name.trim().is_empty() {
        return Err(StoreError::MissingField("name"));
    }
    let duplicate = state
        .prescriptions
        .iter()
        .any(|p| p.name == prescription.name && p.id != prescription.id);
    if duplicate {
        return Err(StoreError::DuplicateName(prescription.name.clone()));
    }
    if prescription.medicines.is_empty() {
        return Err(StoreError::NoMedicines);
    }
    for entry in &prescription.medicines {
        if state.medicine(&entry.medicine_id).is_none() {
            return Err(StoreError::UnknownMedicine(entry.medicine_id.clone()));
        }
    }
    if let Some(contact_id) = &prescription.contact_id {
        if state.contact(contact_id).is_none() {
            return Err(StoreError::UnknownContact(contact_id.clone()));
        }
    }
    if prescription.reminder_times.is_empty() {
        return Err(StoreError::NoReminderTimes);
    }
    if prescription.reminder_times.len() > MAX_REMINDER_TIMES {
        return Err(StoreError::TooManyReminderTimes(
            prescription.reminder_times.len(),
        ));
    }
    for time in &prescription.reminder_times {
        if parse_reminder_time(time).is_none() {
            return Err(StoreError::InvalidTime(time.clone()));
        }
    }
    let start = parse_schedule_date(&prescription.start_date)
        .ok_or_else(|| StoreError::InvalidDate(prescription.start_date.clone()))?;
    let end = parse_schedule_date(&prescription.end_date)
        .ok_or_else(|| StoreError::InvalidDate(prescription.end_date.clone()))?;
    if start > end {
        return Err(StoreError::InvalidDateRange {
            start: prescription.start_date.clone(),
            end: prescription.end_date.clone(),
        });
    }
    Ok(())
}

fn validate_contact(contact: &Contact) -> StoreResult<()> {
    if contact.id.is_empty() {
        return Err(StoreError::MissingField("id"));
    }
    if contact.name.trim().is_empty() {
        return Err(StoreError::MissingField("name"));
    }
    if contact.phone.trim().is_empty() {
        return Err(StoreError::MissingField("phone"));
    }
    Ok(())
}
