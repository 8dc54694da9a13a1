//! Store events: every mutation of the record collections is one of these.

use crate::models::{Contact, Medicine, Prescription};

/// A mutation applied to the application state through the reducer.
///
/// Upserts insert when the id is absent and replace in place when it is
/// present; deletes and toggles are no-ops for absent ids.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    UpsertMedicine(Medicine),
    DeleteMedicine { id: String },
    UpsertPrescription(Prescription),
    DeletePrescription { id: String },
    ToggleActive { id: String },
    UpsertContact(Contact),
    DeleteContact { id: String },
}
