//! Pillbox Core Library
//!
//! Local-first medication tracking with timed dose reminders.
//!
//! # Architecture
//!
//! ```text
//! Form input → StoreEvent → apply(event) → new AppState
//!                                │
//!                    ┌───────────▼───────────┐
//!                    │   Persistence flush    │
//!                    │  (three keyed blobs,   │
//!                    │   one transaction)     │
//!                    └───────────┬───────────┘
//!                                │
//!            Host timer (10s) ──▶│
//!                    ┌───────────▼───────────┐
//!                    │   ReminderEvaluator    │
//!                    │  minute guard + match  │
//!                    └───────────┬───────────┘
//!                                │ due events
//!                                ▼
//!                        Notification Sink
//!                  (platform notification, or
//!                   blocking alert fallback)
//! ```
//!
//! # Core Principle
//!
//! **The reducer is pure.** Every mutation is a [`StoreEvent`] validated
//! against the current state; persistence is a flush that follows a
//! successful apply, so no partial write is ever observable.
//!
//! # Modules
//!
//! - [`store`]: application state, events, reducer, persistence coupling
//! - [`models`]: domain types (Medicine, Prescription, Contact, User)
//! - [`reminder`]: due-reminder evaluation with minute deduplication
//! - [`db`]: SQLite persistence (keyed JSON blobs)
//! - [`presence`]: pluggable contact-presence capability
//! - [`auth`]: pluggable authentication capability

pub mod auth;
pub mod db;
pub mod models;
pub mod presence;
pub mod reminder;
pub mod store;

// Re-export commonly used types
pub use auth::{Authenticator, MockAuthenticator};
pub use db::Database;
pub use models::{Contact, ContactStatus, Medicine, MedicineDetails, Prescription, PrescriptionMedicine, User};
pub use presence::{DigitParityPresence, PresenceCheck};
pub use reminder::{NotificationSink, ReminderEvaluator, ReminderEvent, TICK_INTERVAL};
pub use store::{AppState, RecordStore, StoreError, StoreEvent};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

/// Successful AI autofill calls allowed per calendar day.
pub const DAILY_AI_LIMIT: u32 = 10;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PillboxError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for PillboxError {
    fn from(e: db::DbError) -> Self {
        PillboxError::DatabaseError(e.to_string())
    }
}

impl From<store::StoreError> for PillboxError {
    fn from(e: store::StoreError) -> Self {
        match e {
            StoreError::Db(msg) => PillboxError::DatabaseError(msg),
            other => PillboxError::ValidationError(other.to_string()),
        }
    }
}

impl From<auth::AuthError> for PillboxError {
    fn from(e: auth::AuthError) -> Self {
        PillboxError::AuthenticationError(e.to_string())
    }
}

impl From<serde_json::Error> for PillboxError {
    fn from(e: serde_json::Error) -> Self {
        PillboxError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PillboxError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PillboxError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a store at the given path.
#[uniffi::export]
pub fn open_store(path: String) -> Result<Arc<PillboxCore>, PillboxError> {
    let db = Database::open(&path)?;
    let store = RecordStore::open(db)?;
    Ok(Arc::new(PillboxCore {
        inner: Mutex::new(Inner {
            store,
            evaluator: ReminderEvaluator::new(),
        }),
    }))
}

/// Create an in-memory store (for testing).
#[uniffi::export]
pub fn open_store_in_memory() -> Result<Arc<PillboxCore>, PillboxError> {
    let db = Database::open_in_memory()?;
    let store = RecordStore::open(db)?;
    Ok(Arc::new(PillboxCore {
        inner: Mutex::new(Inner {
            store,
            evaluator: ReminderEvaluator::new(),
        }),
    }))
}

struct Inner {
    store: RecordStore,
    evaluator: ReminderEvaluator,
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct PillboxCore {
    inner: Mutex<Inner>,
}

#[uniffi::export]
impl PillboxCore {
    // =========================================================================
    // Medicine Operations
    // =========================================================================

    /// Add or update a medicine.
    pub fn upsert_medicine(&self, medicine: FfiMedicine) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner.store.dispatch(StoreEvent::UpsertMedicine(medicine.into()))?;
        Ok(())
    }

    /// Delete a medicine, dropping it from every prescription.
    pub fn delete_medicine(&self, id: String) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner.store.dispatch(StoreEvent::DeleteMedicine { id })?;
        Ok(())
    }

    /// All medicines, most recently created first.
    pub fn list_medicines(&self) -> Result<Vec<FfiMedicine>, PillboxError> {
        let inner = self.inner.lock()?;
        Ok(inner.store.state().medicines.iter().cloned().map(Into::into).collect())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Add or update a prescription.
    pub fn upsert_prescription(&self, prescription: FfiPrescription) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner
            .store
            .dispatch(StoreEvent::UpsertPrescription(prescription.into()))?;
        Ok(())
    }

    /// Delete a prescription.
    pub fn delete_prescription(&self, id: String) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner.store.dispatch(StoreEvent::DeletePrescription { id })?;
        Ok(())
    }

    /// Flip a prescription's active flag.
    pub fn toggle_prescription_active(&self, id: String) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner.store.dispatch(StoreEvent::ToggleActive { id })?;
        Ok(())
    }

    /// All prescriptions, most recently created first.
    pub fn list_prescriptions(&self) -> Result<Vec<FfiPrescription>, PillboxError> {
        let inner = self.inner.lock()?;
        Ok(inner
            .store
            .state()
            .prescriptions
            .iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Contact Operations
    // =========================================================================

    /// Add a contact, deriving its connectivity status.
    pub fn add_contact(&self, name: String, phone: String) -> Result<FfiContact, PillboxError> {
        let mut inner = self.inner.lock()?;
        let contact = Contact::new(name, phone, &DigitParityPresence);
        inner.store.dispatch(StoreEvent::UpsertContact(contact.clone()))?;
        Ok(contact.into())
    }

    /// Delete a contact, unlinking it from every prescription.
    pub fn delete_contact(&self, id: String) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner.store.dispatch(StoreEvent::DeleteContact { id })?;
        Ok(())
    }

    /// All contacts, most recently created first.
    pub fn list_contacts(&self) -> Result<Vec<FfiContact>, PillboxError> {
        let inner = self.inner.lock()?;
        Ok(inner.store.state().contacts.iter().cloned().map(Into::into).collect())
    }

    // =========================================================================
    // Reminder Operations
    // =========================================================================

    /// Evaluate reminders for the current instant.
    ///
    /// The host calls this every ten seconds and surfaces the returned
    /// events as notifications (or blocking alerts when the notification
    /// capability is denied or absent).
    pub fn check_reminders(&self) -> Result<Vec<FfiReminderEvent>, PillboxError> {
        let mut inner = self.inner.lock()?;
        let Inner { store, evaluator } = &mut *inner;
        let events = evaluator.tick(store.state());
        Ok(events.into_iter().map(Into::into).collect())
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Request a login code for the phone (demo flow, no SMS is sent).
    pub fn request_login_code(&self, phone: String) -> Result<(), PillboxError> {
        MockAuthenticator.request_code(&phone)?;
        Ok(())
    }

    /// Verify the code and persist the logged-in user.
    pub fn login(&self, phone: String, code: String) -> Result<FfiUser, PillboxError> {
        let mut inner = self.inner.lock()?;
        let user = MockAuthenticator.verify(&phone, &code)?;
        inner.store.db().save_user(&user)?;
        Ok(user.into())
    }

    /// Forget the logged-in user.
    pub fn logout(&self) -> Result<(), PillboxError> {
        let mut inner = self.inner.lock()?;
        inner.store.db().clear_user()?;
        Ok(())
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Result<Option<FfiUser>, PillboxError> {
        let mut inner = self.inner.lock()?;
        Ok(inner.store.db().load_user()?.map(Into::into))
    }

    // =========================================================================
    // AI Quota Operations
    // =========================================================================

    /// Autofill calls left today.
    pub fn remaining_ai_uses(&self) -> Result<u32, PillboxError> {
        let mut inner = self.inner.lock()?;
        let today = chrono::Local::now().date_naive();
        let used = inner.store.db().ai_usage(today)?;
        Ok(DAILY_AI_LIMIT.saturating_sub(used))
    }

    /// Record one successful autofill call; returns the remaining quota.
    pub fn record_ai_use(&self) -> Result<u32, PillboxError> {
        let mut inner = self.inner.lock()?;
        let today = chrono::Local::now().date_naive();
        let used = inner.store.db().record_ai_usage(today)?;
        Ok(DAILY_AI_LIMIT.saturating_sub(used))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub ingredients: String,
    pub specs: String,
    pub indications: String,
    pub usage: String,
    pub expiry_date: String,
    pub image: Option<String>,
}

impl From<Medicine> for FfiMedicine {
    fn from(medicine: Medicine) -> Self {
        Self {
            id: medicine.id,
            name: medicine.name,
            brand: medicine.brand,
            ingredients: medicine.ingredients,
            specs: medicine.specs,
            indications: medicine.indications,
            usage: medicine.usage,
            expiry_date: medicine.expiry_date,
            image: medicine.image,
        }
    }
}

impl From<FfiMedicine> for Medicine {
    fn from(medicine: FfiMedicine) -> Self {
        Medicine {
            id: medicine.id,
            name: medicine.name,
            brand: medicine.brand,
            ingredients: medicine.ingredients,
            specs: medicine.specs,
            indications: medicine.indications,
            usage: medicine.usage,
            expiry_date: medicine.expiry_date,
            image: medicine.image,
        }
    }
}

/// FFI-safe prescription medicine entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionMedicine {
    pub medicine_id: String,
    pub custom_usage: Option<String>,
}

impl From<PrescriptionMedicine> for FfiPrescriptionMedicine {
    fn from(entry: PrescriptionMedicine) -> Self {
        Self {
            medicine_id: entry.medicine_id,
            custom_usage: entry.custom_usage,
        }
    }
}

impl From<FfiPrescriptionMedicine> for PrescriptionMedicine {
    fn from(entry: FfiPrescriptionMedicine) -> Self {
        PrescriptionMedicine {
            medicine_id: entry.medicine_id,
            custom_usage: entry.custom_usage,
        }
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub name: String,
    pub medicines: Vec<FfiPrescriptionMedicine>,
    pub contact_id: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub reminder_times: Vec<String>,
    pub is_active: bool,
}

impl From<Prescription> for FfiPrescription {
    fn from(prescription: Prescription) -> Self {
        Self {
            id: prescription.id,
            name: prescription.name,
            medicines: prescription.medicines.into_iter().map(Into::into).collect(),
            contact_id: prescription.contact_id,
            start_date: prescription.start_date,
            end_date: prescription.end_date,
            reminder_times: prescription.reminder_times,
            is_active: prescription.is_active,
        }
    }
}

impl From<FfiPrescription> for Prescription {
    fn from(prescription: FfiPrescription) -> Self {
        Prescription {
            id: prescription.id,
            name: prescription.name,
            medicines: prescription.medicines.into_iter().map(Into::into).collect(),
            contact_id: prescription.contact_id,
            start_date: prescription.start_date,
            end_date: prescription.end_date,
            reminder_times: prescription.reminder_times,
            is_active: prescription.is_active,
        }
    }
}

/// FFI-safe contact.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiContact {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub status: String,
}

impl From<Contact> for FfiContact {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            phone: contact.phone,
            status: contact.status.as_str().to_string(),
        }
    }
}

/// FFI-safe user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub phone: String,
    pub is_new: bool,
}

impl From<User> for FfiUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            is_new: user.is_new,
        }
    }
}

/// FFI-safe reminder event, with the notification text pre-rendered.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminderEvent {
    pub prescription_id: String,
    pub prescription_name: String,
    pub medicine_names: Vec<String>,
    pub contact_name: Option<String>,
    pub time: String,
    pub title: String,
    pub body: String,
}

impl From<ReminderEvent> for FfiReminderEvent {
    fn from(event: ReminderEvent) -> Self {
        let title = event.title();
        let body = event.body();
        Self {
            prescription_id: event.prescription_id,
            prescription_name: event.prescription_name,
            medicine_names: event.medicine_names,
            contact_name: event.contact_name,
            time: event.time,
            title,
            body,
        }
    }
}
