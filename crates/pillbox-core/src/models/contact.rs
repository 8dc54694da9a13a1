//! Contact models for shared reminders.

use serde::{Deserialize, Serialize};

use crate::presence::PresenceCheck;

/// Connectivity status of a contact, derived once at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    /// The contact's device is reachable for shared reminders
    Connected,
    /// Stored locally only, not yet reachable
    Local,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Connected => "connected",
            ContactStatus::Local => "local",
        }
    }
}

/// A person who can receive shared dose reminders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    /// Opaque stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Phone number
    pub phone: String,
    /// Derived connectivity status
    pub status: ContactStatus,
}

impl Contact {
    /// Create a new contact, deriving its status through the presence
    /// capability.
    pub fn new(name: String, phone: String, presence: &dyn PresenceCheck) -> Self {
        let status = presence.check_status(&phone);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            phone,
            status,
        }
    }
}
