//! SQLite schema definition.

/// Complete database schema for pillbox.
///
/// Record collections are stored as independently keyed JSON-array blobs
/// rather than row-per-record tables: the store always flushes whole
/// collections, and the blob layout keeps load/save symmetric with that.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Record collections (one JSON array per key)
-- ============================================================================

CREATE TABLE IF NOT EXISTS record_blobs (
    key TEXT PRIMARY KEY,                        -- medicines | prescriptions | contacts
    value TEXT NOT NULL,                         -- JSON array of records
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Session state (current user, per-day AI usage counters)
-- ============================================================================

CREATE TABLE IF NOT EXISTS app_state (
    key TEXT PRIMARY KEY,                        -- current_user, ai_usage_<YYYY-MM-DD>
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Blob key for the medicine collection.
pub const KEY_MEDICINES: &str = "medicines";
/// Blob key for the prescription collection.
pub const KEY_PRESCRIPTIONS: &str = "prescriptions";
/// Blob key for the contact collection.
pub const KEY_CONTACTS: &str = "contacts";
/// State key for the logged-in user record.
pub const KEY_CURRENT_USER: &str = "current_user";
