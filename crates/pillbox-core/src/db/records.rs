//! Record blob and session-state database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Transaction};

use super::{
    Database, DbResult, KEY_CONTACTS, KEY_CURRENT_USER, KEY_MEDICINES, KEY_PRESCRIPTIONS,
};
use crate::models::{Contact, Medicine, Prescription, User};
use crate::store::AppState;

impl Database {
    /// Flush all three collections in one transaction.
    pub fn save_records(&mut self, state: &AppState) -> DbResult<()> {
        let medicines = serde_json::to_string(&state.medicines)?;
        let prescriptions = serde_json::to_string(&state.prescriptions)?;
        let contacts = serde_json::to_string(&state.contacts)?;

        let tx = self.transaction()?;
        put_blob(&tx, KEY_MEDICINES, &medicines)?;
        put_blob(&tx, KEY_PRESCRIPTIONS, &prescriptions)?;
        put_blob(&tx, KEY_CONTACTS, &contacts)?;
        tx.commit()?;
        Ok(())
    }

    /// Load all three collections; missing keys yield empty collections.
    pub fn load_records(&self) -> DbResult<AppState> {
        let medicines: Vec<Medicine> = self.load_blob(KEY_MEDICINES)?;
        let prescriptions: Vec<Prescription> = self.load_blob(KEY_PRESCRIPTIONS)?;
        let contacts: Vec<Contact> = self.load_blob(KEY_CONTACTS)?;
        Ok(AppState {
            medicines,
            prescriptions,
            contacts,
        })
    }

    fn load_blob<T: serde::de::DeserializeOwned>(&self, key: &str) -> DbResult<Vec<T>> {
        let blob: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM record_blobs WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        match blob {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Persist the logged-in user.
    pub fn save_user(&self, user: &User) -> DbResult<()> {
        let json = serde_json::to_string(user)?;
        self.put_state(KEY_CURRENT_USER, &json)
    }

    /// Load the logged-in user, if any.
    pub fn load_user(&self) -> DbResult<Option<User>> {
        match self.get_state(KEY_CURRENT_USER)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Forget the logged-in user. Idempotent.
    pub fn clear_user(&self) -> DbResult<()> {
        self.conn()
            .execute("DELETE FROM app_state WHERE key = ?", [KEY_CURRENT_USER])?;
        Ok(())
    }

    /// AI autofill calls recorded for a calendar day.
    ///
    /// The key includes the date, so a new day implicitly reads zero; stale
    /// keys linger harmlessly.
    pub fn ai_usage(&self, date: NaiveDate) -> DbResult<u32> {
        match self.get_state(&ai_usage_key(date))? {
            Some(value) => Ok(value.parse().unwrap_or(0)),
            None => Ok(0),
        }
    }

    /// Record one successful AI autofill call, returning the day's new count.
    pub fn record_ai_usage(&self, date: NaiveDate) -> DbResult<u32> {
        let count = self.ai_usage(date)? + 1;
        self.put_state(&ai_usage_key(date), &count.to_string())?;
        Ok(count)
    }

    fn get_state(&self, key: &str) -> DbResult<Option<String>> {
        self.conn()
            .query_row("SELECT value FROM app_state WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn put_state(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn().execute(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

fn put_blob(tx: &Transaction<'_>, key: &str, value: &str) -> DbResult<()> {
    tx.execute(
        r#"
        INSERT INTO record_blobs (key, value, updated_at)
        VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
        params![key, value],
    )?;
    Ok(())
}

fn ai_usage_key(date: NaiveDate) -> String {
    format!("ai_usage_{}", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrescriptionMedicine;
    use crate::presence::DigitParityPresence;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_state() -> AppState {
        let mut med = Medicine::new("Ibuprofen".into());
        med.brand = "Advil".into();
        med.usage = "One capsule every 12 hours".into();

        let mut presc = Prescription::new("Cold routine".into());
        presc.medicines = vec![PrescriptionMedicine::for_medicine(&med)];

        let presence = DigitParityPresence;
        let contact = Contact::new("Mom".into(), "13800138000".into(), &presence);

        AppState {
            medicines: vec![med],
            prescriptions: vec![presc],
            contacts: vec![contact],
        }
    }

    #[test]
    fn test_load_empty_database() {
        let db = setup_db();
        let state = db.load_records().unwrap();
        assert!(state.medicines.is_empty());
        assert!(state.prescriptions.is_empty());
        assert!(state.contacts.is_empty());
    }

    #[test]
    fn test_records_round_trip() {
        let mut db = setup_db();
        let state = sample_state();

        db.save_records(&state).unwrap();
        let reloaded = db.load_records().unwrap();
        assert_eq!(reloaded, state);

        // Saving the reload changes nothing
        db.save_records(&reloaded).unwrap();
        assert_eq!(db.load_records().unwrap(), state);
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let mut db = setup_db();
        let state = sample_state();
        db.save_records(&state).unwrap();

        let first: String = db
            .conn()
            .query_row(
                "SELECT value FROM record_blobs WHERE key = 'prescriptions'",
                [],
                |row| row.get(0),
            )
            .unwrap();

        let reloaded = db.load_records().unwrap();
        db.save_records(&reloaded).unwrap();

        let second: String = db
            .conn()
            .query_row(
                "SELECT value FROM record_blobs WHERE key = 'prescriptions'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_user_round_trip() {
        let db = setup_db();
        assert!(db.load_user().unwrap().is_none());

        let user = User::auto_registered("13800138000".into());
        db.save_user(&user).unwrap();
        assert_eq!(db.load_user().unwrap(), Some(user));

        db.clear_user().unwrap();
        assert!(db.load_user().unwrap().is_none());
        db.clear_user().unwrap(); // idempotent
    }

    #[test]
    fn test_ai_usage_counter() {
        let db = setup_db();
        let day = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let next_day = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();

        assert_eq!(db.ai_usage(day).unwrap(), 0);
        assert_eq!(db.record_ai_usage(day).unwrap(), 1);
        assert_eq!(db.record_ai_usage(day).unwrap(), 2);
        assert_eq!(db.ai_usage(day).unwrap(), 2);

        // A new calendar day reads zero without touching the old key
        assert_eq!(db.ai_usage(next_day).unwrap(), 0);
        assert_eq!(db.ai_usage(day).unwrap(), 2);
    }
}
