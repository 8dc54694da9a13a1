//! Daily usage quota for the autofill assistant.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Successful autofill calls allowed per calendar day.
pub const DAILY_LIMIT: u32 = 10;

/// Quota errors.
#[derive(Error, Debug, PartialEq)]
pub enum QuotaError {
    #[error("Daily AI autofill limit of {0} reached")]
    Exhausted(u32),
}

/// Per-day call counter. The count belongs to one calendar date; asking
/// about a later date implicitly resets it. Serializable so a host can
/// persist it alongside the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyQuota {
    date: NaiveDate,
    used: u32,
    limit: u32,
}

impl DailyQuota {
    /// Fresh quota for a day, with the default limit.
    pub fn new(today: NaiveDate) -> Self {
        Self::restore(today, 0, DAILY_LIMIT)
    }

    /// Rehydrate from a persisted counter.
    pub fn restore(date: NaiveDate, used: u32, limit: u32) -> Self {
        Self { date, used, limit }
    }

    /// Calls left today.
    pub fn remaining(&mut self, today: NaiveDate) -> u32 {
        self.roll(today);
        self.limit.saturating_sub(self.used)
    }

    /// Check that a call may be issued today. Called before the upstream
    /// request; an exhausted quota means the request is never sent.
    pub fn check(&mut self, today: NaiveDate) -> Result<(), QuotaError> {
        self.roll(today);
        if self.used >= self.limit {
            return Err(QuotaError::Exhausted(self.limit));
        }
        Ok(())
    }

    /// Count one successful call.
    pub fn record_success(&mut self, today: NaiveDate) {
        self.roll(today);
        self.used += 1;
    }

    /// Calls counted for the current date.
    pub fn used(&self) -> u32 {
        self.used
    }

    /// The date the counter belongs to.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    fn roll(&mut self, today: NaiveDate) {
        if self.date != today {
            self.date = today;
            self.used = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_eleventh_call_rejected() {
        let mut quota = DailyQuota::new(day(15));

        for _ in 0..DAILY_LIMIT {
            quota.check(day(15)).unwrap();
            quota.record_success(day(15));
        }

        assert_eq!(quota.remaining(day(15)), 0);
        assert_eq!(quota.check(day(15)), Err(QuotaError::Exhausted(DAILY_LIMIT)));
    }

    #[test]
    fn test_resets_on_next_date() {
        let mut quota = DailyQuota::new(day(15));
        for _ in 0..DAILY_LIMIT {
            quota.record_success(day(15));
        }
        assert!(quota.check(day(15)).is_err());

        assert!(quota.check(day(16)).is_ok());
        assert_eq!(quota.used(), 0);
        assert_eq!(quota.remaining(day(16)), DAILY_LIMIT);
    }

    #[test]
    fn test_failed_calls_do_not_consume() {
        let mut quota = DailyQuota::new(day(15));
        quota.check(day(15)).unwrap();
        // The upstream call failed: nothing recorded
        assert_eq!(quota.remaining(day(15)), DAILY_LIMIT);
    }

    #[test]
    fn test_restore_from_persisted_counter() {
        let mut quota = DailyQuota::restore(day(15), 9, DAILY_LIMIT);
        assert_eq!(quota.remaining(day(15)), 1);
        quota.record_success(day(15));
        assert!(quota.check(day(15)).is_err());
    }
}
