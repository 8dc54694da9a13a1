//! Contact presence capability.
//!
//! Whether a contact can actually receive shared reminders is decided by a
//! presence service. The trait keeps that decision swappable; the default
//! implementation simulates it from the phone number's last digit.

use crate::models::ContactStatus;

/// Capability that decides whether a phone number is reachable for shared
/// reminders.
pub trait PresenceCheck {
    fn check_status(&self, phone: &str) -> ContactStatus;
}

/// Simulated presence check: even last digit means connected.
///
/// Stands in for a real lookup against a presence service. A phone number
/// with no trailing digit counts as local.
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitParityPresence;

impl PresenceCheck for DigitParityPresence {
    fn check_status(&self, phone: &str) -> ContactStatus {
        match phone.chars().last().and_then(|c| c.to_digit(10)) {
            Some(d) if d % 2 == 0 => ContactStatus::Connected,
            _ => ContactStatus::Local,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_last_digit_is_connected() {
        let presence = DigitParityPresence;
        assert_eq!(presence.check_status("13800138000"), ContactStatus::Connected);
        assert_eq!(presence.check_status("13800138008"), ContactStatus::Connected);
    }

    #[test]
    fn test_odd_last_digit_is_local() {
        let presence = DigitParityPresence;
        assert_eq!(presence.check_status("13800138001"), ContactStatus::Local);
        assert_eq!(presence.check_status("13800138009"), ContactStatus::Local);
    }

    #[test]
    fn test_non_digit_tail_is_local() {
        let presence = DigitParityPresence;
        assert_eq!(presence.check_status(""), ContactStatus::Local);
        assert_eq!(presence.check_status("ext-12a"), ContactStatus::Local);
    }
}
