//! Current-user model.

use serde::{Deserialize, Serialize};

/// The logged-in user. Authentication itself is a pluggable capability;
/// the store only needs somewhere to keep the verified record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Stable identifier (the phone number for auto-registered users)
    pub id: String,
    /// Verified phone number
    pub phone: String,
    /// Whether this login auto-registered a new account
    pub is_new: bool,
}

impl User {
    /// Auto-register a user from a verified phone number.
    pub fn auto_registered(phone: String) -> Self {
        Self {
            id: phone.clone(),
            phone,
            is_new: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_registered() {
        let user = User::auto_registered("13800138000".into());
        assert_eq!(user.id, "13800138000");
        assert_eq!(user.phone, "13800138000");
        assert!(user.is_new);
    }
}
