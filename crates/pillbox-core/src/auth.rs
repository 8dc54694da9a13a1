//! Authentication capability.
//!
//! Login is phone + SMS code. The reminder and store logic never depend on
//! how verification happens, so the flow sits behind a trait; the shipped
//! implementation is the demo flow with a fixed code and auto-registration.

use thiserror::Error;

use crate::models::User;

/// Fixed verification code accepted by the demo authenticator.
pub const DEMO_CODE: &str = "123456";

/// Authentication errors.
#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Wrong verification code")]
    WrongCode,
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Capability that issues verification codes and verifies logins.
pub trait Authenticator {
    /// Request that a code be sent to the phone.
    fn request_code(&self, phone: &str) -> AuthResult<()>;

    /// Verify a code for the phone, returning the logged-in user.
    fn verify(&self, phone: &str, code: &str) -> AuthResult<User>;
}

/// Demo authenticator: no SMS is sent, the fixed code always verifies,
/// and an unknown phone number auto-registers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAuthenticator;

impl Authenticator for MockAuthenticator {
    fn request_code(&self, phone: &str) -> AuthResult<()> {
        if !is_valid_phone(phone) {
            return Err(AuthError::InvalidPhone(phone.to_string()));
        }
        Ok(())
    }

    fn verify(&self, phone: &str, code: &str) -> AuthResult<User> {
        if !is_valid_phone(phone) {
            return Err(AuthError::InvalidPhone(phone.to_string()));
        }
        if code != DEMO_CODE {
            return Err(AuthError::WrongCode);
        }
        Ok(User::auto_registered(phone.to_string()))
    }
}

/// Validate a mobile number: 11 digits, leading 1, second digit 3-9.
pub fn is_valid_phone(phone: &str) -> bool {
    let bytes = phone.as_bytes();
    bytes.len() == 11
        && bytes[0] == b'1'
        && (b'3'..=b'9').contains(&bytes[1])
        && bytes.iter().all(|b| b.is_ascii_digit())
}
