//! Domain models for the pillbox system.

mod contact;
mod medicine;
mod prescription;
mod user;

pub use contact::*;
pub use medicine::*;
pub use prescription::*;
pub use user::*;
