//! AI-assisted medicine autofill.
//!
//! Turns a free-form description (a drug name, a short note, shorthand)
//! into a partial medicine record the form layer can merge, via one
//! chat-completions exchange. Calls are capped by a per-day quota tracked
//! client-side; the HTTP client itself is feature-gated so hosts that
//! bring their own transport only take the prompt/parse/quota logic.

pub mod analyze;
pub mod prompts;
pub mod quota;

#[cfg(feature = "http")]
pub mod client;

pub use analyze::*;
pub use prompts::*;
pub use quota::*;

#[cfg(feature = "http")]
pub use client::*;
