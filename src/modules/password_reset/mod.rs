//! Password reset token lifecycle: issue, validate, consume.
//!
//! HTTP endpoints for this flow live in the `auth` module; this module owns
//! the token store and its rules.

pub mod service;
pub mod token;

pub use service::PasswordResetService;
