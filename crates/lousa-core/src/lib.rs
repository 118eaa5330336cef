//! # Lousa Core
//!
//! Core types, errors, and utilities for the Lousa accounts API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`normalize`]: Canonical forms for emails, phones and CPF numbers
//! - [`password`]: Secure password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use lousa_core::errors::AppError;
//! use lousa_core::normalize::{normalize_email, normalize_phone};
//! use lousa_core::password::{hash_password, verify_password};
//!
//! let error = AppError::bad_request(anyhow::anyhow!("Email already exists"));
//! let email = normalize_email("  Ana@X.com "); // "ana@x.com"
//! let phone = normalize_phone("(11) 91234-5678"); // "11912345678"
//! let hash = hash_password("secret1")?;
//! ```

pub mod errors;
pub mod normalize;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse, FieldErrors};
pub use normalize::{is_valid_phone, normalize_cpf, normalize_email, normalize_phone};
pub use password::{hash_password, verify_password};
