//! Request extractors for cross-cutting concerns.
//!
//! - [`auth`]: Bearer token authentication
//!
//! Handlers that need the caller's identity take [`auth::AuthUser`] as a
//! parameter; routes without it are public.

pub mod auth;
