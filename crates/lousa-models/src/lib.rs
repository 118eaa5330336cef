//! # Lousa Models
//!
//! Domain models and DTOs for the Lousa accounts API.
//!
//! # Modules
//!
//! - [`auth`]: Login, token and password reset request/response bodies
//! - [`password_reset`]: Stored reset tokens and their lifecycle errors
//! - [`users`]: User rows, public projections and registration/profile DTOs

pub mod auth;
pub mod password_reset;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    AccessTokenResponse, DetailResponse, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RefreshTokenRequest, ResetPasswordRequest, SuccessResponse, TokenPairResponse,
    ValidTokenResponse, ValidateResetTokenRequest,
};
pub use password_reset::{PasswordResetToken, ResetTokenError};
pub use users::{
    RegisterUserDto, UpdateProfileDto, User, UserCredentials, UserProfile, UserSummary, UserType,
};
