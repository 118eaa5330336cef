//! Administrative commands run outside the HTTP server.

use lousa_models::{RegisterUserDto, User};
use sqlx::PgPool;
use validator::Validate;

use crate::modules::auth::service::{AccountFlags, AuthService};

/// Creates an active `ADMIN` account with staff and superuser flags.
///
/// Input goes through the same validation and normalization as public
/// registration.
pub async fn create_superuser(
    db: &PgPool,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<User, String> {
    let dto = RegisterUserDto {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        password: password.to_string(),
        cpf: None,
    };

    dto.validate().map_err(|errors| describe(errors.to_string()))?;

    AuthService::create_account(db, dto, AccountFlags::superuser())
        .await
        .map_err(|e| describe(e.error.to_string()))
}

fn describe(message: String) -> String {
    message.replace('\n', "; ")
}
