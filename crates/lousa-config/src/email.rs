use std::env;

use crate::{env_flag, env_or};

#[derive(Clone, Debug)]
pub struct EmailConfig {
    /// When false, reset links are written to the log instead of mailed.
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// Base URL of the web client; reset links point at `{frontend_url}/auth/reset-password`.
    pub frontend_url: String,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("SMTP_ENABLED", false),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
            smtp_port: env_or("SMTP_PORT", 1025),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_default(),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            from_email: env::var("FROM_EMAIL").unwrap_or_else(|_| "noreply@lousa.app".to_string()),
            from_name: env::var("FROM_NAME").unwrap_or_else(|_| "Lousa".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }

    /// Link embedded in reset emails.
    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/auth/reset-password?token={}",
            self.frontend_url.trim_end_matches('/'),
            token
        )
    }
}
