use crate::{env_flag, env_or};

/// Password reset token policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordResetConfig {
    /// Hours a freshly issued token stays usable.
    pub token_ttl_hours: i64,
    /// Delete a user's outstanding tokens when a new one is issued and when
    /// one is consumed. Off by default: users may hold several live tokens.
    pub revoke_previous_tokens: bool,
}

impl Default for PasswordResetConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: 24,
            revoke_previous_tokens: false,
        }
    }
}

impl PasswordResetConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_ttl_hours: env_or("PASSWORD_RESET_TOKEN_TTL_HOURS", defaults.token_ttl_hours)
                .max(1),
            revoke_previous_tokens: env_flag(
                "PASSWORD_RESET_REVOKE_PREVIOUS",
                defaults.revoke_previous_tokens,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = PasswordResetConfig::default();
        assert_eq!(config.token_ttl_hours, 24);
        assert!(!config.revoke_previous_tokens);
    }
}
