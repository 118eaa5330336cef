use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::SmartIpKeyExtractor;

use crate::{env_flag, env_or};

/// Rate limit configuration for the credential endpoints (login, register,
/// token, password reset).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Replenish interval: one request per `1 / auth_per_second` seconds
    pub auth_per_second: u64,
    /// Requests allowed in a burst before limiting kicks in
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED", defaults.enabled),
            auth_per_second: env_or("RATE_LIMIT_AUTH_PER_SECOND", defaults.auth_per_second),
            auth_burst_size: env_or("RATE_LIMIT_AUTH_BURST_SIZE", defaults.auth_burst_size),
        }
    }

    /// Disabled limiter, for tests driving the router without a peer address.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Create GovernorConfig for auth endpoints.
    ///
    /// Clients are keyed by `X-Forwarded-For`/`X-Real-Ip`/`Forwarded` when
    /// present, falling back to the peer address.
    ///
    /// # Panics
    ///
    /// Panics if `auth_per_second` or `auth_burst_size` is zero.
    pub fn auth_governor_config(
        &self,
    ) -> GovernorConfig<SmartIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second)
            .burst_size(self.auth_burst_size)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("Failed to build auth rate limiter config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_disabled_keeps_limits() {
        let config = RateLimitConfig::disabled();
        assert!(!config.enabled);
        assert_eq!(config.auth_burst_size, 5);
    }
}
