//! Process configuration.
//!
//! Configuration is built once at startup and passed by handle into every
//! component that needs it — there is no ambient global state. The server
//! secret is required in production; development mode falls back to an
//! ephemeral secret with a loud warning so local runs work out of the box.

use crate::error::ConfigurationError;
use chrono::Duration;
use sealnote_crypto::{decode_key_b64, ServerSecret};
use tracing::warn;

/// Environment variable holding the base64 server secret.
pub const SERVER_KEY_ENV: &str = "SEALNOTE_SERVER_KEY";
/// Environment variable overriding the trash retention window, in days.
pub const TRASH_TTL_DAYS_ENV: &str = "SEALNOTE_TRASH_TTL_DAYS";
/// Environment variable overriding the sweep interval, in seconds.
pub const SWEEP_INTERVAL_SECS_ENV: &str = "SEALNOTE_SWEEP_INTERVAL_SECS";

const DEFAULT_TRASH_TTL_DAYS: i64 = 30;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 86_400;

/// How strictly configuration is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Missing server secret is a startup failure.
    Production,
    /// Missing server secret falls back to an ephemeral one (with a warning).
    Development,
}

/// Configuration consumed by the service layer.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub server_secret: ServerSecret,
    /// Age at which a trashed note becomes eligible for permanent deletion.
    pub trash_retention: Duration,
    /// Pause between expiry sweeps.
    pub sweep_interval: std::time::Duration,
}

impl ServiceConfig {
    /// Builds a config with default retention (30 days) and sweep interval
    /// (once per day) around an explicit secret.
    pub fn new(server_secret: ServerSecret) -> Self {
        Self {
            server_secret,
            trash_retention: Duration::days(DEFAULT_TRASH_TTL_DAYS),
            sweep_interval: std::time::Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    /// Loads configuration from the environment.
    pub fn from_env(mode: RunMode) -> Result<Self, ConfigurationError> {
        let server_secret = match std::env::var(SERVER_KEY_ENV) {
            Ok(encoded) => {
                let bytes = decode_key_b64(&encoded).map_err(|e| {
                    ConfigurationError::InvalidSecret {
                        env: SERVER_KEY_ENV,
                        reason: e.to_string(),
                    }
                })?;
                ServerSecret::from_bytes(bytes)
            }
            Err(_) => match mode {
                RunMode::Production => {
                    return Err(ConfigurationError::MissingSecret(SERVER_KEY_ENV));
                }
                RunMode::Development => {
                    let secret = ServerSecret::generate();
                    warn!(
                        "no {SERVER_KEY_ENV} in environment — generated an ephemeral server secret. \
                         Notes encrypted with it are unreadable after restart. \
                         Set {SERVER_KEY_ENV}={} to persist.",
                        secret.to_b64()
                    );
                    secret
                }
            },
        };

        let trash_retention = match std::env::var(TRASH_TTL_DAYS_ENV) {
            Ok(raw) => {
                let days: i64 = raw.parse().map_err(|_| ConfigurationError::InvalidValue {
                    env: TRASH_TTL_DAYS_ENV,
                    reason: format!("{raw:?} is not a whole number of days"),
                })?;
                Duration::days(days)
            }
            Err(_) => Duration::days(DEFAULT_TRASH_TTL_DAYS),
        };

        let sweep_interval = match std::env::var(SWEEP_INTERVAL_SECS_ENV) {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigurationError::InvalidValue {
                    env: SWEEP_INTERVAL_SECS_ENV,
                    reason: format!("{raw:?} is not a whole number of seconds"),
                })?;
                std::time::Duration::from_secs(secs)
            }
            Err(_) => std::time::Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        };

        Ok(Self {
            server_secret,
            trash_retention,
            sweep_interval,
        })
    }
}
