//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Which feed adapter backs the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedBackend {
    /// Process-local store, optionally seeded from a JSON file.
    Memory,
    /// Firebase Realtime Database over REST.
    Firebase,
}

impl FromStr for FeedBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firebase" => Ok(Self::Firebase),
            other => Err(format!("unknown feed backend: {other}")),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`SwipeConfig::from_env`].
#[derive(Debug, Clone)]
pub struct SwipeConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// User whose session is served.
    pub user_id: String,

    /// Feed adapter selection.
    pub feed_backend: FeedBackend,

    /// Seed document for the memory backend.
    pub feed_seed_file: Option<PathBuf>,

    /// Database URL for the Firebase backend.
    pub firebase_database_url: Option<String>,

    /// Optional Firebase auth token (ID token or database secret).
    pub firebase_auth_token: Option<String>,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Snapshot buffer of each feed subscription.
    pub feed_channel_capacity: usize,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is not a socket address.
    #[error("invalid LISTEN_ADDR: {0}")]
    ListenAddr(#[from] std::net::AddrParseError),

    /// `FEED_BACKEND` names an unknown backend.
    #[error("invalid FEED_BACKEND: {0}")]
    Backend(String),

    /// The Firebase backend was selected without a database URL.
    #[error("FIREBASE_DATABASE_URL is required for the firebase backend")]
    MissingDatabaseUrl,
}

impl SwipeConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `LISTEN_ADDR` or `FEED_BACKEND` cannot
    /// be parsed, or if the Firebase backend lacks a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let user_id = std::env::var("SWIPE_USER_ID").unwrap_or_else(|_| "user_123".to_string());

        let feed_backend = std::env::var("FEED_BACKEND")
            .unwrap_or_else(|_| "memory".to_string())
            .parse()
            .map_err(ConfigError::Backend)?;

        let config = Self {
            listen_addr,
            user_id,
            feed_backend,
            feed_seed_file: parse_env_opt("FEED_SEED_FILE").map(PathBuf::from),
            firebase_database_url: parse_env_opt("FIREBASE_DATABASE_URL"),
            firebase_auth_token: parse_env_opt("FIREBASE_AUTH_TOKEN"),
            event_bus_capacity: parse_env("EVENT_BUS_CAPACITY", 1024),
            feed_channel_capacity: parse_env("FEED_CHANNEL_CAPACITY", 16),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_backend == FeedBackend::Firebase && self.firebase_database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Reads an environment variable, treating blank values as unset.
fn parse_env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: FeedBackend, url: Option<&str>) -> SwipeConfig {
        SwipeConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            user_id: "user_123".to_string(),
            feed_backend: backend,
            feed_seed_file: None,
            firebase_database_url: url.map(str::to_string),
            firebase_auth_token: None,
            event_bus_capacity: 16,
            feed_channel_capacity: 4,
        }
    }

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("Firebase".parse::<FeedBackend>(), Ok(FeedBackend::Firebase));
        assert_eq!(" memory ".parse::<FeedBackend>(), Ok(FeedBackend::Memory));
        assert!("postgres".parse::<FeedBackend>().is_err());
    }

    #[test]
    fn firebase_requires_database_url() {
        assert!(matches!(
            config(FeedBackend::Firebase, None).validate(),
            Err(ConfigError::MissingDatabaseUrl)
        ));
        assert!(config(FeedBackend::Firebase, Some("https://db.example.app")).validate().is_ok());
        assert!(config(FeedBackend::Memory, None).validate().is_ok());
    }
}
