//! Runtime settings read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_USERS_API: &str = "https://users.roblox.com/v1";
pub const DEFAULT_FRIENDS_API: &str = "https://friends.roblox.com/v1";
pub const DEFAULT_WEB_BASE: &str = "https://www.roblox.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    BindAddr { var: &'static str, value: String },
    #[error("{var} is not a valid URL: {value} ({source})")]
    Url {
        var: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("{var} must be a whole number of seconds, got {value}")]
    Seconds { var: &'static str, value: String },
}

/// Base URLs of the three external services the lookup talks to.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub users_api: Url,
    pub friends_api: Url,
    pub web_base: Url,
}

impl Endpoints {
    pub fn identity_url(&self, user_id: u64) -> String {
        format!("{}/users/{}", trim(&self.users_api), user_id)
    }

    pub fn follower_count_url(&self, user_id: u64) -> String {
        format!("{}/users/{}/followers/count", trim(&self.friends_api), user_id)
    }

    pub fn profile_url(&self, user_id: u64) -> String {
        format!("{}/users/{}/profile", trim(&self.web_base), user_id)
    }
}

fn trim(url: &Url) -> &str {
    url.as_str().trim_end_matches('/')
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub endpoints: Endpoints,
    pub request_timeout: Duration,
    pub rate_limit_backoff: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let bind_raw = get("FOLLOWERS_BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::BindAddr {
            var: "FOLLOWERS_BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let endpoints = Endpoints {
            users_api: parse_url("ROBLOX_USERS_API", get("ROBLOX_USERS_API", DEFAULT_USERS_API))?,
            friends_api: parse_url(
                "ROBLOX_FRIENDS_API",
                get("ROBLOX_FRIENDS_API", DEFAULT_FRIENDS_API),
            )?,
            web_base: parse_url("ROBLOX_WEB_BASE", get("ROBLOX_WEB_BASE", DEFAULT_WEB_BASE))?,
        };

        let request_timeout = parse_secs(
            "FOLLOWERS_REQUEST_TIMEOUT_SECS",
            get("FOLLOWERS_REQUEST_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string()),
        )?;
        let rate_limit_backoff = parse_secs(
            "FOLLOWERS_RATE_LIMIT_BACKOFF_SECS",
            get(
                "FOLLOWERS_RATE_LIMIT_BACKOFF_SECS",
                &DEFAULT_RATE_LIMIT_BACKOFF_SECS.to_string(),
            ),
        )?;

        Ok(Config {
            bind_addr,
            endpoints,
            request_timeout,
            rate_limit_backoff,
        })
    }
}

fn parse_url(var: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|source| ConfigError::Url { var, value, source })
}

fn parse_secs(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::Seconds { var, value })
}
