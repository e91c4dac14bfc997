//! Structured lookup against the Roblox users and friends JSON APIs.

use std::time::Duration;

use log::{error, warn};
use serde::Deserialize;

use crate::client::{Fetch, FetchedPage};
use crate::config::Endpoints;
use crate::delay_manager;
use crate::error::{LookupError, TransportError};

#[derive(Debug, Deserialize)]
struct UserIdentity {
    name: Option<String>,
    #[serde(rename = "displayName")]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FollowerCount {
    count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOutcome {
    Complete { username: String, followers: u64 },
    /// At least one of the two values is missing; the caller should scrape.
    Incomplete {
        username: Option<String>,
        followers: Option<u64>,
    },
}

pub struct StructuredLookup {
    endpoints: Endpoints,
    timeout: Duration,
    rate_limit_backoff: Duration,
}

impl StructuredLookup {
    pub fn new(endpoints: Endpoints, timeout: Duration, rate_limit_backoff: Duration) -> Self {
        StructuredLookup {
            endpoints,
            timeout,
            rate_limit_backoff,
        }
    }

    /// Query identity and follower count, in that order.
    ///
    /// Only a timeout or connection failure comes back as `Err`; every other
    /// problem leaves the corresponding field empty.
    pub fn lookup(&self, fetch: &dyn Fetch, user_id: u64) -> Result<ApiOutcome, LookupError> {
        let username = self.fetch_username(fetch, user_id)?;
        let followers = self.fetch_follower_count(fetch, user_id)?;

        Ok(match (username, followers) {
            (Some(username), Some(followers)) => ApiOutcome::Complete { username, followers },
            (username, followers) => ApiOutcome::Incomplete { username, followers },
        })
    }

    fn fetch_username(&self, fetch: &dyn Fetch, user_id: u64) -> Result<Option<String>, LookupError> {
        let url = self.endpoints.identity_url(user_id);
        let page = match fetch.get(&url, self.timeout) {
            Ok(page) => page,
            Err(e) => return swallow(user_id, "username", e),
        };

        match page.status {
            200 => match serde_json::from_str::<UserIdentity>(&page.body) {
                Ok(identity) => Ok(pick_name(identity)),
                Err(e) => {
                    warn!("Failed to get username from API for user {}: {}", user_id, e);
                    Ok(None)
                }
            },
            404 => Ok(None),
            status => {
                warn!("API returned status {} for user {}", status, user_id);
                Ok(None)
            }
        }
    }

    fn fetch_follower_count(&self, fetch: &dyn Fetch, user_id: u64) -> Result<Option<u64>, LookupError> {
        let url = self.endpoints.follower_count_url(user_id);
        let page = match fetch.get(&url, self.timeout) {
            Ok(page) => page,
            Err(e) => return swallow(user_id, "followers", e),
        };

        match page.status {
            200 => Ok(parse_count_body(user_id, &page)),
            404 => Ok(None),
            429 => {
                delay_manager::rate_limit_delay(user_id, self.rate_limit_backoff);
                let retry = match fetch.get(&url, self.timeout) {
                    Ok(page) => page,
                    Err(e) => return swallow(user_id, "followers", e),
                };
                if retry.status == 200 {
                    Ok(parse_count_body(user_id, &retry))
                } else {
                    warn!("Still rate limited after retry for user {}", user_id);
                    Ok(None)
                }
            }
            status => {
                warn!("Followers API returned status {} for user {}", status, user_id);
                Ok(None)
            }
        }
    }
}

fn pick_name(identity: UserIdentity) -> Option<String> {
    identity
        .name
        .filter(|n| !n.is_empty())
        .or(identity.display_name)
        .filter(|n| !n.is_empty())
}

fn parse_count_body(user_id: u64, page: &FetchedPage) -> Option<u64> {
    match serde_json::from_str::<FollowerCount>(&page.body) {
        Ok(body) => Some(body.count.unwrap_or(0)),
        Err(e) => {
            warn!("Failed to get followers from API for user {}: {}", user_id, e);
            None
        }
    }
}

fn swallow<T>(user_id: u64, field: &str, err: TransportError) -> Result<Option<T>, LookupError> {
    if let Some(terminal) = LookupError::terminal(&err) {
        error!("{} while getting {} for user {}", err, field, user_id);
        return Err(terminal);
    }
    warn!("Failed to get {} from API for user {}: {}", field, user_id, err);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::ScriptedFetch;
    use crate::config::Config;

    const IDENTITY: &str = "https://users.roblox.com/v1/users/156";
    const COUNT: &str = "https://friends.roblox.com/v1/users/156/followers/count";

    fn lookup() -> StructuredLookup {
        let config = Config::from_lookup(|_| None).unwrap();
        StructuredLookup::new(config.endpoints, Duration::from_secs(10), Duration::ZERO)
    }

    #[test]
    fn test_both_endpoints_ok() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 200, r#"{"name":"builderman","displayName":"Builder"}"#)
            .respond(COUNT, 200, r#"{"count":123456}"#);
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::Complete { username: "builderman".to_string(), followers: 123456 }
        );
    }

    #[test]
    fn test_display_name_and_missing_count() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 200, r#"{"displayName":"Builder"}"#)
            .respond(COUNT, 200, r#"{}"#);
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::Complete { username: "Builder".to_string(), followers: 0 }
        );
    }

    #[test]
    fn test_identity_404_is_incomplete() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 404, "")
            .respond(COUNT, 200, r#"{"count":5}"#);
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(outcome, ApiOutcome::Incomplete { username: None, followers: Some(5) });
    }

    #[test]
    fn test_rate_limited_once_then_ok() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 200, r#"{"name":"a"}"#)
            .respond(COUNT, 429, "")
            .respond(COUNT, 200, r#"{"count":77}"#);
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(outcome, ApiOutcome::Complete { username: "a".to_string(), followers: 77 });
        assert_eq!(fetch.call_count(COUNT), 2);
    }

    #[test]
    fn test_rate_limited_twice_gives_no_count() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 200, r#"{"name":"a"}"#)
            .respond(COUNT, 429, "");
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(
            outcome,
            ApiOutcome::Incomplete { username: Some("a".to_string()), followers: None }
        );
        assert_eq!(fetch.call_count(COUNT), 2);
    }

    #[test]
    fn test_bad_json_and_server_error_are_soft() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 200, "<html>")
            .respond(COUNT, 500, "");
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(outcome, ApiOutcome::Incomplete { username: None, followers: None });
    }

    #[test]
    fn test_timeout_is_terminal() {
        let fetch = ScriptedFetch::new().fail(IDENTITY, TransportError::Timeout);
        assert_eq!(lookup().lookup(&fetch, 156), Err(LookupError::Timeout));
        assert_eq!(fetch.call_count(COUNT), 0);
    }

    #[test]
    fn test_connect_failure_on_count_is_terminal() {
        let fetch = ScriptedFetch::new()
            .respond(IDENTITY, 200, r#"{"name":"a"}"#)
            .fail(COUNT, TransportError::Connect);
        assert_eq!(lookup().lookup(&fetch, 156), Err(LookupError::ConnectionFailure));
    }

    #[test]
    fn test_other_transport_failure_is_soft() {
        let fetch = ScriptedFetch::new()
            .fail(IDENTITY, TransportError::Other("body decode".to_string()))
            .respond(COUNT, 200, r#"{"count":1}"#);
        let outcome = lookup().lookup(&fetch, 156).unwrap();
        assert_eq!(outcome, ApiOutcome::Incomplete { username: None, followers: Some(1) });
    }
}
