use chrono::{Local, SecondsFormat};
use serde::Serialize;

use crate::error::LookupError;

/// Outcome of one follower lookup. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    pub success: bool,
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResult {
    pub fn success(user_id: u64, username: String, followers: u64) -> Self {
        LookupResult {
            success: true,
            user_id,
            username: Some(username),
            followers: Some(followers),
            timestamp: Some(Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)),
            error: None,
        }
    }

    /// A failed result. Any username recovered before the failure is kept.
    pub fn failure(user_id: u64, err: &LookupError) -> Self {
        let username = match err {
            LookupError::ExtractionIncomplete { username } => username.clone(),
            _ => None,
        };
        LookupResult {
            success: false,
            user_id,
            username,
            followers: None,
            timestamp: None,
            error: Some(err.to_string()),
        }
    }
}
