//! Entry point for a single follower lookup.

use std::sync::Arc;

use log::{error, info};

use crate::api::{ApiOutcome, StructuredLookup};
use crate::client::Fetch;
use crate::config::Config;
use crate::model::LookupResult;
use crate::profile::ProfileScraper;

/// Runs the structured API lookup and falls back to profile scraping.
///
/// Holds no per-request state; one instance serves every request.
pub struct LookupService {
    fetch: Arc<dyn Fetch>,
    api: StructuredLookup,
    profile: ProfileScraper,
}

impl LookupService {
    pub fn new(fetch: Arc<dyn Fetch>, config: &Config) -> Self {
        LookupService {
            fetch,
            api: StructuredLookup::new(
                config.endpoints.clone(),
                config.request_timeout,
                config.rate_limit_backoff,
            ),
            profile: ProfileScraper::new(config.endpoints.clone(), config.request_timeout),
        }
    }

    /// Always produces a result; failures are reported inside it.
    pub fn lookup(&self, user_id: u64) -> LookupResult {
        let fetch = self.fetch.as_ref();

        match self.api.lookup(fetch, user_id) {
            Ok(ApiOutcome::Complete { username, followers }) => {
                return LookupResult::success(user_id, username, followers);
            }
            Ok(ApiOutcome::Incomplete { .. }) => {
                info!("API lookup incomplete for user {}, falling back to profile page", user_id);
            }
            Err(e) => {
                error!("Lookup failed for user {}: {}", user_id, e);
                return LookupResult::failure(user_id, &e);
            }
        }

        match self.profile.scrape(fetch, user_id) {
            Ok(scraped) => LookupResult::success(user_id, scraped.username, scraped.followers),
            Err(e) => {
                error!("Profile scrape failed for user {}: {}", user_id, e);
                LookupResult::failure(user_id, &e)
            }
        }
    }
}
