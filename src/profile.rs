//! Fallback path: fetch the public profile page and scrape it.

use std::time::Duration;

use log::{debug, error, warn};

use crate::client::Fetch;
use crate::config::Endpoints;
use crate::error::LookupError;
use crate::extractor::ProfilePage;
use crate::followers::extract_followers;
use crate::username::extract_username;

const NOT_FOUND_MARKER: &str = "User not found";

/// What the profile page yielded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedProfile {
    pub username: String,
    pub followers: u64,
}

pub struct ProfileScraper {
    endpoints: Endpoints,
    timeout: Duration,
}

impl ProfileScraper {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Self {
        ProfileScraper { endpoints, timeout }
    }

    pub fn scrape(&self, fetch: &dyn Fetch, user_id: u64) -> Result<ScrapedProfile, LookupError> {
        let url = self.endpoints.profile_url(user_id);
        debug!("Scraping URL: {}", url);

        let page = fetch.get(&url, self.timeout).map_err(|e| {
            error!("{} while scraping user {}", e, user_id);
            LookupError::from(e)
        })?;

        if page.body.contains(NOT_FOUND_MARKER) || page.status == 404 {
            return Err(LookupError::NotFound);
        }
        if !page.is_success() {
            error!("HTTP error {} while scraping user {}", page.status, user_id);
            return Err(LookupError::HttpError(page.status));
        }

        let document = ProfilePage::parse(&page.body);
        let username = extract_username(&document);

        match extract_followers(&document) {
            Some(followers) => Ok(ScrapedProfile { username, followers }),
            None => {
                warn!("Could not extract follower count for user {}", user_id);
                Err(LookupError::ExtractionIncomplete { username: Some(username) })
            }
        }
    }
}
