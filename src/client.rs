use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS, USER_AGENT};
use std::time::Duration;
use log::debug;

use crate::error::TransportError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound GET transport shared by the structured lookup and the profile scraper.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, TransportError>;
}

/// Blocking reqwest session with browser-like default headers and a cookie jar.
pub struct RobloxClient {
    client: Client,
}

impl RobloxClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .gzip(true)
            .build()?;

        Ok(RobloxClient { client })
    }
}

impl Fetch for RobloxClient {
    fn get(&self, url: &str, timeout: Duration) -> Result<FetchedPage, TransportError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).timeout(timeout).send()?;

        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(FetchedPage { status, body })
    }
}
