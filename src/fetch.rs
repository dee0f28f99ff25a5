//! Outbound HTTP to the search engines.
//!
//! One GET per attempt, browser-like headers, bounded by the client
//! timeout. Bot blocking is detected by substring match against the body;
//! a match is reported as `FetchError::Blocked` so the caller can move on
//! to the next URL template.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

/// Body substrings that indicate the engine served a bot wall instead of
/// results. Deliberately naive: a results page *about* captchas will
/// false-positive, which degrades to the next template or an empty result
/// set rather than an error.
const BLOCK_MARKERS: &[&str] = &["captcha", "unusual traffic"];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search engine returned status {0}")]
    BadStatus(u16),

    #[error("blocked by search engine bot detection")]
    Blocked,

    #[error("no search URL templates configured")]
    NoTemplates,
}

/// Builds the shared HTTP client with a browser-like user agent.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(user_agent).timeout(timeout).build()
}

/// Fetches one results page. Non-success status and detected bot walls
/// both count as failed attempts.
pub async fn fetch_results_page(client: &Client, url: &str) -> Result<String, FetchError> {
    log::debug!("Fetching results page: {}", url);

    let response = client
        .get(url)
        .header("Accept", "text/html,application/xhtml+xml")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::BadStatus(status.as_u16()));
    }

    let body = response.text().await?;
    if is_blocked(&body) {
        return Err(FetchError::Blocked);
    }

    Ok(body)
}

fn is_blocked(body: &str) -> bool {
    let lower = body.to_lowercase();
    BLOCK_MARKERS.iter().any(|marker| lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_block_markers_case_insensitively() {
        assert!(is_blocked("<html>Please solve this CAPTCHA to continue</html>"));
        assert!(is_blocked("We detected Unusual Traffic from your network"));
        assert!(!is_blocked("<html><div class=\"result\">hello</div></html>"));
    }

    #[tokio::test]
    async fn bad_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .with_status(429)
            .create_async()
            .await;

        let client = build_client(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let err = fetch_results_page(&client, &format!("{}/search", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::BadStatus(429)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn blocked_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .with_body("<html>please complete the captcha challenge</html>")
            .create_async()
            .await;

        let client = build_client(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap();
        let err = fetch_results_page(&client, &format!("{}/search", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Blocked));
    }
}
