//! Search orchestration: walk the URL templates in order until one of them
//! yields parseable results.

use std::time::Duration;

use scraper::Html;
use serde::Serialize;

use crate::config::Config;
use crate::extract;
use crate::fetch::{self, FetchError, DEFAULT_USER_AGENT};
use crate::types::SearchResponse;

const NO_RESULTS_MESSAGE: &str =
    "No results found; the search engines may be blocking automated requests";

/// Per-searcher configuration, passed explicitly so tests can point the
/// templates at a local mock server.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Tried in order; `{query}` is replaced with the URL-encoded query.
    pub url_templates: Vec<String>,
    /// Fixed pause before each outbound request.
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            url_templates: vec![
                "https://html.duckduckgo.com/html/?q={query}".to_string(),
                "https://duckduckgo.com/html/?q={query}".to_string(),
                "https://www.google.com/search?q={query}&num=20".to_string(),
            ],
            request_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn from_config(config: &Config) -> Self {
        SearchConfig {
            request_delay: config.request_delay(),
            request_timeout: config.request_timeout(),
            ..SearchConfig::default()
        }
    }
}

/// Diagnostic payload for `/api/debug/<query>`; not a stable contract.
#[derive(Serialize, Debug)]
pub struct DebugPreview {
    pub query: String,
    pub url: String,
    pub status: u16,
    pub html_preview: String,
    pub html_length: usize,
}

pub struct Searcher {
    client: reqwest::Client,
    config: SearchConfig,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Result<Self, reqwest::Error> {
        let client = fetch::build_client(&config.user_agent, config.request_timeout)?;
        Ok(Searcher { client, config })
    }

    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        Searcher::new(SearchConfig::default())
    }

    /// Runs the query against each URL template in order and returns the
    /// first non-empty extraction.
    ///
    /// Blocking and empty pages advance the loop; when every template is
    /// exhausted the search still succeeds with an empty result set and an
    /// explanatory message. Only when *every* attempt failed at the
    /// transport level does the error propagate.
    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<SearchResponse, FetchError> {
        let encoded = urlencoding::encode(query);
        let mut attempts = 0usize;
        let mut transport_failures = 0usize;
        let mut last_error: Option<FetchError> = None;

        for template in &self.config.url_templates {
            let url = template.replace("{query}", &encoded);
            attempts += 1;

            tokio::time::sleep(self.config.request_delay).await;

            let body = match fetch::fetch_results_page(&self.client, &url).await {
                Ok(body) => body,
                Err(e) => {
                    log::warn!("Attempt against {} failed: {}", url, e);
                    if matches!(e, FetchError::Http(_)) {
                        transport_failures += 1;
                    }
                    last_error = Some(e);
                    continue;
                }
            };

            let results = {
                let document = Html::parse_document(&body);
                extract::extract_results(&document, max_results, query)
            };

            if !results.is_empty() {
                log::info!("Query {:?}: {} results via {}", query, results.len(), url);
                return Ok(SearchResponse::new(query, results));
            }

            log::debug!("No results parsed from {}, trying next template", url);
        }

        if attempts > 0 && transport_failures == attempts {
            // Nothing reachable at all; surface the failure to the caller.
            return Err(last_error.unwrap_or(FetchError::NoTemplates));
        }

        log::info!("Query {:?}: all templates exhausted without results", query);
        Ok(SearchResponse::empty(query, NO_RESULTS_MESSAGE))
    }

    /// Fetches the first template raw, without block detection, and returns
    /// a truncated preview for diagnosing markup changes.
    pub async fn fetch_debug(&self, query: &str) -> Result<DebugPreview, FetchError> {
        let template = self
            .config
            .url_templates
            .first()
            .ok_or(FetchError::NoTemplates)?;
        let url = template.replace("{query}", &urlencoding::encode(query));

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(DebugPreview {
            query: query.to_string(),
            url,
            status,
            html_preview: body.chars().take(500).collect(),
            html_length: body.len(),
        })
    }
}
