use serde::{Deserialize, Serialize};

/// One normalized entry scraped from a search engine results page.
///
/// `position` is 1-based and dense: it counts kept entries in document
/// order, so a filtered-out container never leaves a gap.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
    pub position: u32,
}

/// The envelope returned by `/api/search` and consumed by `/api/export`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub results_count: usize,
    pub results: Vec<SearchResult>,
    /// UTC, formatted as `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    /// Set only when every fetch attempt was exhausted without results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    pub fn new(query: &str, results: Vec<SearchResult>) -> Self {
        SearchResponse {
            query: query.to_string(),
            results_count: results.len(),
            results,
            timestamp: current_timestamp(),
            message: None,
        }
    }

    /// An empty result set with an explanatory message; used when all URL
    /// templates were exhausted (blocking, no parseable results).
    pub fn empty(query: &str, message: &str) -> Self {
        SearchResponse {
            query: query.to_string(),
            results_count: 0,
            results: Vec::new(),
            timestamp: current_timestamp(),
            message: Some(message.to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_count_matches_results() {
        let results = vec![SearchResult {
            title: "Example".to_string(),
            url: "https://example.com".to_string(),
            description: String::new(),
            position: 1,
        }];
        let response = SearchResponse::new("example", results);
        assert_eq!(response.results_count, response.results.len());
        assert!(response.message.is_none());
    }

    #[test]
    fn message_omitted_when_absent() {
        let response = SearchResponse::new("example", Vec::new());
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("message").is_none());

        let empty = SearchResponse::empty("example", "no results");
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["message"], "no results");
    }
}
