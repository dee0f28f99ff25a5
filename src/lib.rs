//! Web search scraping API.
//!
//! Accepts a search query, forwards it to a public search engine
//! (DuckDuckGo first, Google as a last resort), scrapes the returned HTML
//! results page, and yields normalized structured results. Served over
//! HTTP by [`server`] or invoked directly through [`Searcher`].

pub mod config;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod logger;
pub mod search;
pub mod server;
pub mod types;

pub use fetch::FetchError;
pub use search::{SearchConfig, Searcher};
pub use types::{ErrorResponse, SearchResponse, SearchResult};
