//! Selector-based extraction of search results from a SERP document.
//!
//! An ordered list of selector sets is tried against the page; the first
//! set that produces any kept entries wins. When every set comes up empty
//! a generic anchor scan takes over, so a markup change on the engine side
//! degrades results instead of emptying them.

use scraper::{ElementRef, Html, Selector};

use crate::types::SearchResult;

/// Titles this short are navigation chrome, not results.
const MIN_TITLE_CHARS: usize = 4;

/// Anchor text bounds for the generic fallback scan.
const FALLBACK_TEXT_MIN: usize = 15;
const FALLBACK_TEXT_MAX: usize = 150;
const FALLBACK_DESCRIPTION_LIMIT: usize = 200;

/// Links back into the engines themselves are never results.
const ENGINE_DOMAINS: &[&str] = &["duckduckgo.com", "google.com"];

/// One candidate markup shape: a container selector plus selectors applied
/// relative to each container.
struct SelectorSet {
    container: Selector,
    title: Selector,
    link: Selector,
    description: Selector,
}

fn candidate_sets() -> Vec<SelectorSet> {
    // Ordered by how likely the markup is to appear; first hit wins.
    [
        // DuckDuckGo html.duckduckgo.com
        (".result", "a.result__a", "a.result__a", ".result__snippet"),
        // DuckDuckGo alternate markup
        (
            ".results_links",
            "a.result__a",
            "a.result__a",
            ".result__snippet",
        ),
        // Google
        (
            "div.g",
            "h3",
            "a[href]",
            "div[data-sncf], div[style*=\"-webkit-line-clamp\"]",
        ),
    ]
    .into_iter()
    .map(|(container, title, link, description)| SelectorSet {
        container: Selector::parse(container).unwrap(),
        title: Selector::parse(title).unwrap(),
        link: Selector::parse(link).unwrap(),
        description: Selector::parse(description).unwrap(),
    })
    .collect()
}

/// Extracts up to `max_results` entries from a parsed results page.
///
/// The query is only consulted by the fallback anchor scan, as a relevance
/// hint; selector-set extraction ignores it.
pub fn extract_results(document: &Html, max_results: usize, query: &str) -> Vec<SearchResult> {
    for set in candidate_sets() {
        let results = extract_with_set(document, &set, max_results);
        if !results.is_empty() {
            return results;
        }
    }

    log::debug!("No selector set matched, falling back to anchor scan");
    fallback_anchor_scan(document, max_results, query)
}

fn extract_with_set(document: &Html, set: &SelectorSet, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    for container in document.select(&set.container) {
        if results.len() >= max_results {
            break;
        }

        // A container without a link element is skipped entirely; it does
        // not consume a position.
        let Some(link_element) = container.select(&set.link).next() else {
            continue;
        };
        let Some(href) = link_element.value().attr("href") else {
            continue;
        };
        let Some(url) = normalize_href(href) else {
            continue;
        };

        let title = container
            .select(&set.title)
            .next()
            .map(element_text)
            .unwrap_or_else(|| element_text(link_element));

        let description = container
            .select(&set.description)
            .next()
            .map(element_text)
            .unwrap_or_default();

        if !keep_entry(&title, &url) {
            continue;
        }

        results.push(SearchResult {
            title,
            url,
            description,
            position: results.len() as u32 + 1,
        });
    }

    results
}

/// Last-resort pass: scan every anchor on the page and keep the ones that
/// look like external results.
fn fallback_anchor_scan(document: &Html, max_results: usize, query: &str) -> Vec<SearchResult> {
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let terms: Vec<String> = query
        .split_whitespace()
        .filter(|word| word.chars().count() > 3)
        .map(str::to_lowercase)
        .collect();

    let mut candidates: Vec<SearchResult> = Vec::new();
    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = normalize_href(href) else {
            continue;
        };
        if is_engine_host(&url) {
            continue;
        }

        let title = element_text(element);
        let length = title.chars().count();
        if !(FALLBACK_TEXT_MIN..=FALLBACK_TEXT_MAX).contains(&length) {
            continue;
        }

        // Describe the anchor by its surroundings: parent text minus the
        // anchor's own text.
        let description = element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| element_text(parent).replace(&title, ""))
            .map(|text| truncate_chars(text.trim(), FALLBACK_DESCRIPTION_LIMIT))
            .unwrap_or_default();

        candidates.push(SearchResult {
            title,
            url,
            description,
            position: 0, // assigned after filtering
        });
    }

    // Prefer anchors that mention a query term, but only when at least one
    // does; otherwise keep everything the scan found.
    if !terms.is_empty() {
        let matches_query = |result: &SearchResult| {
            let title = result.title.to_lowercase();
            let url = result.url.to_lowercase();
            terms.iter().any(|t| title.contains(t) || url.contains(t))
        };
        if candidates.iter().any(matches_query) {
            candidates.retain(matches_query);
        }
    }

    candidates.truncate(max_results);
    for (index, result) in candidates.iter_mut().enumerate() {
        result.position = index as u32 + 1;
    }
    candidates
}

/// Resolves a raw href to an absolute external URL, unwrapping the engines'
/// redirect links. Returns None for anything that is not http(s).
fn normalize_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // Google wraps results as /url?q=<actual_url>&sa=...
    if let Some(rest) = href.strip_prefix("/url?q=") {
        let end = rest.find('&').unwrap_or(rest.len());
        let decoded = urlencoding::decode(&rest[..end]).ok()?.into_owned();
        return is_http(&decoded).then_some(decoded);
    }

    // Protocol-relative and root-relative hrefs come from DuckDuckGo.
    let candidate = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{href}")
    } else {
        href.to_string()
    };

    // DuckDuckGo redirect links carry the destination in the uddg param.
    if candidate.contains("duckduckgo.com/l/") {
        if let Some(index) = candidate.find("uddg=") {
            let after = &candidate[index + "uddg=".len()..];
            let end = after.find('&').unwrap_or(after.len());
            let decoded = urlencoding::decode(&after[..end]).ok()?.into_owned();
            return is_http(&decoded).then_some(decoded);
        }
    }

    is_http(&candidate).then_some(candidate)
}

fn keep_entry(title: &str, url: &str) -> bool {
    !title.is_empty()
        && !url.is_empty()
        && is_http(url)
        && title.chars().count() >= MIN_TITLE_CHARS
        && !is_engine_host(url)
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn host_of(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    Some(host.split(':').next().unwrap_or(host))
}

fn is_engine_host(url: &str) -> bool {
    let Some(host) = host_of(url) else {
        return false;
    };
    ENGINE_DOMAINS
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

fn element_text(element: ElementRef) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&joined)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
