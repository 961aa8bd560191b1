//! Search result retrieval
//!
//! The only contract the rest of the pipeline relies on is [`SearchProvider`]:
//! "give me the organic result links for this query". [`GoogleSerp`] satisfies
//! it by fetching Google's result page through the scraping proxy and guessing
//! at its current markup, which has no stable schema. An official search API can
//! replace it without touching aggregation.

use std::collections::HashSet;
use std::future::Future;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::{FetchSettings, SearchSettings};
use crate::error::AnalysisError;
use crate::fetch::{FetchError, ProxyClient};
use crate::url_utils::{is_google_host, parse_http_url};

/// Markup patterns Google has used for organic result links, most specific first.
const ORGANIC_RESULT_SELECTORS: &str = concat!(
    "div.yuRUbf a[href], ",
    "div.tF2Cxc a[href], ",
    "div.MjjYud div.g a[href], ",
    "div.g a[href], ",
    "a[jsname=\"UWckNb\"][href]"
);

static GOOGLE_SEARCH: Lazy<Url> =
    Lazy::new(|| Url::parse("https://www.google.com/search").expect("invalid search URL"));
static ORGANIC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(ORGANIC_RESULT_SELECTORS).expect("invalid organic result selector")
});

/// Anything that can list organic result links for a query.
pub trait SearchProvider {
    /// Organic result links in rank order, deduplicated, at most `limit` of them.
    fn result_links(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>, AnalysisError>> + Send;
}

/// Google result page scraped through the proxy.
#[derive(Debug, Clone)]
pub struct GoogleSerp {
    proxy: ProxyClient,
    search: SearchSettings,
    fetch: FetchSettings,
}

impl GoogleSerp {
    pub fn new(proxy: ProxyClient, search: SearchSettings, fetch: FetchSettings) -> Self {
        Self {
            proxy,
            search,
            fetch,
        }
    }

    /// Google search URL for `query`.
    pub fn search_url(&self, query: &str, limit: usize) -> Url {
        // A few extra results leave room for the subject URL and duplicates.
        let num = limit.saturating_add(2).to_string();
        let mut url = GOOGLE_SEARCH.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("num", &num)
            .append_pair("hl", &self.search.language)
            .append_pair("gl", &self.search.country);
        url
    }
}

impl SearchProvider for GoogleSerp {
    async fn result_links(&self, query: &str, limit: usize) -> Result<Vec<String>, AnalysisError> {
        let search_url = self.search_url(query, limit);
        info!(query, "fetching search results");

        let page = self
            .proxy
            .fetch(search_url.as_str(), self.fetch.search_timeout)
            .await
            .map_err(|e| match e {
                FetchError::Timeout(_) => AnalysisError::Timeout("fetching search results"),
                other => AnalysisError::Retrieval(other.to_string()),
            })?;

        let links = parse_organic_links(&page.body, limit);
        if links.is_empty() {
            return Err(AnalysisError::Retrieval(
                "no organic result links found on the search result page".to_string(),
            ));
        }

        info!(query, results = links.len(), "parsed organic results");
        Ok(links)
    }
}

/// Extract organic result targets from a Google result page.
///
/// Document order, first occurrence wins, at most `limit` links.
pub fn parse_organic_links(html: &str, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&ORGANIC_SELECTOR) {
        if links.len() >= limit {
            break;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(target) = resolve_result_href(href) else {
            debug!(href, "skipping non-organic link");
            continue;
        };
        if seen.insert(target.clone()) {
            links.push(target);
        }
    }

    links
}

/// Turn a result anchor's `href` into an absolute, non-Google target.
fn resolve_result_href(href: &str) -> Option<String> {
    let href = href.trim();

    // Google's redirect wrapper: /url?q=<target>&sa=...
    let candidate = if href.starts_with("/url?") {
        let wrapped = GOOGLE_SEARCH.join(href).ok()?;
        wrapped
            .query_pairs()
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, value)| value.into_owned())?
    } else {
        href.to_string()
    };

    let parsed = parse_http_url(&candidate)?;
    if is_google_host(&parsed) {
        return None;
    }
    Some(candidate)
}
