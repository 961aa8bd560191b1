//! Competitor benchmark aggregation

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AnalysisError;
use crate::fetch::{FetchError, ProxyClient};
use crate::keywords::KeywordFrequency;
use crate::report::PageReport;
use crate::url_utils::{normalize_page_url, same_page};

/// Number of merged keywords kept in the benchmark.
pub const COMMON_KEYWORDS: usize = 20;

/// Aggregate statistics across the competitor pages that could be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub average_word_count: usize,
    pub common_keywords: KeywordFrequency,
    pub competitor_count: usize,
}

impl Benchmark {
    /// Aggregate a set of competitor reports. An empty set yields all zeros.
    pub fn from_reports(reports: &[PageReport]) -> Self {
        let total_words: usize = reports.iter().map(|r| r.word_count).sum();
        let average_word_count = total_words.checked_div(reports.len()).unwrap_or(0);

        let common_keywords =
            KeywordFrequency::merge(reports.iter().map(|r| &r.top_keywords)).top(COMMON_KEYWORDS);

        Self {
            average_word_count,
            common_keywords,
            competitor_count: reports.len(),
        }
    }
}

/// Competitor URLs worth fetching: deduplicated, user's own page removed, order kept.
pub fn competitor_targets<'a>(urls: &'a [String], user_url: &str) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    urls.iter()
        .map(String::as_str)
        .filter(|url| !same_page(url, user_url))
        .filter(|url| seen.insert(normalize_page_url(url)))
        .collect()
}

/// Fetch and report on one page.
pub async fn fetch_report(
    proxy: &ProxyClient,
    url: &str,
    timeout: Duration,
) -> Result<PageReport, FetchError> {
    let page = proxy.fetch(url, timeout).await?;
    if page.truncated {
        debug!(url, "body cut at size ceiling before parsing");
    }
    Ok(PageReport::from_html(url, &page.body, page.status))
}

/// Fetch every competitor in turn and aggregate whatever succeeded.
///
/// A competitor that fails is skipped. Only a batch where nothing succeeded is an error.
pub async fn benchmark_competitors(
    proxy: &ProxyClient,
    urls: &[String],
    user_url: &str,
    timeout: Duration,
) -> Result<Benchmark, AnalysisError> {
    let targets = competitor_targets(urls, user_url);
    let mut reports = Vec::with_capacity(targets.len());

    for url in &targets {
        info!(competitor = url, "analyzing competitor");
        match fetch_report(proxy, url, timeout).await {
            Ok(report) => reports.push(report),
            Err(e) => warn!(competitor = url, error = %e, "skipping competitor"),
        }
    }

    if reports.is_empty() {
        return Err(AnalysisError::Aggregation);
    }

    info!(
        requested = targets.len(),
        analyzed = reports.len(),
        "competitor benchmark complete"
    );
    Ok(Benchmark::from_reports(&reports))
}
