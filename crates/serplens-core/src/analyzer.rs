//! End-to-end comparison of a subject page against its search competitors

use serde::Serialize;
use tracing::{Instrument, info, info_span};

use crate::benchmark::{Benchmark, benchmark_competitors, fetch_report};
use crate::config::{API_KEY_ENV, Settings};
use crate::error::AnalysisError;
use crate::fetch::ProxyClient;
use crate::report::PageReport;
use crate::serp::{GoogleSerp, SearchProvider};
use crate::url_utils::parse_http_url;

/// The subject page's report next to the competitor benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub user_analysis: PageReport,
    pub competitor_benchmarks: Benchmark,
}

/// Drives one analysis: retrieve, aggregate, fetch the subject page, respond.
///
/// Holds only immutable configuration and the shared HTTP client, so a single
/// instance can serve any number of concurrent requests.
#[derive(Debug)]
pub struct Analyzer<S = GoogleSerp> {
    settings: Settings,
    proxy: ProxyClient,
    search: S,
}

impl Analyzer<GoogleSerp> {
    /// Analyzer backed by Google result pages fetched through the scraping proxy.
    pub fn new(settings: Settings) -> Result<Self, AnalysisError> {
        settings.validate()?;
        let proxy = ProxyClient::new(&settings.proxy, &settings.fetch)
            .map_err(|e| AnalysisError::Unexpected(e.to_string()))?;
        let search = GoogleSerp::new(
            proxy.clone(),
            settings.search.clone(),
            settings.fetch.clone(),
        );
        Ok(Self {
            settings,
            proxy,
            search,
        })
    }
}

impl<S: SearchProvider> Analyzer<S> {
    /// Analyzer with a custom search result source.
    pub fn with_search_provider(settings: Settings, search: S) -> Result<Self, AnalysisError> {
        settings.validate()?;
        let proxy = ProxyClient::new(&settings.proxy, &settings.fetch)
            .map_err(|e| AnalysisError::Unexpected(e.to_string()))?;
        Ok(Self {
            settings,
            proxy,
            search,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Compare `user_url` against the top results for `keyword`.
    ///
    /// Competitor failures are tolerated one by one. The subject page is
    /// mandatory: any failure fetching it ends the run.
    pub async fn analyze(
        &self,
        keyword: &str,
        user_url: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let keyword = keyword.trim();
        let user_url = user_url.trim();

        if keyword.is_empty() || user_url.is_empty() {
            return Err(AnalysisError::missing_parameters());
        }
        if parse_http_url(user_url).is_none() {
            return Err(AnalysisError::Validation(
                "Parameter 'url' must be an absolute http(s) URL.".to_string(),
            ));
        }
        if !self.settings.has_api_key() {
            return Err(AnalysisError::Configuration(API_KEY_ENV));
        }

        let span = info_span!("analyze", keyword, user_url);
        self.run(keyword, user_url).instrument(span).await
    }

    async fn run(&self, keyword: &str, user_url: &str) -> Result<AnalysisResult, AnalysisError> {
        let timeout = self.settings.fetch.page_timeout;

        let competitors = self
            .search
            .result_links(keyword, self.settings.search.max_competitors)
            .await?;

        let competitor_benchmarks =
            benchmark_competitors(&self.proxy, &competitors, user_url, timeout).await?;

        info!("analyzing subject page");
        let user_analysis = fetch_report(&self.proxy, user_url, timeout)
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout("fetching your URL")
                } else {
                    AnalysisError::UserFetch(e)
                }
            })?;

        Ok(AnalysisResult {
            user_analysis,
            competitor_benchmarks,
        })
    }
}
