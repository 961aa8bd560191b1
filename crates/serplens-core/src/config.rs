//! Runtime settings shared by the CLI and the HTTP server

use std::time::Duration;

use serde::Deserialize;

use crate::error::AnalysisError;

/// Environment variable holding the scraping proxy credential.
pub const API_KEY_ENV: &str = "SCRAPER_API_KEY";

/// Default scraping proxy endpoint (ScraperAPI-compatible: `?api_key=..&url=..`).
pub const DEFAULT_PROXY_ENDPOINT: &str = "https://api.scraperapi.com/";

/// All settings for one `Analyzer`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub proxy: ProxySettings,
    pub search: SearchSettings,
    pub fetch: FetchSettings,
}

/// Scraping proxy settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Proxy endpoint; the target URL and credential are passed as query parameters.
    pub endpoint: String,
    /// Proxy credential. Missing credential is reported per request.
    pub api_key: Option<String>,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PROXY_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

/// Search result page settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Upper bound on the number of organic results analyzed.
    pub max_competitors: usize,
    /// Interface language (`hl`).
    pub language: String,
    /// Result country (`gl`).
    pub country: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_competitors: 10,
            language: "en".to_string(),
            country: "us".to_string(),
        }
    }
}

/// Page fetch settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Timeout for each competitor or subject page fetch.
    #[serde(with = "duration_secs")]
    pub page_timeout: Duration,
    /// Timeout for the search result page fetch.
    #[serde(with = "duration_secs")]
    pub search_timeout: Duration,
    /// Bodies are cut at this many bytes before parsing.
    pub max_content_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(15),
            search_timeout: Duration::from_secs(30),
            max_content_bytes: 500_000,
            user_agent: format!(
                "Mozilla/5.0 (compatible; serplens/{})",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl Settings {
    /// Reject settings no run could succeed with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.search.max_competitors == 0 {
            return Err(AnalysisError::Validation(
                "Setting 'max_competitors' must be at least 1.".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the proxy credential is present and non-blank.
    pub fn has_api_key(&self) -> bool {
        self.proxy
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Flags (with environment fallbacks) that fill a [`Settings`].
#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Args)]
pub struct SettingsArgs {
    /// Scraping proxy API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Scraping proxy endpoint
    #[arg(long, env = "SERPLENS_PROXY_ENDPOINT", default_value = DEFAULT_PROXY_ENDPOINT)]
    pub proxy_endpoint: String,

    /// Maximum number of organic results to analyze
    #[arg(
        long,
        env = "SERPLENS_MAX_COMPETITORS",
        default_value_t = 10,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_competitors: usize,

    /// Search interface language (hl)
    #[arg(long, env = "SERPLENS_LANGUAGE", default_value = "en")]
    pub language: String,

    /// Search result country (gl)
    #[arg(long, env = "SERPLENS_COUNTRY", default_value = "us")]
    pub country: String,

    /// Timeout in seconds for each page fetch
    #[arg(long, env = "SERPLENS_PAGE_TIMEOUT_SECS", default_value_t = 15)]
    pub page_timeout: u64,

    /// Timeout in seconds for the search result fetch
    #[arg(long, env = "SERPLENS_SEARCH_TIMEOUT_SECS", default_value_t = 30)]
    pub search_timeout: u64,

    /// Response bodies are cut at this many bytes
    #[arg(long, env = "SERPLENS_MAX_CONTENT_BYTES", default_value_t = 500_000)]
    pub max_content_bytes: usize,
}

#[cfg(feature = "cli")]
impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            proxy: ProxySettings {
                endpoint: args.proxy_endpoint,
                api_key: args.api_key,
            },
            search: SearchSettings {
                max_competitors: args.max_competitors,
                language: args.language,
                country: args.country,
            },
            fetch: FetchSettings {
                page_timeout: Duration::from_secs(args.page_timeout),
                search_timeout: Duration::from_secs(args.search_timeout),
                max_content_bytes: args.max_content_bytes,
                ..FetchSettings::default()
            },
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
