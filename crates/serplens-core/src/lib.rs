//! # serplens-core
//!
//! Core library for benchmarking a page's on-page SEO signals against the pages
//! that outrank it.
//!
//! This library provides:
//! - Text normalization and keyword frequency extraction
//! - Single-page reports (title, meta description, word count, top keywords)
//! - Organic result retrieval from Google result pages via a scraping proxy
//! - Competitor aggregation and the end-to-end comparison pipeline
//!
//! ## Example
//!
//! ```no_run
//! use serplens_core::{Analyzer, Settings};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut settings = Settings::default();
//! settings.proxy.api_key = Some("my-scraper-key".to_string());
//!
//! let analyzer = Analyzer::new(settings)?;
//! let result = analyzer
//!     .analyze("best running shoes", "https://example.com/shoes")
//!     .await?;
//!
//! println!(
//!     "{} words vs. competitor average of {}",
//!     result.user_analysis.word_count, result.competitor_benchmarks.average_word_count
//! );
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod fetch;
pub mod keywords;
pub mod report;
pub mod serp;
pub mod url_utils;

// Re-export commonly used types
pub use analyzer::{AnalysisResult, Analyzer};
pub use benchmark::Benchmark;
pub use config::Settings;
pub use error::AnalysisError;
pub use keywords::{KeywordFrequency, extract_keywords, normalize_text};
pub use report::PageReport;
pub use serp::{GoogleSerp, SearchProvider};
