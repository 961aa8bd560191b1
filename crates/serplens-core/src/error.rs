//! Error taxonomy for a single analysis run

use thiserror::Error;

use crate::fetch::FetchError;

/// Message returned when either request parameter is missing.
pub const MISSING_PARAMETERS: &str = "Parameters 'keyword' and 'url' are required.";

/// Everything that can end an analysis run.
///
/// Per-competitor fetch failures never show up here; the aggregator absorbs them.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The scraping proxy credential is not configured.
    #[error("Server is missing {0} configuration.")]
    Configuration(&'static str),

    /// A required request parameter is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The search result page could not be fetched or no organic links were found on it.
    #[error("Could not fetch organic results from Google: {0}")]
    Retrieval(String),

    /// Not a single competitor page could be analyzed.
    #[error("Could not analyze any competitor pages.")]
    Aggregation,

    /// The subject page could not be fetched or parsed.
    #[error("Failed to analyze your URL: {0}")]
    UserFetch(#[source] FetchError),

    /// An upstream call exceeded its time bound.
    #[error("Upstream request timed out while {0}.")]
    Timeout(&'static str),

    /// Anything else. The detail is for logs only.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AnalysisError {
    pub fn missing_parameters() -> Self {
        Self::Validation(MISSING_PARAMETERS.to_string())
    }

    /// Whether the detail may be shown to the caller as-is.
    pub fn is_public(&self) -> bool {
        !matches!(self, Self::Unexpected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_message() {
        assert_eq!(
            AnalysisError::missing_parameters().to_string(),
            "Parameters 'keyword' and 'url' are required."
        );
    }

    #[test]
    fn configuration_message_names_the_variable() {
        let err = AnalysisError::Configuration("SCRAPER_API_KEY");
        assert_eq!(
            err.to_string(),
            "Server is missing SCRAPER_API_KEY configuration."
        );
    }

    #[test]
    fn user_fetch_wraps_fetch_error() {
        let err = AnalysisError::UserFetch(FetchError::Status(404));
        assert_eq!(
            err.to_string(),
            "Failed to analyze your URL: Upstream returned HTTP status 404"
        );
    }

    #[test]
    fn unexpected_is_not_public() {
        assert!(!AnalysisError::Unexpected("boom".into()).is_public());
        assert!(AnalysisError::Aggregation.is_public());
    }
}
