//! HTTP API for serplens
//!
//! Axum server exposing the comparison pipeline as `GET /analyze-serp`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serplens_core::{AnalysisError, AnalysisResult, Analyzer, GoogleSerp, SearchProvider};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info, info_span, warn};
use url::form_urlencoded;
use uuid::Uuid;

/// Message shown to callers for errors whose detail stays in the logs.
pub const UNEXPECTED_ERROR: &str = "An unexpected server error occurred.";

const BANNER: &str = "SERP SEO Analyzer API is running!";

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub listen_addr: String,
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            cors_enabled: true,
        }
    }
}

/// Shared application state
pub struct AppState<S = GoogleSerp> {
    pub analyzer: Arc<Analyzer<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            analyzer: self.analyzer.clone(),
        }
    }
}

/// Query parameters of `/analyze-serp`. Both are optional so a missing one
/// reaches validation instead of being rejected by the extractor.
#[derive(Debug, PartialEq, Eq)]
pub struct AnalyzeParams {
    pub keyword: Option<String>,
    pub url: Option<String>,
}

impl AnalyzeParams {
    /// Read the parameters from a raw query string. A repeated key keeps its first value.
    pub fn from_query(query: &str) -> Self {
        let mut keyword = None;
        let mut url = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "keyword" => &mut keyword,
                "url" => &mut url,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Self { keyword, url }
    }
}

/// Response envelope for every JSON endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// HTTP status for each kind of analysis failure.
pub fn status_for(err: &AnalysisError) -> StatusCode {
    match err {
        AnalysisError::Validation(_) => StatusCode::BAD_REQUEST,
        AnalysisError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        AnalysisError::Configuration(_)
        | AnalysisError::Retrieval(_)
        | AnalysisError::Aggregation
        | AnalysisError::UserFetch(_)
        | AnalysisError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Translate an analysis failure into the JSON envelope.
pub fn error_response(err: AnalysisError) -> Response {
    let status = status_for(&err);

    let message = if err.is_public() {
        if status.is_server_error() {
            warn!(error = %err, status = status.as_u16(), "analysis failed");
        }
        err.to_string()
    } else {
        error!(error = ?err, "unexpected error in /analyze-serp");
        UNEXPECTED_ERROR.to_string()
    };

    (status, Json(ApiResponse::<()>::failure(message))).into_response()
}

/// Liveness banner
pub async fn home() -> &'static str {
    BANNER
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Compare `url` against the top results for `keyword`.
pub async fn analyze_serp<S>(
    State(state): State<AppState<S>>,
    RawQuery(query): RawQuery,
) -> Response
where
    S: SearchProvider + Send + Sync + 'static,
{
    let params = AnalyzeParams::from_query(query.as_deref().unwrap_or_default());
    let request_id = Uuid::new_v4();
    let keyword = params.keyword.unwrap_or_default();
    let url = params.url.unwrap_or_default();
    let span = info_span!("analyze_serp", %request_id);

    // A panic inside the analysis comes back as a JoinError.
    let analyzer = state.analyzer.clone();
    let outcome = tokio::spawn(
        async move { analyzer.analyze(&keyword, &url).await }.instrument(span.clone()),
    )
    .await;

    span.in_scope(|| match outcome {
        Ok(Ok(result)) => {
            info!(
                competitors = result.competitor_benchmarks.competitor_count,
                "analysis complete"
            );
            (StatusCode::OK, Json(ApiResponse::<AnalysisResult>::success(result))).into_response()
        }
        Ok(Err(err)) => error_response(err),
        Err(join_error) => error_response(AnalysisError::Unexpected(join_error.to_string())),
    })
}

/// Create the API router with all routes
pub fn create_router<S>(state: AppState<S>, config: &HttpConfig) -> Router
where
    S: SearchProvider + Send + Sync + 'static,
{
    let mut app = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/analyze-serp", get(analyze_serp::<S>))
        .with_state(state);

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

/// HTTP API server
pub struct HttpServer<S = GoogleSerp> {
    config: HttpConfig,
    analyzer: Arc<Analyzer<S>>,
}

impl<S> HttpServer<S>
where
    S: SearchProvider + Send + Sync + 'static,
{
    pub fn new(config: HttpConfig, analyzer: Arc<Analyzer<S>>) -> Self {
        Self { config, analyzer }
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = self
            .config
            .listen_addr
            .parse()
            .context("Invalid HTTP listen address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let state = AppState {
            analyzer: self.analyzer.clone(),
        };
        let app = create_router(state, &self.config);

        info!(
            "HTTP API server listening on http://{}",
            listener.local_addr().context("listener has no local address")?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
