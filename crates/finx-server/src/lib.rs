//! HTTP boundary for finx.
//!
//! Endpoints:
//! - `POST /retrieve`: aggregate a settlement report spreadsheet
//! - `POST /upload` and `POST /upload/{profile}`: extract invoice PDFs
//! - `GET /health`: liveness check

mod error;
mod handlers;
mod types;

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use finx_core::{DocumentExtractor, FinxConfig, PdfTextExtractor, TextSource};

pub use error::ApiError;
pub use handlers::*;
pub use types::*;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FinxConfig>,
    extractors: Arc<BTreeMap<String, Arc<DocumentExtractor>>>,
    source: Arc<dyn TextSource>,
}

impl AppState {
    /// Build state with the PDF text backend.
    pub fn new(config: FinxConfig) -> finx_core::Result<Self> {
        Self::with_source(config, Arc::new(PdfTextExtractor::new()))
    }

    /// Build state with a custom text backend; every profile is compiled up front.
    pub fn with_source(config: FinxConfig, source: Arc<dyn TextSource>) -> finx_core::Result<Self> {
        let mut extractors = BTreeMap::new();
        for (name, profile) in &config.extraction.profiles {
            let extractor = DocumentExtractor::new(&config.extraction, profile)?;
            extractors.insert(name.clone(), Arc::new(extractor));
        }

        Ok(Self {
            config: Arc::new(config),
            extractors: Arc::new(extractors),
            source,
        })
    }

    /// Extractor for a named profile, or the default one.
    pub fn extractor(&self, profile: Option<&str>) -> Result<Arc<DocumentExtractor>, ApiError> {
        let name = profile.unwrap_or(&self.config.extraction.default_profile);
        self.extractors
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::UnknownProfile(name.to_string()))
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/retrieve", post(retrieve))
        .route("/upload", post(upload))
        .route("/upload/{profile}", post(upload_profile))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| warn!("Ignoring invalid CORS origin '{}'", origin))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the API server
pub async fn start_server(state: AppState) -> Result<(), std::io::Error> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    tracing::info!("Starting API server on {}", addr);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_compiles_all_profiles() {
        let state = AppState::new(FinxConfig::default()).unwrap();
        assert!(state.extractor(None).is_ok());
        assert!(state.extractor(Some("dh-trading")).is_ok());
        assert!(state.extractor(Some("open")).is_ok());
        assert!(matches!(
            state.extractor(Some("missing")),
            Err(ApiError::UnknownProfile(_))
        ));
    }
}
