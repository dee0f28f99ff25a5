//! HTTP surface: axum router and request handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config;
use crate::export::{self, ExportFormat};
use crate::search::{DebugPreview, SearchConfig, Searcher};
use crate::types::{ErrorResponse, SearchResponse};

pub struct AppState {
    pub searcher: Searcher,
    pub max_results: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

fn internal_error(message: String) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchRequest {
    /// Missing and empty queries are treated the same.
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ExportRequest {
    pub results: SearchResponse,
}

#[derive(Serialize, Deserialize, Debug)]
struct HealthCheckResponse {
    status: String,
    service: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/search", post(search_handler))
        .route("/api/search", post(search_handler))
        .route("/api/export/:format", post(export_handler))
        .route("/api/health", get(health_handler))
        .route("/api/debug/:query", get(debug_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "OK".to_string(),
        service: "websearch-api".to_string(),
    })
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = payload.query.trim();
    if query.is_empty() {
        return Err(bad_request("Query is empty"));
    }

    match state.searcher.search(query, state.max_results).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            log::error!("Search for {:?} failed: {}", query, e);
            Err(internal_error(e.to_string()))
        }
    }
}

async fn export_handler(
    Path(format): Path<String>,
    Json(payload): Json<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(format) = ExportFormat::parse(&format) else {
        return Err(bad_request("Unsupported export format"));
    };

    let file = export::export_results(&payload.results, format).map_err(|e| {
        log::error!("Export failed: {}", e);
        internal_error(e.to_string())
    })?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.body))
}

async fn debug_handler(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<DebugPreview>, ApiError> {
    match state.searcher.fetch_debug(&query).await {
        Ok(preview) => Ok(Json(preview)),
        Err(e) => Err(internal_error(e.to_string())),
    }
}

/// Builds the app state from the process configuration and runs the server.
pub async fn serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = config::get_config();
    let searcher = Searcher::new(SearchConfig::from_config(config))?;
    let state = Arc::new(AppState {
        searcher,
        max_results: config.max_results(),
    });

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("Search API listening on http://{}", addr);
    println!("Search API listening on http://{}", addr);
    println!("Press Ctrl+C to stop the server");

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
