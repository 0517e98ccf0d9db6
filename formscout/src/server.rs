// HTTP routes the dashboard talks to

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use formscout_core::{ExtractionMode, ExtractionResponse, LinksResponse, shape_extraction};
use formscout_scanner::Scanner;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::info;

use crate::autofill::{AutofillProxy, AutofillRequest};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::health::health_handler;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub autofill: Arc<AutofillProxy>,
    pub started: Instant,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            scanner: Arc::new(Scanner::with_config(config.scanner_config())?),
            autofill: Arc::new(AutofillProxy::new(
                config.autofill_backend.clone(),
                config.request_timeout_secs,
            )?),
            started: Instant::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FormValidationRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "type")]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuickLinksRequest {
    #[serde(default)]
    pub url: Option<String>,
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest {
        error: "Invalid request body".to_string(),
        details: rejection.body_text(),
    }
}

/// A present, non-blank string, or the given validation error
fn required(value: Option<String>, message: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::Validation(message))
}

fn parse_mode(raw: Option<&str>) -> Result<ExtractionMode, ApiError> {
    match raw {
        None => Ok(ExtractionMode::default()),
        Some(value) => ExtractionMode::from_str(value).ok_or_else(|| ApiError::BadRequest {
            error: "Unknown extraction type".to_string(),
            details: format!(
                "'{}' is not one of legacy, domains, detailed",
                value
            ),
        }),
    }
}

async fn form_validation(
    State(state): State<AppState>,
    payload: Result<Json<FormValidationRequest>, JsonRejection>,
) -> Result<Json<ExtractionResponse>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let url = required(request.url, "URL is required")?;
    let mode = parse_mode(request.mode.as_deref())?;

    info!("Form extraction requested for {} ({})", url, mode.as_str());
    let extraction = state
        .scanner
        .scan_forms(&url)
        .await
        .map_err(ApiError::FormExtraction)?;

    Ok(Json(shape_extraction(&extraction, mode)))
}

async fn quick_links(
    State(state): State<AppState>,
    payload: Result<Json<QuickLinksRequest>, JsonRejection>,
) -> Result<Json<LinksResponse>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let url = required(request.url, "URL is required")?;

    info!("Quick links requested for {}", url);
    let extraction = state
        .scanner
        .scan_links(&url)
        .await
        .map_err(ApiError::LinkAnalysis)?;

    Ok(Json(LinksResponse::from(extraction)))
}

async fn autofill(
    State(state): State<AppState>,
    payload: Result<Json<AutofillRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let link = required(request.link, "Form link is required")?;

    let body = state
        .autofill
        .forward(&link, request.index)
        .await
        .map_err(|e| ApiError::Autofill(e.to_string()))?;

    Ok(Json(body))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/formValidation", post(form_validation))
        .route("/api/quick-links", post(quick_links))
        .route("/api/autofill", post(autofill))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Serve on an already-bound listener until the process is stopped
pub async fn serve_on(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::new(&config)?;
    info!(
        "Autofill backend: {} (timeout {}s)",
        state.autofill.backend(),
        config.request_timeout_secs
    );
    let listener = TcpListener::bind(config.bind).await?;
    serve_on(listener, state).await
}
