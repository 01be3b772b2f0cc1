// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::car_count::car_count_handler;
use super::detect::detect_handler;
use super::handlers::health_handler;
use crate::vision::Detector;

/// Deployment-time configuration for either service variant.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
    pub cors_allowed_origins: Vec<String>,
    pub confidence_threshold: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:5000".to_string(),
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            confidence_threshold: 0.3,
        }
    }
}

/// Shared per-request state. The detector is loaded once at startup and
/// injected here rather than living in a module-level global.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn Detector>,
    pub confidence_threshold: f32,
}

impl AppState {
    pub fn new(detector: Arc<dyn Detector>, confidence_threshold: f32) -> Self {
        Self {
            detector,
            confidence_threshold,
        }
    }
}

/// Router for the primary vehicle detection service.
pub fn create_app(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/detect", post(detect_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the minimal car-count service.
pub fn create_car_count_app(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/detect", post(car_count_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparseable CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Start the primary vehicle detection service.
pub async fn start_server(config: ApiConfig, detector: Arc<dyn Detector>) -> Result<()> {
    let state = AppState::new(detector, config.confidence_threshold);
    let app = create_app(state, &config);
    serve(app, &config.listen_addr).await
}

/// Start the minimal car-count service.
pub async fn start_car_count_server(config: ApiConfig, detector: Arc<dyn Detector>) -> Result<()> {
    let state = AppState::new(detector, config.confidence_threshold);
    let app = create_car_count_app(state, &config);
    serve(app, &config.listen_addr).await
}

async fn serve(app: Router, listen_addr: &str) -> Result<()> {
    let addr = listen_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
