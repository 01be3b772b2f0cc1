// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared endpoint handlers

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::server::AppState;

/// GET /health response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub model: String,
}

/// GET /health - Static liveness payload naming the loaded model
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Backend is running!".to_string(),
        message: "Vehicle detection API is ready".to_string(),
        model: state.detector.name().to_string(),
    })
}
