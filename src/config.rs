// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration for both service binaries

use clap::Parser;
use std::path::PathBuf;

use crate::api::ApiConfig;

/// Command-line / environment configuration shared by both services.
#[derive(Parser, Debug, Clone)]
#[command(about = "Vehicle detection HTTP service backed by YOLOv8n")]
pub struct NodeArgs {
    /// Address the HTTP server binds to
    #[arg(long, env = "API_ADDR", default_value = "127.0.0.1:5000")]
    pub listen_addr: String,

    /// Path to the yolov8n.onnx model file
    #[arg(long, env = "MODEL_PATH", default_value = "./models/yolov8n.onnx")]
    pub model_path: PathBuf,

    /// Origin allowed to call this service cross-origin
    #[arg(long, env = "CORS_ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
    pub cors_allowed_origin: String,

    /// Minimum confidence for a detection to be reported
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.3)]
    pub confidence_threshold: f32,
}

impl NodeArgs {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            listen_addr: self.listen_addr.clone(),
            cors_allowed_origins: vec![self.cors_allowed_origin.clone()],
            confidence_threshold: self.confidence_threshold,
        }
    }
}
