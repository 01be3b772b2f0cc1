// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use std::{env, sync::Arc};
use tracing::info;
use vehicle_detect_node::{api, config::NodeArgs, version, vision::YoloDetector};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = NodeArgs::parse();

    info!("Starting {}", version::get_version_string());

    let detector = YoloDetector::new(&args.model_path)?;
    let config = args.api_config();

    info!(
        "Vehicle detection API at http://{} (allowed origin: {})",
        config.listen_addr, args.cors_allowed_origin
    );

    api::start_server(config, Arc::new(detector)).await
}
