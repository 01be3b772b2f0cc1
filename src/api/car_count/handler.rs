// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Car-count endpoint handler (minimal service variant)

use axum::extract::State;
use axum::Json;
use axum_extra::extract::Multipart;
use tracing::{info, warn};

use super::response::CarCountResponse;
use crate::api::detect::handler::read_image_field;
use crate::api::errors::ApiError;
use crate::api::server::AppState;
use crate::vision::{decode_image_bytes, CAR_CLASS_ID};

/// POST /detect - Count cars in an uploaded image
///
/// Same input contract as the vehicle detection endpoint, restricted to
/// the car class and reporting only a flag and a count.
pub async fn car_count_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CarCountResponse>, ApiError> {
    let bytes = read_image_field(multipart).await?;

    let (image, _image_info) = decode_image_bytes(&bytes).map_err(|e| {
        warn!("Failed to decode uploaded image: {}", e);
        ApiError::from(e)
    })?;

    let detections = state
        .detector
        .detect(&image, &[CAR_CLASS_ID], state.confidence_threshold)
        .map_err(|e| {
            warn!("Car detection failed: {}", e);
            ApiError::from(e)
        })?;

    let response = CarCountResponse::from_count(detections.len());

    info!("Car count complete: {} cars", response.num_cars);

    Ok(Json(response))
}
