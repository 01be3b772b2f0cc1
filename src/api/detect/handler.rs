// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vehicle detection endpoint handler

use axum::extract::State;
use axum::Json;
use axum_extra::extract::Multipart;
use tracing::{debug, info, warn};

use super::response::DetectionResponse;
use crate::api::errors::ApiError;
use crate::api::server::AppState;
use crate::vision::{decode_image_bytes, VEHICLE_CLASS_IDS};

/// POST /detect - Detect vehicles in an uploaded image
///
/// Accepts a multipart form with a required `image` file field and returns
/// the detected vehicles with type, screen-side position and confidence.
///
/// # Errors
/// - 400 Bad Request: `image` field missing, or the upload is not a
///   decodable image
/// - 413 Payload Too Large: upload exceeds the size limit
/// - 500 Internal Server Error: model inference failed
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    let bytes = read_image_field(multipart).await?;

    let (image, image_info) = decode_image_bytes(&bytes).map_err(|e| {
        warn!("Failed to decode uploaded image: {}", e);
        ApiError::from(e)
    })?;

    debug!(
        "Decoded image: {}x{}, {} bytes",
        image_info.width, image_info.height, image_info.size_bytes
    );

    let detections = state
        .detector
        .detect(&image, VEHICLE_CLASS_IDS, state.confidence_threshold)
        .map_err(|e| {
            warn!("Vehicle detection failed: {}", e);
            ApiError::from(e)
        })?;

    let response = DetectionResponse::from_detections(&detections, image_info.width);

    info!(
        "Detection complete: {} vehicles in {}x{} image",
        response.num_vehicles, image_info.width, image_info.height
    );

    Ok(Json(response))
}

/// Pull the bytes of the `image` field out of a multipart request.
pub(crate) async fn read_image_field(mut multipart: Multipart) -> Result<bytes::Bytes, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidImage(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() == Some("image") {
            return field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidImage(format!("Failed to read image field: {}", e)));
        }
    }

    Err(ApiError::MissingImage)
}
