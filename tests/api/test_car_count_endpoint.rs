// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for POST /detect on the car-count service variant

use axum::http::StatusCode;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use super::support::{
    car_count_app_with, detection, multipart_request, png_bytes, response_json, FixedDetector,
};

#[tokio::test]
async fn test_counts_only_cars() {
    // Two cars and a truck; the truck must not be counted
    let app = car_count_app_with(FixedDetector::with(vec![
        detection(10.0, 10.0, 90.0, 90.0, 2, 0.9),
        detection(110.0, 10.0, 190.0, 90.0, 2, 0.6),
        detection(210.0, 10.0, 290.0, 90.0, 7, 0.8),
    ]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 100));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body, json!({"car_detected": true, "num_cars": 2}));
}

#[tokio::test]
async fn test_no_cars_detected() {
    let app = car_count_app_with(FixedDetector::empty());

    let request = multipart_request("/detect", "image", &png_bytes(400, 100));
    let response = app.oneshot(request).await.unwrap();

    let body = response_json(response).await;
    assert_eq!(body, json!({"car_detected": false, "num_cars": 0}));
}

#[tokio::test]
async fn test_missing_image_field_shares_contract() {
    let app = car_count_app_with(FixedDetector::empty());

    let request = multipart_request("/detect", "file", &png_bytes(10, 10));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body, json!({"error": "No image file provided"}));
}
