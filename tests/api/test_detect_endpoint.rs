// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for POST /detect on the vehicle detection service
//!
//! These tests drive the real router with a stub detector injected into
//! AppState, so the multipart contract, the error taxonomy and the
//! post-processing are exercised end to end without a model file.

use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use super::support::{
    app_with, detection, empty_multipart_request, multipart_request, png_bytes, response_json,
    FailingDetector, FixedDetector,
};

#[tokio::test]
async fn test_missing_image_field_returns_400() {
    let app = app_with(FixedDetector::empty());

    // A multipart body whose only field is not named "image"
    let request = multipart_request("/detect", "file", &png_bytes(10, 10));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body, json!({"error": "No image file provided"}));
}

#[tokio::test]
async fn test_empty_multipart_returns_400() {
    let app = app_with(FixedDetector::empty());

    let response = app.oneshot(empty_multipart_request("/detect")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body, json!({"error": "No image file provided"}));
}

#[tokio::test]
async fn test_single_car_left_of_center() {
    // 400-wide image; box (50,50,150,150) has center x 100 < 200
    let app = app_with(FixedDetector::with(vec![detection(
        50.0, 50.0, 150.0, 150.0, 2, 0.85,
    )]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 300));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body,
        json!({
            "vehicles_detected": true,
            "num_vehicles": 1,
            "vehicles": [{"type": "car", "position": "left", "confidence": 0.85}]
        })
    );
}

#[tokio::test]
async fn test_detection_at_exact_center_is_right() {
    // Box centered exactly on x = 200 for a 400-wide image
    let app = app_with(FixedDetector::with(vec![detection(
        150.0, 50.0, 250.0, 150.0, 7, 0.6,
    )]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 300));
    let response = app.oneshot(request).await.unwrap();

    let body = response_json(response).await;
    assert_eq!(body["vehicles"][0]["position"], "right");
    assert_eq!(body["vehicles"][0]["type"], "truck");
}

#[tokio::test]
async fn test_no_detections() {
    let app = app_with(FixedDetector::empty());

    let request = multipart_request("/detect", "image", &png_bytes(640, 480));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body,
        json!({"vehicles_detected": false, "num_vehicles": 0, "vehicles": []})
    );
}

#[tokio::test]
async fn test_low_confidence_detection_is_dropped() {
    // 0.2 is below the 0.3 threshold the state carries
    let app = app_with(FixedDetector::with(vec![detection(
        50.0, 50.0, 150.0, 150.0, 2, 0.2,
    )]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 300));
    let response = app.oneshot(request).await.unwrap();

    let body = response_json(response).await;
    assert_eq!(body["num_vehicles"], 0);
    assert_eq!(body["vehicles_detected"], false);
}

#[tokio::test]
async fn test_non_vehicle_class_is_dropped() {
    // COCO class 0 ("person") is outside the vehicle allow-list
    let app = app_with(FixedDetector::with(vec![
        detection(50.0, 50.0, 150.0, 150.0, 0, 0.9),
        detection(250.0, 50.0, 350.0, 150.0, 5, 0.7),
    ]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 300));
    let response = app.oneshot(request).await.unwrap();

    let body = response_json(response).await;
    assert_eq!(body["num_vehicles"], 1);
    assert_eq!(body["vehicles"][0]["type"], "bus");
    assert_eq!(body["vehicles"][0]["position"], "right");
}

#[tokio::test]
async fn test_count_matches_vehicle_list() {
    let app = app_with(FixedDetector::with(vec![
        detection(10.0, 10.0, 90.0, 90.0, 2, 0.9),
        detection(210.0, 10.0, 290.0, 90.0, 3, 0.5),
        detection(310.0, 10.0, 390.0, 90.0, 7, 0.31),
    ]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 100));
    let response = app.oneshot(request).await.unwrap();

    let body = response_json(response).await;
    let vehicles = body["vehicles"].as_array().unwrap();
    assert_eq!(body["num_vehicles"], vehicles.len());
    assert_eq!(body["vehicles_detected"], !vehicles.is_empty());
}

#[tokio::test]
async fn test_confidence_rounded_to_two_decimals() {
    let app = app_with(FixedDetector::with(vec![detection(
        50.0, 50.0, 150.0, 150.0, 2, 0.8567,
    )]));

    let request = multipart_request("/detect", "image", &png_bytes(400, 300));
    let response = app.oneshot(request).await.unwrap();

    let body = response_json(response).await;
    assert_eq!(body["vehicles"][0]["confidence"], 0.86);
}

#[tokio::test]
async fn test_undecodable_upload_returns_400() {
    let app = app_with(FixedDetector::empty());

    let request = multipart_request("/detect", "image", b"this is not an image");
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_inference_failure_returns_500() {
    let app = app_with(FailingDetector);

    let request = multipart_request("/detect", "image", &png_bytes(400, 300));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("inference failed"));
}

#[tokio::test]
async fn test_detect_rejects_get() {
    let app = app_with(FixedDetector::empty());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/detect")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
