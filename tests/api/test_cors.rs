// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests for the cross-origin policy: only the configured origin is allowed

use axum::body::Body;
use axum::http::{header, Method, Request};
use tower::util::ServiceExt; // for `oneshot`

use super::support::{app_with, FixedDetector};

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/detect")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_configured_origin_is_allowed() {
    let app = app_with(FixedDetector::empty());

    let response = app.oneshot(preflight("http://localhost:5173")).await.unwrap();

    let allow_origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("preflight should carry an allow-origin header");
    assert_eq!(allow_origin, "http://localhost:5173");
}

#[tokio::test]
async fn test_other_origin_is_not_allowed() {
    let app = app_with(FixedDetector::empty());

    let response = app
        .oneshot(preflight("http://other.example.com"))
        .await
        .unwrap();

    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
