// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types from the API layer
pub use api::{
    ApiConfig, ApiError, CarCountResponse, DetectionResponse, ErrorResponse, HealthResponse,
    Position, VehicleRecord,
};

// Re-export the detector seam
pub use vision::{DetectError, Detector, ImageError, ImageInfo, RawDetection, YoloDetector};
