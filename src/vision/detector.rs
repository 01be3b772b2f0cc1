// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The detector seam between the HTTP layer and the inference backend.

use image::DynamicImage;
use thiserror::Error;

/// A single detection as produced by the model, in original-image pixel
/// coordinates. Read-only view over model output; the service never
/// mutates these.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    /// Left edge of the bounding box
    pub x1: f32,
    /// Top edge of the bounding box
    pub y1: f32,
    /// Right edge of the bounding box
    pub x2: f32,
    /// Bottom edge of the bounding box
    pub y2: f32,
    /// Detector class id
    pub class_id: u32,
    /// Confidence score in [0, 1]
    pub confidence: f32,
}

impl RawDetection {
    /// Horizontal center of the bounding box.
    pub fn center_x(&self) -> f32 {
        (self.x1 + self.x2) / 2.0
    }
}

/// Errors from a detection backend
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output: {0}")]
    OutputShape(String),
}

impl From<ort::Error> for DetectError {
    fn from(e: ort::Error) -> Self {
        DetectError::Inference(e.to_string())
    }
}

/// Common interface for object detectors.
///
/// The HTTP handlers only depend on this trait, so tests can inject a
/// fixed-output implementation and the YOLO backend stays swappable.
pub trait Detector: Send + Sync {
    /// Run inference on a decoded image.
    ///
    /// Only detections whose class id is in `classes` and whose confidence
    /// is at least `confidence_threshold` are returned, in original-image
    /// pixel coordinates.
    fn detect(
        &self,
        image: &DynamicImage,
        classes: &[u32],
        confidence_threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectError>;

    /// Model name reported by the health endpoint.
    fn name(&self) -> &str;
}
