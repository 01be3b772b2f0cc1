// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response types and raw-detection post-processing

use serde::{Deserialize, Serialize};

use crate::vision::{label_for_class_id, RawDetection};

/// Screen side of a detected vehicle, relative to the image center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Right,
}

/// One detected vehicle as reported to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleRecord {
    /// Vehicle class label (car, motorcycle, bus, truck)
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// Which half of the image the box center falls in
    pub position: Position,
    /// Confidence score rounded to 2 decimal places
    pub confidence: f32,
}

impl VehicleRecord {
    /// Build a record from a raw detection.
    ///
    /// `image_center` is the full image width halved with integer division;
    /// a box centered exactly on it is classified `right` (strict `<` test).
    pub fn from_detection(detection: &RawDetection, image_center: u32) -> Self {
        let position = if detection.center_x() < image_center as f32 {
            Position::Left
        } else {
            Position::Right
        };

        Self {
            vehicle_type: label_for_class_id(detection.class_id).to_string(),
            position,
            confidence: round_confidence(detection.confidence),
        }
    }
}

/// Response from the vehicle detection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub vehicles_detected: bool,
    pub num_vehicles: usize,
    pub vehicles: Vec<VehicleRecord>,
}

impl DetectionResponse {
    /// Build the response from raw detections and the image width.
    pub fn from_detections(detections: &[RawDetection], image_width: u32) -> Self {
        let image_center = image_width / 2;

        let vehicles: Vec<VehicleRecord> = detections
            .iter()
            .map(|d| VehicleRecord::from_detection(d, image_center))
            .collect();

        Self {
            vehicles_detected: !vehicles.is_empty(),
            num_vehicles: vehicles.len(),
            vehicles,
        }
    }
}

/// Round a confidence score to 2 decimal places (half away from zero).
fn round_confidence(confidence: f32) -> f32 {
    (confidence * 100.0).round() / 100.0
}
