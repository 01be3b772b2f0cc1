// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based vehicle detection
//!
//! This module provides:
//! - Image decoding for multipart uploads
//! - The `Detector` seam and the YOLOv8n implementation on top of ONNX Runtime
//!
//! Inference runs on CPU only.

pub mod classes;
pub mod detector;
pub mod image_utils;
pub mod yolo;

pub use classes::{label_for_class_id, VehicleClass, CAR_CLASS_ID, VEHICLE_CLASS_IDS};
pub use detector::{DetectError, Detector, RawDetection};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use yolo::YoloDetector;
