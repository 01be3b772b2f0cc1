// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! YOLOv8n detection backend on ONNX Runtime
//!
//! This module wraps an `ort` session around the pretrained yolov8n.onnx
//! model. The model file is an external artifact; nothing here trains or
//! reimplements detection. Responsibilities:
//! - Model loading from disk (CPU execution provider)
//! - Letterbox preprocessing to the 640x640 model input
//! - Postprocessing: class filter, confidence filter, NMS, box transform
//!   back to original-image pixel coordinates

use anyhow::{Context, Result};
use image::DynamicImage;
use ndarray::{Array2, Array3, Array4, ArrayView2, Axis, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::detector::{DetectError, Detector, RawDetection};

/// Model input edge length. YOLOv8n is exported with a fixed 640x640 input.
const INPUT_SIZE: u32 = 640;

/// IoU threshold for non-maximum suppression.
const IOU_THRESHOLD: f32 = 0.45;

/// Gray letterbox padding value, as used by the upstream predictor.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// YOLOv8n object detector
///
/// # Thread Safety
/// The `ort` session requires exclusive access per `run` call, so inference
/// is serialized behind a mutex. The struct clones cheaply via `Arc`.
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (wrapped in Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    /// Model name (e.g., "YOLOv8n")
    model_name: String,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Loads the YOLOv8n ONNX model from disk.
    ///
    /// # Errors
    /// Returns error if the model file is missing or ONNX Runtime fails to
    /// initialize the session.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }

        info!("Loading YOLOv8n model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        info!("YOLOv8n model loaded");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            model_name: "YOLOv8n".to_string(),
        })
    }
}

impl Detector for YoloDetector {
    fn detect(
        &self,
        image: &DynamicImage,
        classes: &[u32],
        confidence_threshold: f32,
    ) -> Result<Vec<RawDetection>, DetectError> {
        let (input_tensor, params) = preprocess(image);

        // Run inference - lock session for exclusive access, then copy the
        // predictions out so the lock is released before postprocessing.
        let preds: Array2<f32> = {
            let mut session_guard = self.session.lock().unwrap();
            let outputs = session_guard.run(ort::inputs![
                "images" => Value::from_array(input_tensor)?
            ])?;

            let output_array = outputs[0]
                .try_extract_array::<f32>()
                .map_err(|e| DetectError::OutputShape(e.to_string()))?;

            // Model outputs [1, 4 + classes, anchors]; normalize to
            // [anchors, features] regardless of export orientation.
            let output3 = output_array
                .into_dimensionality::<Ix3>()
                .map_err(|e| DetectError::OutputShape(e.to_string()))?;
            let batch = output3.index_axis(Axis(0), 0);
            let (rows, cols) = (batch.shape()[0], batch.shape()[1]);
            if rows.min(cols) < 5 {
                return Err(DetectError::OutputShape(format!(
                    "prediction tensor too small: [{}, {}]",
                    rows, cols
                )));
            }
            if rows < cols {
                batch.t().to_owned()
            } else {
                batch.to_owned()
            }
        };

        let detections = postprocess_predictions(
            preds.view(),
            &params,
            classes,
            confidence_threshold,
            IOU_THRESHOLD,
        );

        debug!(
            detections = detections.len(),
            width = params.orig_w,
            height = params.orig_h,
            "detection complete"
        );

        Ok(detections)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Scale and padding applied during letterboxing, needed to map boxes back
/// to original-image coordinates.
#[derive(Debug, Clone, Copy)]
struct PreprocessParams {
    scale: f32,
    pad_x: f32,
    pad_y: f32,
    orig_w: u32,
    orig_h: u32,
}

/// Letterbox-resize the image onto a gray 640x640 canvas and convert to an
/// NCHW f32 tensor in [0, 1].
fn preprocess(image: &DynamicImage) -> (Array4<f32>, PreprocessParams) {
    let orig_w = image.width();
    let orig_h = image.height();

    let scale_w = INPUT_SIZE as f32 / orig_w.max(1) as f32;
    let scale_h = INPUT_SIZE as f32 / orig_h.max(1) as f32;
    let scale = scale_w.min(scale_h);

    let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);
    let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, INPUT_SIZE);

    let resized = image.resize_exact(new_w, new_h, image::imageops::FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let pad_x = (INPUT_SIZE - new_w) as f32 / 2.0;
    let pad_y = (INPUT_SIZE - new_h) as f32 / 2.0;
    let offset_x = pad_x.floor() as usize;
    let offset_y = pad_y.floor() as usize;

    let mut canvas =
        Array3::<f32>::from_elem((3, INPUT_SIZE as usize, INPUT_SIZE as usize), PAD_VALUE);

    let raw = rgb.as_raw();
    let row_len = new_w as usize;
    for y in 0..new_h as usize {
        for x in 0..row_len {
            let src = (y * row_len + x) * 3;
            canvas[[0, offset_y + y, offset_x + x]] = raw[src] as f32 / 255.0;
            canvas[[1, offset_y + y, offset_x + x]] = raw[src + 1] as f32 / 255.0;
            canvas[[2, offset_y + y, offset_x + x]] = raw[src + 2] as f32 / 255.0;
        }
    }

    let input_tensor = canvas.insert_axis(Axis(0));

    (
        input_tensor,
        PreprocessParams {
            scale,
            pad_x,
            pad_y,
            orig_w,
            orig_h,
        },
    )
}

/// Turn raw predictions (`[anchors, 4 + classes]`, boxes as center/size in
/// model-input coordinates) into filtered detections in original-image
/// pixel coordinates.
fn postprocess_predictions(
    preds: ArrayView2<f32>,
    params: &PreprocessParams,
    classes: &[u32],
    confidence_threshold: f32,
    iou_threshold: f32,
) -> Vec<RawDetection> {
    let mut candidates = Vec::new();

    for row in preds.axis_iter(Axis(0)) {
        let (best_class, confidence) = row.iter().skip(4).enumerate().fold(
            (0usize, f32::NEG_INFINITY),
            |(best_idx, best_score), (idx, &score)| {
                if score > best_score {
                    (idx, score)
                } else {
                    (best_idx, best_score)
                }
            },
        );

        if !confidence.is_finite() || confidence < confidence_threshold {
            continue;
        }

        let class_id = best_class as u32;
        if !classes.contains(&class_id) {
            continue;
        }

        let (cx, cy, w, h) = (row[0], row[1], row[2], row[3]);
        if !cx.is_finite() || !cy.is_finite() || w <= 0.0 || h <= 0.0 {
            continue;
        }

        // Undo the letterbox transform and clamp to image bounds
        let x1 = (((cx - w / 2.0) - params.pad_x) / params.scale).clamp(0.0, params.orig_w as f32);
        let y1 = (((cy - h / 2.0) - params.pad_y) / params.scale).clamp(0.0, params.orig_h as f32);
        let x2 = (((cx + w / 2.0) - params.pad_x) / params.scale).clamp(0.0, params.orig_w as f32);
        let y2 = (((cy + h / 2.0) - params.pad_y) / params.scale).clamp(0.0, params.orig_h as f32);

        if x2 - x1 <= 0.0 || y2 - y1 <= 0.0 {
            continue;
        }

        candidates.push(RawDetection {
            x1,
            y1,
            x2,
            y2,
            class_id,
            confidence,
        });
    }

    non_max_suppression(candidates, iou_threshold)
}

/// Greedy per-class non-maximum suppression, matching the upstream
/// predictor's behavior of suppressing overlaps only within a class.
fn non_max_suppression(mut detections: Vec<RawDetection>, iou_threshold: f32) -> Vec<RawDetection> {
    detections.sort_unstable_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut suppressed = vec![false; detections.len()];
    let mut kept = Vec::with_capacity(detections.len());

    for i in 0..detections.len() {
        if suppressed[i] {
            continue;
        }
        for j in (i + 1)..detections.len() {
            if suppressed[j] || detections[i].class_id != detections[j].class_id {
                continue;
            }
            if iou(&detections[i], &detections[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
        kept.push(detections[i].clone());
    }

    kept
}

fn iou(a: &RawDetection, b: &RawDetection) -> f32 {
    let inter_x1 = a.x1.max(b.x1);
    let inter_y1 = a.y1.max(b.y1);
    let inter_x2 = a.x2.min(b.x2);
    let inter_y2 = a.y2.min(b.y2);

    let inter = (inter_x2 - inter_x1).max(0.0) * (inter_y2 - inter_y1).max(0.0);
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    let union = area_a + area_b - inter;

    if union > f32::EPSILON {
        inter / union
    } else {
        0.0
    }
}
