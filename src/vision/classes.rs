// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Fixed COCO class ids for the vehicle classes this service reports.

/// Detector class ids treated as vehicles (COCO: car, motorcycle, bus, truck).
pub const VEHICLE_CLASS_IDS: &[u32] = &[2, 3, 5, 7];

/// Detector class id for "car", used by the car-count service.
pub const CAR_CLASS_ID: u32 = 2;

/// Vehicle classes the detection endpoint reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Car,
    Motorcycle,
    Bus,
    Truck,
}

impl VehicleClass {
    /// Maps a detector class id to a vehicle class.
    pub fn from_class_id(class_id: u32) -> Option<Self> {
        match class_id {
            2 => Some(VehicleClass::Car),
            3 => Some(VehicleClass::Motorcycle),
            5 => Some(VehicleClass::Bus),
            7 => Some(VehicleClass::Truck),
            _ => None,
        }
    }

    /// Human-readable label used in API responses.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Motorcycle => "motorcycle",
            VehicleClass::Bus => "bus",
            VehicleClass::Truck => "truck",
        }
    }
}

/// Label for a class id, falling back to `"vehicle"` for ids outside the
/// fixed mapping. The allow-list filter makes the fallback unreachable in
/// normal operation, but the mapping stays total.
pub fn label_for_class_id(class_id: u32) -> &'static str {
    VehicleClass::from_class_id(class_id)
        .map(|c| c.label())
        .unwrap_or("vehicle")
}
