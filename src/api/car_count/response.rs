// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Car count response types

use serde::{Deserialize, Serialize};

/// Response from the car-count detection endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarCountResponse {
    pub car_detected: bool,
    pub num_cars: usize,
}

impl CarCountResponse {
    pub fn from_count(num_cars: usize) -> Self {
        Self {
            car_detected: num_cars > 0,
            num_cars,
        }
    }
}
