// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod car_count;
pub mod detect;
pub mod errors;
pub mod handlers;
pub mod server;

pub use car_count::{car_count_handler, CarCountResponse};
pub use detect::{detect_handler, DetectionResponse, Position, VehicleRecord};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{health_handler, HealthResponse};
pub use server::{
    create_app, create_car_count_app, start_car_count_server, start_server, ApiConfig, AppState,
};
