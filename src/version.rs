// Version information for the vehicle detection node

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-05";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Vehicle Detection Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
