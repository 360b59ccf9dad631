//! Location captures recorded on check-in and check-out.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A resolved position and the moment it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCapture {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCapture {
    pub fn new(position: Position, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            latitude: position.latitude,
            longitude: position.longitude,
        }
    }

    /// ISO 8601 with millisecond precision, e.g. `2024-03-01T08:30:00.000Z`.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn location(&self) -> String {
        format_location(self.latitude, self.longitude)
    }
}

/// `"{lat}, {long}"`, each to five decimal places.
pub fn format_location(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.5}, {longitude:.5}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("Location permission was denied.")]
    PermissionDenied,
    #[error("Geolocation is not supported on this device.")]
    Unsupported,
    #[error("Unable to retrieve your location.")]
    PositionUnavailable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn location_has_five_decimals() {
        assert_eq!(format_location(37.7749, -122.4194), "37.77490, -122.41940");
        assert_eq!(format_location(0.0, 0.0), "0.00000, 0.00000");
        assert_eq!(format_location(-33.868820, 151.209296), "-33.86882, 151.20930");
    }

    #[test]
    fn timestamp_is_iso_with_millis() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        let capture = GeoCapture::new(Position::new(1.0, 2.0), ts);
        assert_eq!(capture.timestamp_iso(), "2024-03-01T08:30:00.000Z");
        assert_eq!(capture.location(), "1.00000, 2.00000");
    }
}
