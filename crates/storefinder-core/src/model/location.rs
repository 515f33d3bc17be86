use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated latitude/longitude pair in decimal degrees.
///
/// Both bounds are checked on construction, so every `Location` in the
/// system is usable by the geodetic math without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLocation")]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawLocation> for Location {
    type Error = ValidationError;

    fn try_from(raw: RawLocation) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Location {
    pub const MIN_LATITUDE: f64 = -90.0;
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MIN_LONGITUDE: f64 = -180.0;
    pub const MAX_LONGITUDE: f64 = 180.0;

    /// # Errors
    ///
    /// Returns [`ValidationError::LatitudeOutOfRange`] or
    /// [`ValidationError::LongitudeOutOfRange`] for out-of-range or NaN input.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !(Self::MIN_LATITUDE..=Self::MAX_LATITUDE).contains(&latitude) {
            return Err(ValidationError::LatitudeOutOfRange(latitude));
        }
        if !(Self::MIN_LONGITUDE..=Self::MAX_LONGITUDE).contains(&longitude) {
            return Err(ValidationError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
