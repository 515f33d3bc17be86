//! Spherical-Earth geodesy: great-circle distance, initial bearing and
//! destination-point projection.
//!
//! All inputs and outputs are decimal degrees and meters; conversion to
//! radians happens before any trig call.

use thiserror::Error;

use crate::error::ValidationError;
use crate::model::Location;

/// Mean Earth radius used by [`Haversine`], in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6372.8;

const METERS_PER_KM: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("distance must be a positive, finite number of meters, got {0}")]
    InvalidDistance(f64),

    #[error("bearing must be within [-360, 360] degrees, got {0}")]
    InvalidBearing(f64),

    #[error(transparent)]
    Location(#[from] ValidationError),
}

impl From<GeoError> for ValidationError {
    fn from(err: GeoError) -> Self {
        match err {
            GeoError::InvalidDistance(d) => {
                ValidationError::invalid("distance", format!("{d} is not a positive distance"))
            }
            GeoError::InvalidBearing(b) => {
                ValidationError::invalid("bearing", format!("{b} is outside [-360, 360]"))
            }
            GeoError::Location(inner) => inner,
        }
    }
}

impl From<GeoError> for crate::error::StoreError {
    fn from(err: GeoError) -> Self {
        Self::InvalidArgument(err.into())
    }
}

/// Geodetic formulas over [`Location`]s.
pub trait GeoCalculator {
    /// Great-circle distance in meters.
    fn distance_between(&self, a: Location, b: Location) -> f64;

    /// Initial true-course bearing from `start` toward `end`, in `[0, 360)`.
    fn bearing_from_to(&self, start: Location, end: Location) -> f64;

    /// Point reached by travelling `distance_meters` from `origin` along the
    /// initial bearing `bearing_degrees`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the distance is not positive or the bearing is
    /// outside `[-360, 360]`.
    fn destination_from(
        &self,
        origin: Location,
        distance_meters: f64,
        bearing_degrees: f64,
    ) -> Result<Location, GeoError>;
}

/// Haversine formulas on a sphere of radius [`EARTH_RADIUS_KM`].
///
/// Ignores Earth's oblateness; the resulting error is small and accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Haversine;

pub const HAVERSINE: Haversine = Haversine;

impl Haversine {
    fn radius_meters(self) -> f64 {
        EARTH_RADIUS_KM * METERS_PER_KM
    }
}

impl GeoCalculator for Haversine {
    fn distance_between(&self, a: Location, b: Location) -> f64 {
        let phi1 = a.latitude().to_radians();
        let phi2 = b.latitude().to_radians();
        let d_phi = (b.latitude() - a.latitude()).to_radians();
        let d_lambda = (b.longitude() - a.longitude()).to_radians();

        let h = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // Float noise can push h a hair past 1 for antipodal points.
        let c = 2.0 * h.sqrt().min(1.0).asin();

        c * EARTH_RADIUS_KM * METERS_PER_KM
    }

    fn bearing_from_to(&self, start: Location, end: Location) -> f64 {
        let phi1 = start.latitude().to_radians();
        let phi2 = end.latitude().to_radians();
        let d_lambda = (end.longitude() - start.longitude()).to_radians();

        let y = d_lambda.sin() * phi2.cos();
        let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
        let theta = y.atan2(x).to_degrees();

        (theta + 360.0) % 360.0
    }

    fn destination_from(
        &self,
        origin: Location,
        distance_meters: f64,
        bearing_degrees: f64,
    ) -> Result<Location, GeoError> {
        if !distance_meters.is_finite() || distance_meters <= 0.0 {
            return Err(GeoError::InvalidDistance(distance_meters));
        }
        if !(-360.0..=360.0).contains(&bearing_degrees) {
            return Err(GeoError::InvalidBearing(bearing_degrees));
        }

        let delta = distance_meters / self.radius_meters();
        let theta = bearing_degrees.to_radians();
        let phi1 = origin.latitude().to_radians();
        let lambda1 = origin.longitude().to_radians();

        let sin_phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos())
            .clamp(-1.0, 1.0);
        let phi2 = sin_phi2.asin();
        let lambda2 = lambda1
            + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

        let latitude = phi2
            .to_degrees()
            .clamp(Location::MIN_LATITUDE, Location::MAX_LATITUDE);
        let longitude = normalize_longitude(lambda2.to_degrees());

        Ok(Location::new(latitude, longitude)?)
    }
}

/// Wrap a longitude in degrees into `[-180, 180]`.
#[must_use]
pub fn normalize_longitude(longitude: f64) -> f64 {
    (longitude + 540.0).rem_euclid(360.0) - 180.0
}
