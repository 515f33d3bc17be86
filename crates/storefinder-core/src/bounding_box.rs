//! Rectangular latitude/longitude pre-filter for radius searches.
//!
//! A [`BoundingBox`] always contains the whole search circle, so it can
//! narrow an indexed backend query cheaply. It also admits points near the
//! corners that are outside the circle; the exact distance filter in
//! [`crate::pipeline`] must still run on whatever the box lets through.

use std::f64::consts::FRAC_PI_2;

use crate::geo::{normalize_longitude, GeoCalculator, GeoError, EARTH_RADIUS_KM};
use crate::model::Location;

/// Slack added to every edge so points lying exactly on the circle survive
/// floating-point rounding. About 0.1 mm.
const EDGE_EPSILON_DEGREES: f64 = 1e-9;

// Unlike `normalize_longitude`, keeps an edge of exactly +-180 in place.
fn wrap_edge(longitude: f64) -> f64 {
    if longitude > Location::MAX_LONGITUDE {
        longitude - 360.0
    } else if longitude < Location::MIN_LONGITUDE {
        longitude + 360.0
    } else {
        longitude
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl BoundingBox {
    /// The box spanning the whole globe.
    pub const WORLD: Self = Self {
        north: Location::MAX_LATITUDE,
        south: Location::MIN_LATITUDE,
        east: Location::MAX_LONGITUDE,
        west: Location::MIN_LONGITUDE,
    };

    /// Box around the circle of `radius_meters` centred on `center`.
    ///
    /// The latitude edges come from projecting the centre due north and due
    /// south. Off the equator the due-east/west projections are not the
    /// circle's longitude extremes, so those edges are widened to the
    /// tangent longitude `asin(sin δ / cos φ)`. A circle reaching a pole spans
    /// every longitude, and one crossing the antimeridian yields a box with
    /// `west > east` (see [`BoundingBox::wraps`]).
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidDistance`] if `radius_meters` is not a
    /// positive finite number.
    pub fn around<G: GeoCalculator>(
        calculator: &G,
        center: Location,
        radius_meters: f64,
    ) -> Result<Self, GeoError> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(GeoError::InvalidDistance(radius_meters));
        }

        let delta = radius_meters / (EARTH_RADIUS_KM * 1000.0);
        if delta >= std::f64::consts::PI {
            return Ok(Self::WORLD);
        }
        let phi = center.latitude().to_radians();

        let reaches_north_pole = phi + delta >= FRAC_PI_2;
        let reaches_south_pole = phi - delta <= -FRAC_PI_2;

        let north = if reaches_north_pole {
            Location::MAX_LATITUDE
        } else {
            calculator
                .destination_from(center, radius_meters, 0.0)?
                .latitude()
        };
        let south = if reaches_south_pole {
            Location::MIN_LATITUDE
        } else {
            calculator
                .destination_from(center, radius_meters, 180.0)?
                .latitude()
        };

        if reaches_north_pole || reaches_south_pole {
            return Ok(Self {
                north,
                south,
                east: Location::MAX_LONGITUDE,
                west: Location::MIN_LONGITUDE,
            }
            .padded());
        }

        let east_point = calculator.destination_from(center, radius_meters, 90.0)?;
        let west_point = calculator.destination_from(center, radius_meters, 270.0)?;

        let tangent = (delta.sin() / phi.cos()).min(1.0).asin().to_degrees();
        let east_offset =
            normalize_longitude(east_point.longitude() - center.longitude()).max(tangent);
        let west_offset =
            normalize_longitude(center.longitude() - west_point.longitude()).max(tangent);

        if east_offset + west_offset + 2.0 * EDGE_EPSILON_DEGREES >= 360.0 {
            return Ok(Self {
                north,
                south,
                east: Location::MAX_LONGITUDE,
                west: Location::MIN_LONGITUDE,
            }
            .padded());
        }

        Ok(Self {
            north,
            south,
            east: wrap_edge(center.longitude() + east_offset + EDGE_EPSILON_DEGREES),
            west: wrap_edge(center.longitude() - west_offset - EDGE_EPSILON_DEGREES),
        }
        .padded())
    }

    fn padded(self) -> Self {
        Self {
            north: (self.north + EDGE_EPSILON_DEGREES).min(Location::MAX_LATITUDE),
            south: (self.south - EDGE_EPSILON_DEGREES).max(Location::MIN_LATITUDE),
            ..self
        }
    }

    #[must_use]
    pub fn north(&self) -> f64 {
        self.north
    }

    #[must_use]
    pub fn south(&self) -> f64 {
        self.south
    }

    #[must_use]
    pub fn east(&self) -> f64 {
        self.east
    }

    #[must_use]
    pub fn west(&self) -> f64 {
        self.west
    }

    /// `true` when the box crosses the antimeridian, i.e. `west > east`.
    ///
    /// The longitude test then becomes `lng >= west OR lng <= east`.
    #[must_use]
    pub fn wraps(&self) -> bool {
        self.west > self.east
    }

    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        let lat = location.latitude();
        let lng = location.longitude();
        if lat > self.north || lat < self.south {
            return false;
        }
        if self.wraps() {
            lng >= self.west || lng <= self.east
        } else {
            lng >= self.west && lng <= self.east
        }
    }
}
