//! Query descriptors for store searches.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::model::{validate_zip_code, Location};
use crate::repository::normalize_limit;

/// Radius used when a search has a center but no explicit radius.
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 5000.0;

/// Backend-wide defaults applied to incoming [`SearchRequest`]s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchDefaults {
    pub radius_in_meters: f64,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            radius_in_meters: DEFAULT_SEARCH_RADIUS_METERS,
        }
    }
}

/// A bag of independent, conjunctive search constraints.
///
/// Every constraint is optional. Empty strings and a limit of zero mean
/// "unset"; everything else is validated when set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    search_term: Option<String>,
    center: Option<Location>,
    radius_in_meters: Option<f64>,
    zip_code: Option<String>,
    limit: Option<usize>,
}

impl SearchRequest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Substring to look for in store names. Blank clears the constraint.
    pub fn set_search_term(&mut self, term: impl Into<String>) -> &mut Self {
        let term = term.into();
        let trimmed = term.trim();
        self.search_term = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn set_center(&mut self, center: Location) -> &mut Self {
        self.center = Some(center);
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] unless `meters` is positive
    /// and finite.
    pub fn set_radius_in_meters(&mut self, meters: f64) -> Result<&mut Self, ValidationError> {
        if !meters.is_finite() || meters <= 0.0 {
            return Err(ValidationError::invalid(
                "radius",
                format!("must be a positive number of meters, got {meters}"),
            ));
        }
        self.radius_in_meters = Some(meters);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] for a non-empty value that is
    /// not five digits.
    pub fn set_zip_code(&mut self, zip: &str) -> Result<&mut Self, ValidationError> {
        self.zip_code = if zip.trim().is_empty() {
            None
        } else {
            Some(validate_zip_code(zip)?)
        };
        Ok(self)
    }

    /// Cap on the number of results. Zero clears the cap.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] for a negative limit.
    pub fn set_limit(&mut self, limit: i64) -> Result<&mut Self, ValidationError> {
        self.limit = normalize_limit(limit)?;
        Ok(self)
    }

    #[must_use]
    pub fn has_search_term(&self) -> bool {
        self.search_term.is_some()
    }

    #[must_use]
    pub fn has_center(&self) -> bool {
        self.center.is_some()
    }

    #[must_use]
    pub fn has_radius(&self) -> bool {
        self.radius_in_meters.is_some()
    }

    #[must_use]
    pub fn has_zip_code(&self) -> bool {
        self.zip_code.is_some()
    }

    #[must_use]
    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    #[must_use]
    pub fn center(&self) -> Option<Location> {
        self.center
    }

    #[must_use]
    pub fn radius_in_meters(&self) -> Option<f64> {
        self.radius_in_meters
    }

    /// The explicit radius, or the backend default when none was given.
    #[must_use]
    pub fn effective_radius(&self, defaults: &SearchDefaults) -> f64 {
        self.radius_in_meters.unwrap_or(defaults.radius_in_meters)
    }

    #[must_use]
    pub fn zip_code(&self) -> Option<&str> {
        self.zip_code.as_deref()
    }

    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Raw query-string form of a search, as received at the HTTP boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(alias = "search_term")]
    pub q: Option<String>,
    #[serde(alias = "latitude")]
    pub lat: Option<f64>,
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: Option<f64>,
    #[serde(alias = "radius_in_meters")]
    pub radius: Option<f64>,
    pub zip_code: Option<String>,
    pub limit: Option<i64>,
}

impl TryFrom<SearchParams> for SearchRequest {
    type Error = ValidationError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let mut request = SearchRequest::new();
        if let Some(term) = params.q {
            request.set_search_term(term);
        }
        match (params.lat, params.lng) {
            (Some(lat), Some(lng)) => {
                request.set_center(Location::new(lat, lng)?);
            }
            (None, None) => {}
            (Some(_), None) => return Err(ValidationError::MissingField("lng")),
            (None, Some(_)) => return Err(ValidationError::MissingField("lat")),
        }
        if let Some(radius) = params.radius {
            request.set_radius_in_meters(radius)?;
        }
        if let Some(zip) = params.zip_code {
            request.set_zip_code(&zip)?;
        }
        if let Some(limit) = params.limit {
            request.set_limit(limit)?;
        }
        Ok(request)
    }
}
