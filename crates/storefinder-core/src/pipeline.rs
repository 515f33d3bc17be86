//! Exact filter stage shared by every repository backend.
//!
//! Backends may narrow candidates however they like first (see
//! [`crate::bounding_box`]); this stage decides the final result set.

use crate::geo::GeoCalculator;
use crate::model::{Location, Store};
use crate::search::{SearchDefaults, SearchRequest};

/// Case folding applied to both sides of a name match.
///
/// Backends that pre-filter by name must compare against names folded with
/// this function, or they can drop stores the exact filter would keep.
#[must_use]
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// The conjunction of every constraint present on a [`SearchRequest`].
///
/// Name matching is a case-insensitive substring test. The limit is applied
/// only after every other constraint, so `limit = N` yields the first `N`
/// matching stores in candidate order.
#[derive(Debug, Clone)]
pub struct StoreFilter<'a, G> {
    calculator: &'a G,
    term: Option<String>,
    zip_code: Option<&'a str>,
    circle: Option<(Location, f64)>,
    limit: Option<usize>,
}

impl<'a, G: GeoCalculator> StoreFilter<'a, G> {
    #[must_use]
    pub fn new(request: &'a SearchRequest, defaults: &SearchDefaults, calculator: &'a G) -> Self {
        Self {
            calculator,
            term: request.search_term().map(fold_name),
            zip_code: request.zip_code(),
            circle: request
                .center()
                .map(|center| (center, request.effective_radius(defaults))),
            limit: request.limit(),
        }
    }

    /// Whether `store` satisfies every constraint other than the limit.
    #[must_use]
    pub fn matches(&self, store: &Store) -> bool {
        if let Some(term) = &self.term {
            if !fold_name(store.name()).contains(term.as_str()) {
                return false;
            }
        }
        if let Some(zip) = self.zip_code {
            if store.address().zip_code() != zip {
                return false;
            }
        }
        if let Some((center, radius)) = self.circle {
            if self.calculator.distance_between(store.location(), center) > radius {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }

    /// Filter borrowed candidates, cloning only the survivors.
    pub fn apply_ref<'s, I>(&self, candidates: I) -> Vec<Store>
    where
        I: IntoIterator<Item = &'s Store>,
    {
        candidates
            .into_iter()
            .filter(|store| self.matches(store))
            .take(self.limit())
            .cloned()
            .collect()
    }

    /// Filter owned candidates.
    pub fn apply<I>(&self, candidates: I) -> Vec<Store>
    where
        I: IntoIterator<Item = Store>,
    {
        candidates
            .into_iter()
            .filter(|store| self.matches(store))
            .take(self.limit())
            .collect()
    }
}

/// Shorthand for [`StoreFilter::new`] followed by [`StoreFilter::apply`].
pub fn filter_stores<G, I>(
    candidates: I,
    request: &SearchRequest,
    defaults: &SearchDefaults,
    calculator: &G,
) -> Vec<Store>
where
    G: GeoCalculator,
    I: IntoIterator<Item = Store>,
{
    StoreFilter::new(request, defaults, calculator).apply(candidates)
}
