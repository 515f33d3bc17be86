//! Read operations for the `stores` table.

use sqlx::PgPool;
use storefinder_core::{
    fold_name, BoundingBox, GeoCalculator, GeoError, SearchDefaults, SearchRequest,
};
use uuid::Uuid;

use super::types::{StoreRow, STORE_COLUMNS};

/// The part of a [`SearchRequest`] Postgres can evaluate with its indexes.
///
/// Everything here is a superset of the final answer: the bounding box
/// admits corner points outside the circle, so callers must still run the
/// exact filter on the rows it returns.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    /// `LIKE` pattern over `name_folded`: the folded term with wildcards
    /// escaped.
    pub name_pattern: Option<String>,
    pub zip_code: Option<String>,
    pub bbox: Option<BoundingBox>,
    /// Only set when no radius filter will drop rows after the query.
    pub limit: Option<i64>,
}

impl CandidateQuery {
    /// # Errors
    ///
    /// Returns [`GeoError`] if the bounding box cannot be computed for the
    /// request's center and radius.
    pub fn from_request<G: GeoCalculator>(
        request: &SearchRequest,
        defaults: &SearchDefaults,
        calculator: &G,
    ) -> Result<Self, GeoError> {
        let bbox = request
            .center()
            .map(|center| {
                BoundingBox::around(calculator, center, request.effective_radius(defaults))
            })
            .transpose()?;
        let limit = if bbox.is_some() {
            None
        } else {
            request
                .limit()
                .map(|n| i64::try_from(n).unwrap_or(i64::MAX))
        };

        Ok(Self {
            name_pattern: request
                .search_term()
                .map(|term| contains_pattern(&fold_name(term))),
            zip_code: request.zip_code().map(str::to_string),
            bbox,
            limit,
        })
    }
}

/// `%term%` with `\`, `%` and `_` escaped so the term matches literally.
#[must_use]
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Fetch a single store by its public id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn get_store(pool: &PgPool, store_id: Uuid) -> Result<Option<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores WHERE store_id = $1"
    ))
    .bind(store_id)
    .fetch_optional(pool)
    .await
}

/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn store_exists(pool: &PgPool, store_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM stores WHERE store_id = $1)")
        .bind(store_id)
        .fetch_one(pool)
        .await
}

/// List stores in insertion order. `None` is unbounded.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_stores(pool: &PgPool, limit: Option<i64>) -> Result<Vec<StoreRow>, sqlx::Error> {
    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         ORDER BY id \
         LIMIT COALESCE($1, 9223372036854775807)"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_stores(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stores")
        .fetch_one(pool)
        .await
}

/// Rows satisfying every constraint in `query`, in insertion order.
///
/// A box with `west > east` crosses the antimeridian and matches longitudes
/// on either side of it.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn search_store_candidates(
    pool: &PgPool,
    query: &CandidateQuery,
) -> Result<Vec<StoreRow>, sqlx::Error> {
    let (south, north, west, east) = match query.bbox {
        Some(b) => (
            Some(b.south()),
            Some(b.north()),
            Some(b.west()),
            Some(b.east()),
        ),
        None => (None, None, None, None),
    };

    sqlx::query_as::<_, StoreRow>(&format!(
        "SELECT {STORE_COLUMNS} FROM stores \
         WHERE ($1::TEXT IS NULL OR name_folded LIKE $1 ESCAPE '\\') \
           AND ($2::TEXT IS NULL OR zip_code = $2) \
           AND ($3::FLOAT8 IS NULL OR latitude BETWEEN $3 AND $4::FLOAT8) \
           AND ($5::FLOAT8 IS NULL OR CASE \
                 WHEN $5 <= $6::FLOAT8 THEN longitude BETWEEN $5 AND $6 \
                 ELSE longitude >= $5 OR longitude <= $6 \
               END) \
         ORDER BY id \
         LIMIT COALESCE($7, 9223372036854775807)"
    ))
    .bind(query.name_pattern.as_deref())
    .bind(query.zip_code.as_deref())
    .bind(south)
    .bind(north)
    .bind(west)
    .bind(east)
    .bind(query.limit)
    .fetch_all(pool)
    .await
}
