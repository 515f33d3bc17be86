//! Write operations for the `stores` table.

use sqlx::PgPool;
use storefinder_core::{fold_name, Store};
use uuid::Uuid;

/// Insert `store` unless its `store_id` is already taken.
///
/// Returns `false` when a row with the same id exists; the existing row is
/// left untouched.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn insert_store(pool: &PgPool, store: &Store) -> Result<bool, sqlx::Error> {
    let address = store.address();
    let inserted: Option<i64> = sqlx::query_scalar::<_, i64>(
        "INSERT INTO stores \
             (store_id, name, name_folded, store_code, latitude, longitude, address_line1, \
              address_line2, city, state, county, zip_code, local_zip_code, main_image_url, \
              is_farmers_market) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         ON CONFLICT (store_id) DO NOTHING \
         RETURNING id",
    )
    .bind(*store.store_id().as_uuid())
    .bind(store.name())
    .bind(fold_name(store.name()))
    .bind(store.store_code())
    .bind(store.location().latitude())
    .bind(store.location().longitude())
    .bind(address.address_line1())
    .bind(address.address_line2())
    .bind(address.city())
    .bind(address.state())
    .bind(address.county())
    .bind(address.zip_code())
    .bind(address.local_zip_code())
    .bind(store.main_image_url())
    .bind(store.is_farmers_market())
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Insert `store`, or overwrite every column of the row with the same
/// `store_id`.
///
/// Returns `true` when the row was newly inserted.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn upsert_store(pool: &PgPool, store: &Store) -> Result<bool, sqlx::Error> {
    let address = store.address();
    sqlx::query_scalar::<_, bool>(
        "INSERT INTO stores \
             (store_id, name, name_folded, store_code, latitude, longitude, address_line1, \
              address_line2, city, state, county, zip_code, local_zip_code, main_image_url, \
              is_farmers_market) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         ON CONFLICT (store_id) DO UPDATE SET \
             name              = EXCLUDED.name, \
             name_folded       = EXCLUDED.name_folded, \
             store_code        = EXCLUDED.store_code, \
             latitude          = EXCLUDED.latitude, \
             longitude         = EXCLUDED.longitude, \
             address_line1     = EXCLUDED.address_line1, \
             address_line2     = EXCLUDED.address_line2, \
             city              = EXCLUDED.city, \
             state             = EXCLUDED.state, \
             county            = EXCLUDED.county, \
             zip_code          = EXCLUDED.zip_code, \
             local_zip_code    = EXCLUDED.local_zip_code, \
             main_image_url    = EXCLUDED.main_image_url, \
             is_farmers_market = EXCLUDED.is_farmers_market, \
             updated_at        = NOW() \
         RETURNING (xmax = 0) AS is_new",
    )
    .bind(*store.store_id().as_uuid())
    .bind(store.name())
    .bind(fold_name(store.name()))
    .bind(store.store_code())
    .bind(store.location().latitude())
    .bind(store.location().longitude())
    .bind(address.address_line1())
    .bind(address.address_line2())
    .bind(address.city())
    .bind(address.state())
    .bind(address.county())
    .bind(address.zip_code())
    .bind(address.local_zip_code())
    .bind(store.main_image_url())
    .bind(store.is_farmers_market())
    .fetch_one(pool)
    .await
}

/// Delete the store with `store_id`. Returns the number of rows removed.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn delete_store(pool: &PgPool, store_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stores WHERE store_id = $1")
        .bind(store_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
