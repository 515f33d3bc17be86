//! Row types for the `stores` table.

use chrono::{DateTime, Utc};
use storefinder_core::{Address, Location, Store, StoreId, ValidationError};
use uuid::Uuid;

/// A row from the `stores` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoreRow {
    pub id: i64,
    pub store_id: Uuid,
    pub name: String,
    pub store_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub county: String,
    pub zip_code: String,
    pub local_zip_code: Option<String>,
    pub main_image_url: Option<String>,
    pub is_farmers_market: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column list shared by every `SELECT` that decodes into [`StoreRow`].
pub(crate) const STORE_COLUMNS: &str = "id, store_id, name, store_code, latitude, longitude, \
     address_line1, address_line2, city, state, county, zip_code, local_zip_code, \
     main_image_url, is_farmers_market, created_at, updated_at";

impl TryFrom<StoreRow> for Store {
    type Error = ValidationError;

    /// Rebuild the domain value, re-running model validation so rows written
    /// by other tools cannot smuggle in invalid stores.
    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let mut address = Address::builder()
            .address_line1(row.address_line1)?
            .city(row.city)?
            .state(row.state)?
            .county(row.county)?
            .zip_code(row.zip_code)?;
        if let Some(line2) = row.address_line2 {
            address = address.address_line2(line2);
        }
        if let Some(local) = row.local_zip_code {
            address = address.local_zip_code(local)?;
        }

        let mut builder = Store::builder()
            .store_id(StoreId::from(row.store_id))
            .name(row.name)?
            .location(Location::new(row.latitude, row.longitude)?)
            .address(address.build()?)
            .farmers_market(row.is_farmers_market);
        if let Some(code) = row.store_code {
            builder = builder.store_code(code);
        }
        if let Some(url) = row.main_image_url {
            builder = builder.main_image_url(url)?;
        }
        builder.build()
    }
}
