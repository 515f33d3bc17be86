use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::address::required;
use super::{Address, Location};
use crate::error::ValidationError;

/// Unique identity of a [`Store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(Uuid);

impl StoreId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for StoreId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<&Store> for StoreId {
    fn from(store: &Store) -> Self {
        store.store_id
    }
}

impl FromStr for StoreId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ValidationError::invalid("store_id", e.to_string()))
    }
}

impl std::fmt::Display for StoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A retail location that accepts EBT.
///
/// Immutable: changes are expressed with [`Store::copy_with`] or
/// [`Store::to_builder`], both of which re-validate the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStore")]
pub struct Store {
    store_id: StoreId,
    #[serde(rename = "store_name")]
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_code: Option<String>,
    location: Location,
    address: Address,
    is_farmers_market: bool,
    #[serde(rename = "main_image_url", skip_serializing_if = "Option::is_none")]
    main_image_url: Option<String>,
}

#[derive(Deserialize)]
struct RawStore {
    store_id: StoreId,
    store_name: String,
    store_code: Option<String>,
    location: Location,
    address: Address,
    #[serde(default)]
    is_farmers_market: bool,
    main_image_url: Option<String>,
}

impl TryFrom<RawStore> for Store {
    type Error = ValidationError;

    fn try_from(raw: RawStore) -> Result<Self, Self::Error> {
        let mut builder = Store::builder()
            .store_id(raw.store_id)
            .name(raw.store_name)?
            .location(raw.location)
            .address(raw.address)
            .farmers_market(raw.is_farmers_market);
        if let Some(code) = raw.store_code {
            builder = builder.store_code(code);
        }
        if let Some(url) = raw.main_image_url {
            builder = builder.main_image_url(url)?;
        }
        builder.build()
    }
}

impl Store {
    #[must_use]
    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    #[must_use]
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn store_code(&self) -> Option<&str> {
        self.store_code.as_deref()
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn address(&self) -> &Address {
        &self.address
    }

    #[must_use]
    pub fn main_image_url(&self) -> Option<&str> {
        self.main_image_url.as_deref()
    }

    #[must_use]
    pub fn is_farmers_market(&self) -> bool {
        self.is_farmers_market
    }

    /// Reopen a builder holding every field of this store, id included.
    #[must_use]
    pub fn to_builder(&self) -> StoreBuilder {
        StoreBuilder {
            store_id: Some(self.store_id),
            name: Some(self.name.clone()),
            store_code: self.store_code.clone(),
            location: Some(self.location),
            address: Some(self.address.clone()),
            main_image_url: self.main_image_url.clone(),
            is_farmers_market: self.is_farmers_market,
        }
    }

    /// Return a new store with `changes` applied on top of this one.
    ///
    /// The id never changes; a store with a different id is a different store.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if any overridden field is invalid.
    pub fn copy_with(&self, changes: StoreChanges) -> Result<Store, ValidationError> {
        let mut builder = self.to_builder();
        if let Some(name) = changes.name {
            builder = builder.name(name)?;
        }
        if let Some(code) = changes.store_code {
            builder.store_code = code.filter(|c| !c.trim().is_empty());
        }
        if let Some(location) = changes.location {
            builder = builder.location(location);
        }
        if let Some(address) = changes.address {
            builder = builder.address(address);
        }
        if let Some(url) = changes.main_image_url {
            builder = match url {
                Some(url) => builder.main_image_url(url)?,
                None => builder.clear_main_image_url(),
            };
        }
        if let Some(flag) = changes.is_farmers_market {
            builder = builder.farmers_market(flag);
        }
        builder.build()
    }
}

/// Field overrides for [`Store::copy_with`].
///
/// For optional store fields the outer `Option` means "leave as is" when
/// `None`; `Some(None)` clears the field.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreChanges {
    #[serde(rename = "store_name")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub store_code: Option<Option<String>>,
    pub location: Option<Location>,
    pub address: Option<Address>,
    #[serde(default, deserialize_with = "double_option")]
    pub main_image_url: Option<Option<String>>,
    pub is_farmers_market: Option<bool>,
}

// Distinguishes an explicit `null` (clear) from an absent key (keep).
#[allow(clippy::option_option)]
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default)]
pub struct StoreBuilder {
    store_id: Option<StoreId>,
    name: Option<String>,
    store_code: Option<String>,
    location: Option<Location>,
    address: Option<Address>,
    main_image_url: Option<String>,
    is_farmers_market: bool,
}

impl StoreBuilder {
    #[must_use]
    pub fn store_id(mut self, id: StoreId) -> Self {
        self.store_id = Some(id);
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `value` is blank.
    pub fn name(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.name = Some(required("store_name", value.into())?);
        Ok(self)
    }

    /// Blank codes are treated as absent.
    #[must_use]
    pub fn store_code(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        self.store_code = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidField`] unless `value` parses as an
    /// absolute URL.
    pub fn main_image_url(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let value = value.trim();
        reqwest::Url::parse(value)
            .map_err(|e| ValidationError::invalid("main_image_url", e.to_string()))?;
        self.main_image_url = Some(value.to_string());
        Ok(self)
    }

    #[must_use]
    pub fn clear_main_image_url(mut self) -> Self {
        self.main_image_url = None;
        self
    }

    #[must_use]
    pub fn farmers_market(mut self, value: bool) -> Self {
        self.is_farmers_market = value;
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for the first missing
    /// required field.
    pub fn build(self) -> Result<Store, ValidationError> {
        let missing = ValidationError::MissingField;
        Ok(Store {
            store_id: self.store_id.ok_or(missing("store_id"))?,
            name: self.name.ok_or(missing("store_name"))?,
            store_code: self.store_code,
            location: self.location.ok_or(missing("location"))?,
            address: self.address.ok_or(missing("address"))?,
            main_image_url: self.main_image_url,
            is_farmers_market: self.is_farmers_market,
        })
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
