use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated US street address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAddress")]
pub struct Address {
    #[serde(rename = "address_line_1")]
    address_line1: String,
    #[serde(rename = "address_line_2", skip_serializing_if = "Option::is_none")]
    address_line2: Option<String>,
    city: String,
    state: String,
    county: String,
    zip_code: String,
    local_zip_code: Option<String>,
}

#[derive(Deserialize)]
struct RawAddress {
    address_line_1: String,
    address_line_2: Option<String>,
    city: String,
    state: String,
    county: String,
    zip_code: String,
    local_zip_code: Option<String>,
}

impl TryFrom<RawAddress> for Address {
    type Error = ValidationError;

    fn try_from(raw: RawAddress) -> Result<Self, Self::Error> {
        let mut builder = Address::builder()
            .address_line1(raw.address_line_1)?
            .city(raw.city)?
            .state(raw.state)?
            .county(raw.county)?
            .zip_code(raw.zip_code)?;
        if let Some(line2) = raw.address_line_2 {
            builder = builder.address_line2(line2);
        }
        if let Some(local) = raw.local_zip_code {
            builder = builder.local_zip_code(local)?;
        }
        builder.build()
    }
}

impl Address {
    #[must_use]
    pub fn builder() -> AddressBuilder {
        AddressBuilder::default()
    }

    #[must_use]
    pub fn address_line1(&self) -> &str {
        &self.address_line1
    }

    #[must_use]
    pub fn address_line2(&self) -> Option<&str> {
        self.address_line2.as_deref()
    }

    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn county(&self) -> &str {
        &self.county
    }

    #[must_use]
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    #[must_use]
    pub fn local_zip_code(&self) -> Option<&str> {
        self.local_zip_code.as_deref()
    }

    /// Reopen a builder holding this address's fields.
    #[must_use]
    pub fn to_builder(&self) -> AddressBuilder {
        AddressBuilder {
            address_line1: Some(self.address_line1.clone()),
            address_line2: self.address_line2.clone(),
            city: Some(self.city.clone()),
            state: Some(self.state.clone()),
            county: Some(self.county.clone()),
            zip_code: Some(self.zip_code.clone()),
            local_zip_code: self.local_zip_code.clone(),
        }
    }
}

/// Builder for [`Address`]. Each setter validates its field; [`build`]
/// checks that every required field was supplied.
///
/// [`build`]: AddressBuilder::build
#[derive(Debug, Clone, Default)]
pub struct AddressBuilder {
    address_line1: Option<String>,
    address_line2: Option<String>,
    city: Option<String>,
    state: Option<String>,
    county: Option<String>,
    zip_code: Option<String>,
    local_zip_code: Option<String>,
}

impl AddressBuilder {
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `value` is blank.
    pub fn address_line1(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.address_line1 = Some(required("address_line_1", value.into())?);
        Ok(self)
    }

    /// Blank values clear the second line.
    #[must_use]
    pub fn address_line2(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        let trimmed = value.trim();
        self.address_line2 = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `value` is blank.
    pub fn city(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.city = Some(required("city", value.into())?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `value` is blank.
    pub fn state(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.state = Some(required("state", value.into())?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if `value` is blank.
    pub fn county(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.county = Some(required("county", value.into())?);
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns an error unless `value` is exactly five ASCII digits.
    pub fn zip_code(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        self.zip_code = Some(validate_zip_code(&value.into())?);
        Ok(self)
    }

    /// The ZIP+4 suffix.
    ///
    /// # Errors
    ///
    /// Returns an error unless `value` is exactly four ASCII digits.
    pub fn local_zip_code(mut self, value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let value = value.trim();
        if !is_digits(value, 4) {
            return Err(ValidationError::invalid(
                "local_zip_code",
                format!("expected 4 digits, got '{value}'"),
            ));
        }
        self.local_zip_code = Some(value.to_string());
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first required
    /// field that was never set.
    pub fn build(self) -> Result<Address, ValidationError> {
        Ok(Address {
            address_line1: self
                .address_line1
                .ok_or(ValidationError::MissingField("address_line_1"))?,
            address_line2: self.address_line2,
            city: self.city.ok_or(ValidationError::MissingField("city"))?,
            state: self.state.ok_or(ValidationError::MissingField("state"))?,
            county: self.county.ok_or(ValidationError::MissingField("county"))?,
            zip_code: self
                .zip_code
                .ok_or(ValidationError::MissingField("zip_code"))?,
            local_zip_code: self.local_zip_code,
        })
    }
}

/// Validate and trim a five-digit ZIP code.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidField`] for anything but five ASCII digits.
pub fn validate_zip_code(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if is_digits(value, 5) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::invalid(
            "zip_code",
            format!("expected 5 digits, got '{value}'"),
        ))
    }
}

pub(crate) fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_string())
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}
