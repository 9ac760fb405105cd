//! Shipping address details collected next to the shipping chain

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::DomainError;

/// Recipient and address fields of the shipping form.
///
/// All fields are required. Use [`ShippingDetails::validated`] before handing
/// the details to the next checkout step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub address1: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub city: String,
    #[validate(length(min = 1, max = 20), custom(function = "not_blank"))]
    pub zip_code: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl ShippingDetails {
    /// Trim every field and validate the result.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` listing the offending fields.
    pub fn validated(self) -> Result<Self, DomainError> {
        let trimmed = Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            address1: self.address1.trim().to_string(),
            email: self.email.trim().to_string(),
            city: self.city.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
        };
        trimmed.validate()?;
        Ok(trimmed)
    }
}
