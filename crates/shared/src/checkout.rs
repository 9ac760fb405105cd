//! Checkout service responses

use serde::{Deserialize, Serialize};

/// `GET /checkouts/{cart_id}?type=cart`
///
/// Only the fields the storefront reads are modelled; the rest of the token
/// body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutTokenData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,
    /// Unix timestamp after which the token is no longer accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
}

/// Monetary amount as rendered by the commerce service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub raw: f64,
    #[serde(default)]
    pub formatted: String,
    pub formatted_with_symbol: String,
}

/// One entry of `GET /checkouts/{checkout_token_id}/helper/shipping_options`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOptionData {
    pub id: String,
    pub description: String,
    pub price: PriceData,
    #[serde(default)]
    pub countries: Vec<String>,
}

impl ShippingOptionData {
    /// Display label, e.g. `"Standard - ($5.00)"`.
    pub fn label(&self) -> String {
        format!("{} - ({})", self.description, self.price.formatted_with_symbol)
    }
}

/// Query string of the shipping options helper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingOptionsQuery {
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}
