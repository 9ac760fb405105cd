//! Locale service responses

use serde::{Deserialize, Serialize};

use crate::ordered::{deserialize_pairs, serialize_pairs};

/// `GET /services/locale/{checkout_token_id}/countries`
///
/// Countries the checkout can ship to, as `(code, name)` pairs in the order
/// the service listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingCountriesResponse {
    #[serde(
        deserialize_with = "deserialize_pairs",
        serialize_with = "serialize_pairs",
        default
    )]
    pub countries: Vec<(String, String)>,
}

/// `GET /services/locale/{country_code}/subdivisions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdivisionsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(
        deserialize_with = "deserialize_pairs",
        serialize_with = "serialize_pairs",
        default
    )]
    pub subdivisions: Vec<(String, String)>,
}
