//! Payload handed to the next checkout step once shipping is settled

use serde::{Deserialize, Serialize};

/// Address fields plus the resolved shipping selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSubmission {
    pub checkout_token_id: String,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub email: String,
    pub city: String,
    pub zip_code: String,
    pub shipping_country: String,
    pub shipping_subdivision: String,
    pub shipping_option: String,
}
