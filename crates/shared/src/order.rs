//! Order capture payloads

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checkout::PriceData;

/// `POST /checkouts/{checkout_token_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureOrderRequest {
    /// Keyed by line item id
    pub line_items: BTreeMap<String, OrderLineItem>,
    pub customer: OrderCustomer,
    pub shipping: OrderShipping,
    pub fulfillment: OrderFulfillment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<OrderPayment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderShipping {
    pub name: String,
    pub street: String,
    pub town_city: String,
    pub county_state: String,
    pub postal_zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFulfillment {
    pub shipping_method: String,
}

/// Gateway name plus whatever gateway-specific fields the caller supplies.
///
/// The storefront forwards these untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPayment {
    pub gateway: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Captured order as returned by the commerce service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_payment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_value: Option<PriceData>,
}
