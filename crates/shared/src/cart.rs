//! Cart service payloads

use serde::{Deserialize, Serialize};

use crate::checkout::PriceData;

/// `GET /carts/{cart_id}`, and the `cart` member of every cart mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartData {
    pub id: String,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_unique_items: u32,
    pub subtotal: PriceData,
    #[serde(default)]
    pub line_items: Vec<LineItemData>,
}

impl CartData {
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    pub fn line_item(&self, id: &str) -> Option<&LineItemData> {
        self.line_items.iter().find(|item| item.id == id)
    }
}

/// One product in a cart, with its quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemData {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: PriceData,
    pub line_total: PriceData,
}

/// Response of add, update, remove and empty: the cart after the change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartMutationResponse {
    #[serde(default)]
    pub success: bool,
    pub cart: CartData,
}

/// `POST /carts/{cart_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    /// Product id
    pub id: String,
    pub quantity: u32,
}

/// `PUT /carts/{cart_id}/items/{line_item_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}
