//! Storefront wire types
//!
//! This crate contains the JSON shapes exchanged with the external commerce
//! service and the payload handed to the next checkout step:
//! - Locale responses (shipping countries, subdivisions)
//! - Checkout responses (checkout tokens, shipping options)
//! - Cart contents and cart mutation bodies
//! - Order capture requests and captured orders
//! - Error bodies returned by the commerce service
//! - The shipping submission payload
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - plain `String`s on the wire; conversion happens in the checkout crate

pub mod cart;
pub mod checkout;
pub mod error_body;
pub mod locale;
pub mod order;
mod ordered;
pub mod submission;

pub use cart::{
    AddToCartRequest, CartData, CartMutationResponse, LineItemData, UpdateQuantityRequest,
};
pub use checkout::{CheckoutTokenData, PriceData, ShippingOptionData, ShippingOptionsQuery};
pub use error_body::{CommerceErrorBody, CommerceErrorDetail};
pub use locale::{ShippingCountriesResponse, SubdivisionsResponse};
pub use order::{
    CaptureOrderRequest, OrderCustomer, OrderData, OrderFulfillment, OrderLineItem, OrderPayment,
    OrderShipping,
};
pub use submission::ShippingSubmission;
