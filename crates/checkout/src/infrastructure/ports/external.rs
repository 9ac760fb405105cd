//! External service port traits (option provider, commerce API).

use async_trait::async_trait;
use storefront_domain::{
    CartId, CheckoutTokenId, LineItemId, ProductId, ResolutionContext, SelectionOption, StageId,
};
use storefront_shared::{
    CaptureOrderRequest, CartData, CheckoutTokenData, OrderData, ShippingCountriesResponse,
    ShippingOptionData, ShippingOptionsQuery, SubdivisionsResponse,
};

use super::error::{CommerceError, ProviderError};

// =============================================================================
// Option Provider
// =============================================================================

/// Source of the options for one stage of a selection chain.
///
/// `context` carries the selections of every stage before `stage`, in chain
/// order. Implementations may take arbitrarily long; the resolver discards
/// answers that arrive after the request was superseded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OptionProviderPort: Send + Sync {
    async fn fetch_options(
        &self,
        stage: &StageId,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError>;
}

// =============================================================================
// Commerce API
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommercePort: Send + Sync {
    /// `GET /checkouts/{cart_id}?type=cart`
    async fn generate_checkout_token(
        &self,
        cart_id: &CartId,
    ) -> Result<CheckoutTokenData, CommerceError>;

    /// `GET /services/locale/{checkout_token_id}/countries`
    async fn list_shipping_countries(
        &self,
        token: &CheckoutTokenId,
    ) -> Result<ShippingCountriesResponse, CommerceError>;

    /// `GET /services/locale/{country_code}/subdivisions`
    async fn list_subdivisions(&self, country: &str)
        -> Result<SubdivisionsResponse, CommerceError>;

    /// `GET /checkouts/{checkout_token_id}/helper/shipping_options`
    async fn get_shipping_options(
        &self,
        token: &CheckoutTokenId,
        query: &ShippingOptionsQuery,
    ) -> Result<Vec<ShippingOptionData>, CommerceError>;

    /// `GET /carts/{cart_id}`
    async fn retrieve_cart(&self, cart_id: &CartId) -> Result<CartData, CommerceError>;

    /// `POST /carts/{cart_id}`
    async fn add_to_cart(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartData, CommerceError>;

    /// `PUT /carts/{cart_id}/items/{line_item_id}`
    async fn update_cart_qty(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: u32,
    ) -> Result<CartData, CommerceError>;

    /// `DELETE /carts/{cart_id}/items/{line_item_id}`
    async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<CartData, CommerceError>;

    /// `DELETE /carts/{cart_id}/items`
    async fn empty_cart(&self, cart_id: &CartId) -> Result<CartData, CommerceError>;

    /// `GET /carts` - starts a new, empty cart
    async fn refresh_cart(&self) -> Result<CartData, CommerceError>;

    /// `POST /checkouts/{checkout_token_id}`
    async fn capture_checkout(
        &self,
        token: &CheckoutTokenId,
        order: &CaptureOrderRequest,
    ) -> Result<OrderData, CommerceError>;
}
