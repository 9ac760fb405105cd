//! Commerce REST API client

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use storefront_domain::{CartId, CheckoutTokenId, LineItemId, ProductId};
use storefront_shared::{
    AddToCartRequest, CaptureOrderRequest, CartData, CartMutationResponse, CheckoutTokenData,
    CommerceErrorBody, OrderData, ShippingCountriesResponse, ShippingOptionData,
    ShippingOptionsQuery, SubdivisionsResponse, UpdateQuantityRequest,
};

use crate::infrastructure::ports::{CommerceError, CommercePort};

/// Default commerce API base URL.
pub const DEFAULT_COMMERCE_API_URL: &str = "https://api.chec.io/v1";

/// Header carrying the public API key.
const AUTH_HEADER: &str = "X-Authorization";

/// Client for the commerce service's public (storefront) API
#[derive(Clone)]
pub struct CommerceClient {
    client: Client,
    base_url: Url,
    public_key: String,
}

impl CommerceClient {
    /// # Errors
    ///
    /// Returns `CommerceError::Config` if `base_url` is not an absolute URL with a path.
    pub fn new(base_url: &str, public_key: &str, timeout: Duration) -> Result<Self, CommerceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CommerceError::Config(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CommerceError::Config(format!(
                "base url '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            base_url,
            public_key: public_key.to_string(),
        })
    }

    /// Base URL plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CommerceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CommerceError::Config(format!("base url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request for `segments` with the storefront headers attached.
    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, CommerceError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(method = %method, url = %url, "Commerce API request");

        Ok(self
            .client
            .request(method, url)
            .header(AUTH_HEADER, &self.public_key)
            .header(ACCEPT, "application/json"))
    }

    fn get(&self, segments: &[&str]) -> Result<RequestBuilder, CommerceError> {
        self.request(Method::GET, segments)
    }

    /// Cart mutations answer with a wrapper; callers only want the cart.
    async fn send_cart_mutation(&self, request: RequestBuilder) -> Result<CartData, CommerceError> {
        let response: CartMutationResponse = self.send_json(request).await?;
        Ok(response.cart)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CommerceError> {
        let response = request
            .send()
            .await
            .map_err(|e| CommerceError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| CommerceError::RequestFailed(e.to_string()))?;
            let message = CommerceErrorBody::message_from(&body).unwrap_or(body);
            return Err(CommerceError::api(status.as_u16(), message));
        }

        // Decode straight from the body: locale maps rely on document order.
        response
            .json::<T>()
            .await
            .map_err(|e| CommerceError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl CommercePort for CommerceClient {
    async fn generate_checkout_token(
        &self,
        cart_id: &CartId,
    ) -> Result<CheckoutTokenData, CommerceError> {
        let request = self
            .get(&["checkouts", cart_id.as_str()])?
            .query(&[("type", "cart")]);
        self.send_json(request).await
    }

    async fn list_shipping_countries(
        &self,
        token: &CheckoutTokenId,
    ) -> Result<ShippingCountriesResponse, CommerceError> {
        let request = self.get(&["services", "locale", token.as_str(), "countries"])?;
        self.send_json(request).await
    }

    async fn list_subdivisions(
        &self,
        country: &str,
    ) -> Result<SubdivisionsResponse, CommerceError> {
        let request = self.get(&["services", "locale", country, "subdivisions"])?;
        self.send_json(request).await
    }

    async fn get_shipping_options(
        &self,
        token: &CheckoutTokenId,
        query: &ShippingOptionsQuery,
    ) -> Result<Vec<ShippingOptionData>, CommerceError> {
        let request = self
            .get(&["checkouts", token.as_str(), "helper", "shipping_options"])?
            .query(query);
        self.send_json(request).await
    }

    async fn retrieve_cart(&self, cart_id: &CartId) -> Result<CartData, CommerceError> {
        let request = self.get(&["carts", cart_id.as_str()])?;
        self.send_json(request).await
    }

    async fn add_to_cart(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartData, CommerceError> {
        let body = AddToCartRequest {
            id: product_id.to_string(),
            quantity,
        };
        let request = self
            .request(Method::POST, &["carts", cart_id.as_str()])?
            .json(&body);
        self.send_cart_mutation(request).await
    }

    async fn update_cart_qty(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: u32,
    ) -> Result<CartData, CommerceError> {
        let request = self
            .request(
                Method::PUT,
                &["carts", cart_id.as_str(), "items", line_item_id.as_str()],
            )?
            .json(&UpdateQuantityRequest { quantity });
        self.send_cart_mutation(request).await
    }

    async fn remove_from_cart(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<CartData, CommerceError> {
        let request = self.request(
            Method::DELETE,
            &["carts", cart_id.as_str(), "items", line_item_id.as_str()],
        )?;
        self.send_cart_mutation(request).await
    }

    async fn empty_cart(&self, cart_id: &CartId) -> Result<CartData, CommerceError> {
        let request = self.request(Method::DELETE, &["carts", cart_id.as_str(), "items"])?;
        self.send_cart_mutation(request).await
    }

    async fn refresh_cart(&self) -> Result<CartData, CommerceError> {
        let request = self.get(&["carts"])?;
        self.send_json(request).await
    }

    async fn capture_checkout(
        &self,
        token: &CheckoutTokenId,
        order: &CaptureOrderRequest,
    ) -> Result<OrderData, CommerceError> {
        let request = self
            .request(Method::POST, &["checkouts", token.as_str()])?
            .json(order);
        self.send_json(request).await
    }
}
