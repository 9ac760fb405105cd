//! Capture checkout use case.
//!
//! Turns a settled shipping submission and the cart's line items into an
//! order. After a successful capture the shopper gets a fresh cart.

use std::sync::Arc;

use storefront_domain::CheckoutTokenId;
use storefront_shared::{
    CaptureOrderRequest, CartData, OrderCustomer, OrderData, OrderFulfillment, OrderLineItem,
    OrderPayment, OrderShipping, ShippingSubmission,
};

use crate::infrastructure::ports::{CommerceError, CommercePort};

/// Address book label the commerce service stores the shipping address under.
const SHIPPING_ADDRESS_NAME: &str = "Primary";

/// An order the commerce service accepted.
#[derive(Debug, Clone)]
pub struct CapturedOrder {
    pub order: OrderData,
    /// The cart that replaces the checked-out one; `None` if the refresh failed.
    pub cart: Option<CartData>,
}

pub struct CaptureCheckout {
    commerce: Arc<dyn CommercePort>,
}

impl CaptureCheckout {
    pub fn new(commerce: Arc<dyn CommercePort>) -> Self {
        Self { commerce }
    }

    /// Capture the checkout named by `submission` for the items in `cart`.
    ///
    /// `payment` is forwarded untouched. A failed cart refresh does not undo
    /// the order; it is logged and reported as `cart: None`.
    pub async fn execute(
        &self,
        submission: &ShippingSubmission,
        cart: &CartData,
        payment: Option<OrderPayment>,
    ) -> Result<CapturedOrder, CaptureCheckoutError> {
        if cart.is_empty() {
            return Err(CaptureCheckoutError::EmptyCart);
        }

        let token = CheckoutTokenId::from(submission.checkout_token_id.as_str());
        let request = build_order(submission, cart, payment);
        let order = self.commerce.capture_checkout(&token, &request).await?;

        tracing::info!(
            checkout_token = %token,
            order_id = %order.id,
            reference = order.customer_reference.as_deref().unwrap_or("-"),
            "Checkout captured"
        );

        let cart = match self.commerce.refresh_cart().await {
            Ok(cart) => Some(cart),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    order_id = %order.id,
                    "Cart refresh after capture failed"
                );
                None
            }
        };

        Ok(CapturedOrder { order, cart })
    }
}

fn build_order(
    submission: &ShippingSubmission,
    cart: &CartData,
    payment: Option<OrderPayment>,
) -> CaptureOrderRequest {
    CaptureOrderRequest {
        line_items: cart
            .line_items
            .iter()
            .map(|item| {
                (
                    item.id.clone(),
                    OrderLineItem {
                        quantity: item.quantity,
                    },
                )
            })
            .collect(),
        customer: OrderCustomer {
            firstname: submission.first_name.clone(),
            lastname: submission.last_name.clone(),
            email: submission.email.clone(),
        },
        shipping: OrderShipping {
            name: SHIPPING_ADDRESS_NAME.to_string(),
            street: submission.address1.clone(),
            town_city: submission.city.clone(),
            county_state: submission.shipping_subdivision.clone(),
            postal_zip_code: submission.zip_code.clone(),
            country: submission.shipping_country.clone(),
        },
        fulfillment: OrderFulfillment {
            shipping_method: submission.shipping_option.clone(),
        },
        payment,
    }
}

/// Display text is meant for the shopper.
#[derive(Debug, thiserror::Error)]
pub enum CaptureCheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,
    #[error("{}", .0.user_message())]
    Commerce(#[from] CommerceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCommercePort;
    use crate::test_fixtures::CartFixtures;
    use serde_json::json;

    fn order(id: &str) -> OrderData {
        OrderData {
            id: id.into(),
            customer_reference: Some("STORE-1".into()),
            status_payment: Some("paid".into()),
            order_value: Some(CartFixtures::price(25.0)),
        }
    }

    #[test]
    fn order_carries_address_selections_and_line_items() {
        let request = build_order(
            &CartFixtures::submission(),
            &CartFixtures::mugs("cart_1", 2),
            None,
        );

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "line_items": { "item_mug": { "quantity": 2 } },
                "customer": {
                    "firstname": "Ada",
                    "lastname": "Lovelace",
                    "email": "ada@example.com"
                },
                "shipping": {
                    "name": "Primary",
                    "street": "12 Analytical Row",
                    "town_city": "San Francisco",
                    "county_state": "CA",
                    "postal_zip_code": "94107",
                    "country": "US"
                },
                "fulfillment": { "shipping_method": "ship_std" }
            })
        );
    }

    #[tokio::test]
    async fn capture_then_refresh_cart() {
        let mut commerce = MockCommercePort::new();
        commerce
            .expect_capture_checkout()
            .withf(|token, request| {
                token.as_str() == "chkt_1"
                    && request.fulfillment.shipping_method == "ship_std"
                    && request.payment.as_ref().map(|p| p.gateway.as_str()) == Some("test_gateway")
            })
            .times(1)
            .returning(|_, _| Ok(order("ord_1")));
        commerce
            .expect_refresh_cart()
            .times(1)
            .returning(|| Ok(CartFixtures::empty("cart_2")));

        let payment = OrderPayment {
            gateway: "test_gateway".into(),
            details: serde_json::Map::new(),
        };
        let captured = CaptureCheckout::new(Arc::new(commerce))
            .execute(
                &CartFixtures::submission(),
                &CartFixtures::mugs("cart_1", 2),
                Some(payment),
            )
            .await
            .unwrap();

        assert_eq!(captured.order.id, "ord_1");
        assert_eq!(captured.cart.map(|c| c.id).as_deref(), Some("cart_2"));
    }

    #[tokio::test]
    async fn refusal_surfaces_service_message_and_keeps_cart() {
        let mut commerce = MockCommercePort::new();
        commerce.expect_capture_checkout().returning(|_, _| {
            Err(CommerceError::api(
                422,
                "The fulfillment.shipping_method field is required.",
            ))
        });
        commerce.expect_refresh_cart().never();

        let err = CaptureCheckout::new(Arc::new(commerce))
            .execute(
                &CartFixtures::submission(),
                &CartFixtures::mugs("cart_1", 1),
                None,
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "The fulfillment.shipping_method field is required."
        );
    }

    #[tokio::test]
    async fn failed_refresh_still_reports_the_order() {
        let mut commerce = MockCommercePort::new();
        commerce
            .expect_capture_checkout()
            .returning(|_, _| Ok(order("ord_2")));
        commerce
            .expect_refresh_cart()
            .returning(|| Err(CommerceError::RequestFailed("connection reset".into())));

        let captured = CaptureCheckout::new(Arc::new(commerce))
            .execute(
                &CartFixtures::submission(),
                &CartFixtures::mugs("cart_1", 1),
                None,
            )
            .await
            .unwrap();

        assert_eq!(captured.order.id, "ord_2");
        assert!(captured.cart.is_none());
    }

    #[tokio::test]
    async fn empty_cart_is_not_captured() {
        let mut commerce = MockCommercePort::new();
        commerce.expect_capture_checkout().never();

        let err = CaptureCheckout::new(Arc::new(commerce))
            .execute(&CartFixtures::submission(), &CartFixtures::empty("cart_1"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, CaptureCheckoutError::EmptyCart));
    }
}
