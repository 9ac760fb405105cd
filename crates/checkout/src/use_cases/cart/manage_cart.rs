//! Manage cart use case.
//!
//! Reads and changes the shopper's cart. Every operation answers with the
//! cart as the commerce service holds it afterwards.

use std::sync::Arc;

use storefront_domain::{CartId, DomainError, LineItemId, ProductId};
use storefront_shared::CartData;

use crate::infrastructure::ports::{CommerceError, CommercePort};

pub struct ManageCart {
    commerce: Arc<dyn CommercePort>,
}

impl ManageCart {
    pub fn new(commerce: Arc<dyn CommercePort>) -> Self {
        Self { commerce }
    }

    pub async fn retrieve(&self, cart_id: &CartId) -> Result<CartData, CartError> {
        Ok(self.commerce.retrieve_cart(cart_id).await?)
    }

    /// Add `quantity` of a product.
    ///
    /// # Errors
    ///
    /// `CartError::Domain` if `quantity` is zero.
    pub async fn add(
        &self,
        cart_id: &CartId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartData, CartError> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1").into());
        }
        let cart = self
            .commerce
            .add_to_cart(cart_id, product_id, quantity)
            .await?;

        tracing::info!(
            cart_id = %cart_id,
            product_id = %product_id,
            quantity,
            total_items = cart.total_items,
            "Added to cart"
        );
        Ok(cart)
    }

    /// Set a line item's quantity; zero removes the line item.
    pub async fn update_quantity(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
        quantity: u32,
    ) -> Result<CartData, CartError> {
        if quantity == 0 {
            return self.remove(cart_id, line_item_id).await;
        }
        let cart = self
            .commerce
            .update_cart_qty(cart_id, line_item_id, quantity)
            .await?;

        tracing::debug!(
            cart_id = %cart_id,
            line_item_id = %line_item_id,
            quantity,
            "Cart quantity updated"
        );
        Ok(cart)
    }

    pub async fn remove(
        &self,
        cart_id: &CartId,
        line_item_id: &LineItemId,
    ) -> Result<CartData, CartError> {
        let cart = self.commerce.remove_from_cart(cart_id, line_item_id).await?;
        tracing::debug!(cart_id = %cart_id, line_item_id = %line_item_id, "Removed from cart");
        Ok(cart)
    }

    pub async fn empty(&self, cart_id: &CartId) -> Result<CartData, CartError> {
        let cart = self.commerce.empty_cart(cart_id).await?;
        tracing::info!(cart_id = %cart_id, "Cart emptied");
        Ok(cart)
    }

    /// Drop the current cart and start a new, empty one.
    pub async fn refresh(&self) -> Result<CartData, CartError> {
        let cart = self.commerce.refresh_cart().await?;
        tracing::info!(cart_id = %cart.id, "Started a new cart");
        Ok(cart)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Invalid cart change: {0}")]
    Domain(#[from] DomainError),
    #[error("{}", .0.user_message())]
    Commerce(#[from] CommerceError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCommercePort;
    use crate::test_fixtures::CartFixtures;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn add_forwards_product_and_quantity() {
        let mut commerce = MockCommercePort::new();
        commerce
            .expect_add_to_cart()
            .with(eq(CartId::from("cart_1")), eq(ProductId::from("prod_mug")), eq(2))
            .times(1)
            .returning(|cart, _, quantity| Ok(CartFixtures::mugs(cart.as_str(), quantity)));

        let cart = ManageCart::new(Arc::new(commerce))
            .add(&CartId::from("cart_1"), &ProductId::from("prod_mug"), 2)
            .await
            .unwrap();

        assert_eq!(cart.total_items, 2);
    }

    #[tokio::test]
    async fn zero_quantity_add_never_reaches_the_service() {
        let mut commerce = MockCommercePort::new();
        commerce.expect_add_to_cart().never();

        let err = ManageCart::new(Arc::new(commerce))
            .add(&CartId::from("cart_1"), &ProductId::from("prod_mug"), 0)
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn zero_quantity_update_removes_line_item() {
        let mut commerce = MockCommercePort::new();
        commerce.expect_update_cart_qty().never();
        commerce
            .expect_remove_from_cart()
            .with(eq(CartId::from("cart_1")), eq(LineItemId::from("item_mug")))
            .times(1)
            .returning(|cart, _| Ok(CartFixtures::empty(cart.as_str())));

        let cart = ManageCart::new(Arc::new(commerce))
            .update_quantity(&CartId::from("cart_1"), &LineItemId::from("item_mug"), 0)
            .await
            .unwrap();

        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn update_sets_quantity() {
        let mut commerce = MockCommercePort::new();
        commerce
            .expect_update_cart_qty()
            .with(eq(CartId::from("cart_1")), eq(LineItemId::from("item_mug")), eq(3))
            .times(1)
            .returning(|cart, _, quantity| Ok(CartFixtures::mugs(cart.as_str(), quantity)));

        let cart = ManageCart::new(Arc::new(commerce))
            .update_quantity(&CartId::from("cart_1"), &LineItemId::from("item_mug"), 3)
            .await
            .unwrap();

        assert_eq!(cart.line_item("item_mug").map(|i| i.quantity), Some(3));
    }

    #[tokio::test]
    async fn retrieve_empty_and_refresh_pass_through() {
        let mut commerce = MockCommercePort::new();
        commerce
            .expect_retrieve_cart()
            .returning(|cart| Ok(CartFixtures::mugs(cart.as_str(), 1)));
        commerce
            .expect_empty_cart()
            .returning(|cart| Ok(CartFixtures::empty(cart.as_str())));
        commerce
            .expect_refresh_cart()
            .returning(|| Ok(CartFixtures::empty("cart_2")));
        let carts = ManageCart::new(Arc::new(commerce));
        let cart_id = CartId::from("cart_1");

        assert_eq!(carts.retrieve(&cart_id).await.unwrap().total_items, 1);
        assert!(carts.empty(&cart_id).await.unwrap().is_empty());
        assert_eq!(carts.refresh().await.unwrap().id, "cart_2");
    }

    #[tokio::test]
    async fn service_refusal_shows_service_message() {
        let mut commerce = MockCommercePort::new();
        commerce
            .expect_retrieve_cart()
            .returning(|_| Err(CommerceError::api(404, "Cart not found")));

        let err = ManageCart::new(Arc::new(commerce))
            .retrieve(&CartId::from("cart_gone"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Cart not found");
    }
}
