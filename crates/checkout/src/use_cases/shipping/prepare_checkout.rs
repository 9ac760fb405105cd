//! Prepare checkout use case.
//!
//! Turns a cart into a checkout token and starts the shipping chain
//! (country, subdivision, shipping method) for it.

use std::sync::Arc;

use storefront_domain::{CartId, CheckoutTokenId, DomainError, SelectionChain, ShippingStage};

use crate::infrastructure::ports::{CommerceError, CommercePort, OptionProviderPort};

use super::resolver::{ChainHandle, ChainResolver};

/// Builds the option provider serving one checkout token.
pub type ProviderFactory =
    Arc<dyn Fn(CheckoutTokenId) -> Arc<dyn OptionProviderPort> + Send + Sync>;

/// A checkout whose shipping chain is running.
#[derive(Clone)]
pub struct PreparedCheckout {
    pub checkout_token: CheckoutTokenId,
    pub shipping: ChainHandle,
}

pub struct PrepareCheckout {
    commerce: Arc<dyn CommercePort>,
    providers: ProviderFactory,
}

impl PrepareCheckout {
    pub fn new(commerce: Arc<dyn CommercePort>, providers: ProviderFactory) -> Self {
        Self {
            commerce,
            providers,
        }
    }

    /// Generate a checkout token for `cart_id` and start its shipping chain.
    ///
    /// Returns as soon as the chain is running; its stages are `Loading`
    /// until the provider answers.
    pub async fn execute(&self, cart_id: &CartId) -> Result<PreparedCheckout, PrepareCheckoutError> {
        let token = self.commerce.generate_checkout_token(cart_id).await?;
        let checkout_token = CheckoutTokenId::from(token.id);

        let chain = SelectionChain::new(ShippingStage::chain_ids())?;
        let provider = (self.providers)(checkout_token.clone());
        let shipping = ChainResolver::spawn(chain, provider);

        tracing::info!(
            cart_id = %cart_id,
            checkout_token = %checkout_token,
            chain_id = %shipping.chain_id(),
            "Checkout prepared"
        );

        Ok(PreparedCheckout {
            checkout_token,
            shipping,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrepareCheckoutError {
    #[error("Could not create checkout: {0}")]
    Commerce(#[from] CommerceError),
    #[error("Invalid shipping chain: {0}")]
    Domain(#[from] DomainError),
}
