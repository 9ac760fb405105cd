//! Shipping use cases.

mod prepare_checkout;
mod resolver;
mod submit_shipping;

pub use prepare_checkout::{
    PrepareCheckout, PrepareCheckoutError, PreparedCheckout, ProviderFactory,
};
pub use resolver::{ChainHandle, ChainResolver, ResolverError};
pub use submit_shipping::{SubmitShipping, SubmitShippingError};

use std::sync::Arc;

/// Container for shipping use cases.
pub struct ShippingUseCases {
    pub prepare: Arc<PrepareCheckout>,
    pub submit: Arc<SubmitShipping>,
}

impl ShippingUseCases {
    pub fn new(prepare: Arc<PrepareCheckout>, submit: Arc<SubmitShipping>) -> Self {
        Self { prepare, submit }
    }
}
