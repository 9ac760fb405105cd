//! Application state and composition.

use std::sync::Arc;

use storefront_domain::CheckoutTokenId;

use crate::infrastructure::{
    ports::{CommercePort, OptionProviderPort},
    resilient_provider::{ResilientOptionProvider, RetryConfig},
    shipping_provider::ShippingOptionProvider,
};
use crate::use_cases;
use crate::use_cases::cart::ManageCart;
use crate::use_cases::order::CaptureCheckout;
use crate::use_cases::shipping::{PrepareCheckout, ProviderFactory, SubmitShipping};

/// Main application state.
///
/// Holds the commerce port and the use cases built on top of it.
pub struct App {
    pub use_cases: UseCases,
    pub commerce: Arc<dyn CommercePort>,
}

/// Container for all use cases.
pub struct UseCases {
    pub cart: use_cases::CartUseCases,
    pub shipping: use_cases::ShippingUseCases,
    pub order: use_cases::OrderUseCases,
}

impl App {
    /// Wire the use cases around `commerce`.
    ///
    /// Every checkout gets its own shipping option provider, wrapped with
    /// timeouts and retries according to `retry`.
    pub fn new(commerce: Arc<dyn CommercePort>, retry: RetryConfig) -> Self {
        let providers: ProviderFactory = {
            let commerce = Arc::clone(&commerce);
            Arc::new(move |token: CheckoutTokenId| {
                let shipping = ShippingOptionProvider::new(Arc::clone(&commerce), token);
                Arc::new(ResilientOptionProvider::new(
                    Arc::new(shipping),
                    retry.clone(),
                )) as Arc<dyn OptionProviderPort>
            })
        };

        let shipping = use_cases::ShippingUseCases::new(
            Arc::new(PrepareCheckout::new(Arc::clone(&commerce), providers)),
            Arc::new(SubmitShipping::new()),
        );

        let cart = use_cases::CartUseCases::new(Arc::new(ManageCart::new(Arc::clone(&commerce))));
        let order =
            use_cases::OrderUseCases::new(Arc::new(CaptureCheckout::new(Arc::clone(&commerce))));

        Self {
            use_cases: UseCases {
                cart,
                shipping,
                order,
            },
            commerce,
        }
    }
}
