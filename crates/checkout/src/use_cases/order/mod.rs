//! Order use cases.

mod capture_checkout;

pub use capture_checkout::{CaptureCheckout, CaptureCheckoutError, CapturedOrder};

use std::sync::Arc;

/// Container for order use cases.
pub struct OrderUseCases {
    pub capture: Arc<CaptureCheckout>,
}

impl OrderUseCases {
    pub fn new(capture: Arc<CaptureCheckout>) -> Self {
        Self { capture }
    }
}
