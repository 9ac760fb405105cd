//! Cart use cases.

mod manage_cart;

pub use manage_cart::{CartError, ManageCart};

use std::sync::Arc;

/// Container for cart use cases.
pub struct CartUseCases {
    pub manage: Arc<ManageCart>,
}

impl CartUseCases {
    pub fn new(manage: Arc<ManageCart>) -> Self {
        Self { manage }
    }
}
