//! Storefront domain.
//!
//! Pure types for the dependent selection chain used at checkout
//! (country, then subdivision, then shipping method). No I/O and no async
//! runtime: the checkout crate drives the chain and talks to the commerce
//! backend.

pub mod aggregates;
pub mod error;
pub mod events;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    ChainView, FetchRequest, SelectionChain, SelectionStage, StageStatus, StageView,
};
pub use error::{DomainError, SelectionError};
pub use events::FetchOutcome;
pub use ids::{CartId, ChainId, CheckoutTokenId, LineItemId, OptionKey, ProductId, StageId};
pub use value_objects::{
    ensure_unique_keys, ChainSnapshot, ResolutionContext, SelectionOption, ShippingDetails,
    ShippingStage,
};
