//! Use cases - user story orchestration.
//!
//! Use cases coordinate ports and the domain. They are the primary entry
//! points for the binary and for any storefront front end.

pub mod cart;
pub mod order;
pub mod shipping;

pub use cart::CartUseCases;
pub use order::OrderUseCases;
pub use shipping::ShippingUseCases;
