//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod commerce;
pub mod ports;
pub mod resilient_provider;
pub mod settings;
pub mod shipping_provider;
