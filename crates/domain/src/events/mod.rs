//! Domain Events
//!
//! ## Aggregate Mutation Events
//!
//! The `chain_events` submodule contains return types from selection chain
//! mutations, communicating what happened when state was modified. The
//! resolver logs them and acts on the fetch effects they carry.

pub mod chain_events;

pub use chain_events::*;
