//! Value objects - Immutable objects defined by their attributes

mod chain_snapshot;
mod resolution_context;
mod selection_option;
mod shipping_details;
mod shipping_stage;

pub use chain_snapshot::ChainSnapshot;
pub use resolution_context::ResolutionContext;
pub use selection_option::{ensure_unique_keys, SelectionOption};
pub use shipping_details::ShippingDetails;
pub use shipping_stage::ShippingStage;
