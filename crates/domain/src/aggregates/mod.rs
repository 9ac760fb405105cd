//! Aggregate roots - domain objects that own their related data
//!
//! The selection chain owns its stages. Stage transitions are crate-private,
//! so the chain is the only thing that can move a stage between statuses, and
//! every chain mutation returns what happened (see `events`).

pub mod selection_chain;
pub mod selection_stage;
mod submission_gate;

pub use selection_chain::{ChainView, FetchRequest, SelectionChain};
pub use selection_stage::{SelectionStage, StageStatus, StageView};
