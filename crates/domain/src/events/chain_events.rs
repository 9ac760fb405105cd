//! Selection chain mutation outcomes

use crate::aggregates::FetchRequest;
use crate::ids::{OptionKey, StageId};

/// Outcome of applying a provider response to a chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Options stored, the first one was selected, and the next stage must be fetched
    Cascaded {
        stage: StageId,
        selected: OptionKey,
        next: FetchRequest,
    },
    /// Options stored and the last stage of the chain resolved
    Completed { stage: StageId, selected: OptionKey },
    /// The provider returned no options; the cascade stops here
    Exhausted { stage: StageId },
    /// The provider failed; the stage is `Failed` and the cascade stops here
    Failed { stage: StageId, error: String },
    /// The response answers a superseded request; nothing changed
    Stale { stage: StageId, seq: u64 },
}

impl FetchOutcome {
    /// The follow-up fetch this outcome requires, if any.
    pub fn next_request(&self) -> Option<&FetchRequest> {
        match self {
            Self::Cascaded { next, .. } => Some(next),
            _ => None,
        }
    }

    pub fn into_next_request(self) -> Option<FetchRequest> {
        match self {
            Self::Cascaded { next, .. } => Some(next),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }

    pub fn stage(&self) -> &StageId {
        match self {
            Self::Cascaded { stage, .. }
            | Self::Completed { stage, .. }
            | Self::Exhausted { stage }
            | Self::Failed { stage, .. }
            | Self::Stale { stage, .. } => stage,
        }
    }
}
