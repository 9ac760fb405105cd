//! Selection stage - one level of a dependent selection chain

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SelectionError;
use crate::ids::{OptionKey, StageId};
use crate::value_objects::SelectionOption;

/// Lifecycle status of a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Nothing requested, nothing to show
    Idle,
    /// Options are being fetched; options and selection are empty
    Loading,
    /// Options are available
    Ready,
    /// The provider failed; see the stage error
    Failed,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// State of one stage.
///
/// Mutated only through the owning [`SelectionChain`](super::SelectionChain),
/// which keeps the downstream-invalidation invariant across stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStage {
    id: StageId,
    options: Vec<SelectionOption>,
    selected: Option<OptionKey>,
    status: StageStatus,
    error: Option<String>,
}

impl SelectionStage {
    pub fn new(id: StageId) -> Self {
        Self {
            id,
            options: Vec::new(),
            selected: None,
            status: StageStatus::Idle,
            error: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &StageId {
        &self.id
    }

    pub fn options(&self) -> &[SelectionOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&OptionKey> {
        self.selected.as_ref()
    }

    pub fn status(&self) -> StageStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_option(&self, key: &OptionKey) -> bool {
        self.options.iter().any(|o| &o.key == key)
    }

    /// Ready with a selection.
    pub fn is_resolved(&self) -> bool {
        self.status == StageStatus::Ready && self.selected.is_some()
    }

    /// No options and no selection.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.selected.is_none()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    pub(crate) fn set_loading(&mut self) {
        self.status = StageStatus::Loading;
        self.options.clear();
        self.selected = None;
        self.error = None;
    }

    /// Store fetched options.
    ///
    /// A previous selection survives only if its key is still offered;
    /// otherwise the first option becomes the selection (none if empty).
    pub(crate) fn set_ready(&mut self, options: Vec<SelectionOption>) {
        let keep = self
            .selected
            .as_ref()
            .is_some_and(|key| options.iter().any(|o| &o.key == key));
        if !keep {
            self.selected = options.first().map(|o| o.key.clone());
        }
        self.options = options;
        self.status = StageStatus::Ready;
        self.error = None;
    }

    pub(crate) fn set_failed(&mut self, error: impl Into<String>) {
        self.status = StageStatus::Failed;
        self.options.clear();
        self.selected = None;
        self.error = Some(error.into());
    }

    /// Back to `Idle` with nothing to show.
    pub(crate) fn clear(&mut self) {
        self.status = StageStatus::Idle;
        self.options.clear();
        self.selected = None;
        self.error = None;
    }

    pub(crate) fn select(&mut self, key: OptionKey) -> Result<(), SelectionError> {
        if !self.has_option(&key) {
            return Err(SelectionError::invalid_selection(&self.id, &key));
        }
        self.selected = Some(key);
        Ok(())
    }

    /// Render-ready copy of this stage.
    pub fn view(&self) -> StageView {
        StageView {
            id: self.id.clone(),
            options: self.options.clone(),
            selected: self.selected.clone(),
            status: self.status,
            error: self.error.clone(),
        }
    }
}

/// Snapshot of one stage for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub id: StageId,
    pub options: Vec<SelectionOption>,
    pub selected: Option<OptionKey>,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
