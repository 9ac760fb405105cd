//! Submission gate - decides when a chain's selections can be handed on

use crate::aggregates::selection_chain::SelectionChain;
use crate::error::SelectionError;
use crate::ids::StageId;
use crate::value_objects::ChainSnapshot;

impl SelectionChain {
    /// Every stage is `Ready` with a selection.
    pub fn is_complete(&self) -> bool {
        self.stages().iter().all(|s| s.is_resolved())
    }

    /// First stage (in chain order) that is not resolved.
    pub fn first_unresolved(&self) -> Option<&StageId> {
        self.stages()
            .iter()
            .find(|s| !s.is_resolved())
            .map(|s| s.id())
    }

    /// The ordered `stage id -> key` map of a complete chain.
    ///
    /// # Errors
    ///
    /// Returns `IncompleteChain` naming the first unresolved stage.
    pub fn snapshot(&self) -> Result<ChainSnapshot, SelectionError> {
        if let Some(stage) = self.first_unresolved() {
            return Err(SelectionError::incomplete(stage));
        }
        let entries = self
            .stages()
            .iter()
            .filter_map(|s| s.selected().map(|key| (s.id().clone(), key.clone())))
            .collect();
        Ok(ChainSnapshot::from_entries(entries))
    }
}
