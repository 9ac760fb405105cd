//! Selection chain - ordered stages where each stage depends on the ones before it
//!
//! The chain is a pure state machine. Transitions mutate the chain and return
//! the fetch they require as an explicit [`FetchRequest`] value; performing
//! the fetch and feeding the result back through [`SelectionChain::apply_fetch`]
//! is the caller's job.
//!
//! # Invariants
//!
//! - Downstream invalidation: if stage `i` has no selection, every stage `j > i`
//!   has no options and no selection.
//! - At most one request per stage is current. Any change upstream of a stage
//!   retires its current request, so late responses are reported as
//!   [`FetchOutcome::Stale`] and never touch state.

use std::collections::HashSet;

use serde::Serialize;

use crate::aggregates::selection_stage::{SelectionStage, StageStatus, StageView};
use crate::error::{DomainError, SelectionError};
use crate::events::FetchOutcome;
use crate::ids::{ChainId, OptionKey, StageId};
use crate::value_objects::{ensure_unique_keys, ResolutionContext, SelectionOption};

/// A fetch the chain needs performed: options for `stage` given `context`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub chain_id: ChainId,
    pub stage_index: usize,
    pub stage: StageId,
    pub seq: u64,
    pub context: ResolutionContext,
}

/// Render-ready copy of the whole chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainView {
    pub chain_id: ChainId,
    pub stages: Vec<StageView>,
    pub complete: bool,
}

impl ChainView {
    /// No stage is waiting on the provider.
    pub fn is_settled(&self) -> bool {
        self.stages.iter().all(|s| s.status != StageStatus::Loading)
    }

    pub fn stage(&self, id: &str) -> Option<&StageView> {
        self.stages.iter().find(|s| s.id.as_str() == id)
    }
}

#[derive(Debug, Clone)]
pub struct SelectionChain {
    id: ChainId,
    stages: Vec<SelectionStage>,
    /// Sequence number of the current request per stage
    pending: Vec<Option<u64>>,
    last_seq: u64,
}

impl SelectionChain {
    /// Create a chain over the given stage ids, in order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if there are no stages or an id repeats.
    pub fn new(stage_ids: Vec<StageId>) -> Result<Self, DomainError> {
        if stage_ids.is_empty() {
            return Err(DomainError::validation("a selection chain needs at least one stage"));
        }
        let mut seen = HashSet::with_capacity(stage_ids.len());
        for id in &stage_ids {
            if !seen.insert(id.as_str()) {
                return Err(DomainError::validation(format!("duplicate stage id '{}'", id)));
            }
        }

        let pending = vec![None; stage_ids.len()];
        Ok(Self {
            id: ChainId::new(),
            stages: stage_ids.into_iter().map(SelectionStage::new).collect(),
            pending,
            last_seq: 0,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> ChainId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[SelectionStage] {
        &self.stages
    }

    pub fn stage(&self, id: &StageId) -> Result<&SelectionStage, SelectionError> {
        let index = self.index_of(id)?;
        Ok(&self.stages[index])
    }

    pub fn stage_view(&self, id: &StageId) -> Result<StageView, SelectionError> {
        self.stage(id).map(SelectionStage::view)
    }

    pub fn view(&self) -> ChainView {
        ChainView {
            chain_id: self.id,
            stages: self.stages.iter().map(SelectionStage::view).collect(),
            complete: self.is_complete(),
        }
    }

    /// Whether `request` is still the current request for its stage.
    pub fn is_current(&self, request: &FetchRequest) -> bool {
        request.chain_id == self.id
            && self
                .pending
                .get(request.stage_index)
                .is_some_and(|p| *p == Some(request.seq))
    }

    fn index_of(&self, id: &StageId) -> Result<usize, SelectionError> {
        self.stages
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| SelectionError::UnknownStage(id.clone()))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Put every stage into `Loading` and request stage 0 with an empty context.
    pub fn start(&mut self) -> FetchRequest {
        self.await_from(0);
        let request = self.issue_request(0);
        self.debug_check();
        request
    }

    /// A user picked `key` at `stage`.
    ///
    /// Every downstream stage goes to `Loading` before this returns, and the
    /// fetch for the next stage is returned. Re-selecting the current key is a
    /// no-op and returns `Ok(None)`, as does changing the last stage.
    ///
    /// # Errors
    ///
    /// - `UnknownStage` if the stage is not part of this chain
    /// - `InvalidSelection` if `key` is not one of the stage's current options
    pub fn select(
        &mut self,
        stage: &StageId,
        key: OptionKey,
    ) -> Result<Option<FetchRequest>, SelectionError> {
        let index = self.index_of(stage)?;
        if self.stages[index].selected() == Some(&key) && self.stages[index].is_resolved() {
            return Ok(None);
        }
        self.stages[index].select(key)?;
        let request = self.cascade_from(index);
        self.debug_check();
        Ok(request)
    }

    /// Re-request a stage that failed or came back empty.
    ///
    /// # Errors
    ///
    /// - `UnknownStage` if the stage is not part of this chain
    /// - `InvalidTransition` unless the stage is `Failed`, or `Ready` with no options
    pub fn retry(&mut self, stage: &StageId) -> Result<FetchRequest, SelectionError> {
        let index = self.index_of(stage)?;
        let current = &self.stages[index];
        let retryable = match current.status() {
            StageStatus::Failed => true,
            StageStatus::Ready => current.options().is_empty(),
            StageStatus::Idle | StageStatus::Loading => false,
        };
        if !retryable {
            return Err(SelectionError::invalid_transition(stage, current.status()));
        }

        self.await_from(index);
        let request = self.issue_request(index);
        self.debug_check();
        Ok(request)
    }

    /// Feed a provider response back into the chain.
    ///
    /// Responses to superseded requests are ignored and reported as
    /// [`FetchOutcome::Stale`]. A non-empty option list selects its first
    /// entry and cascades to the next stage; an empty list or a failure stops
    /// the cascade and clears every stage after it.
    pub fn apply_fetch(
        &mut self,
        request: &FetchRequest,
        result: Result<Vec<SelectionOption>, String>,
    ) -> FetchOutcome {
        if !self.is_current(request) {
            return FetchOutcome::Stale {
                stage: request.stage.clone(),
                seq: request.seq,
            };
        }

        let index = request.stage_index;
        self.pending[index] = None;

        let outcome = match result.and_then(|options| {
            ensure_unique_keys(&options)
                .map(|_| options)
                .map_err(|e| e.to_string())
        }) {
            Err(error) => {
                self.stages[index].set_failed(error.clone());
                self.clear_after(index);
                FetchOutcome::Failed {
                    stage: request.stage.clone(),
                    error,
                }
            }
            Ok(options) => {
                self.stages[index].set_ready(options);
                match self.stages[index].selected().cloned() {
                    None => {
                        self.clear_after(index);
                        FetchOutcome::Exhausted {
                            stage: request.stage.clone(),
                        }
                    }
                    Some(selected) => match self.cascade_from(index) {
                        Some(next) => FetchOutcome::Cascaded {
                            stage: request.stage.clone(),
                            selected,
                            next,
                        },
                        None => FetchOutcome::Completed {
                            stage: request.stage.clone(),
                            selected,
                        },
                    },
                }
            }
        };

        self.debug_check();
        outcome
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Invalidate everything after `index` and request `index + 1`, if it exists.
    fn cascade_from(&mut self, index: usize) -> Option<FetchRequest> {
        let next = index + 1;
        if next >= self.stages.len() {
            return None;
        }
        self.await_from(next);
        Some(self.issue_request(next))
    }

    /// Stages `from..` go to `Loading` and lose any current request.
    fn await_from(&mut self, from: usize) {
        for j in from..self.stages.len() {
            self.stages[j].set_loading();
            self.pending[j] = None;
        }
    }

    /// Stages after `index` go back to `Idle` and lose any current request.
    fn clear_after(&mut self, index: usize) {
        for j in index + 1..self.stages.len() {
            self.stages[j].clear();
            self.pending[j] = None;
        }
    }

    fn issue_request(&mut self, index: usize) -> FetchRequest {
        self.last_seq += 1;
        self.pending[index] = Some(self.last_seq);
        FetchRequest {
            chain_id: self.id,
            stage_index: index,
            stage: self.stages[index].id().clone(),
            seq: self.last_seq,
            context: self.context_for(index),
        }
    }

    /// Selections of stages `0..index`.
    fn context_for(&self, index: usize) -> ResolutionContext {
        let entries = self.stages[..index]
            .iter()
            .filter_map(|s| s.selected().map(|key| (s.id().clone(), key.clone())))
            .collect();
        ResolutionContext::from_entries(entries)
    }

    /// Check both chain invariants.
    ///
    /// Selected keys must be offered by ready stages, and once a stage has no
    /// selection every later stage must be empty.
    pub fn holds_invariants(&self) -> bool {
        let mut unset_upstream = false;
        for stage in &self.stages {
            if unset_upstream && !stage.is_empty() {
                return false;
            }
            match stage.selected() {
                Some(key) => {
                    if stage.status() == StageStatus::Ready && !stage.has_option(key) {
                        return false;
                    }
                }
                None => unset_upstream = true,
            }
        }
        true
    }

    fn debug_check(&self) {
        debug_assert!(
            self.holds_invariants(),
            "selection chain invariant violated: {:?}",
            self.stages
        );
    }
}
