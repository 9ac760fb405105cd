//! Resolution context - the selections made upstream of a stage

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ids::{OptionKey, StageId};

/// Immutable, ordered `stage id -> selected key` mapping for stages `0..i`.
///
/// Handed to the option provider when fetching stage `i`. A new context is
/// built for every request; nothing mutates one after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionContext {
    entries: Vec<(StageId, OptionKey)>,
}

impl ResolutionContext {
    /// The context used to seed stage 0.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(entries: Vec<(StageId, OptionKey)>) -> Self {
        Self { entries }
    }

    /// Selected key of an upstream stage, if that stage is part of the context.
    pub fn get(&self, stage: &StageId) -> Option<&OptionKey> {
        self.entries
            .iter()
            .find(|(id, _)| id == stage)
            .map(|(_, key)| key)
    }

    /// Same as [`get`](Self::get) but keyed by a plain string.
    pub fn get_str(&self, stage: &str) -> Option<&OptionKey> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_str() == stage)
            .map(|(_, key)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StageId, &OptionKey)> {
        self.entries.iter().map(|(id, key)| (id, key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResolutionContext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (stage, key) in &self.entries {
            map.serialize_entry(stage, key)?;
        }
        map.end()
    }
}
