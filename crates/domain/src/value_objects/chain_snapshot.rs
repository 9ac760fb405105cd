//! Chain snapshot - the accumulated selections of a complete chain

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ids::{OptionKey, StageId};

/// Ordered `stage id -> selected key` map, produced only by a complete chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSnapshot {
    entries: Vec<(StageId, OptionKey)>,
}

impl ChainSnapshot {
    pub(crate) fn from_entries(entries: Vec<(StageId, OptionKey)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, stage: &str) -> Option<&OptionKey> {
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

    /// `(stage, key)` pairs as plain strings, in chain order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(id, key)| (id.to_string(), key.to_string()))
            .collect()
    }
}

impl Serialize for ChainSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (stage, key) in &self.entries {
            map.serialize_entry(stage, key)?;
        }
        map.end()
    }
}
