use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::UnitKey;

/// In-memory copy of the resume ledger. Serializes as a flat
/// `{ "track|artist": true }` object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressStore {
    entries: BTreeMap<String, bool>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self, key: &UnitKey) -> bool {
        self.entries.get(key.as_str()).copied().unwrap_or(false)
    }

    pub fn mark_done(&mut self, key: UnitKey) {
        self.entries.insert(key.into(), true);
    }

    /// Number of keys marked done.
    pub fn done_count(&self) -> usize {
        self.entries.values().filter(|done| **done).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
