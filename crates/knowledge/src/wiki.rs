use std::{collections::HashMap, sync::RwLock};

use crate::store::KnowledgeEntry;

/// Exact-key fact store where every contribution stays an independent
/// entry. Re-teaching a key adds a second entry instead of merging;
/// lookups concatenate all entries for the key at read time.
#[derive(Default)]
pub struct WikiStore {
    inner: RwLock<HashMap<String, Vec<KnowledgeEntry>>>,
}

impl WikiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new entry under `key`. Entries are read-only afterward.
    pub fn teach(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        contributor: impl Into<String>,
    ) -> KnowledgeEntry {
        let entry = KnowledgeEntry {
            key: key.into(),
            value: value.into(),
            contributor: contributor.into(),
        };
        let mut map = self.inner.write().unwrap();
        map.entry(entry.key.clone()).or_default().push(entry.clone());
        entry
    }

    /// Number of entries stored under exactly `key`.
    pub fn count_for(&self, key: &str) -> usize {
        let map = self.inner.read().unwrap();
        map.get(key).map_or(0, |entries| entries.len())
    }

    /// All values taught for exactly `key`, newline-joined in teach order.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let map = self.inner.read().unwrap();
        let entries = map.get(key)?;
        if entries.is_empty() {
            return None;
        }
        Some(
            entries
                .iter()
                .map(|e| e.value.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Total number of entries across all keys. Feeds the best-effort
    /// teach confirmation id.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
