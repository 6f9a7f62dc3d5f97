use std::{
    collections::{HashMap, hash_map::Entry},
    sync::RwLock,
};

use serde::{Deserialize, Serialize};

/// One taught fact. `contributor` is the display name of whoever taught it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub key: String,
    pub value: String,
    pub contributor: String,
}

/// Append-merge fact store with substring lookup.
///
/// Teaching an existing key appends to its value (newline-joined) instead
/// of overwriting — facts are never deleted or edited. The whole map sits
/// behind one `RwLock` so concurrent teaches of the same key cannot lose
/// an update.
#[derive(Default)]
pub struct KnowledgeStore {
    inner: RwLock<HashMap<String, KnowledgeEntry>>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Teach a fact. Returns the entry as stored (merged when the key
    /// already existed).
    pub fn teach(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        contributor: impl Into<String>,
    ) -> KnowledgeEntry {
        let key = key.into();
        let value = value.into();
        let contributor = contributor.into();

        let mut map = self.inner.write().unwrap();
        match map.entry(key.clone()) {
            Entry::Occupied(mut slot) => {
                let entry = slot.get_mut();
                entry.value = format!("{}\n{}", entry.value, value);
                entry.contributor = contributor;
                entry.clone()
            },
            Entry::Vacant(slot) => slot
                .insert(KnowledgeEntry {
                    key,
                    value,
                    contributor,
                })
                .clone(),
        }
    }

    /// Look a query up: an exact key match wins; otherwise every entry
    /// whose key is contained in `text` matches. Multiple matches are
    /// newline-joined. `None` when nothing matches.
    pub fn lookup(&self, text: &str) -> Option<String> {
        let map = self.inner.read().unwrap();
        if let Some(entry) = map.get(text) {
            return Some(entry.value.clone());
        }
        let mut values: Vec<&str> = map
            .iter()
            .filter(|(k, _)| text.contains(k.as_str()))
            .map(|(_, e)| e.value.as_str())
            .collect();
        if values.is_empty() {
            return None;
        }
        values.sort_unstable();
        Some(values.join("\n"))
    }

    /// Number of distinct keys. Used for the best-effort teach
    /// confirmation id (`len() + 1`), which is not unique under
    /// concurrent teaches.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
