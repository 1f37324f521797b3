//! Per-document published diagnostic sets.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::diagnostic::Diagnostic;

#[derive(Debug, Clone)]
pub struct Published<D> {
    pub version: i32,
    pub diagnostics: Arc<Vec<D>>,
}

/// Latest diagnostics per document, keyed by document identity.
///
/// A set is only ever replaced whole. `publish` refuses a set computed for an
/// older version than the one already stored, so a slow pass over stale text
/// can never overwrite the result for newer text.
#[derive(Debug)]
pub struct DiagnosticStore<K, D = Diagnostic>
where
    K: Eq + Hash,
{
    sets: DashMap<K, Published<D>>,
}

impl<K: Eq + Hash, D> Default for DiagnosticStore<K, D> {
    fn default() -> Self {
        Self { sets: DashMap::new() }
    }
}

impl<K: Eq + Hash, D> DiagnosticStore<K, D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set for `key`. Returns false when a newer version is already stored.
    pub fn publish(&self, key: K, version: i32, diagnostics: Vec<D>) -> bool {
        let published = Published {
            version,
            diagnostics: Arc::new(diagnostics),
        };
        match self.sets.entry(key) {
            Entry::Occupied(mut slot) => {
                if slot.get().version > version {
                    return false;
                }
                slot.insert(published);
            }
            Entry::Vacant(slot) => {
                slot.insert(published);
            }
        }
        true
    }

    pub fn get(&self, key: &K) -> Option<Published<D>> {
        self.sets.get(key).map(|p| Published {
            version: p.version,
            diagnostics: Arc::clone(&p.diagnostics),
        })
    }

    pub fn version(&self, key: &K) -> Option<i32> {
        self.sets.get(key).map(|p| p.version)
    }

    /// Forget `key` entirely, e.g. when its document closes.
    pub fn clear(&self, key: &K) -> bool {
        self.sets.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
