//! Flat ordered name-list store, shared by components, labels and fix
//! versions. Case-insensitively sorted, duplicates disallowed.

use std::sync::Arc;

use super::ci_cmp;

/// A sorted, duplicate-free list of display names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameListState {
    pub entries: Vec<String>,
}

impl NameListState {
    /// Full replace from a snapshot.
    pub fn from_raw(raw: &[String]) -> Arc<Self> {
        let mut entries: Vec<String> = Vec::with_capacity(raw.len());
        for entry in raw {
            if !entries.contains(entry) {
                entries.push(entry.clone());
            }
        }
        entries.sort_by(|a, b| ci_cmp(a, b));
        Arc::new(Self { entries })
    }

    /// Merge new names in, re-sort, and return the result. Insertion is
    /// idempotent per value; no net change returns the same `Arc`.
    pub fn with_added(self: &Arc<Self>, raw: Option<&[String]>) -> Arc<Self> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Arc::clone(self),
        };

        let mut entries = self.entries.clone();
        let mut changed = false;
        for entry in raw {
            if !entries.contains(entry) {
                entries.push(entry.clone());
                changed = true;
            }
        }
        if !changed {
            return Arc::clone(self);
        }
        entries.sort_by(|a, b| ci_cmp(a, b));
        Arc::new(Self { entries })
    }

    pub fn by_index(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }
}
