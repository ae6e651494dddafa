//! Priority store, sorted case-insensitively by name.

use std::sync::Arc;

use indexmap::IndexMap;

use super::ci_cmp;
use crate::raw::RawNamedEntry;

/// An issue priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Priority {
    pub name: String,
    pub colour: Option<String>,
}

/// Ordered map of priority name -> priority. Priorities arrive only with a
/// full snapshot; there is no incremental add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityState {
    pub priorities: IndexMap<String, Arc<Priority>>,
}

impl PriorityState {
    pub fn from_raw(raw: &[RawNamedEntry]) -> Arc<Self> {
        let mut priorities: IndexMap<String, Arc<Priority>> = raw
            .iter()
            .map(|entry| {
                (
                    entry.name.clone(),
                    Arc::new(Priority {
                        name: entry.name.clone(),
                        colour: entry.colour.clone(),
                    }),
                )
            })
            .collect();
        priorities.sort_by(|_, a, _, b| ci_cmp(&a.name, &b.name));
        Arc::new(Self { priorities })
    }

    /// The priority at the given position in display order.
    pub fn by_index(&self, index: usize) -> Option<&Arc<Priority>> {
        self.priorities.get_index(index).map(|(_, p)| p)
    }
}
