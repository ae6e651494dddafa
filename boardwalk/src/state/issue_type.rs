//! Issue type store, sorted case-insensitively by name.

use std::sync::Arc;

use indexmap::IndexMap;

use super::ci_cmp;
use crate::raw::RawNamedEntry;

/// An issue type (bug, task, story, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueType {
    pub name: String,
    pub colour: Option<String>,
}

/// Ordered map of type name -> issue type. Snapshot-only, like priorities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueTypeState {
    pub issue_types: IndexMap<String, Arc<IssueType>>,
}

impl IssueTypeState {
    pub fn from_raw(raw: &[RawNamedEntry]) -> Arc<Self> {
        let mut issue_types: IndexMap<String, Arc<IssueType>> = raw
            .iter()
            .map(|entry| {
                (
                    entry.name.clone(),
                    Arc::new(IssueType {
                        name: entry.name.clone(),
                        colour: entry.colour.clone(),
                    }),
                )
            })
            .collect();
        issue_types.sort_by(|_, a, _, b| ci_cmp(&a.name, &b.name));
        Arc::new(Self { issue_types })
    }

    /// The issue type at the given position in display order.
    pub fn by_index(&self, index: usize) -> Option<&Arc<IssueType>> {
        self.issue_types.get_index(index).map(|(_, t)| t)
    }
}
