//! Blacklist store: data the server could not classify into the board
//! configuration.

use std::sync::Arc;

use super::ci_cmp;
use crate::raw::{RawBlacklist, RawBlacklistChange};

/// Four sorted lists of unclassifiable data. Issues on the blacklist are
/// kept out of the rank order by the aggregate reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistState {
    pub states: Vec<String>,
    pub priorities: Vec<String>,
    pub issue_types: Vec<String>,
    pub issues: Vec<String>,
}

impl BlacklistState {
    pub fn from_raw(raw: Option<&RawBlacklist>) -> Arc<Self> {
        let Some(raw) = raw else {
            return Arc::new(Self::default());
        };
        Arc::new(Self {
            states: sorted(&raw.states),
            priorities: sorted(&raw.priorities),
            issue_types: sorted(&raw.issue_types),
            issues: sorted(&raw.issues),
        })
    }

    /// Apply a blacklist change: append the new entries, remove the
    /// un-blacklisted issue keys. No net change returns the same `Arc`.
    pub fn with_change(self: &Arc<Self>, change: &RawBlacklistChange) -> Arc<Self> {
        let states = merged(&self.states, &change.states);
        let priorities = merged(&self.priorities, &change.priorities);
        let issue_types = merged(&self.issue_types, &change.issue_types);
        let mut issues = merged(&self.issues, &change.issues);
        issues.retain(|key| !change.removed_issues.contains(key));

        let next = Self {
            states,
            priorities,
            issue_types,
            issues,
        };
        if next == **self {
            return Arc::clone(self);
        }
        Arc::new(next)
    }
}

fn sorted(entries: &[String]) -> Vec<String> {
    let mut entries = entries.to_vec();
    entries.sort_by(|a, b| ci_cmp(a, b));
    entries
}

fn merged(existing: &[String], new: &[String]) -> Vec<String> {
    let mut entries = existing.to_vec();
    for entry in new {
        if !entries.contains(entry) {
            entries.push(entry.clone());
        }
    }
    entries.sort_by(|a, b| ci_cmp(a, b));
    entries
}
