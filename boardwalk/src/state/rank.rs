//! Rank store: the authoritative per-project issue ordering.

use std::sync::Arc;

use indexmap::IndexMap;

use super::project_code_of;
use crate::raw::{RawProjects, RawRankChange};

/// Ordered map of project code -> issue keys in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankState {
    pub ranked: IndexMap<String, Vec<String>>,
}

impl RankState {
    /// Authoritative snapshot from the main projects' `ranked` lists.
    pub fn from_raw(raw: &RawProjects) -> Arc<Self> {
        let ranked = raw
            .main
            .iter()
            .map(|(code, project)| (code.clone(), project.ranked.clone()))
            .collect();
        Arc::new(Self { ranked })
    }

    /// Apply positional rank changes to one project.
    ///
    /// Every moved key is first dropped from the current order; a single
    /// left-to-right pass then re-inserts each change as soon as the output
    /// reaches its target index, pulling non-moved keys from the original
    /// order in between. Changes left over after the pass land at the tail
    /// (clamped to the output length for out-of-range indices, which the
    /// server does not promise a particular order for).
    pub fn with_rerank(
        self: &Arc<Self>,
        project: &str,
        changes: &[RawRankChange],
    ) -> Arc<Self> {
        if changes.is_empty() {
            return Arc::clone(self);
        }

        let original = self.ranked.get(project).cloned().unwrap_or_default();
        let mut result: Vec<String> = Vec::with_capacity(original.len() + changes.len());
        let mut pending = changes.iter().peekable();

        for key in original
            .iter()
            .filter(|key| !changes.iter().any(|c| &c.key == *key))
        {
            while let Some(change) = pending.peek() {
                if change.index <= result.len() {
                    result.push(change.key.clone());
                    pending.next();
                } else {
                    break;
                }
            }
            result.push(key.clone());
        }
        for change in pending {
            let index = change.index.min(result.len());
            result.insert(index, change.key.clone());
        }

        if self.ranked.get(project) == Some(&result) {
            return Arc::clone(self);
        }
        let mut ranked = self.ranked.clone();
        ranked.insert(project.to_string(), result);
        Arc::new(Self { ranked })
    }

    /// Remove an issue key from its project's ranked list, if present. The
    /// owning project is found by the key's project-code prefix.
    pub fn with_removed(self: &Arc<Self>, key: &str) -> Arc<Self> {
        let project = project_code_of(key);
        let position = self
            .ranked
            .get(project)
            .and_then(|keys| keys.iter().position(|k| k == key));
        let Some(position) = position else {
            return Arc::clone(self);
        };

        let mut ranked = self.ranked.clone();
        if let Some(keys) = ranked.get_mut(project) {
            keys.remove(position);
        }
        Arc::new(Self { ranked })
    }
}
