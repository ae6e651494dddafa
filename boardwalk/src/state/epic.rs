//! Epic store: per-project epic lists, sorted by epic name.

use std::sync::Arc;

use indexmap::IndexMap;

use super::ci_cmp;
use crate::raw::RawProjects;

/// An epic an issue can belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Epic {
    pub key: String,
    pub name: String,
}

/// Ordered map of project code -> that project's epics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpicState {
    pub epics: IndexMap<String, Vec<Arc<Epic>>>,
}

impl EpicState {
    pub fn from_raw(raw: &RawProjects) -> Arc<Self> {
        let epics = raw
            .main
            .iter()
            .filter(|(_, project)| !project.epics.is_empty())
            .map(|(code, project)| {
                let mut list: Vec<Arc<Epic>> = project
                    .epics
                    .iter()
                    .map(|epic| {
                        Arc::new(Epic {
                            key: epic.key.clone(),
                            name: epic.name.clone(),
                        })
                    })
                    .collect();
                list.sort_by(|a, b| ci_cmp(&a.name, &b.name));
                (code.clone(), list)
            })
            .collect();
        Arc::new(Self { epics })
    }

    /// The epic of `project` at the given position in display order.
    pub fn by_index(&self, project: &str, index: usize) -> Option<&Arc<Epic>> {
        self.epics.get(project).and_then(|list| list.get(index))
    }
}
