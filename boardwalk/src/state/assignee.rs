//! Assignee store: the board's known users, sorted by display name.

use std::sync::Arc;

use indexmap::IndexMap;

use super::ci_cmp;
use crate::raw::RawAssignee;

/// A user that issues can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignee {
    pub key: String,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    /// Derived from the display name; see [`initials_of`].
    pub initials: String,
}

impl Assignee {
    fn from_raw(raw: &RawAssignee) -> Self {
        Self {
            key: raw.key.clone(),
            name: raw.name.clone(),
            email: raw.email.clone(),
            avatar: raw.avatar.clone(),
            initials: initials_of(&raw.name),
        }
    }
}

/// Derive avatar initials from a display name.
///
/// A single word takes up to 3 characters, first uppercased and the rest
/// lowercased; multiple words take the first character of up to the first
/// 3 words, all uppercased.
pub fn initials_of(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => String::new(),
        [word] => word
            .chars()
            .take(3)
            .enumerate()
            .flat_map(|(i, c)| {
                if i == 0 {
                    c.to_uppercase().collect::<Vec<_>>()
                } else {
                    c.to_lowercase().collect::<Vec<_>>()
                }
            })
            .collect(),
        words => words
            .iter()
            .take(3)
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_uppercase)
            .collect(),
    }
}

/// Ordered map of assignee key -> assignee, sorted case-insensitively by
/// display name after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssigneeState {
    pub assignees: IndexMap<String, Arc<Assignee>>,
}

impl AssigneeState {
    /// Full replace from a snapshot.
    pub fn from_raw(raw: &[RawAssignee]) -> Arc<Self> {
        let mut assignees: IndexMap<String, Arc<Assignee>> = raw
            .iter()
            .map(|a| (a.key.clone(), Arc::new(Assignee::from_raw(a))))
            .collect();
        sort(&mut assignees);
        Arc::new(Self { assignees })
    }

    /// Merge new assignees in, re-sort, and return the result.
    ///
    /// Returns the same `Arc` when the merge produced no net change; the
    /// UI layer's change detection relies on that reference equality.
    pub fn with_added(self: &Arc<Self>, raw: Option<&[RawAssignee]>) -> Arc<Self> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Arc::clone(self),
        };

        let mut assignees = self.assignees.clone();
        let mut changed = false;
        for entry in raw {
            let assignee = Assignee::from_raw(entry);
            match assignees.get(&entry.key) {
                Some(existing) if **existing == assignee => {}
                _ => {
                    assignees.insert(entry.key.clone(), Arc::new(assignee));
                    changed = true;
                }
            }
        }
        if !changed {
            return Arc::clone(self);
        }
        sort(&mut assignees);
        Arc::new(Self { assignees })
    }

    /// The assignee at the given position in display order.
    pub fn by_index(&self, index: usize) -> Option<&Arc<Assignee>> {
        self.assignees.get_index(index).map(|(_, a)| a)
    }
}

fn sort(assignees: &mut IndexMap<String, Arc<Assignee>>) {
    assignees.sort_by(|_, a, _, b| ci_cmp(&a.name, &b.name));
}
