//! Normalized board state and the reducers that build and update it.
//!
//! The aggregate [`BoardState`] holds one `Arc` per sub-state. Reducers are
//! pure: (old state, input) -> new state, and every reducer that produces
//! no net change hands back the same `Arc` it was given, so downstream
//! change detection can compare pointers instead of walking trees.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::debug;

pub mod assignee;
pub mod blacklist;
pub mod custom_field;
pub mod epic;
pub mod header;
pub mod issue;
pub mod issue_type;
pub mod name_list;
pub mod priority;
pub mod project;
pub mod rank;
pub mod swimlane;

pub use assignee::{Assignee, AssigneeState};
pub use blacklist::BlacklistState;
pub use custom_field::{CustomFieldState, CustomFieldValue};
pub use epic::{Epic, EpicState};
pub use header::{HeaderCell, HeaderState};
pub use issue::{Issue, IssueState, LinkedIssue, ResolutionContext};
pub use issue_type::{IssueType, IssueTypeState};
pub use name_list::NameListState;
pub use priority::{Priority, PriorityState};
pub use project::{BoardProject, ParallelTask, ProjectState};
pub use rank::RankState;
pub use swimlane::{ManualSwimlane, ManualSwimlaneState, SwimlaneEntry};

use crate::error::Result;
use crate::raw::{RawBoard, RawChangeSet};

/// Case-insensitive ordering on display strings. All entity stores sort
/// with this; the sort itself is stable, so equal keys keep arrival order.
pub(crate) fn ci_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// The project-code prefix of an issue key (`"SUP-EU-12"` -> `"SUP-EU"`).
pub fn project_code_of(key: &str) -> &str {
    key.rsplit_once('-').map_or(key, |(project, _)| project)
}

/// The aggregate root: everything the board viewer knows about one board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    /// Numeric identifier of the active board configuration.
    pub view_id: u64,
    pub rank_custom_field_id: u64,
    pub headers: Arc<HeaderState>,
    pub assignees: Arc<AssigneeState>,
    pub priorities: Arc<PriorityState>,
    pub issue_types: Arc<IssueTypeState>,
    pub components: Arc<NameListState>,
    pub labels: Arc<NameListState>,
    pub fix_versions: Arc<NameListState>,
    pub custom_fields: Arc<CustomFieldState>,
    pub epics: Arc<EpicState>,
    pub projects: Arc<ProjectState>,
    pub ranks: Arc<RankState>,
    pub blacklist: Arc<BlacklistState>,
    pub swimlanes: Arc<ManualSwimlaneState>,
    pub issues: Arc<IssueState>,
}

impl BoardState {
    /// Deserialize one full board snapshot.
    ///
    /// Entity stores deserialize independently; issues resolve against them
    /// afterwards. Every call builds a brand-new aggregate.
    pub fn from_raw(raw: &RawBoard) -> Result<Self> {
        Self::build(raw, None)
    }

    /// Deserialize a full snapshot against this state.
    ///
    /// Sub-states that come out structurally equal to the current ones are
    /// replaced by the current `Arc`s, so an unchanged snapshot yields a
    /// state whose parts are all pointer-identical to `self`'s.
    pub fn refreshed(&self, raw: &RawBoard) -> Result<Self> {
        Self::build(raw, Some(self))
    }

    fn build(raw: &RawBoard, previous: Option<&Self>) -> Result<Self> {
        let headers = reuse_if_equal(
            previous.map(|p| &p.headers),
            HeaderState::from_raw(&raw.states, &raw.headers, raw.backlog, raw.done),
        );
        let assignees = reuse_if_equal(
            previous.map(|p| &p.assignees),
            AssigneeState::from_raw(&raw.assignees),
        );
        let priorities = reuse_if_equal(
            previous.map(|p| &p.priorities),
            PriorityState::from_raw(&raw.priorities),
        );
        let issue_types = reuse_if_equal(
            previous.map(|p| &p.issue_types),
            IssueTypeState::from_raw(&raw.issue_types),
        );
        let components = reuse_if_equal(
            previous.map(|p| &p.components),
            NameListState::from_raw(&raw.components),
        );
        let labels = reuse_if_equal(
            previous.map(|p| &p.labels),
            NameListState::from_raw(&raw.labels),
        );
        let fix_versions = reuse_if_equal(
            previous.map(|p| &p.fix_versions),
            NameListState::from_raw(&raw.fix_versions),
        );
        let custom_fields = reuse_if_equal(
            previous.map(|p| &p.custom_fields),
            CustomFieldState::from_raw(&raw.custom),
        );
        let epics = reuse_if_equal(previous.map(|p| &p.epics), EpicState::from_raw(&raw.projects));
        let projects = reuse_if_equal(
            previous.map(|p| &p.projects),
            ProjectState::from_raw(&raw.projects),
        );
        let ranks = reuse_if_equal(previous.map(|p| &p.ranks), RankState::from_raw(&raw.projects));
        let blacklist = reuse_if_equal(
            previous.map(|p| &p.blacklist),
            BlacklistState::from_raw(raw.blacklist.as_ref()),
        );
        let swimlanes = reuse_if_equal(
            previous.map(|p| &p.swimlanes),
            ManualSwimlaneState::from_raw(&raw.manual_swimlanes),
        );

        let issues = {
            let ctx = ResolutionContext {
                assignees: &assignees,
                priorities: &priorities,
                issue_types: &issue_types,
                components: &components,
                labels: &labels,
                fix_versions: &fix_versions,
                custom_fields: &custom_fields,
                epics: &epics,
                projects: &projects,
            };
            reuse_if_equal(
                previous.map(|p| &p.issues),
                IssueState::from_raw(&raw.issues, &ctx)?,
            )
        };

        Ok(Self {
            view_id: raw.view,
            rank_custom_field_id: raw.rank_custom_field_id,
            headers,
            assignees,
            priorities,
            issue_types,
            components,
            labels,
            fix_versions,
            custom_fields,
            epics,
            projects,
            ranks,
            blacklist,
            swimlanes,
            issues,
        })
    }

    /// The lookup tables issue resolution runs against.
    pub fn resolution_context(&self) -> ResolutionContext<'_> {
        ResolutionContext {
            assignees: &self.assignees,
            priorities: &self.priorities,
            issue_types: &self.issue_types,
            components: &self.components,
            labels: &self.labels,
            fix_versions: &self.fix_versions,
            custom_fields: &self.custom_fields,
            epics: &self.epics,
            projects: &self.projects,
        }
    }

    /// Apply one sparse change-set.
    ///
    /// Steps run in a fixed order because later ones depend on earlier
    /// ones: entity additions first (new issues may reference them), then
    /// blacklist additions and removals, issue deletions, issue creations
    /// and updates, rerank, and the view id last. Sub-states a change-set
    /// does not touch stay pointer-identical.
    pub fn apply(&self, changes: &RawChangeSet) -> Result<Self> {
        debug!(view = ?changes.view, "applying board change-set");

        // Step 1: entity-store additions.
        let assignees = self.assignees.with_added(changes.assignees.as_deref());
        let components = self.components.with_added(changes.components.as_deref());
        let labels = self.labels.with_added(changes.labels.as_deref());
        let fix_versions = self.fix_versions.with_added(changes.fix_versions.as_deref());
        let custom_fields = self.custom_fields.with_added(changes.custom.as_ref());

        let mut ranks = Arc::clone(&self.ranks);
        let mut issues = Arc::clone(&self.issues);

        // Steps 2 and 3: blacklist additions pull the affected issues out
        // of the rank order; un-blacklisted keys also leave the issue store
        // (the issue may have been deleted server-side while blacklisted).
        let blacklist = match &changes.blacklist {
            Some(change) => {
                for key in &change.issues {
                    ranks = ranks.with_removed(key);
                }
                issues = issues.with_removed(&change.removed_issues);
                self.blacklist.with_change(change)
            }
            None => Arc::clone(&self.blacklist),
        };

        if let Some(issue_changes) = &changes.issues {
            // Step 4: deletions.
            issues = issues.with_removed(&issue_changes.delete);
            for key in &issue_changes.delete {
                ranks = ranks.with_removed(key);
            }

            // Step 5: creations and updates, resolved against the stores
            // updated in step 1.
            let ctx = ResolutionContext {
                assignees: &assignees,
                priorities: &self.priorities,
                issue_types: &self.issue_types,
                components: &components,
                labels: &labels,
                fix_versions: &fix_versions,
                custom_fields: &custom_fields,
                epics: &self.epics,
                projects: &self.projects,
            };
            issues = issues.with_changes(&issue_changes.new, &issue_changes.update, &ctx)?;
        }

        // Step 6: rerank.
        if let Some(rank_changes) = &changes.rank {
            for (project, entries) in rank_changes {
                ranks = ranks.with_rerank(project, entries);
            }
        }

        // Step 7: view id.
        Ok(Self {
            view_id: changes.view.unwrap_or(self.view_id),
            rank_custom_field_id: self.rank_custom_field_id,
            headers: Arc::clone(&self.headers),
            assignees,
            priorities: Arc::clone(&self.priorities),
            issue_types: Arc::clone(&self.issue_types),
            components,
            labels,
            fix_versions,
            custom_fields,
            epics: Arc::clone(&self.epics),
            projects: Arc::clone(&self.projects),
            ranks,
            blacklist,
            swimlanes: Arc::clone(&self.swimlanes),
            issues,
        })
    }
}

/// Reuse the previous `Arc` when the freshly built value equals it. This is
/// the "same value => same reference" contract downstream change detection
/// depends on; the equality check is part of correctness, not a fast path.
fn reuse_if_equal<T: PartialEq>(previous: Option<&Arc<T>>, next: Arc<T>) -> Arc<T> {
    match previous {
        Some(previous) if **previous == *next => Arc::clone(previous),
        _ => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_code_of() {
        assert_eq!(project_code_of("P1-3"), "P1");
        assert_eq!(project_code_of("SUP-EU-12"), "SUP-EU");
        assert_eq!(project_code_of("NOHYPHEN"), "NOHYPHEN");
    }

    #[test]
    fn test_ci_cmp() {
        assert_eq!(ci_cmp("abc", "ABC"), Ordering::Equal);
        assert_eq!(ci_cmp("a", "B"), Ordering::Less);
        assert_eq!(ci_cmp("b", "A"), Ordering::Greater);
    }

    #[test]
    fn test_reuse_if_equal() {
        let previous = Arc::new(7);
        assert!(Arc::ptr_eq(
            &previous,
            &reuse_if_equal(Some(&previous), Arc::new(7))
        ));
        let next = reuse_if_equal(Some(&previous), Arc::new(8));
        assert!(!Arc::ptr_eq(&previous, &next));
        assert_eq!(*next, 8);
    }
}
