//! Issue store: raw issues resolved into immutable board issue records.
//!
//! Resolution replaces every entity index in a raw issue with the resolved
//! record from the corresponding store. It is a pure function: the same raw
//! input against the same lookup tables produces an identical issue, which
//! is what makes the structural-sharing comparisons upstream sound.

use std::sync::Arc;

use boardwalk_query::QueryableIssue;
use indexmap::IndexMap;

use super::assignee::{Assignee, AssigneeState};
use super::custom_field::{CustomFieldState, CustomFieldValue};
use super::epic::{Epic, EpicState};
use super::issue_type::{IssueType, IssueTypeState};
use super::name_list::NameListState;
use super::priority::{Priority, PriorityState};
use super::project::ProjectState;
use super::project_code_of;
use crate::error::{Result, StateError};
use crate::raw::{RawCustomValue, RawIssue, RawIssueUpdate, RawLinkedIssue};

/// A lightweight reference to an issue outside the normalization scope.
/// Display-only; never resolved against the entity stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIssue {
    pub key: String,
    pub summary: String,
    pub state: Option<String>,
    pub colour: Option<String>,
}

impl LinkedIssue {
    fn from_raw(raw: &RawLinkedIssue) -> Self {
        Self {
            key: raw.key.clone(),
            summary: raw.summary.clone(),
            state: raw.state.clone(),
            colour: raw.colour.clone(),
        }
    }
}

/// A fully-resolved board issue. Immutable: every change produces a new
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    /// Derived from the key's project-code prefix.
    pub project_code: String,
    pub summary: String,
    /// Index into the issue's own project's local state list.
    pub own_state: usize,
    /// `None` is the no-assignee sentinel.
    pub assignee: Option<Arc<Assignee>>,
    pub priority: Arc<Priority>,
    pub issue_type: Arc<IssueType>,
    pub epic: Option<Arc<Epic>>,
    /// `None` when the raw issue carried no such field; the UI skips
    /// rendering in that case, unlike for a present-but-empty set.
    pub components: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub fix_versions: Option<Vec<String>>,
    pub custom_fields: IndexMap<String, Arc<CustomFieldValue>>,
    /// Selected option per configured parallel task.
    pub parallel_tasks: Option<Vec<String>>,
    pub linked_issues: Vec<LinkedIssue>,
}

/// The lookup tables issue resolution runs against.
#[derive(Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub assignees: &'a AssigneeState,
    pub priorities: &'a PriorityState,
    pub issue_types: &'a IssueTypeState,
    pub components: &'a NameListState,
    pub labels: &'a NameListState,
    pub fix_versions: &'a NameListState,
    pub custom_fields: &'a CustomFieldState,
    pub epics: &'a EpicState,
    pub projects: &'a ProjectState,
}

impl Issue {
    /// Resolve one raw issue against the entity stores.
    pub fn resolve(raw: &RawIssue, ctx: &ResolutionContext<'_>) -> Result<Self> {
        let project_code = project_code_of(&raw.key).to_string();

        // An absent or unresolvable assignee is the sentinel, not an error;
        // index 0 is a valid assignee.
        let assignee = raw
            .assignee
            .and_then(|index| ctx.assignees.by_index(index).cloned());

        let priority = ctx
            .priorities
            .by_index(raw.priority)
            .cloned()
            .ok_or_else(|| StateError::invalid_reference(&raw.key, "priority", raw.priority))?;
        let issue_type = ctx
            .issue_types
            .by_index(raw.issue_type)
            .cloned()
            .ok_or_else(|| StateError::invalid_reference(&raw.key, "type", raw.issue_type))?;

        let components = resolve_names(&raw.key, "component", raw.components.as_deref(), ctx.components)?;
        let labels = resolve_names(&raw.key, "label", raw.labels.as_deref(), ctx.labels)?;
        let fix_versions = resolve_names(
            &raw.key,
            "fix version",
            raw.fix_versions.as_deref(),
            ctx.fix_versions,
        )?;

        let custom_fields = resolve_custom(&raw.custom, ctx.custom_fields);

        let epic = raw
            .epic
            .and_then(|index| ctx.epics.by_index(&project_code, index).cloned());

        let parallel_tasks = raw.parallel_tasks.as_ref().map(|selected| {
            selected
                .iter()
                .enumerate()
                .filter_map(|(task, &option)| {
                    ctx.projects
                        .parallel_task_option(&project_code, task, option)
                        .map(ToString::to_string)
                })
                .collect()
        });

        Ok(Self {
            key: raw.key.clone(),
            project_code,
            summary: raw.summary.clone(),
            own_state: raw.state,
            assignee,
            priority,
            issue_type,
            epic,
            components,
            labels,
            fix_versions,
            custom_fields,
            parallel_tasks,
            linked_issues: raw.linked_issues.iter().map(LinkedIssue::from_raw).collect(),
        })
    }

    /// Produce a new record with the update's present fields merged in.
    pub fn updated(&self, update: &RawIssueUpdate, ctx: &ResolutionContext<'_>) -> Result<Self> {
        let mut issue = self.clone();

        if let Some(state) = update.state {
            issue.own_state = state;
        }
        if let Some(summary) = &update.summary {
            issue.summary = summary.clone();
        }
        if let Some(index) = update.priority {
            issue.priority = ctx
                .priorities
                .by_index(index)
                .cloned()
                .ok_or_else(|| StateError::invalid_reference(&self.key, "priority", index))?;
        }
        if let Some(index) = update.issue_type {
            issue.issue_type = ctx
                .issue_types
                .by_index(index)
                .cloned()
                .ok_or_else(|| StateError::invalid_reference(&self.key, "type", index))?;
        }
        if update.unassigned {
            issue.assignee = None;
        } else if let Some(index) = update.assignee {
            issue.assignee = ctx.assignees.by_index(index).cloned();
        }
        if update.clear_components {
            issue.components = None;
        } else if update.components.is_some() {
            issue.components = resolve_names(
                &self.key,
                "component",
                update.components.as_deref(),
                ctx.components,
            )?;
        }
        if update.clear_labels {
            issue.labels = None;
        } else if update.labels.is_some() {
            issue.labels = resolve_names(&self.key, "label", update.labels.as_deref(), ctx.labels)?;
        }
        if update.clear_fix_versions {
            issue.fix_versions = None;
        } else if update.fix_versions.is_some() {
            issue.fix_versions = resolve_names(
                &self.key,
                "fix version",
                update.fix_versions.as_deref(),
                ctx.fix_versions,
            )?;
        }
        if let Some(custom) = &update.custom {
            for (field, value) in custom {
                match value {
                    Some(value) => {
                        if let Some(resolved) = resolve_custom_value(field, value, ctx.custom_fields)
                        {
                            issue.custom_fields.insert(field.clone(), resolved);
                        }
                    }
                    None => {
                        issue.custom_fields.shift_remove(field);
                    }
                }
            }
        }
        if let Some(selected) = &update.parallel_tasks {
            issue.parallel_tasks = Some(
                selected
                    .iter()
                    .enumerate()
                    .filter_map(|(task, &option)| {
                        ctx.projects
                            .parallel_task_option(&self.project_code, task, option)
                            .map(ToString::to_string)
                    })
                    .collect(),
            );
        }

        Ok(issue)
    }
}

fn resolve_names(
    key: &str,
    entity: &'static str,
    indices: Option<&[usize]>,
    store: &NameListState,
) -> Result<Option<Vec<String>>> {
    indices
        .map(|indices| {
            indices
                .iter()
                .map(|&index| {
                    store
                        .by_index(index)
                        .map(ToString::to_string)
                        .ok_or_else(|| StateError::invalid_reference(key, entity, index))
                })
                .collect()
        })
        .transpose()
}

fn resolve_custom(
    raw: &IndexMap<String, RawCustomValue>,
    store: &CustomFieldState,
) -> IndexMap<String, Arc<CustomFieldValue>> {
    raw.iter()
        .filter_map(|(field, value)| {
            resolve_custom_value(field, value, store).map(|resolved| (field.clone(), resolved))
        })
        .collect()
}

/// Unknown fields and options are omitted rather than failing.
fn resolve_custom_value(
    field: &str,
    value: &RawCustomValue,
    store: &CustomFieldState,
) -> Option<Arc<CustomFieldValue>> {
    match value {
        RawCustomValue::Index(index) => store.by_index(field, *index).cloned(),
        RawCustomValue::Key(key) => store.by_key(field, key).cloned(),
    }
}

/// Ordered map of issue key -> resolved issue, in raw arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueState {
    pub issues: IndexMap<String, Arc<Issue>>,
}

impl IssueState {
    pub fn from_raw(
        raw: &IndexMap<String, RawIssue>,
        ctx: &ResolutionContext<'_>,
    ) -> Result<Arc<Self>> {
        let mut issues = IndexMap::with_capacity(raw.len());
        for (key, issue) in raw {
            issues.insert(key.clone(), Arc::new(Issue::resolve(issue, ctx)?));
        }
        Ok(Arc::new(Self { issues }))
    }

    /// Remove the given keys, if present. No removal returns the same `Arc`.
    pub fn with_removed(self: &Arc<Self>, keys: &[String]) -> Arc<Self> {
        if !keys.iter().any(|key| self.issues.contains_key(key)) {
            return Arc::clone(self);
        }
        let mut issues = self.issues.clone();
        for key in keys {
            issues.shift_remove(key);
        }
        Arc::new(Self { issues })
    }

    /// Insert newly created issues and merge partial updates, resolving
    /// against the already-updated entity stores.
    pub fn with_changes(
        self: &Arc<Self>,
        new: &[RawIssue],
        updates: &[RawIssueUpdate],
        ctx: &ResolutionContext<'_>,
    ) -> Result<Arc<Self>> {
        if new.is_empty() && updates.is_empty() {
            return Ok(Arc::clone(self));
        }

        let mut issues = self.issues.clone();
        for raw in new {
            issues.insert(raw.key.clone(), Arc::new(Issue::resolve(raw, ctx)?));
        }
        for update in updates {
            // An update for an issue the board does not have (e.g. deleted
            // in the same change-set) is ignored.
            let Some(existing) = issues.get(&update.key) else {
                continue;
            };
            let merged = existing.updated(update, ctx)?;
            issues.insert(update.key.clone(), Arc::new(merged));
        }
        Ok(Arc::new(Self { issues }))
    }
}

impl QueryableIssue for Issue {
    fn assignee_key(&self) -> Option<&str> {
        self.assignee.as_ref().map(|a| a.key.as_str())
    }

    fn priority_name(&self) -> &str {
        &self.priority.name
    }

    fn issue_type_name(&self) -> &str {
        &self.issue_type.name
    }

    fn project_code(&self) -> &str {
        &self.project_code
    }

    fn components(&self) -> Option<&[String]> {
        self.components.as_deref()
    }

    fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }

    fn fix_versions(&self) -> Option<&[String]> {
        self.fix_versions.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawBoard;
    use crate::state::BoardState;

    fn board_fixture() -> BoardState {
        let raw: RawBoard = serde_json::from_value(serde_json::json!({
            "view": 1,
            "rank-custom-field-id": 10000,
            "states": [{"name": "S1"}, {"name": "S2"}],
            "assignees": [
                {"key": "anna", "name": "Anna Appleton"},
                {"key": "kabir", "name": "Kabir Khan"}
            ],
            "components": ["C1", "C2"],
            "labels": ["L1", "L2"],
            "fix-versions": ["F1"],
            "priorities": [{"name": "Blocker"}, {"name": "Major"}],
            "issue-types": [{"name": "Bug"}, {"name": "Task"}],
            "custom": {
                "Documenter": [
                    {"key": "kabir", "value": "Kabir Khan"},
                    {"key": "stuart", "value": "Stuart Douglas"}
                ]
            },
            "projects": {
                "owner": "P1",
                "main": {
                    "P1": {
                        "state-links": {"S1": "S1", "S2": "S2"},
                        "ranked": ["P1-1"],
                        "parallel-tasks": [
                            {"name": "UT", "display": "Upgrade tests", "options": ["TD", "IP", "D"]}
                        ],
                        "epics": [{"key": "P1-900", "name": "Big epic"}]
                    }
                }
            }
        }))
        .expect("deserialize");
        BoardState::from_raw(&raw).expect("board state")
    }

    fn raw_issue(value: serde_json::Value) -> RawIssue {
        serde_json::from_value(value).expect("raw issue")
    }

    #[test]
    fn test_resolve_full_issue() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let issue = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-1",
                "state": 1,
                "summary": "Fix the thing",
                "priority": 0,
                "type": 1,
                "assignee": 1,
                "components": [0, 1],
                "labels": [1],
                "fix-versions": [0],
                "custom": {"Documenter": 1},
                "epic": 0,
                "parallel-tasks": [2],
                "linked-issues": [{"key": "EXT-3", "summary": "linked", "state": "Open"}]
            })),
            &ctx,
        )
        .expect("resolve");

        assert_eq!(issue.project_code, "P1");
        assert_eq!(issue.own_state, 1);
        assert_eq!(issue.assignee.as_ref().expect("assignee").key, "kabir");
        assert_eq!(issue.priority.name, "Blocker");
        assert_eq!(issue.issue_type.name, "Task");
        assert_eq!(issue.components.as_deref(), Some(&["C1".to_string(), "C2".to_string()][..]));
        assert_eq!(issue.labels.as_deref(), Some(&["L2".to_string()][..]));
        assert_eq!(issue.fix_versions.as_deref(), Some(&["F1".to_string()][..]));
        assert_eq!(issue.custom_fields["Documenter"].key, "stuart");
        assert_eq!(issue.epic.as_ref().expect("epic").key, "P1-900");
        assert_eq!(issue.parallel_tasks.as_deref(), Some(&["D".to_string()][..]));
        assert_eq!(issue.linked_issues[0].key, "EXT-3");
        assert_eq!(issue.linked_issues[0].state.as_deref(), Some("Open"));
    }

    #[test]
    fn test_resolve_absent_assignee_is_sentinel_index_zero_is_not() {
        let board = board_fixture();
        let ctx = board.resolution_context();

        let unassigned = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-2", "state": 0, "summary": "s", "priority": 0, "type": 0
            })),
            &ctx,
        )
        .expect("resolve");
        assert!(unassigned.assignee.is_none());

        let first = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-3", "state": 0, "summary": "s", "priority": 0, "type": 0,
                "assignee": 0
            })),
            &ctx,
        )
        .expect("resolve");
        assert_eq!(first.assignee.as_ref().expect("assignee").key, "anna");
    }

    #[test]
    fn test_resolve_absent_sets_are_none() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let issue = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-2", "state": 0, "summary": "s", "priority": 0, "type": 0
            })),
            &ctx,
        )
        .expect("resolve");
        assert!(issue.components.is_none());
        assert!(issue.labels.is_none());
        assert!(issue.fix_versions.is_none());
        assert!(issue.parallel_tasks.is_none());
        assert!(issue.custom_fields.is_empty());
    }

    #[test]
    fn test_resolve_out_of_range_priority_is_an_error() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let result = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-2", "state": 0, "summary": "s", "priority": 9, "type": 0
            })),
            &ctx,
        );
        assert!(matches!(
            result,
            Err(StateError::InvalidReference { entity: "priority", index: 9, .. })
        ));
    }

    #[test]
    fn test_resolve_unknown_custom_option_is_omitted() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let issue = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-2", "state": 0, "summary": "s", "priority": 0, "type": 0,
                "custom": {"Documenter": "nobody", "Unknown": 0}
            })),
            &ctx,
        )
        .expect("resolve");
        assert!(issue.custom_fields.is_empty());
    }

    #[test]
    fn test_resolution_is_pure() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let raw = raw_issue(serde_json::json!({
            "key": "P1-1", "state": 0, "summary": "s", "priority": 1, "type": 0,
            "assignee": 0, "components": [0]
        }));
        let a = Issue::resolve(&raw, &ctx).expect("resolve");
        let b = Issue::resolve(&raw, &ctx).expect("resolve");
        assert_eq!(a, b);
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let issue = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-1", "state": 0, "summary": "before", "priority": 0, "type": 0,
                "assignee": 0, "components": [0]
            })),
            &ctx,
        )
        .expect("resolve");

        let update: RawIssueUpdate = serde_json::from_value(serde_json::json!({
            "key": "P1-1",
            "state": 1,
            "summary": "after",
            "unassigned": true,
            "clear-components": true,
            "labels": [0]
        }))
        .expect("update");
        let merged = issue.updated(&update, &ctx).expect("merge");

        assert_eq!(merged.own_state, 1);
        assert_eq!(merged.summary, "after");
        assert!(merged.assignee.is_none());
        assert!(merged.components.is_none());
        assert_eq!(merged.labels.as_deref(), Some(&["L1".to_string()][..]));
        // Untouched fields carry over.
        assert_eq!(merged.priority.name, "Blocker");
        // The original record is unchanged.
        assert_eq!(issue.summary, "before");
    }

    #[test]
    fn test_update_custom_set_and_clear() {
        let board = board_fixture();
        let ctx = board.resolution_context();
        let issue = Issue::resolve(
            &raw_issue(serde_json::json!({
                "key": "P1-1", "state": 0, "summary": "s", "priority": 0, "type": 0,
                "custom": {"Documenter": "kabir"}
            })),
            &ctx,
        )
        .expect("resolve");

        let set: RawIssueUpdate = serde_json::from_value(serde_json::json!({
            "key": "P1-1", "custom": {"Documenter": "stuart"}
        }))
        .expect("update");
        let merged = issue.updated(&set, &ctx).expect("merge");
        assert_eq!(merged.custom_fields["Documenter"].key, "stuart");

        let clear: RawIssueUpdate = serde_json::from_value(serde_json::json!({
            "key": "P1-1", "custom": {"Documenter": null}
        }))
        .expect("update");
        let cleared = merged.updated(&clear, &ctx).expect("merge");
        assert!(cleared.custom_fields.is_empty());
    }

    #[test]
    fn test_issue_state_with_removed_same_reference_when_absent() {
        let board = board_fixture();
        let issues = Arc::clone(&board.issues);
        let unchanged = issues.with_removed(&["P9-1".to_string()]);
        assert!(Arc::ptr_eq(&issues, &unchanged));
    }
}
