//! Wire format for inbound board data.
//!
//! The server sends one full snapshot per board load and sparse change-sets
//! afterwards, both as JSON with kebab-case keys. These types mirror that
//! format one-to-one; all normalization happens in the state layer. Maps use
//! [`IndexMap`] so server-side key order survives deserialization.
//!
//! The deserializer trusts the input shape: required fields are required,
//! absent optional arrays mean "empty", and no cross-reference validation
//! happens at this layer.

use indexmap::IndexMap;
use serde::Deserialize;

/// One full board snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBoard {
    /// Numeric identifier of the active board configuration.
    pub view: u64,
    #[serde(rename = "rank-custom-field-id")]
    pub rank_custom_field_id: u64,
    pub states: Vec<RawState>,
    #[serde(default)]
    pub headers: Vec<String>,
    /// Number of leading states folded into the backlog.
    #[serde(default)]
    pub backlog: usize,
    /// Number of trailing states treated as done (not displayed).
    #[serde(default)]
    pub done: usize,
    #[serde(default)]
    pub assignees: Vec<RawAssignee>,
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(rename = "fix-versions", default)]
    pub fix_versions: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<RawNamedEntry>,
    #[serde(rename = "issue-types", default)]
    pub issue_types: Vec<RawNamedEntry>,
    /// Custom field name -> selectable options.
    #[serde(default)]
    pub custom: IndexMap<String, Vec<RawCustomFieldOption>>,
    pub projects: RawProjects,
    /// Issue key -> raw issue, in server rank-agnostic order.
    #[serde(default)]
    pub issues: IndexMap<String, RawIssue>,
    #[serde(default)]
    pub blacklist: Option<RawBlacklist>,
    #[serde(rename = "manual-swimlanes", default)]
    pub manual_swimlanes: Vec<RawManualSwimlane>,
}

/// One board state/column definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RawState {
    pub name: String,
    /// Index into the `headers` array, for states grouped under a category.
    #[serde(default)]
    pub header: Option<usize>,
    /// Work-in-progress limit.
    #[serde(default)]
    pub wip: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAssignee {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// A named entry with a display colour (priorities, issue types).
#[derive(Debug, Clone, Deserialize)]
pub struct RawNamedEntry {
    pub name: String,
    #[serde(default)]
    pub colour: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCustomFieldOption {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawProjects {
    /// The project whose state list defines the board columns.
    pub owner: String,
    #[serde(default)]
    pub main: IndexMap<String, RawBoardProject>,
    #[serde(default)]
    pub linked: IndexMap<String, RawLinkedProject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBoardProject {
    #[serde(default)]
    pub colour: Option<String>,
    /// Whether issues of this project may be reranked from the board.
    #[serde(default)]
    pub rank: bool,
    /// Board state name -> this project's own state name; `null` = unmapped.
    #[serde(rename = "state-links", default)]
    pub state_links: IndexMap<String, Option<String>>,
    /// Issue keys in rank order.
    #[serde(default)]
    pub ranked: Vec<String>,
    #[serde(rename = "parallel-tasks", default)]
    pub parallel_tasks: Vec<RawParallelTask>,
    #[serde(default)]
    pub epics: Vec<RawEpic>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLinkedProject {
    #[serde(default)]
    pub states: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParallelTask {
    pub name: String,
    pub display: String,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEpic {
    pub key: String,
    pub name: String,
}

/// A raw issue. Entity references are integer indices into the ordered
/// entity stores; resolution replaces them with the records themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub key: String,
    /// Index into the issue's own project's local state list.
    pub state: usize,
    pub summary: String,
    pub priority: usize,
    #[serde(rename = "type")]
    pub issue_type: usize,
    /// Index 0 is a valid assignee; absent means unassigned.
    #[serde(default)]
    pub assignee: Option<usize>,
    #[serde(default)]
    pub components: Option<Vec<usize>>,
    #[serde(default)]
    pub labels: Option<Vec<usize>>,
    #[serde(rename = "fix-versions", default)]
    pub fix_versions: Option<Vec<usize>>,
    /// Custom field name -> option index or raw option key.
    #[serde(default)]
    pub custom: IndexMap<String, RawCustomValue>,
    #[serde(default)]
    pub epic: Option<usize>,
    /// Selected option index per configured parallel task.
    #[serde(rename = "parallel-tasks", default)]
    pub parallel_tasks: Option<Vec<usize>>,
    #[serde(rename = "linked-issues", default)]
    pub linked_issues: Vec<RawLinkedIssue>,
}

/// A custom field value reference: positional index or option key.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCustomValue {
    Index(usize),
    Key(String),
}

/// A lightweight reference to an issue outside the normalization scope.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLinkedIssue {
    pub key: String,
    pub summary: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub colour: Option<String>,
}

/// Data the server could not classify into the board configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBlacklist {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(rename = "issue-types", default)]
    pub issue_types: Vec<String>,
    #[serde(default)]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawManualSwimlane {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<RawSwimlaneEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSwimlaneEntry {
    pub name: String,
    /// Issue QL text selecting the lane's issues.
    pub query: String,
}

/// Envelope of an incremental update message.
#[derive(Debug, Clone, Deserialize)]
pub struct RawChangeEnvelope {
    pub changes: RawChangeSet,
}

/// A sparse change-set. Every key is optional; application order is fixed
/// by the reducer, not by this type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChangeSet {
    #[serde(default)]
    pub view: Option<u64>,
    #[serde(default)]
    pub assignees: Option<Vec<RawAssignee>>,
    #[serde(default)]
    pub components: Option<Vec<String>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(rename = "fix-versions", default)]
    pub fix_versions: Option<Vec<String>>,
    #[serde(default)]
    pub custom: Option<IndexMap<String, Vec<RawCustomFieldOption>>>,
    #[serde(default)]
    pub blacklist: Option<RawBlacklistChange>,
    /// Project code -> positional insertions, sorted ascending by index.
    #[serde(default)]
    pub rank: Option<IndexMap<String, Vec<RawRankChange>>>,
    #[serde(default)]
    pub issues: Option<RawIssueChanges>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBlacklistChange {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(rename = "issue-types", default)]
    pub issue_types: Vec<String>,
    #[serde(default)]
    pub issues: Vec<String>,
    /// Keys to un-blacklist.
    #[serde(rename = "removed-issues", default)]
    pub removed_issues: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRankChange {
    pub index: usize,
    pub key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssueChanges {
    #[serde(default)]
    pub new: Vec<RawIssue>,
    #[serde(default)]
    pub update: Vec<RawIssueUpdate>,
    #[serde(default)]
    pub delete: Vec<String>,
}

/// A partial-field issue update. Absent fields are left unchanged; the
/// explicit `unassigned` / `clear-*` flags distinguish "clear this field"
/// from "don't touch it".
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssueUpdate {
    pub key: String,
    #[serde(default)]
    pub state: Option<usize>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub priority: Option<usize>,
    #[serde(rename = "type", default)]
    pub issue_type: Option<usize>,
    #[serde(default)]
    pub assignee: Option<usize>,
    #[serde(default)]
    pub unassigned: bool,
    #[serde(default)]
    pub components: Option<Vec<usize>>,
    #[serde(rename = "clear-components", default)]
    pub clear_components: bool,
    #[serde(default)]
    pub labels: Option<Vec<usize>>,
    #[serde(rename = "clear-labels", default)]
    pub clear_labels: bool,
    #[serde(rename = "fix-versions", default)]
    pub fix_versions: Option<Vec<usize>>,
    #[serde(rename = "clear-fix-versions", default)]
    pub clear_fix_versions: bool,
    /// Field name -> new value, or `null` to clear that field.
    #[serde(default)]
    pub custom: Option<IndexMap<String, Option<RawCustomValue>>>,
    #[serde(rename = "parallel-tasks", default)]
    pub parallel_tasks: Option<Vec<usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_board() {
        let board: RawBoard = serde_json::from_value(serde_json::json!({
            "view": 10,
            "rank-custom-field-id": 12345,
            "states": [{"name": "Backlog"}, {"name": "Done"}],
            "projects": {"owner": "P1"}
        }))
        .expect("deserialize");
        assert_eq!(board.view, 10);
        assert_eq!(board.states.len(), 2);
        assert!(board.assignees.is_empty());
        assert!(board.issues.is_empty());
        assert!(board.blacklist.is_none());
    }

    #[test]
    fn test_deserialize_issue_distinguishes_assignee_zero_from_absent() {
        let with_zero: RawIssue = serde_json::from_value(serde_json::json!({
            "key": "P1-1", "state": 0, "summary": "s", "priority": 0, "type": 0,
            "assignee": 0
        }))
        .expect("deserialize");
        assert_eq!(with_zero.assignee, Some(0));

        let absent: RawIssue = serde_json::from_value(serde_json::json!({
            "key": "P1-1", "state": 0, "summary": "s", "priority": 0, "type": 0
        }))
        .expect("deserialize");
        assert_eq!(absent.assignee, None);
    }

    #[test]
    fn test_deserialize_custom_value_index_or_key() {
        let issue: RawIssue = serde_json::from_value(serde_json::json!({
            "key": "P1-1", "state": 0, "summary": "s", "priority": 0, "type": 0,
            "custom": {"Documenter": 1, "Tester": "tester-b"}
        }))
        .expect("deserialize");
        assert!(matches!(issue.custom["Documenter"], RawCustomValue::Index(1)));
        assert!(matches!(issue.custom["Tester"], RawCustomValue::Key(_)));
    }

    #[test]
    fn test_deserialize_change_envelope() {
        let envelope: RawChangeEnvelope = serde_json::from_value(serde_json::json!({
            "changes": {
                "view": 11,
                "rank": {"P1": [{"index": 1, "key": "P1-4"}]},
                "issues": {"delete": ["P1-9"]}
            }
        }))
        .expect("deserialize");
        let changes = envelope.changes;
        assert_eq!(changes.view, Some(11));
        assert_eq!(changes.rank.as_ref().expect("rank")["P1"][0].index, 1);
        assert_eq!(
            changes.issues.as_ref().expect("issues").delete,
            vec!["P1-9".to_string()]
        );
    }

    #[test]
    fn test_state_links_null_means_unmapped() {
        let project: RawBoardProject = serde_json::from_value(serde_json::json!({
            "colour": "#ff0000",
            "rank": true,
            "state-links": {"Board1": "Own1", "Board2": null}
        }))
        .expect("deserialize");
        assert_eq!(project.state_links["Board1"], Some("Own1".to_string()));
        assert_eq!(project.state_links["Board2"], None);
    }
}
