//! Board filters built from query-string parameters.
//!
//! Each parameter value is a comma-separated list of percent-encoded
//! entries. Populated filters AND together; within one filter, any entry
//! may match. Unknown parameter names are ignored.

use percent_encoding::percent_decode_str;

use crate::state::Issue;

/// The assignee filter entry selecting issues with no assignee.
pub const UNASSIGNED: &str = "unassigned";

/// Active board filters. Empty lists mean "no filter on that field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub projects: Vec<String>,
    pub priorities: Vec<String>,
    pub issue_types: Vec<String>,
    /// Assignee keys, or the [`UNASSIGNED`] literal.
    pub assignees: Vec<String>,
    pub components: Vec<String>,
    pub labels: Vec<String>,
    pub fix_versions: Vec<String>,
    /// Exact issue keys.
    pub ids: Vec<String>,
    /// Case-insensitive summary substring.
    pub text: Option<String>,
}

impl FilterState {
    /// Build from query-string pairs (already split on `&` and `=`).
    pub fn from_query_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut state = Self::default();
        for (name, value) in pairs {
            match name {
                "project" => state.projects = decode_list(value),
                "priority" => state.priorities = decode_list(value),
                "issue-type" => state.issue_types = decode_list(value),
                "assignee" => state.assignees = decode_list(value),
                "component" => state.components = decode_list(value),
                "label" => state.labels = decode_list(value),
                "fix-version" => state.fix_versions = decode_list(value),
                "s.ids" => state.ids = decode_list(value),
                // Free text is a single entry; commas are part of the text.
                "s.text" => state.text = Some(decode(value)).filter(|text| !text.is_empty()),
                _ => {}
            }
        }
        state
    }

    /// Whether the issue passes every populated filter.
    pub fn matches(&self, issue: &Issue) -> bool {
        if !passes(&self.projects, |entry| entry == issue.project_code) {
            return false;
        }
        if !passes(&self.priorities, |entry| entry == issue.priority.name) {
            return false;
        }
        if !passes(&self.issue_types, |entry| entry == issue.issue_type.name) {
            return false;
        }
        if !passes(&self.assignees, |entry| match &issue.assignee {
            Some(assignee) => entry == assignee.key,
            None => entry == UNASSIGNED,
        }) {
            return false;
        }
        if !passes_set(&self.components, issue.components.as_deref()) {
            return false;
        }
        if !passes_set(&self.labels, issue.labels.as_deref()) {
            return false;
        }
        if !passes_set(&self.fix_versions, issue.fix_versions.as_deref()) {
            return false;
        }
        if !passes(&self.ids, |entry| entry == issue.key) {
            return false;
        }
        if let Some(text) = &self.text {
            if !issue.summary.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// An empty filter passes everything; otherwise any entry may match.
fn passes(entries: &[String], matches: impl Fn(&str) -> bool) -> bool {
    entries.is_empty() || entries.iter().any(|entry| matches(entry))
}

/// Set-valued issue fields match on intersection; an issue without the
/// field never matches a populated filter.
fn passes_set(entries: &[String], values: Option<&[String]>) -> bool {
    if entries.is_empty() {
        return true;
    }
    values.is_some_and(|values| values.iter().any(|value| entries.contains(value)))
}

fn decode_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(decode)
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn decode(entry: &str) -> String {
    percent_decode_str(entry).decode_utf8_lossy().into_owned()
}
