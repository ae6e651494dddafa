//! Issue-table projection: one ranked issue bucket per board column.
//!
//! Each board project maps a subset of the board columns onto its own local
//! state list. Projection inverts that mapping per project and walks the
//! project's rank order, so issues from different projects sharing a column
//! are concatenated in per-project rank order, owner's contribution first.

use std::sync::Arc;

use crate::state::{BoardProject, HeaderState, Issue, IssueState, ProjectState, RankState};

/// Project the board state onto its column layout.
///
/// Returns one bucket per entry of `headers.states`. The owner project's
/// issues land first in every bucket, then each remaining project's in map
/// order; within a project, issues keep their rank order. Issues missing
/// from the issue store (blacklisted or deleted) are skipped.
pub fn create_issue_table(
    headers: &HeaderState,
    issues: &IssueState,
    projects: &ProjectState,
    ranks: &RankState,
) -> Vec<Vec<Arc<Issue>>> {
    let mut table: Vec<Vec<Arc<Issue>>> = vec![Vec::new(); headers.states.len()];

    let owner = projects.board_projects.get(&projects.owner);
    let rest = projects
        .board_projects
        .values()
        .filter(|project| project.code != projects.owner);
    for project in owner.into_iter().chain(rest) {
        project_into_table(&mut table, headers, issues, ranks, project);
    }

    table
}

fn project_into_table(
    table: &mut [Vec<Arc<Issue>>],
    headers: &HeaderState,
    issues: &IssueState,
    ranks: &RankState,
    project: &BoardProject,
) {
    // Local state index -> board column index, one entry per board column
    // this project maps. A project mapping fewer columns than the board has
    // gets a shorter table; the lookup below stays checked for that reason.
    let translation: Vec<usize> = headers
        .states
        .iter()
        .enumerate()
        .filter(|(_, name)| project.board_state_to_own_state.contains_key(*name))
        .map(|(column, _)| column)
        .collect();

    let Some(ranked) = ranks.ranked.get(&project.code) else {
        return;
    };
    for key in ranked {
        let Some(issue) = issues.issues.get(key) else {
            continue;
        };
        if let Some(&column) = translation.get(issue.own_state) {
            table[column].push(Arc::clone(issue));
        }
    }
}
