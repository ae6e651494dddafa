//! Header layout: the board's state columns and the 2-row header table
//! rendered above them.
//!
//! Derived wholesale from the raw `states`/`headers`/`backlog`/`done`
//! configuration. There is no incremental mutation; a full deserialize
//! recomputes the layout and the aggregate reducer reuses the previous
//! value when it is structurally unchanged.

use std::sync::Arc;

use super::assignee::initials_of;
use crate::raw::RawState;

/// One cell of the header table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub name: String,
    /// Same derivation as assignee initials.
    pub abbreviation: String,
    /// Row span: 2 for cells that are not split into category + states.
    pub rows: usize,
    /// Column span: how many state columns the cell covers.
    pub cols: usize,
    /// Aggregated work-in-progress limit of the covered states.
    pub wip: u32,
    pub backlog: bool,
    /// Indices into [`HeaderState::states`] of the covered states.
    pub state_indices: Vec<usize>,
}

impl HeaderCell {
    fn new(name: &str, rows: usize, backlog: bool, state_index: usize, wip: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            abbreviation: initials_of(name),
            rows,
            cols: 1,
            wip: wip.unwrap_or(0),
            backlog,
            state_indices: vec![state_index],
        }
    }

    fn extend(&mut self, state_index: usize, wip: Option<u32>) {
        self.cols += 1;
        self.wip += wip.unwrap_or(0);
        self.state_indices.push(state_index);
    }
}

/// The board column names plus the 2-row header table above them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderState {
    /// All board column names, including backlog and done states.
    pub states: Vec<String>,
    /// Count of leading backlog states.
    pub backlog: usize,
    /// Count of trailing done states; these carry no header cells.
    pub done: usize,
    /// Top header row: backlog cell, category cells, and 2-row state cells.
    pub top: Vec<Arc<HeaderCell>>,
    /// Bottom header row: state cells sitting under category cells.
    pub bottom: Vec<Arc<HeaderCell>>,
}

impl HeaderState {
    pub fn from_raw(
        states: &[RawState],
        headers: &[String],
        backlog: usize,
        done: usize,
    ) -> Arc<Self> {
        let visible_end = states.len().saturating_sub(done);
        let mut top: Vec<HeaderCell> = Vec::new();
        let mut bottom: Vec<HeaderCell> = Vec::new();
        // Header index of the top row's last cell, when it is a category.
        let mut open_category: Option<usize> = None;

        for (i, state) in states.iter().enumerate() {
            if i >= visible_end {
                break;
            }
            if i < backlog {
                match top.last_mut() {
                    Some(cell) if cell.backlog => cell.extend(i, state.wip),
                    _ => top.push(HeaderCell::new("Backlog", 2, true, i, state.wip)),
                }
                continue;
            }
            match state.header.and_then(|h| headers.get(h).map(|name| (h, name))) {
                Some((header_index, header_name)) => {
                    match top.last_mut() {
                        Some(cell) if open_category == Some(header_index) => {
                            cell.extend(i, state.wip);
                        }
                        _ => {
                            top.push(HeaderCell::new(header_name, 1, false, i, state.wip));
                            open_category = Some(header_index);
                        }
                    }
                    bottom.push(HeaderCell::new(&state.name, 1, false, i, state.wip));
                }
                None => {
                    top.push(HeaderCell::new(&state.name, 2, false, i, state.wip));
                    open_category = None;
                }
            }
        }

        Arc::new(Self {
            states: states.iter().map(|s| s.name.clone()).collect(),
            backlog,
            done,
            top: top.into_iter().map(Arc::new).collect(),
            bottom: bottom.into_iter().map(Arc::new).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_state(name: &str, header: Option<usize>, wip: Option<u32>) -> RawState {
        RawState {
            name: name.to_string(),
            header,
            wip,
        }
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_flat_states_fill_top_row() {
        let state = HeaderState::from_raw(
            &[
                raw_state("S1", None, None),
                raw_state("S2", None, None),
            ],
            &[],
            0,
            0,
        );
        assert_eq!(state.states, ["S1", "S2"]);
        assert_eq!(state.top.len(), 2);
        assert!(state.bottom.is_empty());
        assert_eq!(state.top[0].rows, 2);
        assert_eq!(state.top[0].cols, 1);
    }

    #[test]
    fn test_backlog_states_fold_into_one_cell() {
        let state = HeaderState::from_raw(
            &[
                raw_state("Backlog1", None, None),
                raw_state("Backlog2", None, None),
                raw_state("S1", None, None),
            ],
            &[],
            2,
            0,
        );
        assert_eq!(state.top.len(), 2);
        let backlog_cell = &state.top[0];
        assert!(backlog_cell.backlog);
        assert_eq!(backlog_cell.name, "Backlog");
        assert_eq!(backlog_cell.cols, 2);
        assert_eq!(backlog_cell.state_indices, [0, 1]);
    }

    #[test]
    fn test_category_groups_states_into_two_rows() {
        let state = HeaderState::from_raw(
            &[
                raw_state("S1", None, Some(2)),
                raw_state("S2", Some(0), Some(3)),
                raw_state("S3", Some(0), Some(4)),
                raw_state("S4", None, None),
            ],
            &headers(&["In Progress"]),
            0,
            0,
        );
        assert_eq!(state.top.len(), 3);
        let category = &state.top[1];
        assert_eq!(category.name, "In Progress");
        assert_eq!(category.rows, 1);
        assert_eq!(category.cols, 2);
        assert_eq!(category.wip, 7);
        assert_eq!(category.state_indices, [1, 2]);
        assert_eq!(category.abbreviation, "IP");

        let under: Vec<&str> = state.bottom.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(under, ["S2", "S3"]);
    }

    #[test]
    fn test_non_contiguous_reuse_of_header_makes_two_cells() {
        let state = HeaderState::from_raw(
            &[
                raw_state("S1", Some(0), None),
                raw_state("S2", None, None),
                raw_state("S3", Some(0), None),
            ],
            &headers(&["Cat"]),
            0,
            0,
        );
        // The plain state between the two categorized ones closes the cell.
        assert_eq!(state.top.len(), 3);
        assert_eq!(state.top[0].name, "Cat");
        assert_eq!(state.top[2].name, "Cat");
    }

    #[test]
    fn test_done_states_carry_no_header_cells() {
        let state = HeaderState::from_raw(
            &[
                raw_state("S1", None, None),
                raw_state("Done1", None, None),
                raw_state("Done2", None, None),
            ],
            &[],
            0,
            2,
        );
        assert_eq!(state.states.len(), 3);
        assert_eq!(state.top.len(), 1);
    }

    #[test]
    fn test_recompute_is_structurally_equal() {
        let states = [
            raw_state("B", None, None),
            raw_state("S1", Some(0), Some(1)),
            raw_state("S2", Some(0), None),
        ];
        let names = headers(&["Cat"]);
        let a = HeaderState::from_raw(&states, &names, 1, 0);
        let b = HeaderState::from_raw(&states, &names, 1, 0);
        assert_eq!(*a, *b);
        assert!(!Arc::ptr_eq(&a, &b));
    }
}
