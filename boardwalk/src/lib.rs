//! Client-side state engine for a kanban board viewer.
//!
//! Raw board data arrives as JSON: one full snapshot per board load, sparse
//! change-sets afterwards. This crate deserializes snapshots into a
//! normalized, immutable [`BoardState`], applies change-sets
//! deterministically, projects the state onto the board's column layout
//! with [`create_issue_table`], and filters issues with [`FilterState`].
//!
//! Every transition is a pure function from (old state, input) to new
//! state. State snapshots are `Arc`-shared and freely readable from any
//! number of consumers; callers serialize writes. Sub-states an operation
//! does not change stay pointer-identical across transitions, which is the
//! contract downstream change detection relies on.
//!
//! Query-based filtering (swimlanes, saved searches) lives in the
//! companion `boardwalk-query` crate; [`Issue`] implements its
//! `QueryableIssue` trait.

pub mod error;
pub mod filter;
pub mod raw;
pub mod state;
pub mod table;

pub use error::{Result, StateError};
pub use filter::FilterState;
pub use raw::{RawBoard, RawChangeEnvelope, RawChangeSet};
pub use state::{BoardState, Issue};
pub use table::create_issue_table;
