//! Manual swimlane store: user-defined issue groupings selected by
//! Issue QL queries.

use std::sync::Arc;

use boardwalk_query::Expr;
use indexmap::IndexMap;
use tracing::warn;

use crate::raw::RawManualSwimlane;

/// One lane of a manual swimlane.
#[derive(Debug, Clone, PartialEq)]
pub struct SwimlaneEntry {
    pub name: String,
    /// The user-authored query text, kept for display and editing.
    pub query: String,
    /// The parsed query evaluated for lane membership.
    pub expr: Expr,
}

/// A named horizontal grouping with one lane per query.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualSwimlane {
    pub name: String,
    pub entries: IndexMap<String, Arc<SwimlaneEntry>>,
}

/// Ordered map of swimlane name -> swimlane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualSwimlaneState {
    pub swimlanes: IndexMap<String, Arc<ManualSwimlane>>,
}

impl ManualSwimlaneState {
    /// Deserialize swimlane configuration, parsing each lane query.
    ///
    /// A swimlane with any unparsable query is dropped entirely; sibling
    /// swimlanes are unaffected. This is the recoverable-error path for
    /// user-authored queries, not a failure of the snapshot.
    pub fn from_raw(raw: &[RawManualSwimlane]) -> Arc<Self> {
        let mut swimlanes = IndexMap::new();
        'swimlane: for swimlane in raw {
            let mut entries = IndexMap::new();
            for entry in &swimlane.entries {
                match boardwalk_query::parse(&entry.query) {
                    Ok(expr) => {
                        entries.insert(
                            entry.name.clone(),
                            Arc::new(SwimlaneEntry {
                                name: entry.name.clone(),
                                query: entry.query.clone(),
                                expr,
                            }),
                        );
                    }
                    Err(error) => {
                        warn!(
                            swimlane = %swimlane.name,
                            lane = %entry.name,
                            %error,
                            "dropping manual swimlane with unparsable query"
                        );
                        continue 'swimlane;
                    }
                }
            }
            swimlanes.insert(
                swimlane.name.clone(),
                Arc::new(ManualSwimlane {
                    name: swimlane.name.clone(),
                    entries,
                }),
            );
        }
        Arc::new(Self { swimlanes })
    }
}
