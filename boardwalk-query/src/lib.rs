//! Issue QL: a small boolean query language over kanban board issues.
//!
//! Queries combine attribute comparisons with `AND`/`OR` (OR binds looser),
//! parenthesized grouping, and `!( … )` negation. Three comparison forms are
//! supported:
//!
//! - equality: `assignee = "kabir"`, `type != "Bug"`
//! - membership: `component IN ("C1", "C2")`, `label NOT IN ("L1")`
//! - emptiness: `fixversion IS EMPTY`, `assignee IS NOT EMPTY`
//!
//! Keywords and field identifiers are case-insensitive. Known fields are
//! `assignee`, `component(s)`, `label(s)`, `fixversion`, `priority`,
//! `project` and `type`; anything else parses as a custom-field reference
//! that the matcher rejects with [`MatchError::UnsupportedField`].
//!
//! ## Usage
//!
//! ```
//! use boardwalk_query::{parse, QueryableIssue};
//!
//! struct Card;
//!
//! impl QueryableIssue for Card {
//!     fn assignee_key(&self) -> Option<&str> { Some("kabir") }
//!     fn priority_name(&self) -> &str { "Major" }
//!     fn issue_type_name(&self) -> &str { "Task" }
//!     fn project_code(&self) -> &str { "P1" }
//!     fn components(&self) -> Option<&[String]> { None }
//!     fn labels(&self) -> Option<&[String]> { None }
//!     fn fix_versions(&self) -> Option<&[String]> { None }
//! }
//!
//! let expr = parse("assignee = \"kabir\" and component is empty")?;
//! assert!(expr.matches(&Card)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ast;
mod error;
mod lexer;
mod matcher;
mod parser;

pub use ast::{BoolOp, CmpOp, Expr, Field};
pub use error::{MatchError, ParseError};
pub use matcher::QueryableIssue;
pub use parser::parse;
