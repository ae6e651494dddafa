//! Evaluation of parsed queries against a single issue.
//!
//! The matcher sees issues through the [`QueryableIssue`] trait so this
//! crate stays independent of the state model that owns the issue records.

use crate::ast::{BoolOp, CmpOp, Expr, Field};
use crate::error::MatchError;

/// The issue attributes a query can read.
///
/// Single-valued accessors return the resolved display/key strings; the
/// multi-valued accessors return `None` when the raw issue carried no such
/// field at all (treated as empty by the matcher).
pub trait QueryableIssue {
    /// Key of the assigned user, or `None` for the no-assignee sentinel.
    fn assignee_key(&self) -> Option<&str>;
    fn priority_name(&self) -> &str;
    fn issue_type_name(&self) -> &str;
    fn project_code(&self) -> &str;
    fn components(&self) -> Option<&[String]>;
    fn labels(&self) -> Option<&[String]>;
    fn fix_versions(&self) -> Option<&[String]>;
}

impl Expr {
    /// Evaluate this expression against one issue.
    pub fn matches(&self, issue: &impl QueryableIssue) -> Result<bool, MatchError> {
        match self {
            Self::AndOr {
                op,
                operands,
                negated,
            } => eval_and_or(*op, operands, *negated, issue),
            Self::Factor { field, op, value } => {
                let equal = eval_equality(field, value, issue)?;
                Ok(match op {
                    CmpOp::Eq => equal,
                    CmpOp::Ne => !equal,
                })
            }
            Self::Empty { field, negated } => {
                let empty = eval_empty(field, issue)?;
                Ok(if *negated { !empty } else { empty })
            }
        }
    }
}

/// Evaluate an AND/OR chain left to right with short-circuiting.
///
/// A negated node evaluates by De Morgan's law: the operator flips and the
/// negation is pushed onto each child, so a negated OR short-circuits like
/// an AND and vice versa.
fn eval_and_or(
    op: BoolOp,
    operands: &[Expr],
    negated: bool,
    issue: &impl QueryableIssue,
) -> Result<bool, MatchError> {
    let effective = if negated { op.flipped() } else { op };
    for operand in operands {
        let value = operand.matches(issue)? ^ negated;
        match effective {
            BoolOp::And if !value => return Ok(false),
            BoolOp::Or if value => return Ok(true),
            _ => {}
        }
    }
    Ok(effective == BoolOp::And)
}

fn eval_equality(
    field: &Field,
    value: &str,
    issue: &impl QueryableIssue,
) -> Result<bool, MatchError> {
    Ok(match field {
        Field::Assignee => issue.assignee_key() == Some(value),
        Field::Priority => issue.priority_name() == value,
        Field::Project => issue.project_code() == value,
        Field::IssueType => issue.issue_type_name() == value,
        Field::Component => set_contains(issue.components(), value),
        Field::Label => set_contains(issue.labels(), value),
        Field::FixVersion => set_contains(issue.fix_versions(), value),
        Field::Custom(name) => {
            return Err(MatchError::UnsupportedField { name: name.clone() })
        }
    })
}

fn eval_empty(field: &Field, issue: &impl QueryableIssue) -> Result<bool, MatchError> {
    Ok(match field {
        Field::Assignee => issue.assignee_key().is_none(),
        Field::Component => set_is_empty(issue.components()),
        Field::Label => set_is_empty(issue.labels()),
        Field::FixVersion => set_is_empty(issue.fix_versions()),
        // Board data guarantees these are always populated; the base value
        // is a fixed false, so IS NOT EMPTY on them is always true.
        Field::Priority | Field::Project | Field::IssueType => false,
        Field::Custom(name) => {
            return Err(MatchError::UnsupportedField { name: name.clone() })
        }
    })
}

fn set_contains(set: Option<&[String]>, value: &str) -> bool {
    set.is_some_and(|entries| entries.iter().any(|entry| entry == value))
}

fn set_is_empty(set: Option<&[String]>) -> bool {
    set.is_none_or(|entries| entries.is_empty())
}
