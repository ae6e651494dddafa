//! Expression tree produced by the Issue QL parser.

/// Boolean connective. OR binds looser than AND in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    /// The connective this one becomes under De Morgan negation.
    pub fn flipped(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

/// Comparison operator of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
}

/// An issue attribute a query can test.
///
/// Field identifiers are case-insensitive; `component`/`components` and
/// `label`/`labels` are accepted interchangeably. Identifiers outside the
/// known set parse as [`Field::Custom`] and are rejected by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Assignee,
    Component,
    Label,
    FixVersion,
    Priority,
    Project,
    IssueType,
    /// A custom field or parallel task reference. Parsed, not yet matchable.
    Custom(String),
}

impl Field {
    /// Recognize a field identifier, case-insensitively.
    pub fn parse(ident: &str) -> Self {
        match ident.to_ascii_lowercase().as_str() {
            "assignee" => Self::Assignee,
            "component" | "components" => Self::Component,
            "label" | "labels" => Self::Label,
            "fixversion" => Self::FixVersion,
            "priority" => Self::Priority,
            "project" => Self::Project,
            "type" => Self::IssueType,
            _ => Self::Custom(ident.to_string()),
        }
    }

    /// Canonical display name, used in error messages.
    pub fn name(&self) -> &str {
        match self {
            Self::Assignee => "assignee",
            Self::Component => "component",
            Self::Label => "label",
            Self::FixVersion => "fixversion",
            Self::Priority => "priority",
            Self::Project => "project",
            Self::IssueType => "type",
            Self::Custom(name) => name,
        }
    }
}

/// A parsed Issue QL expression.
///
/// `IN (…)` desugars at parse time into an [`Expr::AndOr`] OR-node of
/// equality factors; `NOT IN` produces the same node with `negated` set.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A chain of AND or OR operands, optionally negated as a whole.
    AndOr {
        op: BoolOp,
        operands: Vec<Expr>,
        negated: bool,
    },
    /// `field = "value"` or `field != "value"`.
    Factor {
        field: Field,
        op: CmpOp,
        value: String,
    },
    /// `field IS EMPTY` or `field IS NOT EMPTY`.
    Empty { field: Field, negated: bool },
}

impl Expr {
    /// Logical negation of this expression.
    ///
    /// Factors fold the negation into their comparison operator; the other
    /// variants flip their `negated` flag.
    pub fn negated(self) -> Self {
        match self {
            Self::AndOr {
                op,
                operands,
                negated,
            } => Self::AndOr {
                op,
                operands,
                negated: !negated,
            },
            Self::Factor { field, op, value } => Self::Factor {
                field,
                op: match op {
                    CmpOp::Eq => CmpOp::Ne,
                    CmpOp::Ne => CmpOp::Eq,
                },
                value,
            },
            Self::Empty { field, negated } => Self::Empty {
                field,
                negated: !negated,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_parse_case_insensitive() {
        assert_eq!(Field::parse("ASSIGNEE"), Field::Assignee);
        assert_eq!(Field::parse("Components"), Field::Component);
        assert_eq!(Field::parse("labels"), Field::Label);
        assert_eq!(Field::parse("FixVersion"), Field::FixVersion);
        assert_eq!(Field::parse("type"), Field::IssueType);
    }

    #[test]
    fn test_field_parse_unknown_is_custom() {
        assert_eq!(
            Field::parse("Story-Points"),
            Field::Custom("Story-Points".to_string())
        );
    }

    #[test]
    fn test_negate_factor_folds_operator() {
        let expr = Expr::Factor {
            field: Field::Assignee,
            op: CmpOp::Eq,
            value: "bob".to_string(),
        };
        assert_eq!(
            expr.negated(),
            Expr::Factor {
                field: Field::Assignee,
                op: CmpOp::Ne,
                value: "bob".to_string(),
            }
        );
    }

    #[test]
    fn test_negate_empty_flips_flag() {
        let expr = Expr::Empty {
            field: Field::Component,
            negated: false,
        };
        assert_eq!(
            expr.negated(),
            Expr::Empty {
                field: Field::Component,
                negated: true,
            }
        );
    }
}
