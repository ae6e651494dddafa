//! End-to-end tests driving the public parse + match API the way board
//! filters and manual swimlanes use it.

use boardwalk_query::{parse, MatchError, ParseError, QueryableIssue};

struct Card {
    assignee: Option<&'static str>,
    priority: &'static str,
    issue_type: &'static str,
    project: &'static str,
    components: Option<Vec<String>>,
    labels: Option<Vec<String>>,
    fix_versions: Option<Vec<String>>,
}

impl Card {
    fn new(project: &'static str) -> Self {
        Self {
            assignee: None,
            priority: "Major",
            issue_type: "Task",
            project,
            components: None,
            labels: None,
            fix_versions: None,
        }
    }
}

impl QueryableIssue for Card {
    fn assignee_key(&self) -> Option<&str> {
        self.assignee
    }
    fn priority_name(&self) -> &str {
        self.priority
    }
    fn issue_type_name(&self) -> &str {
        self.issue_type
    }
    fn project_code(&self) -> &str {
        self.project
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

#[test]
fn swimlane_style_query_selects_matching_cards() {
    let expr = parse(
        "project = \"SUP\" and (priority in (\"Blocker\", \"Critical\") or label = \"escalated\")",
    )
    .expect("parse");

    let mut escalated = Card::new("SUP");
    escalated.labels = Some(vec!["escalated".to_string()]);
    assert!(expr.matches(&escalated).expect("match"));

    let mut blocker = Card::new("SUP");
    blocker.priority = "Blocker";
    assert!(expr.matches(&blocker).expect("match"));

    let other_project = Card::new("DEV");
    assert!(!expr.matches(&other_project).expect("match"));
}

#[test]
fn unassigned_lane_query() {
    let expr = parse("assignee is empty").expect("parse");
    assert!(expr.matches(&Card::new("P1")).expect("match"));

    let mut assigned = Card::new("P1");
    assigned.assignee = Some("kabir");
    assert!(!expr.matches(&assigned).expect("match"));
}

#[test]
fn parse_errors_are_values_not_panics() {
    let err: ParseError = parse("assignee === \"x\"").expect_err("should fail");
    assert!(err.offset > 0);
    assert!(!err.message.is_empty());
}

#[test]
fn custom_fields_parse_but_do_not_match() {
    let expr = parse("Tester = \"jason\"").expect("parse");
    assert!(matches!(
        expr.matches(&Card::new("P1")),
        Err(MatchError::UnsupportedField { .. })
    ));
}
