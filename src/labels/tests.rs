//! Unit tests for label reconciliation.

use std::io::Write;

use mockall::Sequence;
use rstest::{fixture, rstest};

use super::{
    ApplyScope, LabelPlan, RebaseLabelAction, apply, default_labels, extra, incorrect,
    load_labels, missing, plan, plan_for, sync_rebase_label,
};
use crate::github::error::SweepError;
use crate::github::gateway::{MockIssueGateway, MockLabelGateway};
use crate::github::locator::RepositoryLocator;
use crate::github::models::{Label, PullRequest};

fn label(name: &str, color: &str) -> Label {
    Label {
        name: name.to_owned(),
        color: color.to_owned(),
    }
}

#[fixture]
fn repository() -> RepositoryLocator {
    RepositoryLocator::parse("acme/widgets").expect("valid repository")
}

#[fixture]
fn actual() -> Vec<Label> {
    vec![
        label("bugfix", "009800"),
        label("feature", "ffffff"),
        label("wontfix", "000000"),
    ]
}

#[fixture]
fn desired() -> Vec<Label> {
    vec![
        label("bugfix", "009800"),
        label("feature", "0052cc"),
        label("needs-docs", "006b75"),
    ]
}

#[rstest]
fn diff_partitions_by_name_and_colour(actual: Vec<Label>, desired: Vec<Label>) {
    assert_eq!(missing(&actual, &desired), vec![label("needs-docs", "006b75")]);
    assert_eq!(incorrect(&actual, &desired), vec![label("feature", "0052cc")]);
    assert_eq!(extra(&actual, &desired), vec!["wontfix".to_owned()]);
}

#[rstest]
fn matching_labels_need_no_changes(desired: Vec<Label>) {
    assert!(plan(&desired, &desired).is_empty());
}

#[rstest]
fn empty_repository_misses_everything(desired: Vec<Label>) {
    let result = plan(&[], &desired);

    assert_eq!(result.missing, desired);
    assert!(result.incorrect.is_empty());
    assert!(result.extra.is_empty());
}

#[rstest]
#[tokio::test]
async fn plan_for_reads_remote_labels(
    repository: RepositoryLocator,
    actual: Vec<Label>,
    desired: Vec<Label>,
) {
    let mut gateway = MockLabelGateway::new();
    let remote = actual.clone();
    gateway
        .expect_labels()
        .times(1)
        .returning(move |_| Ok(remote.clone()));

    let result = plan_for(&gateway, &repository, &desired)
        .await
        .expect("plan should load");

    assert_eq!(result, plan(&actual, &desired));
}

#[rstest]
#[tokio::test]
async fn apply_deletes_then_updates_then_adds(repository: RepositoryLocator) {
    let mut gateway = MockLabelGateway::new();
    let mut sequence = Sequence::new();
    gateway
        .expect_delete_label()
        .withf(|_, name| name == "wontfix")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok(()));
    gateway
        .expect_update_label()
        .withf(|_, wanted| wanted.name == "feature" && wanted.color == "0052cc")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok(()));
    gateway
        .expect_add_label()
        .withf(|_, wanted| wanted.name == "needs-docs")
        .times(1)
        .in_sequence(&mut sequence)
        .returning(|_, _| Ok(()));
    let changes = LabelPlan {
        missing: vec![label("needs-docs", "006b75")],
        incorrect: vec![label("feature", "0052cc")],
        extra: vec!["wontfix".to_owned()],
    };

    apply(&gateway, &repository, &changes, ApplyScope { prune: true })
        .await
        .expect("apply should succeed");
}

#[rstest]
#[tokio::test]
async fn apply_without_prune_keeps_extra_labels(repository: RepositoryLocator) {
    let mut gateway = MockLabelGateway::new();
    gateway.expect_delete_label().never();
    gateway.expect_update_label().never();
    gateway
        .expect_add_label()
        .times(1)
        .returning(|_, _| Ok(()));
    let changes = LabelPlan {
        missing: vec![label("needs-docs", "006b75")],
        incorrect: Vec::new(),
        extra: vec!["wontfix".to_owned()],
    };

    apply(&gateway, &repository, &changes, ApplyScope::default())
        .await
        .expect("apply should succeed");
}

#[rstest]
#[tokio::test]
async fn apply_stops_at_first_failure(repository: RepositoryLocator) {
    let mut gateway = MockLabelGateway::new();
    gateway.expect_update_label().times(1).returning(|_, _| {
        Err(SweepError::Api {
            message: "validation failed".to_owned(),
        })
    });
    gateway.expect_add_label().never();
    let changes = LabelPlan {
        missing: vec![label("needs-docs", "006b75")],
        incorrect: vec![label("feature", "0052cc")],
        extra: Vec::new(),
    };

    let result = apply(&gateway, &repository, &changes, ApplyScope::default()).await;

    assert!(matches!(result, Err(SweepError::Api { .. })));
}

#[rstest]
fn default_labels_include_rebase_label() {
    let labels = default_labels();

    assert_eq!(labels.len(), 8);
    assert!(labels.contains(&label("needs-rebase", "207de5")));
}

#[rstest]
fn load_labels_reads_json_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"[{{"name": "triaged", "color": "c5def5"}}]"#).expect("write labels");

    let labels = load_labels(file.path()).expect("labels should parse");

    assert_eq!(labels, vec![label("triaged", "c5def5")]);
}

#[rstest]
fn load_labels_rejects_other_json() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"name": "triaged"}}"#).expect("write labels");

    let result = load_labels(file.path());

    assert!(matches!(result, Err(SweepError::Configuration { .. })));
}

fn conflicted(mergeable: Option<bool>) -> PullRequest {
    PullRequest {
        number: 12,
        author: Some("contributor".to_owned()),
        mergeable,
        ..PullRequest::default()
    }
}

fn issue_gateway_with_labels(labels: Vec<Label>) -> MockIssueGateway {
    let mut gateway = MockIssueGateway::new();
    gateway
        .expect_issue_labels()
        .returning(move |_, _| Ok(labels.clone()));
    gateway
}

#[rstest]
#[tokio::test]
async fn conflicting_pull_request_is_commented_and_labelled(repository: RepositoryLocator) {
    let mut gateway = issue_gateway_with_labels(Vec::new());
    gateway
        .expect_add_issue_comment()
        .withf(|_, number, body| *number == 12 && body.contains("@contributor"))
        .times(1)
        .returning(|_, _, _| Ok(()));
    gateway
        .expect_add_issue_label()
        .withf(|_, _, name| name == "needs-rebase")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let action = sync_rebase_label(&gateway, &repository, &conflicted(Some(false)), false)
        .await
        .expect("sync should succeed");

    assert_eq!(action, RebaseLabelAction::Labelled);
}

#[rstest]
#[tokio::test]
async fn no_op_reports_without_writing(repository: RepositoryLocator) {
    let mut gateway = issue_gateway_with_labels(Vec::new());
    gateway.expect_add_issue_comment().never();
    gateway.expect_add_issue_label().never();

    let action = sync_rebase_label(&gateway, &repository, &conflicted(Some(false)), true)
        .await
        .expect("sync should succeed");

    assert_eq!(action, RebaseLabelAction::Labelled);
}

#[rstest]
#[tokio::test]
async fn mergeable_pull_request_loses_stale_label(repository: RepositoryLocator) {
    let mut gateway = issue_gateway_with_labels(vec![label("needs-rebase", "207de5")]);
    gateway
        .expect_remove_issue_label()
        .times(1)
        .returning(|_, _, _| Ok(()));

    let action = sync_rebase_label(&gateway, &repository, &conflicted(Some(true)), false)
        .await
        .expect("sync should succeed");

    assert_eq!(action, RebaseLabelAction::Unlabelled);
}

#[rstest]
#[case(Some(false), vec![label("needs-rebase", "207de5")], RebaseLabelAction::AlreadyLabelled)]
#[case(Some(true), vec![], RebaseLabelAction::Clean)]
#[tokio::test]
async fn settled_pull_requests_are_left_alone(
    repository: RepositoryLocator,
    #[case] mergeable: Option<bool>,
    #[case] labels: Vec<Label>,
    #[case] expected: RebaseLabelAction,
) {
    let mut gateway = issue_gateway_with_labels(labels);
    gateway.expect_add_issue_comment().never();
    gateway.expect_add_issue_label().never();
    gateway.expect_remove_issue_label().never();

    let action = sync_rebase_label(&gateway, &repository, &conflicted(mergeable), false)
        .await
        .expect("sync should succeed");

    assert_eq!(action, expected);
}

#[rstest]
#[tokio::test]
async fn unknown_mergeability_makes_no_calls(repository: RepositoryLocator) {
    let mut gateway = MockIssueGateway::new();
    gateway.expect_issue_labels().never();

    let action = sync_rebase_label(&gateway, &repository, &conflicted(None), false)
        .await
        .expect("sync should succeed");

    assert_eq!(action, RebaseLabelAction::Unknown);
}
