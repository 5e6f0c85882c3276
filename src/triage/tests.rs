//! Unit tests for the classifier library.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::{
    DEFAULT_STALE_DAYS, MemberRole, Membership, MembershipCache, PullSource, bad_status,
    last_comment_by_member, membership_of, mentions_member, merged, needs_rebase, needs_squash,
    no_member_comments, pulls_in_range, pulls_newer_than, pulls_older_than, sort_pulls,
    stale_no_activity, uncommented, unmerged,
};
use crate::enrich::EnrichedPullRequest;
use crate::github::error::SweepError;
use crate::github::gateway::{MockPullRequestGateway, MockRepositoryGateway};
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    CommitStatus, IssueComment, OwnerKind, PullRequest, PullRequestCommit, RepositoryRef,
    StatusState,
};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid instant")
}

fn pull_in(owner: &str, kind: OwnerKind, repo: &str, number: u64) -> PullRequest {
    PullRequest {
        number,
        repository: RepositoryRef {
            owner: owner.to_owned(),
            owner_kind: kind,
            name: repo.to_owned(),
        },
        ..PullRequest::default()
    }
}

fn pull(number: u64) -> PullRequest {
    pull_in("acme", OwnerKind::Organization, "widgets", number)
}

fn comment(author: &str, body: &str) -> IssueComment {
    IssueComment {
        id: 1,
        body: Some(body.to_owned()),
        author: Some(author.to_owned()),
        created_at: None,
        updated_at: None,
    }
}

fn commit(sha: &str) -> PullRequestCommit {
    PullRequestCommit {
        sha: sha.to_owned(),
        author: None,
        message: None,
        authored_at: None,
    }
}

fn status(state: StatusState) -> CommitStatus {
    CommitStatus {
        state,
        context: None,
        created_at: None,
    }
}

fn numbers<T: AsRef<PullRequest>>(items: &[T]) -> Vec<u64> {
    items.iter().map(|item| item.as_ref().number).collect()
}

fn members() -> Membership {
    Membership::organisation(["maintainer", "reviewer"])
}

#[rstest]
fn acme_widgets_scenario() {
    let items = vec![
        EnrichedPullRequest {
            comments: Some(Vec::new()),
            commits: Some(vec![commit("a")]),
            ..EnrichedPullRequest::bare(pull(1))
        },
        EnrichedPullRequest {
            comments: Some(vec![
                comment("contributor", "ready"),
                comment("maintainer", "looks good"),
            ]),
            commits: Some(vec![commit("b")]),
            ..EnrichedPullRequest::bare(pull(2))
        },
        EnrichedPullRequest {
            comments: Some(vec![comment("contributor", "bump")]),
            commits: Some(vec![commit("c"), commit("d")]),
            ..EnrichedPullRequest::bare(pull(3))
        },
    ];
    let membership = members();

    assert_eq!(numbers(&uncommented(&items)), vec![1]);
    assert_eq!(numbers(&last_comment_by_member(&items, &membership)), vec![2]);
    assert_eq!(numbers(&needs_squash(&items)), vec![3]);
}

#[rstest]
fn needs_rebase_ignores_unknown_mergeability() {
    let with_detail = |number: u64, mergeable: Option<bool>| EnrichedPullRequest {
        detail: Some(PullRequest {
            mergeable,
            ..pull(number)
        }),
        ..EnrichedPullRequest::bare(pull(number))
    };
    let items = vec![
        with_detail(1, Some(false)),
        with_detail(2, Some(true)),
        with_detail(3, None),
        EnrichedPullRequest::bare(pull(4)),
    ];

    assert_eq!(numbers(&needs_rebase(&items)), vec![1]);
}

#[rstest]
fn bad_status_looks_only_at_most_recent_entry() {
    let with_statuses = |number: u64, statuses: Vec<CommitStatus>| EnrichedPullRequest {
        statuses: Some(statuses),
        ..EnrichedPullRequest::bare(pull(number))
    };
    let items = vec![
        with_statuses(1, vec![status(StatusState::Failure), status(StatusState::Success)]),
        with_statuses(2, vec![status(StatusState::Success), status(StatusState::Failure)]),
        with_statuses(3, Vec::new()),
        with_statuses(4, vec![status(StatusState::Pending)]),
        EnrichedPullRequest::bare(pull(5)),
    ];

    assert_eq!(numbers(&bad_status(&items)), vec![1, 4]);
}

#[rstest]
fn classifiers_are_total_over_empty_input(now: DateTime<Utc>) {
    let items: Vec<EnrichedPullRequest> = Vec::new();
    let membership = members();

    assert!(needs_rebase(&items).is_empty());
    assert!(needs_squash(&items).is_empty());
    assert!(bad_status(&items).is_empty());
    assert!(uncommented(&items).is_empty());
    assert!(merged(&items).is_empty());
    assert!(unmerged(&items).is_empty());
    assert!(stale_no_activity(&items, now, DEFAULT_STALE_DAYS).is_empty());
    assert!(last_comment_by_member(&items, &membership).is_empty());
    assert!(no_member_comments(&items, &membership).is_empty());
    assert!(mentions_member(&items, &membership).is_empty());
}

#[rstest]
fn merged_and_unmerged_partition_the_input(now: DateTime<Utc>) {
    let pulls = vec![
        PullRequest {
            merged_at: Some(now),
            ..pull(1)
        },
        pull(2),
        PullRequest {
            merged_at: Some(now),
            ..pull(3)
        },
    ];

    assert_eq!(numbers(&merged(&pulls)), vec![1, 3]);
    assert_eq!(numbers(&unmerged(&pulls)), vec![2]);
}

#[rstest]
fn stale_is_a_subset_older_than_cutoff_and_idempotent(now: DateTime<Utc>) {
    let updated = |number: u64, days: i64| PullRequest {
        updated_at: Some(now - Duration::days(days)),
        ..pull(number)
    };
    let pulls = vec![
        updated(1, 41),
        updated(2, 39),
        updated(3, 400),
        PullRequest {
            updated_at: None,
            ..pull(4)
        },
    ];

    let first = stale_no_activity(&pulls, now, DEFAULT_STALE_DAYS);
    let second = stale_no_activity(&pulls, now, DEFAULT_STALE_DAYS);

    assert_eq!(numbers(&first), vec![1, 3]);
    assert_eq!(first, second);
    let cutoff = now - Duration::days(DEFAULT_STALE_DAYS);
    assert!(
        first
            .iter()
            .all(|pull| pull.updated_at.is_some_and(|at| at < cutoff))
    );
}

#[rstest]
fn no_member_comments_counts_every_comment() {
    let items = vec![
        EnrichedPullRequest {
            comments: Some(vec![comment("maintainer", "hi"), comment("someone", "bump")]),
            ..EnrichedPullRequest::bare(pull(1))
        },
        EnrichedPullRequest {
            comments: Some(vec![comment("someone", "bump")]),
            ..EnrichedPullRequest::bare(pull(2))
        },
        EnrichedPullRequest {
            comments: Some(Vec::new()),
            ..EnrichedPullRequest::bare(pull(3))
        },
        EnrichedPullRequest::bare(pull(4)),
    ];

    assert_eq!(numbers(&no_member_comments(&items, &members())), vec![2, 3]);
}

#[rstest]
fn mentions_member_checks_latest_comment_only() {
    let items = vec![
        EnrichedPullRequest {
            comments: Some(vec![comment("someone", "any news @reviewer?")]),
            ..EnrichedPullRequest::bare(pull(1))
        },
        EnrichedPullRequest {
            comments: Some(vec![
                comment("someone", "@maintainer ping"),
                comment("someone", "rebased"),
            ]),
            ..EnrichedPullRequest::bare(pull(2))
        },
        EnrichedPullRequest {
            comments: Some(vec![comment("someone", "thanks @stranger")]),
            ..EnrichedPullRequest::bare(pull(3))
        },
    ];

    assert_eq!(numbers(&mentions_member(&items, &members())), vec![1]);
}

#[rstest]
fn sort_pulls_orders_by_repository_then_number() {
    let mut pulls = vec![
        pull_in("acme", OwnerKind::Organization, "widgets", 10),
        pull_in("acme", OwnerKind::Organization, "gadgets", 30),
        pull_in("acme", OwnerKind::Organization, "widgets", 2),
        pull_in("acme", OwnerKind::Organization, "gadgets", 4),
    ];

    sort_pulls(&mut pulls);

    let keys: Vec<(&str, u64)> = pulls
        .iter()
        .map(|pull| (pull.repository.name.as_str(), pull.number))
        .collect();
    assert_eq!(
        keys,
        vec![("gadgets", 4), ("gadgets", 30), ("widgets", 2), ("widgets", 10)]
    );
}

#[rstest]
#[tokio::test]
async fn personal_repositories_have_exactly_the_owner_as_member() {
    let mut gateway = MockRepositoryGateway::new();
    gateway.expect_organization_members().never();
    let pulls = vec![
        pull_in("octocat", OwnerKind::User, "spoon", 1),
        pull_in("octocat", OwnerKind::User, "spoon", 2),
    ];

    let membership = membership_of(&gateway, &pulls)
        .await
        .expect("membership should load");

    assert_eq!(membership.len(), 1);
    assert_eq!(membership.role("octocat"), Some(MemberRole::Owner));
}

#[rstest]
#[tokio::test]
async fn organisation_membership_lists_members() {
    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_organization_members()
        .withf(|organisation| organisation == "acme")
        .times(1)
        .returning(|_| Ok(vec!["maintainer".to_owned(), "reviewer".to_owned()]));

    let membership = membership_of(&gateway, &[pull(1)])
        .await
        .expect("membership should load");

    assert_eq!(
        membership.logins().collect::<Vec<_>>(),
        vec!["maintainer", "reviewer"]
    );
    assert_eq!(membership.role("maintainer"), Some(MemberRole::Member));
}

#[rstest]
#[tokio::test]
async fn mixed_owners_are_rejected() {
    let gateway = MockRepositoryGateway::new();
    let pulls = vec![
        pull(1),
        pull_in("other", OwnerKind::Organization, "widgets", 2),
    ];

    let result = membership_of(&gateway, &pulls).await;

    assert_eq!(
        result,
        Err(SweepError::MixedOwners {
            expected: "acme".to_owned(),
            found: "other".to_owned(),
        })
    );
}

#[rstest]
#[tokio::test]
async fn empty_pull_list_has_empty_membership() {
    let gateway = MockRepositoryGateway::new();
    let pulls: Vec<PullRequest> = Vec::new();

    let membership = membership_of(&gateway, &pulls)
        .await
        .expect("membership should load");

    assert!(membership.is_empty());
}

#[rstest]
#[tokio::test]
async fn membership_cache_loads_each_owner_once() {
    let mut gateway = MockRepositoryGateway::new();
    gateway
        .expect_organization_members()
        .times(1)
        .returning(|_| Ok(vec!["maintainer".to_owned()]));
    let mut cache = MembershipCache::new();

    for repo in ["widgets", "gadgets", "gizmos"] {
        let pulls = vec![pull_in("acme", OwnerKind::Organization, repo, 1)];
        let membership = cache
            .membership_for(&gateway, &pulls)
            .await
            .expect("membership should load");
        assert!(membership.contains("maintainer"));
    }
}

#[rstest]
#[tokio::test]
async fn time_windows_require_a_source(now: DateTime<Utc>) {
    let gateway = MockPullRequestGateway::new();

    let newer = pulls_newer_than(&gateway, now, PullSource::default()).await;
    let older = pulls_older_than(&gateway, now, PullSource::default()).await;
    let range = pulls_in_range(&gateway, now, now, PullSource::default()).await;

    assert!(matches!(newer, Err(SweepError::InvalidArgument { .. })));
    assert!(matches!(older, Err(SweepError::InvalidArgument { .. })));
    assert!(matches!(range, Err(SweepError::InvalidArgument { .. })));
}

#[rstest]
#[tokio::test]
async fn time_windows_filter_on_updated_at(now: DateTime<Utc>) {
    let gateway = MockPullRequestGateway::new();
    let updated = |number: u64, days: i64| PullRequest {
        updated_at: Some(now - Duration::days(days)),
        ..pull(number)
    };
    let pulls = vec![updated(1, 1), updated(2, 10), updated(3, 100)];

    let newer = pulls_newer_than(
        &gateway,
        now - Duration::days(5),
        PullSource::from_pulls(pulls.clone()),
    )
    .await
    .expect("explicit list needs no gateway");
    let older = pulls_older_than(
        &gateway,
        now - Duration::days(5),
        PullSource::from_pulls(pulls.clone()),
    )
    .await
    .expect("explicit list needs no gateway");
    let range = pulls_in_range(
        &gateway,
        now - Duration::days(50),
        now - Duration::days(5),
        PullSource::from_pulls(pulls),
    )
    .await
    .expect("explicit list needs no gateway");

    assert_eq!(numbers(&newer), vec![1]);
    assert_eq!(numbers(&older), vec![2, 3]);
    assert_eq!(numbers(&range), vec![2]);
}

#[rstest]
#[tokio::test]
async fn time_windows_list_the_repository_when_no_pulls_given(now: DateTime<Utc>) {
    let mut gateway = MockPullRequestGateway::new();
    gateway
        .expect_list_pull_requests()
        .times(1)
        .returning(move |_, _| {
            Ok(vec![PullRequest {
                updated_at: Some(now),
                ..pull(8)
            }])
        });
    let repository = RepositoryLocator::parse("acme/widgets").expect("valid repository");

    let newer = pulls_newer_than(
        &gateway,
        now - Duration::days(1),
        PullSource::from_repository(repository),
    )
    .await
    .expect("listing should succeed");

    assert_eq!(numbers(&newer), vec![8]);
}
