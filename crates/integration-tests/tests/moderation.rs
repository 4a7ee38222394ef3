//! Moderation flows driven through the views.

#![allow(clippy::unwrap_used)]

use meract_admin::notify::NoticeLevel;
use meract_admin::views::{RanksView, UsersView};
use meract_core::{UserAction, UserId, UserStatus};
use meract_integration_tests::Harness;
use mockito::Matcher;
use serde_json::json;

fn block_mock_path() -> Matcher {
    Matcher::Regex(r"^/user/block-user(\?.*)?$".to_string())
}

#[tokio::test]
async fn test_bulk_block_continues_past_a_failure() {
    let mut h = Harness::start().await.unwrap();
    h.sign_in_with("valid").unwrap();

    let mut blocked = Vec::new();
    for (id, status) in [(1, 200), (2, 500), (3, 200)] {
        let mock = h
            .server
            .mock("POST", block_mock_path())
            .match_query(Matcher::UrlEncoded("userId".into(), id.to_string()))
            .with_status(status)
            .with_body(if status == 500 {
                json!({ "message": "User is protected" }).to_string()
            } else {
                String::new()
            })
            .expect(1)
            .create_async()
            .await;
        blocked.push(mock);
    }
    let list = h
        .server
        .mock("GET", "/user/all-users")
        .with_body(
            json!([
                { "id": 1, "email": "a@meract.app", "status": "BLOCKED" },
                { "id": 2, "email": "b@meract.app", "status": "ACTIVE" },
                { "id": 3, "email": "c@meract.app", "status": "BLOCKED" }
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let mut view = UsersView::new(h.ctx());
    for id in [1, 2, 3] {
        view.select(UserId::new(id));
    }
    let report = view.apply_bulk(UserAction::Block).await;

    // Each request went out exactly once: no retry of the failed one.
    for mock in &blocked {
        mock.assert_async().await;
    }
    list.assert_async().await;

    assert_eq!(report.succeeded, [UserId::new(1), UserId::new(3)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed.first().unwrap().0, UserId::new(2));
    assert!(view.selected().is_empty());

    let statuses: Vec<UserStatus> = view.visible().iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        [UserStatus::Blocked, UserStatus::Active, UserStatus::Blocked]
    );

    let notices = h.notices.notices();
    let summary = notices.last().unwrap();
    assert_eq!(summary.level, NoticeLevel::Error);
    assert_eq!(summary.message, "block: 2 succeeded, 1 failed");
}

#[tokio::test]
async fn test_creating_same_rank_twice_makes_two() {
    let mut h = Harness::start().await.unwrap();
    h.sign_in_with("valid").unwrap();

    let create = h
        .server
        .mock("POST", "/rank/create-rank")
        .match_body(Matcher::Json(json!({ "name": "Explorer" })))
        .with_status(201)
        .with_body(json!({ "id": 5, "name": "Explorer" }).to_string())
        .expect(2)
        .create_async()
        .await;
    let _list = h
        .server
        .mock("GET", "/rank/find-all")
        .with_body(
            json!([
                { "id": 5, "name": "Explorer" },
                { "id": 6, "name": "Explorer" }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let mut view = RanksView::new(h.ctx());
    view.create("Explorer").await.unwrap();
    view.create("Explorer").await.unwrap();

    create.assert_async().await;
    assert_eq!(view.ranks().items().len(), 2);
    assert!(
        h.notices
            .notices()
            .iter()
            .all(|n| n.level == NoticeLevel::Success)
    );
}

#[tokio::test]
async fn test_lost_session_during_action_asks_for_sign_in() {
    let mut h = Harness::start().await.unwrap();
    h.sign_in_with("stale").unwrap();

    let _warn = h
        .server
        .mock("POST", Matcher::Regex(r"^/user/issue-warning(\?.*)?$".to_string()))
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let _refresh = h
        .server
        .mock("GET", "/auth/refresh")
        .with_status(401)
        .create_async()
        .await;

    let mut view = UsersView::new(h.ctx());
    let err = view.apply(UserId::new(4), UserAction::Warn).await.unwrap_err();
    assert_eq!(err.class(), meract_admin::ErrorClass::SessionLost);

    let notices = h.notices.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(
        notices.first().unwrap().message,
        "Session expired, please sign in again"
    );
    assert_eq!(h.redirect.locations(), ["/sign-in"]);
}
