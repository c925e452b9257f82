//! Tests for the administrator account endpoints.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{Caller, NoteDraft, PostDraft, Role};
use crate::inbound::http::test_utils::{api_app, harness_state, provision, sign_in};
use crate::test_support::Harness;

#[rstest]
#[case("/api/v1/users")]
#[case("/api/v1/stats")]
#[actix_web::test]
async fn standard_accounts_are_forbidden(#[case] uri: &str) {
    let harness = Harness::new();
    provision(&harness, "alice", Role::Standard).await;
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;
    let cookie = sign_in(&app, "alice").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "authorization_denied");
}

#[rstest]
#[actix_web::test]
async fn anonymous_requests_are_unauthorised() {
    let harness = Harness::new();
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/users").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn admin_creates_reads_and_updates_accounts() {
    let harness = Harness::new();
    provision(&harness, "root", Role::Administrator).await;
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;
    let admin = sign_in(&app, "root").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .cookie(admin.clone())
            .set_json(json!({ "username": "carol", "email": "carol@x.com", "password": "secret1" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(res).await;
    assert_eq!(created["role"], "USER");
    let uri = format!("/api/v1/users/{}", created["id"].as_str().expect("id"));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .cookie(admin.clone())
            .set_json(json!({ "role": "ADMIN", "email": "Carol@Y.com" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated: Value = actix_test::read_body_json(res).await;
    assert_eq!(updated["role"], "ADMIN");
    assert_eq!(updated["email"], "carol@y.com");
    assert_eq!(updated["username"], "carol");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users")
            .cookie(admin)
            .to_request(),
    )
    .await;
    let listed: Value = actix_test::read_body_json(res).await;
    assert_eq!(listed["count"], 2);
    assert!(!listed.to_string().contains("argon2"));
}

#[rstest]
#[actix_web::test]
async fn duplicate_usernames_conflict() {
    let harness = Harness::new();
    provision(&harness, "root", Role::Administrator).await;
    provision(&harness, "alice", Role::Standard).await;
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;
    let admin = sign_in(&app, "root").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .cookie(admin)
            .set_json(json!({
                "username": "alice",
                "email": "other@x.com",
                "password": "secret1",
                "role": "ADMIN"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "username");
}

#[rstest]
#[actix_web::test]
async fn update_of_a_missing_account_is_404_before_role_parsing() {
    let harness = Harness::new();
    provision(&harness, "root", Role::Administrator).await;
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;
    let admin = sign_in(&app, "root").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/users/3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .cookie(admin)
            .set_json(json!({ "role": "SUPERUSER" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn admins_cannot_delete_themselves() {
    let harness = Harness::new();
    let root = provision(&harness, "root", Role::Administrator).await;
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;
    let admin = sign_in(&app, "root").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{}", root.id()))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "self_deletion_forbidden");

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn deleting_an_account_removes_its_notes_and_ends_its_session() {
    let harness = Harness::new();
    provision(&harness, "root", Role::Administrator).await;
    let alice = provision(&harness, "alice", Role::Standard).await;
    harness
        .notes
        .create(
            &Caller::new(alice.id(), alice.role()),
            &NoteDraft {
                title: "Doomed".into(),
                content: "soon gone".into(),
            },
        )
        .await
        .expect("create note");
    harness
        .posts
        .create(
            &Caller::new(alice.id(), alice.role()),
            &PostDraft {
                title: "Farewell".into(),
                content: "also soon gone".into(),
                tags: Vec::new(),
            },
        )
        .await
        .expect("create post");
    let app = actix_test::init_service(api_app(harness_state(&harness))).await;
    let admin = sign_in(&app, "root").await;
    let alice_cookie = sign_in(&app, "alice").await;

    let stats = |cookie: actix_web::cookie::Cookie<'static>| {
        actix_test::TestRequest::get()
            .uri("/api/v1/stats")
            .cookie(cookie)
            .to_request()
    };
    let before: Value =
        actix_test::read_body_json(actix_test::call_service(&app, stats(admin.clone())).await)
            .await;
    assert_eq!(before, json!({ "totalUsers": 2, "totalNotes": 1, "totalOrders": 0, "totalPosts": 1 }));

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{}", alice.id()))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let after: Value =
        actix_test::read_body_json(actix_test::call_service(&app, stats(admin)).await).await;
    assert_eq!(after, json!({ "totalUsers": 1, "totalNotes": 0, "totalOrders": 0, "totalPosts": 0 }));

    let stale = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/notes")
            .cookie(alice_cookie)
            .to_request(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}
