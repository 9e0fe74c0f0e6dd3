/// Integration tests for task endpoints and the ownership gates

mod common;

use axum::http::{Method, StatusCode};
use common::{error_message, id_of, TestContext};
use plando_shared::models::page::Page;
use plando_shared::store::TaskStore;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_with_categories_then_get() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let work = ctx.category(&alice, "work").await;
    let urgent = ctx.category(&alice, "urgent").await;

    let (status, body) = ctx
        .post(
            "/api/v1/task",
            &alice.token,
            json!({
                "title": "Write report",
                "description": "Q3 numbers",
                "category_ids": [work, urgent],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    let id = id_of(&body);

    let (status, body) = ctx.get(&format!("/api/v1/task/{}", id), &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": id,
            "title": "Write report",
            "description": "Q3 numbers",
            "is_done": false,
            "categories": [
                { "id": urgent, "name": "urgent" },
                { "id": work, "name": "work" },
            ],
        })
    );
}

#[tokio::test]
async fn test_foreign_category_is_forbidden_and_nothing_is_written() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let mine = ctx.category(&alice, "mine").await;
    let theirs = ctx.category(&bob, "theirs").await;

    let (status, body) = ctx
        .post(
            "/api/v1/task",
            &alice.token,
            json!({ "title": "sneaky", "category_ids": [mine, theirs] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    error_message(&body);

    let tasks = ctx.store.list_tasks(alice.id, Page::new(1, 100)).await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_unknown_category_is_forbidden() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;

    let (status, _) = ctx
        .post(
            "/api/v1/task",
            &alice.token,
            json!({ "title": "t", "category_ids": [Uuid::new_v4()] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_foreign_task_is_forbidden_on_every_route() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let task = ctx.task(&alice, "private", &[]).await;
    let uri = format!("/api/v1/task/{}", task);

    let (status, _) = ctx.get(&uri, &bob.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.patch(&uri, &bob.token, json!({ "title": "mine now" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send(Method::POST, &format!("{}/readiness", uri), Some(&bob.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx.delete(&uri, &bob.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // untouched
    let details = ctx.store.find_task(task).await.unwrap().unwrap();
    assert_eq!(details.title, "private");
    assert!(!details.is_done);
}

#[tokio::test]
async fn test_missing_task_is_forbidden() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;

    let (status, _) = ctx
        .get(&format!("/api/v1/task/{}", Uuid::new_v4()), &alice.token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_task_id_is_bad_request() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;

    let (status, body) = ctx.get("/api/v1/task/not-a-uuid", &alice.token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "invalid task id");
}

#[tokio::test]
async fn test_gates_run_after_authentication() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let task = ctx.task(&alice, "t", &[]).await;

    let (status, _) = ctx
        .send(Method::GET, &format!("/api/v1/task/{}", task), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send(Method::POST, "/api/v1/task", None, Some(json!({ "title": "t" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_replaces_or_keeps_categories() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let work = ctx.category(&alice, "work").await;
    let home = ctx.category(&alice, "home").await;
    let task = ctx.task(&alice, "t", &[work]).await;
    let uri = format!("/api/v1/task/{}", task);

    let (status, body) = ctx
        .patch(&uri, &alice.token, json!({ "title": "renamed", "description": "d" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK" }));

    let (_, body) = ctx.get(&uri, &alice.token).await;
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["categories"], json!([{ "id": work, "name": "work" }]));

    let (status, _) = ctx
        .patch(&uri, &alice.token, json!({ "title": "renamed", "category_ids": [home] }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get(&uri, &alice.token).await;
    assert_eq!(body["categories"], json!([{ "id": home, "name": "home" }]));

    let (status, _) = ctx
        .patch(&uri, &alice.token, json!({ "title": "renamed", "category_ids": [] }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = ctx.get(&uri, &alice.token).await;
    assert_eq!(body["categories"], json!([]));
}

#[tokio::test]
async fn test_update_with_foreign_category_changes_nothing() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;
    let work = ctx.category(&alice, "work").await;
    let theirs = ctx.category(&bob, "theirs").await;
    let task = ctx.task(&alice, "original", &[work]).await;

    let (status, _) = ctx
        .patch(
            &format!("/api/v1/task/{}", task),
            &alice.token,
            json!({ "title": "changed", "category_ids": [theirs] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let details = ctx.store.find_task(task).await.unwrap().unwrap();
    assert_eq!(details.title, "original");
    assert_eq!(details.categories.len(), 1);
    assert_eq!(details.categories[0].id, work);
}

#[tokio::test]
async fn test_invalid_task_bodies_are_bad_request() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;

    for body in [
        json!({ "description": "no title" }),
        json!({ "title": "" }),
        json!({ "title": "t", "category_ids": ["nope"] }),
        json!({ "title": "x".repeat(129) }),
    ] {
        let (status, response) = ctx.post("/api/v1/task", &alice.token, body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
        error_message(&response);
    }
}

#[tokio::test]
async fn test_toggle_readiness_twice_restores_flag() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let task = ctx.task(&alice, "t", &[]).await;
    let uri = format!("/api/v1/task/{}/readiness", task);

    let (status, body) = ctx.send(Method::POST, &uri, Some(&alice.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK", "is_done": true }));

    let (_, body) = ctx.send(Method::POST, &uri, Some(&alice.token), None).await;
    assert_eq!(body, json!({ "status": "OK", "is_done": false }));
}

#[tokio::test]
async fn test_delete_task() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let task = ctx.task(&alice, "t", &[]).await;
    let uri = format!("/api/v1/task/{}", task);

    let (status, body) = ctx.delete(&uri, &alice.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK" }));

    // gone means no longer owned
    let (status, _) = ctx.delete(&uri, &alice.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_is_sorted_paged_and_scoped() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;
    let bob = ctx.user("bob").await;

    for title in ["delta", "alpha", "charlie", "bravo", "echo"] {
        ctx.task(&alice, title, &[]).await;
    }
    ctx.task(&bob, "aardvark", &[]).await;

    let titles = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap().to_string())
            .collect()
    };

    let (status, body) = ctx
        .post("/api/v1/task/all", &alice.token, json!({ "page_index": 1, "records_per_page": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["alpha", "bravo"]);
    assert_eq!(body[0]["is_done"], false);
    assert!(body[0].get("description").is_none());

    let (_, body) = ctx
        .post("/api/v1/task/all", &alice.token, json!({ "page_index": 3, "records_per_page": 2 }))
        .await;
    assert_eq!(titles(&body), vec!["echo"]);

    let (_, body) = ctx
        .post("/api/v1/task/all", &alice.token, json!({ "page_index": 4, "records_per_page": 2 }))
        .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_list_rejects_invalid_page() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;

    let (status, body) = ctx
        .post("/api/v1/task/all", &alice.token, json!({ "page_index": 0, "records_per_page": 10 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), "page_index must be between 1 and 1000000");
}

#[tokio::test]
async fn test_list_rejects_huge_page_index() {
    let ctx = TestContext::new();
    let alice = ctx.user("alice").await;

    for uri in ["/api/v1/task/all", "/api/v1/category/all"] {
        let (status, body) = ctx
            .post(uri, &alice.token, json!({ "page_index": i64::MAX, "records_per_page": 2 }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), "page_index must be between 1 and 1000000");
    }
}
