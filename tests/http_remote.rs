use std::sync::Arc;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

use todosync::{
    config::RemoteConfig,
    core::store::TaskStore,
    op::RemoteOp,
    remote::{RemoteError, TaskRemote, http::HttpTaskRemote},
    task::{DraftRecord, SubmitIntent, TaskField, TaskRecord},
};

fn remote_for(server: &ServerGuard) -> HttpTaskRemote {
    HttpTaskRemote::new(&RemoteConfig {
        base_url: server.url(),
    })
}

fn milk() -> TaskRecord {
    TaskRecord {
        id: "1".to_string(),
        title: "Buy milk".to_string(),
        priority: "low".to_string(),
        category: "errand".to_string(),
        completed: false,
    }
}

#[tokio::test]
async fn list_decodes_array() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{"id": "1", "title": "Buy milk", "priority": "low", "category": "errand", "completed": false}])
                .to_string(),
        )
        .create_async()
        .await;

    let tasks = remote_for(&server).list_all().await.expect("list");
    assert_eq!(tasks, vec![milk()]);
    mock.assert_async().await;
}

#[tokio::test]
async fn create_posts_json_draft_with_completed_false() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/tasks")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "title": "Pay bills",
            "priority": "high",
            "category": "finance",
            "completed": false
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "2", "title": "Pay bills", "priority": "high", "category": "finance", "completed": false})
                .to_string(),
        )
        .create_async()
        .await;

    let draft = DraftRecord {
        title: "Pay bills".to_string(),
        priority: "high".to_string(),
        category: "finance".to_string(),
    };
    let created = remote_for(&server).create(&draft).await.expect("create");
    assert_eq!(created.id, "2");
    mock.assert_async().await;
}

#[tokio::test]
async fn update_puts_full_record() {
    let mut server = Server::new_async().await;
    let mut edited = milk();
    edited.title = "Buy oat milk".to_string();
    let mock = server
        .mock("PUT", "/tasks/1")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::to_value(&edited).expect("json")))
        .with_status(200)
        .create_async()
        .await;

    remote_for(&server).update("1", &edited).await.expect("update");
    mock.assert_async().await;
}

#[tokio::test]
async fn toggle_patches_full_record() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/tasks/1")
        .match_body(Matcher::Json(json!({
            "id": "1",
            "title": "Buy milk",
            "priority": "low",
            "category": "errand",
            "completed": true
        })))
        .with_status(200)
        .create_async()
        .await;

    remote_for(&server).patch("1", &milk().toggled()).await.expect("patch");
    mock.assert_async().await;
}

#[tokio::test]
async fn delete_hits_item_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/tasks/1")
        .with_status(200)
        .create_async()
        .await;

    remote_for(&server).remove("1").await.expect("delete");
    mock.assert_async().await;
}

#[tokio::test]
async fn any_non_success_status_is_failure() {
    for status in [400, 404, 500] {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/tasks/1")
            .with_status(status)
            .expect(1)
            .create_async()
            .await;

        let err = remote_for(&server).remove("1").await.expect_err("status");
        match err {
            RemoteError::Status { op, status: got } => {
                assert_eq!(op, RemoteOp::Delete { id: "1".to_string() });
                assert_eq!(usize::from(got), status);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn malformed_list_is_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = remote_for(&server).list_all().await.expect_err("decode");
    assert!(matches!(err, RemoteError::Decode { op: RemoteOp::List, .. }));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let remote = HttpTaskRemote::new(&RemoteConfig {
        base_url: "http://127.0.0.1:9".to_string(),
    });
    let err = remote.list_all().await.expect_err("unreachable");
    assert!(matches!(err, RemoteError::Transport { .. }));
}

#[tokio::test]
async fn store_over_http_end_to_end() {
    let mut server = Server::new_async().await;
    let list_one = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([milk()]).to_string())
        .expect(1)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/tasks")
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"id": "2", "title": "Pay bills", "priority": "high", "category": "finance", "completed": false})
                .to_string(),
        )
        .create_async()
        .await;

    let mut store = TaskStore::init(Arc::new(remote_for(&server))).await;
    store.set_draft_field(TaskField::Title, "Pay bills");
    store.set_draft_field(TaskField::Priority, "high");
    store.set_draft_field(TaskField::Category, "finance");
    store.submit_draft(SubmitIntent::default()).await.expect("submit");

    let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert!(store.draft().is_empty());
    list_one.assert_async().await;
    create.assert_async().await;
}
