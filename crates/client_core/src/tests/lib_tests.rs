use super::*;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{Method as HttpMethod, StatusCode},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use shared::error::ErrorCode;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
struct RecordedRequest {
    method: String,
    id: Option<String>,
    body: Option<serde_json::Value>,
}

#[derive(Clone)]
struct ServerState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    fail_with: Option<StatusCode>,
    list_body: &'static str,
}

impl ServerState {
    fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            list_body: r#"{"users":[{"id":1,"username":"ada"},{"_id":"b2","name":"Bob Marley"}]}"#,
        }
    }

    async fn record(&self, method: HttpMethod, id: Option<String>, body: Bytes) {
        let body = (!body.is_empty())
            .then(|| serde_json::from_slice(&body).expect("json request body"));
        self.requests.lock().await.push(RecordedRequest {
            method: method.to_string(),
            id,
            body,
        });
    }
}

async fn collection(
    State(state): State<ServerState>,
    method: HttpMethod,
    body: Bytes,
) -> axum::response::Response {
    state.record(method.clone(), None, body.clone()).await;
    if let Some(status) = state.fail_with {
        return status.into_response();
    }
    if method == HttpMethod::POST {
        let mut created: serde_json::Value = serde_json::from_slice(&body).expect("json");
        created["id"] = serde_json::json!(99);
        return (StatusCode::CREATED, Json(created)).into_response();
    }
    (
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        state.list_body,
    )
        .into_response()
}

async fn item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    method: HttpMethod,
    body: Bytes,
) -> axum::response::Response {
    state.record(method.clone(), Some(id.clone()), body.clone()).await;
    if let Some(status) = state.fail_with {
        return status.into_response();
    }
    if method == HttpMethod::DELETE {
        return StatusCode::NO_CONTENT.into_response();
    }
    let updated: serde_json::Value = serde_json::from_slice(&body).expect("json");
    Json(serde_json::json!({ "message": "updated", "user": updated })).into_response()
}

async fn spawn_user_server(state: ServerState) -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/api/users", get(collection).post(collection))
        .route("/api/users/:id", put(item).delete(item))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}/api/users"))
}

fn draft(password: Option<&str>) -> UserDraft {
    UserDraft {
        username: "ada".into(),
        email: "ada@example.com".into(),
        password: password.map(str::to_string),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    }
}

#[tokio::test]
async fn list_decodes_mixed_record_shapes() {
    let state = ServerState::new();
    let base = spawn_user_server(state.clone()).await.expect("spawn server");
    let client = UserApiClient::new(&base).expect("client");

    let response = client.list().await.expect("list");
    let records = response.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, Some(UserId::Number(1)));
    assert_eq!(records[1].object_id, Some(UserId::Text("b2".into())));
    assert_eq!(records[1].name.as_deref(), Some("Bob Marley"));

    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
}

#[tokio::test]
async fn create_posts_json_body_once() {
    let state = ServerState::new();
    let base = spawn_user_server(state.clone()).await.expect("spawn server");
    let client = UserApiClient::new(&format!("{base}/")).expect("client");

    let created = client.create(&draft(Some("hunter2"))).await.expect("create");
    assert_eq!(created.id, Some(UserId::Number(99)));
    assert_eq!(created.username.as_deref(), Some("ada"));

    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(
        requests[0].body,
        Some(serde_json::json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "hunter2",
            "first_name": "Ada",
            "last_name": "Lovelace"
        }))
    );
}

#[tokio::test]
async fn update_targets_item_and_unwraps_response() {
    let state = ServerState::new();
    let base = spawn_user_server(state.clone()).await.expect("spawn server");
    let client = UserApiClient::new(&base).expect("client");

    let updated = client
        .update(&UserId::Text("65f1c0ffee".into()), &draft(None))
        .await
        .expect("update");
    assert_eq!(updated.email.as_deref(), Some("ada@example.com"));

    let requests = state.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "PUT");
    assert_eq!(requests[0].id.as_deref(), Some("65f1c0ffee"));
    let body = requests[0].body.as_ref().expect("body");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn delete_accepts_empty_reply() {
    let state = ServerState::new();
    let base = spawn_user_server(state.clone()).await.expect("spawn server");
    let client = UserApiClient::new(&base).expect("client");

    client.delete(&UserId::Number(7)).await.expect("delete");

    let requests = state.requests.lock().await;
    assert_eq!(
        *requests,
        vec![RecordedRequest {
            method: "DELETE".into(),
            id: Some("7".into()),
            body: None,
        }]
    );
}

#[tokio::test]
async fn non_success_status_is_an_error_without_retry() {
    let mut state = ServerState::new();
    state.fail_with = Some(StatusCode::NOT_FOUND);
    let base = spawn_user_server(state.clone()).await.expect("spawn server");
    let client = UserApiClient::new(&base).expect("client");

    let err = client
        .delete(&UserId::Number(404))
        .await
        .expect_err("missing user");
    assert!(matches!(
        err,
        ClientError::Status {
            code: ErrorCode::NotFound,
            status: 404,
            ..
        }
    ));
    assert_eq!(state.requests.lock().await.len(), 1);
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let mut state = ServerState::new();
    state.list_body = "<html>maintenance</html>";
    let base = spawn_user_server(state).await.expect("spawn server");
    let client = UserApiClient::new(&base).expect("client");

    let err = client.list().await.expect_err("malformed body");
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = UserApiClient::new(&format!("http://{addr}/api/users")).expect("client");
    let err = client.list().await.expect_err("connection refused");
    assert!(matches!(err, ClientError::Transport(_)));
}

#[test]
fn rejects_unusable_base_urls() {
    for raw in ["not a url", "ftp://example.com/users", "mailto:ops@example.com"] {
        let err = UserApiClient::new(raw).expect_err(raw);
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }), "{raw}");
    }
}

#[test]
fn item_urls_encode_ids_as_one_segment() {
    let client = UserApiClient::new("https://example.com/api/users/").expect("client");
    assert_eq!(client.base_url().as_str(), "https://example.com/api/users");

    let url = client
        .item_url(&UserId::Text("a/b c".into()))
        .expect("item url");
    assert_eq!(url.as_str(), "https://example.com/api/users/a%2Fb%20c");

    let root = UserApiClient::new("http://localhost:8080").expect("client");
    assert_eq!(
        root.item_url(&UserId::Number(3)).expect("item url").as_str(),
        "http://localhost:8080/3"
    );
}
