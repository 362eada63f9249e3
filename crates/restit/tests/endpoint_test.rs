//! End-to-end tests running cases against an in-process HTTP server.
//!
//! The server is an axum router on an ephemeral loopback port serving a
//! small fixed set of users.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Path, Query};
use axum::http::StatusCode as HttpStatus;
use axum::routing::get;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use restit::{
    Case, CaseError, ExpectationError, HttpMethod, QueryParams, ReqwestSession, RequestSpec,
    Response, ResponseError, SessionConfig, StatusExpectation, Tester, TransportError,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
    email: String,
}

/// A user list whose items need a plausible email and match by name.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct Users(Vec<User>);

impl Response for Users {
    fn count(&self) -> usize {
        self.0.len()
    }

    fn nth_valid(&self, index: usize) -> Result<(), ResponseError> {
        let user = self.0.get(index).ok_or(ResponseError::OutOfRange {
            index,
            count: self.count(),
        })?;
        if user.email.contains('@') {
            Ok(())
        } else {
            Err(ResponseError::Invalid(format!(
                "email '{}' has no @",
                user.email
            )))
        }
    }

    fn get_nth(&self, index: usize) -> Result<Value, ResponseError> {
        let user = self.0.get(index).ok_or(ResponseError::OutOfRange {
            index,
            count: self.count(),
        })?;
        serde_json::to_value(user).map_err(|e| ResponseError::Invalid(e.to_string()))
    }

    fn match_items(&self, actual: &Value, expected: &Value) -> Result<(), ResponseError> {
        if actual["name"] == expected["name"] {
            Ok(())
        } else {
            Err(ResponseError::Mismatch(format!(
                "name is {} (expected {})",
                actual["name"], expected["name"]
            )))
        }
    }
}

fn fixtures() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "alice", "email": "alice@example.com" }),
        json!({ "id": 2, "name": "bob", "email": "bob@example.com" }),
        json!({ "id": 3, "name": "carol", "email": "carol@example.com" }),
    ]
}

async fn list_users(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let users = fixtures()
        .into_iter()
        .filter(|u| query.get("name").is_none_or(|name| u["name"] == name.as_str()))
        .collect();
    Json(Value::Array(users))
}

async fn legacy_users() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "alice", "email": "alice@example.com" },
        { "id": 2, "name": "bob", "email": "bob.example.com" },
    ]))
}

async fn create_user(Json(mut body): Json<Value>) -> (HttpStatus, Json<Value>) {
    body["id"] = json!(4);
    (HttpStatus::CREATED, Json(body))
}

async fn retrieve_user(Path(id): Path<u64>) -> Result<Json<Value>, (HttpStatus, Json<Value>)> {
    fixtures()
        .into_iter()
        .find(|u| u["id"] == id)
        .map(Json)
        .ok_or((HttpStatus::NOT_FOUND, Json(json!({ "error": "no such user" }))))
}

async fn update_user(Path(id): Path<u64>, Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!(id);
    Json(body)
}

async fn delete_user(Path(_id): Path<u64>) -> HttpStatus {
    HttpStatus::NO_CONTENT
}

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(retrieve_user).put(update_user).delete(delete_user),
        )
        .route("/legacy-users", get(legacy_users));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read server address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}

async fn users_tester() -> (SocketAddr, Tester<ReqwestSession>) {
    restit::init_tracing();
    let addr = serve().await;
    let tester = restit::rest_with_config(
        "Users",
        format!("http://{addr}/users"),
        &SessionConfig::default(),
    )
    .expect("Failed to create tester");
    (addr, tester)
}

fn list(url: String) -> Case<ReqwestSession> {
    Case::new(
        RequestSpec::new(HttpMethod::Get, url),
        ReqwestSession::new().expect("Failed to create session"),
    )
}

#[tokio::test]
async fn test_list_count_passes() {
    let (addr, _) = users_tester().await;

    let result = list(format!("http://{addr}/users"))
        .expect_result_count(3)
        .expect_results_valid()
        .run()
        .await
        .expect("Case should pass");

    assert!(result.response.status.is_success());
    assert_eq!(
        result.response.header("content-type"),
        Some("application/json")
    );
}

#[tokio::test]
async fn test_list_count_failure_message() {
    let (addr, _) = users_tester().await;

    let err = list(format!("http://{addr}/users"))
        .expect_result_count(2)
        .run()
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"Failed in test: "Test Result Count" Reason: "Result count is 3 (expected 2)""#
    );
    assert!(err.result().unwrap().response.status.is_success());
}

#[tokio::test]
async fn test_query_params_filter_results() {
    let (addr, _) = users_tester().await;

    list(format!("http://{addr}/users"))
        .with_params(QueryParams::new().with("name", "bob"))
        .with_response_as::<Users>()
        .expect_result_count(1)
        .expect_result_nth(0, json!({ "name": "bob" }))
        .run_or_panic()
        .await;
}

#[tokio::test]
async fn test_typed_validity_failure() {
    let (addr, _) = users_tester().await;

    let err = list(format!("http://{addr}/legacy-users"))
        .with_response_as::<Users>()
        .expect_result_count(2)
        .expect_results_valid()
        .run()
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        concat!(
            r#"Failed in test: "Test Results Valid" "#,
            r#"Reason: "Item 1 invalid: email 'bob.example.com' has no @""#,
        )
    );
}

#[tokio::test]
async fn test_retrieve_matches_item() {
    let (_, users) = users_tester().await;

    users
        .retrieve(2)
        .expect_result_count(1)
        .expect_result_nth(0, json!({ "id": 2, "name": "bob" }))
        .run_or_panic()
        .await;
}

#[tokio::test]
async fn test_retrieve_mismatch() {
    let (_, users) = users_tester().await;

    let err = users
        .retrieve(1)
        .expect_result_nth(0, json!({ "name": "bob" }))
        .run()
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"Failed in test: "Test #0 Result Valid" Reason: "$.name: expected "bob", got "alice"""#
    );
}

#[tokio::test]
async fn test_retrieve_missing_is_rejected_by_status() {
    let (_, users) = users_tester().await;

    let err = users
        .retrieve(99)
        .expect_result_count(1)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CaseError::Rejected {
            error: TransportError::UnexpectedStatus { status: 404, .. },
            ..
        }
    ));
    let rejected = err.result().expect("Rejected response should be kept");
    let body: Value = serde_json::from_slice(&rejected.response.body).unwrap();
    assert_eq!(body, json!({ "error": "no such user" }));
}

#[tokio::test]
async fn test_retrieve_missing_with_accepted_status() {
    let (_, users) = users_tester().await;

    users
        .retrieve(99)
        .expect_status(StatusExpectation::exact(404))
        .expect_result_nth(0, json!({ "error": "no such user" }))
        .run_or_panic()
        .await;
}

#[tokio::test]
async fn test_create_echoes_payload() {
    let (_, users) = users_tester().await;
    let payload = User {
        id: 0,
        name: "dave".to_string(),
        email: "dave@example.com".to_string(),
    };

    let result = users
        .create(&payload)
        .unwrap()
        .expect_status(StatusExpectation::exact(201))
        .expect_result_nth(0, json!({ "id": 4, "name": "dave" }))
        .run()
        .await
        .expect("Create should pass");

    assert_eq!(result.response.status.as_u16(), 201);
}

#[tokio::test]
async fn test_update_uses_item_url() {
    let (_, users) = users_tester().await;

    users
        .update(3, &json!({ "name": "caroline" }))
        .unwrap()
        .expect_result_nth(0, json!({ "id": 3, "name": "caroline" }))
        .run_or_panic()
        .await;
}

#[tokio::test]
async fn test_delete_has_no_items() {
    let (_, users) = users_tester().await;

    users
        .delete(1)
        .expect_result_count(0)
        .expect_results_valid()
        .run_or_panic()
        .await;
}

#[tokio::test]
async fn test_custom_expectation() {
    let (_, users) = users_tester().await;

    let err = users
        .retrieve(3)
        .with_response_as::<Value>()
        .expect_results_to_pass("Email is on the corporate domain", |r| {
            let user = r.get_nth(0)?;
            let email = user["email"].as_str().unwrap_or_default();
            if email.ends_with("@corp.example.com") {
                Ok(())
            } else {
                Err(ExpectationError::failed(format!("email is {email}")))
            }
        })
        .run()
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        r#"Failed in test: "Email is on the corporate domain" Reason: "email is carol@example.com""#
    );
}

#[tokio::test]
async fn test_connection_failure_is_reported_verbatim() {
    restit::init_tracing();
    // Bind and drop a listener so the port is known to be closed.
    let addr = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap()
        .local_addr()
        .unwrap();
    let users = restit::rest_with_config(
        "Users",
        format!("http://{addr}/users"),
        &SessionConfig::default(),
    )
    .unwrap();

    let err = users
        .retrieve(1)
        .expect_result_count(1)
        .run()
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.result().is_none());
    assert!(!err.to_string().starts_with("Failed in test"));
}
