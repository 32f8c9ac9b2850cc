use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use rosterr::api::{self, AppState};
use rosterr::config::SessionConfig;
use rosterr::db::Store;
use rosterr::services::digest;

async fn spawn_app() -> Router {
    // A single pooled connection keeps every query on the same in-memory
    // database the migrations ran against.
    let store = Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to connect to in-memory storage");

    let session = SessionConfig {
        secret: "integration-test-secret".to_string(),
        http_only: false,
    };

    api::router(AppState::new(store), &session)
}

async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn send_json(app: &Router, method: &str, uri: &str, body: &serde_json::Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// POST /users and return the created user's id.
async fn create_user(app: &Router, name: &str, password: Option<&str>) -> String {
    let mut payload = serde_json::json!({ "name": name, "isadmin": false });
    if let Some(password) = password {
        payload["password"] = serde_json::json!(password);
    }

    let response = send_json(app, "POST", "/users", &payload).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    body["id"].as_str().expect("created user has an id").to_string()
}

#[tokio::test]
async fn test_create_assigns_id_and_hides_digest() {
    let app = spawn_app().await;

    let response = send_json(
        &app,
        "POST",
        "/users",
        &serde_json::json!({ "name": "bob", "isAdmin": false }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("application/json")
    );

    let body = body_json(response).await;
    let id = body["id"].as_str().expect("assigned id");
    assert_eq!(body["name"], "bob");
    assert_eq!(body["isadmin"], false);
    // The digest never serializes, under any name.
    assert!(body.get("password").is_none());
    assert!(body.get("password_digest").is_none());

    // The assigned id is usable immediately.
    let response = get(&app, &format!("/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["name"], "bob");
}

#[tokio::test]
async fn test_find_by_malformed_id_is_invalid_user_id() {
    let app = spawn_app().await;

    let response = get(&app, "/users/not-a-valid-id").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Invalid User ID" })
    );
}

#[tokio::test]
async fn test_find_by_unknown_id_is_invalid_user_id() {
    let app = spawn_app().await;

    let response = get(&app, "/users/00000000-0000-4000-8000-000000000000").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Invalid User ID" })
    );
}

#[tokio::test]
async fn test_list_users_and_free_alias() {
    let app = spawn_app().await;

    create_user(&app, "alice", None).await;
    create_user(&app, "bob", None).await;

    for uri in ["/users", "/free"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_malformed_payload() {
    let app = spawn_app().await;

    for method in ["POST", "PUT", "DELETE"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/users")
                    .header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Invalid request payload" })
        );
    }
}

#[tokio::test]
async fn test_update_then_fetch() {
    let app = spawn_app().await;
    let id = create_user(&app, "bob", None).await;

    let response = send_json(
        &app,
        "PUT",
        "/users",
        &serde_json::json!({ "id": id, "name": "bobby", "isadmin": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "result": "success" })
    );

    let body = body_json(get(&app, &format!("/users/{id}")).await).await;
    assert_eq!(body["name"], "bobby");
    assert_eq!(body["isadmin"], true);
}

#[tokio::test]
async fn test_update_unknown_id_is_storage_error() {
    let app = spawn_app().await;

    let response = send_json(
        &app,
        "PUT",
        "/users",
        &serde_json::json!({
            "id": "00000000-0000-4000-8000-000000000000",
            "name": "ghost"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_delete_then_find_fails() {
    let app = spawn_app().await;
    let id = create_user(&app, "carl", None).await;

    let response = send_json(
        &app,
        "DELETE",
        "/users",
        &serde_json::json!({ "id": id, "name": "carl" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "result": "success" })
    );

    let response = get(&app, &format!("/users/{id}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Invalid User ID" })
    );
}

#[tokio::test]
async fn test_find_by_name_and_admin_alias() {
    let app = spawn_app().await;
    create_user(&app, "dave", None).await;

    for uri in ["/user/dave", "/admin/dave"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "dave");
    }

    let response = get(&app, "/user/nobody").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Invalid User Name" })
    );
}

async fn login(app: &Router, login: &str, password: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/user")
                .header(
                    header::CONTENT_TYPE,
                    mime::APPLICATION_WWW_FORM_URLENCODED.as_ref(),
                )
                .body(Body::from(format!("login={login}&password={password}")))
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_login_sets_cookie_and_identifies_user() {
    let app = spawn_app().await;
    create_user(&app, "alice", Some("secret")).await;

    let response = login(&app, "alice", "secret").await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie_header = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .to_string();

    assert!(cookie_header.starts_with("auth-key="));
    assert!(cookie_header.contains("Path=/"));
    assert!(cookie_header.contains("Max-Age=604800"));
    // HttpOnly stays off unless configured on.
    assert!(!cookie_header.contains("HttpOnly"));

    let body = body_json(response).await;
    assert_eq!(body["name"], "alice");

    // Round-trip: the cookie identifies the user and yields the digest.
    let cookie = cookie_header.split(';').next().unwrap().to_string();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!(digest("secret")));
}

#[tokio::test]
async fn test_login_failure_is_undifferentiated() {
    let app = spawn_app().await;
    create_user(&app, "alice", Some("secret")).await;

    // Wrong password and unknown name read identically.
    for (name, password) in [("alice", "wrong"), ("mallory", "secret")] {
        let response = login(&app, name, password).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Invalid Name and Password" })
        );
    }
}

#[tokio::test]
async fn test_identify_without_cookie_fails() {
    let app = spawn_app().await;

    let response = get(&app, "/user").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Invalid User Name" })
    );
}

#[tokio::test]
async fn test_stale_session_for_deleted_user_is_rejected() {
    let app = spawn_app().await;
    let id = create_user(&app, "erin", Some("pw")).await;

    let response = login(&app, "erin", "pw").await;
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    send_json(
        &app,
        "DELETE",
        "/users",
        &serde_json::json!({ "id": id, "name": "erin" }),
    )
    .await;

    // The session only counts if the stored name still resolves.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/user")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({ "error": "Invalid User Name" })
    );
}
