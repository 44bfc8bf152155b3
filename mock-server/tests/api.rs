use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, AuthResponse, Todo, TodoList};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(http::header::COOKIE, cookie);
    }
    builder.body(body.to_string()).unwrap()
}

async fn call(app: &Router, req: Request<String>) -> axum::response::Response {
    app.clone().oneshot(req).await.unwrap()
}

/// Sign up `email` and return the `name=value` session cookie pair.
async fn signup(app: &Router, email: &str) -> String {
    let body = format!(r#"{{"email":"{email}","password":"password123"}}"#);
    let resp = call(app, request("POST", "/auth/signup", None, &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let set_cookie = resp
        .headers()
        .get(http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn session_without_cookie_returns_401() {
    let app = app();
    let resp = call(&app, request("GET", "/auth/session", None, "")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn signup_then_session_returns_user() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    assert!(cookie.starts_with("auth_token="));

    let resp = call(&app, request("GET", "/auth/session", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let session: AuthResponse = body_json(resp).await;
    assert_eq!(session.user.email, "ada@example.com");
}

#[tokio::test]
async fn duplicate_signup_returns_409_nested_detail() {
    let app = app();
    signup(&app, "ada@example.com").await;
    let body = r#"{"email":"ada@example.com","password":"password123"}"#;
    let resp = call(&app, request("POST", "/auth/signup", None, body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"]["error"]["code"], "EMAIL_EXISTS");
}

#[tokio::test]
async fn signup_with_short_password_returns_400() {
    let app = app();
    let body = r#"{"email":"ada@example.com","password":"short"}"#;
    let resp = call(&app, request("POST", "/auth/signup", None, body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0]["field"], "password");
}

#[tokio::test]
async fn signin_with_wrong_password_returns_401() {
    let app = app();
    signup(&app, "ada@example.com").await;
    let body = r#"{"email":"ada@example.com","password":"wrong-password"}"#;
    let resp = call(&app, request("POST", "/auth/signin", None, body)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"]["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn signout_invalidates_session() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;

    let resp = call(&app, request("POST", "/auth/signout", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(http::header::SET_COOKIE).is_some());

    let resp = call(&app, request("GET", "/auth/session", Some(&cookie), "")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signin_replaces_earlier_session() {
    let app = app();
    let first = signup(&app, "ada@example.com").await;

    let body = r#"{"email":"ada@example.com","password":"password123"}"#;
    let resp = call(&app, request("POST", "/auth/signin", None, body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let second = resp
        .headers()
        .get(http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let resp = call(&app, request("GET", "/auth/session", Some(&first), "")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = call(&app, request("GET", "/auth/session", Some(&second), "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- tasks ---

#[tokio::test]
async fn tasks_require_session() {
    let app = app();
    let resp = call(&app, request("GET", "/api/tasks", None, "")).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_todo_returns_201() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    let resp = call(&app, request("POST", "/api/tasks", Some(&cookie), r#"{"title":"Buy milk"}"#)).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let todo: Todo = body_json(resp).await;
    assert_eq!(todo.title, "Buy milk");
    assert!(todo.description.is_none());
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);
}

#[tokio::test]
async fn create_todo_with_long_title_returns_400() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    let body = format!(r#"{{"title":"{}"}}"#, "a".repeat(201));
    let resp = call(&app, request("POST", "/api/tasks", Some(&cookie), &body)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_todo_malformed_json_returns_422() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    let resp = call(&app, request("POST", "/api/tasks", Some(&cookie), r#"{"not_title":1}"#)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_todo_not_found_uses_nested_detail() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    let resp = call(
        &app,
        request("GET", "/api/tasks/00000000-0000-0000-0000-000000000000", Some(&cookie), ""),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["detail"]["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn non_uuid_task_id_is_not_found() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    for method in ["GET", "PUT", "PATCH", "DELETE"] {
        let uri = if method == "PATCH" { "/api/tasks/missing/complete" } else { "/api/tasks/missing" };
        let resp = call(&app, request(method, uri, Some(&cookie), "{}")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{method}");
        let body: serde_json::Value = body_json(resp).await;
        assert_eq!(body["detail"]["error"]["code"], "NOT_FOUND", "{method}");
    }
}

#[tokio::test]
async fn other_users_todos_are_invisible() {
    let app = app();
    let ada = signup(&app, "ada@example.com").await;
    let bob = signup(&app, "bob@example.com").await;

    let resp = call(&app, request("POST", "/api/tasks", Some(&ada), r#"{"title":"Private"}"#)).await;
    let todo: Todo = body_json(resp).await;

    let resp = call(&app, request("GET", "/api/tasks", Some(&bob), "")).await;
    let list: TodoList = body_json(resp).await;
    assert!(list.todos.is_empty());

    let uri = format!("/api/tasks/{}", todo.id);
    let resp = call(&app, request("GET", &uri, Some(&bob), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = call(&app, request("DELETE", &uri, Some(&bob), "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    let cookie = Some(cookie.as_str());

    // create
    let resp = call(&app, request("POST", "/api/tasks", cookie, r#"{"title":"Walk dog"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Todo = body_json(resp).await;
    let id = created.id;

    // list
    let resp = call(&app, request("GET", "/api/tasks", cookie, "")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: TodoList = body_json(resp).await;
    assert_eq!(list.todos.len(), 1);
    assert_eq!(list.todos[0].id, id);

    // update: description only
    let uri = format!("/api/tasks/{id}");
    let resp = call(&app, request("PUT", &uri, cookie, r#"{"description":"around the block"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Todo = body_json(resp).await;
    assert_eq!(updated.title, "Walk dog"); // unchanged
    assert_eq!(updated.description.as_deref(), Some("around the block"));
    assert!(updated.updated_at >= created.updated_at);

    // toggle twice
    let toggle_uri = format!("/api/tasks/{id}/complete");
    let resp = call(&app, request("PATCH", &toggle_uri, cookie, "")).await;
    let toggled: Todo = body_json(resp).await;
    assert!(toggled.completed);
    let resp = call(&app, request("PATCH", &toggle_uri, cookie, "")).await;
    let toggled_back: Todo = body_json(resp).await;
    assert!(!toggled_back.completed);
    assert!(toggled_back.updated_at >= toggled.updated_at);

    // delete
    let resp = call(&app, request("DELETE", &uri, cookie, "")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = call(&app, request("GET", &uri, cookie, "")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = app();
    let cookie = signup(&app, "ada@example.com").await;
    for title in ["first", "second", "third"] {
        let body = format!(r#"{{"title":"{title}"}}"#);
        call(&app, request("POST", "/api/tasks", Some(&cookie), &body)).await;
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    let resp = call(&app, request("GET", "/api/tasks", Some(&cookie), "")).await;
    let list: TodoList = body_json(resp).await;
    let titles: Vec<_> = list.todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}
