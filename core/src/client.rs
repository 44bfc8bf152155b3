//! Stateless HTTP request builder and response parser for the todo backend.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a parse step that consumes an `HttpResponse`. The
//! caller (usually `ApiSession`) executes the round trip in between, keeping
//! status mapping deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AuthResponse, CreateTodo, Credentials, Empty, SessionResponse, Todo, TodoList, UpdateTodo,
};

pub const SESSION_ENDPOINT: &str = "/auth/session";
pub const SIGNIN_ENDPOINT: &str = "/auth/signin";
pub const SIGNUP_ENDPOINT: &str = "/auth/signup";
pub const SIGNOUT_ENDPOINT: &str = "/auth/signout";
pub const TASKS_ENDPOINT: &str = "/api/tasks";

/// Synchronous, stateless client for the todo backend.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a bodyless request for `endpoint`, a path relative to the base URL.
    pub fn build(&self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}{endpoint}", self.base_url))
    }

    /// Build a request carrying `body` as JSON.
    pub fn build_with_body<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        self.build(method, endpoint).with_json(body)
    }

    /// Parse any response into `T`.
    ///
    /// Non-2xx statuses become `ApiError`. A 204 yields `T` built from an
    /// empty JSON object; the body is never read.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        if !response.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }
        if response.status == 204 {
            let empty = serde_json::Value::Object(serde_json::Map::new());
            return serde_json::from_value(empty)
                .map_err(|e| ApiError::Deserialization(e.to_string()));
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    // --- auth ---

    pub fn build_session(&self) -> HttpRequest {
        self.build(HttpMethod::Get, SESSION_ENDPOINT)
    }

    pub fn build_sign_in(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Post, SIGNIN_ENDPOINT, credentials)
    }

    pub fn build_sign_up(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Post, SIGNUP_ENDPOINT, credentials)
    }

    pub fn build_sign_out(&self) -> HttpRequest {
        self.build(HttpMethod::Post, SIGNOUT_ENDPOINT)
    }

    pub fn parse_session(&self, response: HttpResponse) -> Result<SessionResponse, ApiError> {
        self.parse(response)
    }

    pub fn parse_auth(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        self.parse(response)
    }

    // --- tasks ---

    pub fn build_list_todos(&self) -> HttpRequest {
        self.build(HttpMethod::Get, TASKS_ENDPOINT)
    }

    pub fn build_get_todo(&self, id: &str) -> HttpRequest {
        self.build(HttpMethod::Get, &task_endpoint(id))
    }

    pub fn build_create_todo(&self, input: &CreateTodo) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Post, TASKS_ENDPOINT, input)
    }

    pub fn build_update_todo(&self, id: &str, input: &UpdateTodo) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Put, &task_endpoint(id), input)
    }

    pub fn build_toggle_complete(&self, id: &str) -> HttpRequest {
        self.build(HttpMethod::Patch, &format!("{}/complete", task_endpoint(id)))
    }

    pub fn build_delete_todo(&self, id: &str) -> HttpRequest {
        self.build(HttpMethod::Delete, &task_endpoint(id))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        self.parse::<TodoList>(response).map(|list| list.todos)
    }

    pub fn parse_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        self.parse(response)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.parse::<Empty>(response).map(|_| ())
    }
}

fn task_endpoint(id: &str) -> String {
    format!("{TASKS_ENDPOINT}/{id}")
}
