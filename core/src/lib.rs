//! Session-aware API client core for the todo web app.
//!
//! # Overview
//! Everything a page needs to talk to the todo backend: a request builder
//! and status mapper (`TodoClient`), an executor that carries the session
//! cookie and redirects on 401 (`ApiSession`), the auth state holder
//! (`AuthHolder`), the cookie-presence route guard (`RouteGuard`) and the
//! todo form validation rules.
//!
//! # Design
//! - `TodoClient` is stateless and I/O-free; `build_*` produces requests and
//!   `parse_*` consumes responses, so status mapping is testable without a
//!   server.
//! - The network sits behind `Transport`; route changes sit behind
//!   `Navigator`. Both are supplied by the host.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod navigation;
pub mod route_guard;
pub mod session;
pub mod transport;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

pub use auth::{AuthHolder, AuthSnapshot, AuthStatus};
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, FieldError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use navigation::{Navigator, NoopNavigator, RecordingNavigator};
pub use route_guard::{GuardDecision, RouteGuard};
pub use session::ApiSession;
pub use transport::{ReqwestTransport, Transport};
pub use types::{AuthResponse, CreateTodo, Credentials, Empty, SessionResponse, Todo, TodoList, UpdateTodo, User};
pub use validation::{validate_new_todo, validate_update, ValidationErrors};
