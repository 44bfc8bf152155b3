//! In-memory stand-in for the todo backend.
//!
//! Serves the `/auth/*` and `/api/tasks` surface with cookie sessions so the
//! client crate can be exercised over real HTTP. Passwords are compared
//! verbatim and nothing persists.

use std::{collections::HashMap, sync::Arc};

use axum::{
    routing::{get, patch, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod auth;
pub mod error;
pub mod tasks;

pub use auth::{AuthResponse, User, SESSION_COOKIE};
pub use tasks::{Todo, TodoList};

#[derive(Default)]
pub struct Store {
    pub(crate) accounts: HashMap<Uuid, auth::Account>,
    /// Session token to user id.
    pub(crate) sessions: HashMap<String, Uuid>,
    pub(crate) todos: HashMap<Uuid, Todo>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/signout", post(auth::signout))
        .route("/auth/session", get(auth::session))
        .route("/api/tasks", get(tasks::list_todos).post(tasks::create_todo))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_todo).put(tasks::update_todo).delete(tasks::delete_todo),
        )
        .route("/api/tasks/{id}/complete", patch(tasks::toggle_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
