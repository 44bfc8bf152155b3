//! `/api/tasks` handlers. Every query is scoped to the session's user; a task
//! owned by someone else answers 404 exactly like a missing one.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiFailure, FieldError};
use crate::Db;

const TITLE_MAX_CHARS: usize = 200;
const DESCRIPTION_MAX_CHARS: usize = 2000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Bump `updated_at` without ever moving it backwards.
    fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

/// Ids that are not UUIDs cannot name a task, so they answer 404 too.
fn parse_id(id: &str) -> Result<Uuid, ApiFailure> {
    Uuid::parse_str(id).map_err(|_| ApiFailure::NotFound)
}

fn check_fields(title: Option<&str>, description: Option<&str>) -> Result<(), ApiFailure> {
    let mut details = Vec::new();
    if let Some(title) = title {
        let len = title.chars().count();
        if len == 0 {
            details.push(FieldError::new("title", "String should have at least 1 character"));
        } else if len > TITLE_MAX_CHARS {
            details.push(FieldError::new("title", "String should have at most 200 characters"));
        }
    }
    if description.is_some_and(|d| d.chars().count() > DESCRIPTION_MAX_CHARS) {
        details.push(FieldError::new("description", "String should have at most 2000 characters"));
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiFailure::Validation(details))
    }
}

pub async fn list_todos(State(db): State<Db>, AuthUser(user): AuthUser) -> Json<TodoList> {
    let store = db.read().await;
    let mut todos: Vec<Todo> = store
        .todos
        .values()
        .filter(|t| t.user_id == user.id)
        .cloned()
        .collect();
    todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Json(TodoList { todos })
}

pub async fn create_todo(
    State(db): State<Db>,
    AuthUser(user): AuthUser,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiFailure> {
    check_fields(Some(&input.title), input.description.as_deref())?;
    let now = Utc::now();
    let todo = Todo {
        id: Uuid::new_v4(),
        user_id: user.id,
        title: input.title,
        description: input.description,
        completed: false,
        created_at: now,
        updated_at: now,
    };
    db.write().await.todos.insert(todo.id, todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(db): State<Db>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiFailure> {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store
        .todos
        .get(&id)
        .filter(|t| t.user_id == user.id)
        .cloned()
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

pub async fn update_todo(
    State(db): State<Db>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiFailure> {
    let id = parse_id(&id)?;
    check_fields(input.title.as_deref(), input.description.as_deref())?;
    let mut store = db.write().await;
    let todo = store
        .todos
        .get_mut(&id)
        .filter(|t| t.user_id == user.id)
        .ok_or(ApiFailure::NotFound)?;
    if let Some(title) = input.title {
        todo.title = title;
    }
    if let Some(description) = input.description {
        todo.description = Some(description);
    }
    todo.touch();
    Ok(Json(todo.clone()))
}

pub async fn toggle_todo(
    State(db): State<Db>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiFailure> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let todo = store
        .todos
        .get_mut(&id)
        .filter(|t| t.user_id == user.id)
        .ok_or(ApiFailure::NotFound)?;
    todo.completed = !todo.completed;
    todo.touch();
    Ok(Json(todo.clone()))
}

pub async fn delete_todo(
    State(db): State<Db>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let owned = store.todos.get(&id).is_some_and(|t| t.user_id == user.id);
    if !owned {
        return Err(ApiFailure::NotFound);
    }
    store.todos.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
