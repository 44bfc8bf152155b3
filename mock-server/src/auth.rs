//! Cookie sessions and the `/auth/*` handlers.

use axum::{
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiFailure, FieldError};
use crate::Db;

pub const SESSION_COOKIE: &str = "auth_token";
const PASSWORD_MIN_CHARS: usize = 8;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
}

pub(crate) struct Account {
    pub user: User,
    pub password: String,
}

/// The user owning the request's session cookie.
pub struct AuthUser(pub User);

impl FromRequestParts<Db> for AuthUser {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(SESSION_COOKIE).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(ApiFailure::Unauthorized);
        }
        let store = db.read().await;
        let user_id = store.sessions.get(token).ok_or(ApiFailure::Unauthorized)?;
        let account = store.accounts.get(user_id).ok_or(ApiFailure::Unauthorized)?;
        Ok(AuthUser(account.user.clone()))
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

fn validate_signup(input: &Credentials) -> Result<(), ApiFailure> {
    let mut details = Vec::new();
    let valid_email = input
        .email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        details.push(FieldError::new("email", "value is not a valid email address"));
    }
    if input.password.chars().count() < PASSWORD_MIN_CHARS {
        details.push(FieldError::new("password", "String should have at least 8 characters"));
    }
    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiFailure::Validation(details))
    }
}

pub async fn signup(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<Credentials>,
) -> Result<impl IntoResponse, ApiFailure> {
    validate_signup(&input)?;
    let email = input.email.trim().to_ascii_lowercase();

    let mut store = db.write().await;
    if store.accounts.values().any(|a| a.user.email == email) {
        return Err(ApiFailure::EmailExists);
    }
    let user = User {
        id: Uuid::new_v4(),
        email,
    };
    store.accounts.insert(
        user.id,
        Account {
            user: user.clone(),
            password: input.password,
        },
    );
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user.id);
    info!(user_id = %user.id, "signed up");

    Ok((StatusCode::CREATED, jar.add(session_cookie(token)), Json(AuthResponse { user })))
}

pub async fn signin(
    State(db): State<Db>,
    jar: CookieJar,
    Json(input): Json<Credentials>,
) -> Result<impl IntoResponse, ApiFailure> {
    let email = input.email.trim().to_ascii_lowercase();

    let mut store = db.write().await;
    let user = store
        .accounts
        .values()
        .find(|a| a.user.email == email && a.password == input.password)
        .map(|a| a.user.clone())
        .ok_or(ApiFailure::InvalidCredentials)?;
    // One live session per user.
    store.sessions.retain(|_, owner| *owner != user.id);
    let token = Uuid::new_v4().to_string();
    store.sessions.insert(token.clone(), user.id);
    info!(user_id = %user.id, "signed in");

    Ok((jar.add(session_cookie(token)), Json(AuthResponse { user })))
}

pub async fn signout(State(db): State<Db>, jar: CookieJar) -> impl IntoResponse {
    if let Some(token) = jar.get(SESSION_COOKIE).map(Cookie::value) {
        db.write().await.sessions.remove(token);
    }
    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(json!({ "message": "Signed out successfully" })))
}

pub async fn session(AuthUser(user): AuthUser) -> Json<AuthResponse> {
    Json(AuthResponse { user })
}
