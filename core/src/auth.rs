//! Auth-session state for the current user.
//!
//! # Design
//! `AuthHolder` is an explicitly constructed context object: `mount` builds it
//! and runs the single session check, views read or `subscribe` to its
//! snapshot, and dropping it closes every subscription. It owns the
//! `ApiSession` so pages reach the backend through the same cookie store.
//!
//! Sign-in, sign-up and sign-out are not coordinated with each other. Each
//! writes the snapshot when its call resolves and the last write wins.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorPayload};
use crate::http::HttpRequest;
use crate::navigation::{Navigator, NoopNavigator, SIGNIN_ROUTE, TODOS_ROUTE};
use crate::session::ApiSession;
use crate::transport::Transport;
use crate::types::{Credentials, SessionResponse, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// The session check has not completed yet.
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

/// Observable auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub status: AuthStatus,
    pub loading: bool,
    /// Message from the last failed sign-in or sign-up, kept until the next
    /// attempt or an explicit `clear_error`.
    pub error: Option<String>,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            status: AuthStatus::Unknown,
            loading: true,
            error: None,
        }
    }
}

impl AuthSnapshot {
    pub fn user(&self) -> Option<&User> {
        match &self.status {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated(_))
    }
}

#[derive(Debug, Clone, Copy)]
enum AuthAction {
    SignIn,
    SignUp,
}

impl AuthAction {
    fn fallback_message(self) -> &'static str {
        match self {
            AuthAction::SignIn => "Sign in failed",
            AuthAction::SignUp => "Signup failed",
        }
    }
}

pub struct AuthHolder<T, N = NoopNavigator> {
    session: ApiSession<T, N>,
    state: watch::Sender<AuthSnapshot>,
}

impl<T: Transport, N: Navigator> AuthHolder<T, N> {
    /// Build the holder and resolve the initial session.
    ///
    /// Issues exactly one `GET /auth/session`. A user payload means
    /// authenticated; anything else, including a transport failure, means
    /// unauthenticated. No redirect is triggered here.
    pub async fn mount(session: ApiSession<T, N>) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        let holder = Self { session, state };
        holder.check_session().await;
        holder
    }

    async fn check_session(&self) {
        let request = self.session.client().build_session();
        let status = match self.session.send_quiet::<SessionResponse>(request).await {
            Ok(SessionResponse { user: Some(user) }) => AuthStatus::Authenticated(user),
            Ok(SessionResponse { user: None }) => AuthStatus::Unauthenticated,
            Err(err) => {
                debug!(%err, "session check failed");
                AuthStatus::Unauthenticated
            }
        };
        info!(authenticated = matches!(status, AuthStatus::Authenticated(_)), "session resolved");
        self.state.send_modify(|snapshot| {
            snapshot.status = status;
            snapshot.loading = false;
        });
    }

    pub fn session(&self) -> &ApiSession<T, N> {
        &self.session
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|snapshot| snapshot.error.take().is_some());
    }

    /// Exchange credentials for a session, then navigate to the todo list.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.authenticate(AuthAction::SignIn, email, password).await
    }

    /// Register a new account, which also opens a session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User, ApiError> {
        self.authenticate(AuthAction::SignUp, email, password).await
    }

    async fn authenticate(&self, action: AuthAction, email: &str, password: &str) -> Result<User, ApiError> {
        self.state.send_modify(|snapshot| {
            snapshot.error = None;
            snapshot.loading = true;
        });

        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let client = self.session.client();
        let request = match action {
            AuthAction::SignIn => client.build_sign_in(&credentials),
            AuthAction::SignUp => client.build_sign_up(&credentials),
        };

        match self.exchange_credentials(request).await {
            Ok(user) => {
                info!(user_id = %user.id, ?action, "authenticated");
                let adopted = user.clone();
                self.state.send_modify(|snapshot| {
                    snapshot.status = AuthStatus::Authenticated(adopted);
                    snapshot.loading = false;
                });
                self.session.navigator().navigate(TODOS_ROUTE);
                Ok(user)
            }
            Err((err, server_message)) => {
                let message = server_message.unwrap_or_else(|| action.fallback_message().to_string());
                warn!(%err, ?action, "authentication failed");
                self.state.send_modify(|snapshot| {
                    snapshot.error = Some(message);
                    snapshot.loading = false;
                    if snapshot.status == AuthStatus::Unknown {
                        snapshot.status = AuthStatus::Unauthenticated;
                    }
                });
                Err(err)
            }
        }
    }

    /// Returns the user on success, or the error together with the message
    /// the backend supplied, if any.
    async fn exchange_credentials(
        &self,
        request: Result<HttpRequest, ApiError>,
    ) -> Result<User, (ApiError, Option<String>)> {
        let request = request.map_err(|err| (err, None))?;
        let response = self
            .session
            .exchange(request)
            .await
            .map_err(|err| (err, None))?;
        let server_message = if response.is_success() {
            None
        } else {
            ErrorPayload::from_body(&response.body).map(|payload| payload.message)
        };
        self.session
            .client()
            .parse_auth(response)
            .map(|auth| auth.user)
            .map_err(|err| (err, server_message))
    }

    /// End the session. Backend failures are logged and otherwise ignored;
    /// the local user is always cleared.
    pub async fn sign_out(&self) {
        self.state.send_modify(|snapshot| snapshot.loading = true);

        let request = self.session.client().build_sign_out();
        if let Err(err) = self.session.send_discarding(request).await {
            warn!(%err, "sign out failed");
        }

        self.state.send_modify(|snapshot| {
            snapshot.status = AuthStatus::Unauthenticated;
            snapshot.loading = false;
        });
        info!("signed out");
        self.session.navigator().navigate(SIGNIN_ROUTE);
    }
}
