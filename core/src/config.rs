//! Client configuration loaded from the environment.

use thiserror::Error;
use tracing::info;
use url::Url;

use crate::navigation::TODOS_ROUTE;
use crate::route_guard::DEFAULT_SESSION_COOKIE;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin, e.g. `http://localhost:8000`.
    pub api_url: String,
    /// Name of the cookie whose presence the route guard checks.
    pub session_cookie: String,
    pub protected_routes: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_cookie: DEFAULT_SESSION_COOKIE.to_string(),
            protected_routes: vec![TODOS_ROUTE.to_string()],
        }
    }
}

impl ClientConfig {
    /// Read `API_URL`, `SESSION_COOKIE` and `PROTECTED_ROUTES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| {
                    info!("{key} not set, using default: {default}");
                    default.to_string()
                })
        };

        let api_url = var("API_URL", &defaults.api_url);
        let parsed = Url::parse(&api_url).map_err(|err| ConfigError::Invalid {
            key: "API_URL",
            reason: format!("{api_url:?} is not a URL: {err}"),
        })?;
        let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
        if !matches!(parsed.scheme(), "http" | "https") || !has_host {
            return Err(ConfigError::Invalid {
                key: "API_URL",
                reason: format!("expected an http(s) URL with a host, got {api_url:?}"),
            });
        }

        let session_cookie = var("SESSION_COOKIE", &defaults.session_cookie);
        if session_cookie.contains(['=', ';', ' ']) {
            return Err(ConfigError::Invalid {
                key: "SESSION_COOKIE",
                reason: format!("{session_cookie:?} is not a valid cookie name"),
            });
        }

        let protected_routes = var("PROTECTED_ROUTES", &defaults.protected_routes.join(","))
            .split(',')
            .map(str::trim)
            .filter(|route| !route.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if let Some(route) = protected_routes.iter().find(|route| !route.starts_with('/')) {
            return Err(ConfigError::Invalid {
                key: "PROTECTED_ROUTES",
                reason: format!("route {route:?} must start with '/'"),
            });
        }

        Ok(Self {
            api_url,
            session_cookie,
            protected_routes,
        })
    }
}
