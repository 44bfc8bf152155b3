//! Per-navigation redirect decisions from session-cookie presence.
//!
//! # Design
//! The guard only checks that the session cookie exists. It never validates
//! the token: a stale cookie passes here and is rejected by the backend on
//! the first API call, which then redirects through `ApiSession`. This is a
//! fast UX redirect, not an authorization boundary.
//!
//! Protection is a plain prefix test, so `/todos` also covers `/todosarchive`.

use cookie::Cookie;
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::navigation::{SIGNIN_ROUTE, SIGNUP_ROUTE, TODOS_ROUTE};

pub const DEFAULT_SESSION_COOKIE: &str = "auth_token";

/// First-segment prefixes that are never guarded (API calls and framework
/// assets).
const UNGUARDED_PREFIXES: [&str; 4] = ["api", "_next", "_static", "_vercel"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    protected_prefixes: Vec<String>,
    cookie_name: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new([TODOS_ROUTE], DEFAULT_SESSION_COOKIE)
    }
}

impl RouteGuard {
    pub fn new<I, S>(protected_prefixes: I, cookie_name: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            protected_prefixes: protected_prefixes.into_iter().map(Into::into).collect(),
            cookie_name: cookie_name.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.protected_routes.iter().cloned(), &config.session_cookie)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Whether the guard runs for `path` at all. Paths whose first segment
    /// starts with an unguarded prefix or looks like a file name
    /// (`favicon.ico`, `robots.txt`) are passed through.
    pub fn applies_to(path: &str) -> bool {
        let rest = path.strip_prefix('/').unwrap_or(path);
        if UNGUARDED_PREFIXES.iter().any(|prefix| rest.starts_with(prefix)) {
            return false;
        }
        !starts_with_file_name(rest)
    }

    pub fn evaluate(&self, path: &str, has_session_cookie: bool) -> GuardDecision {
        if !has_session_cookie && self.is_protected(path) {
            return GuardDecision::Redirect(format!(
                "{SIGNIN_ROUTE}?redirect={}",
                encode_return_path(path)
            ));
        }
        if has_session_cookie && (path == SIGNIN_ROUTE || path == SIGNUP_ROUTE) {
            return GuardDecision::Redirect(TODOS_ROUTE.to_string());
        }
        GuardDecision::Allow
    }

    /// Evaluate a navigation given the raw `Cookie` request header.
    pub fn evaluate_request(&self, path: &str, cookie_header: Option<&str>) -> GuardDecision {
        if !Self::applies_to(path) {
            return GuardDecision::Allow;
        }
        let has_cookie = cookie_header.is_some_and(|header| has_session_cookie(header, &self.cookie_name));
        self.evaluate(path, has_cookie)
    }
}

/// Whether a `Cookie` header carries `name` with a non-empty value.
/// Surrounding quotes do not count as a value.
pub fn has_session_cookie(cookie_header: &str, name: &str) -> bool {
    Cookie::split_parse(cookie_header)
        .filter_map(Result::ok)
        .any(|cookie| cookie.name() == name && !cookie.value_trimmed().is_empty())
}

/// `[\w-]+\.\w` anchored at the start of `segment`.
fn starts_with_file_name(segment: &str) -> bool {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let stem_len = segment
        .find(|c: char| !(is_word(c) || c == '-'))
        .unwrap_or(segment.len());
    stem_len > 0
        && segment[stem_len..]
            .strip_prefix('.')
            .and_then(|ext| ext.chars().next())
            .is_some_and(is_word)
}

/// Form-encode each segment so the path survives as one query value while
/// its slashes stay readable.
fn encode_return_path(path: &str) -> String {
    path.split('/')
        .map(|segment| form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}
