//! Route names and the navigation side channel.
//!
//! The client never changes routes itself. It asks a `Navigator`, which in a
//! browser host performs the navigation and elsewhere may do nothing.

use std::sync::{Mutex, PoisonError};

pub const SIGNIN_ROUTE: &str = "/signin";
pub const SIGNUP_ROUTE: &str = "/signup";
pub const TODOS_ROUTE: &str = "/todos";

pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn navigate(&self, path: &str) {
        (**self).navigate(path);
    }
}

impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    fn navigate(&self, path: &str) {
        (**self).navigate(path);
    }
}

/// Navigator for contexts without a router, such as CLIs and servers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _path: &str) {}
}

/// Navigator that remembers every requested route in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_navigator_keeps_order() {
        let nav = RecordingNavigator::default();
        nav.navigate(SIGNIN_ROUTE);
        nav.navigate(TODOS_ROUTE);
        assert_eq!(nav.visits(), vec!["/signin", "/todos"]);
        assert_eq!(nav.last().as_deref(), Some("/todos"));
    }

    #[test]
    fn shared_navigator_records_through_arc() {
        let nav = std::sync::Arc::new(RecordingNavigator::default());
        let shared = std::sync::Arc::clone(&nav);
        shared.navigate(SIGNIN_ROUTE);
        assert_eq!(nav.visits(), vec!["/signin"]);
    }
}
