//! Router state
//!
//! A snapshot of the last accepted navigation. The router commits it once
//! per navigation, as soon as the incoming route is resolved and before its
//! render runs, so components rendered during the navigation already
//! observe the new path. Last write wins when navigations overlap.

use crate::params::{QueryParams, RouteParams};

/// The committed navigation state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterState {
    /// Path of the currently displayed route.
    pub current_path: String,
    /// Path displayed before the last navigation, if any.
    pub previous_path: Option<String>,
    /// Parameters of the currently matched route.
    pub params: RouteParams,
    /// Query parameters of the current URL.
    pub query: QueryParams,
}

impl RouterState {
    /// Initial state before the first navigation commits.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            current_path: initial_path.into(),
            previous_path: None,
            params: RouteParams::new(),
            query: QueryParams::new(),
        }
    }

    /// Commit a completed navigation, rotating the current path into
    /// `previous_path`.
    pub fn commit(&mut self, path: impl Into<String>, params: RouteParams, query: QueryParams) {
        let path = path.into();
        self.previous_path = Some(std::mem::replace(&mut self.current_path, path));
        self.params = params;
        self.query = query;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_rotates_paths() {
        let mut state = RouterState::new("/");
        assert_eq!(state.previous_path, None);

        state.commit("/about", RouteParams::new(), QueryParams::new());
        assert_eq!(state.current_path, "/about");
        assert_eq!(state.previous_path.as_deref(), Some("/"));

        state.commit("/blog/x", RouteParams::new(), QueryParams::new());
        assert_eq!(state.current_path, "/blog/x");
        assert_eq!(state.previous_path.as_deref(), Some("/about"));
    }

    #[test]
    fn commit_replaces_params() {
        let mut state = RouterState::new("/");
        let mut params = RouteParams::new();
        params.insert("slug".to_string(), "intro".to_string());

        state.commit("/blog/intro", params, QueryParams::parse("tab=1"));
        assert_eq!(state.params.get("slug"), Some(&"intro".to_string()));
        assert_eq!(state.query.get("tab"), Some(&"1".to_string()));

        state.commit("/about", RouteParams::new(), QueryParams::new());
        assert!(state.params.is_empty());
    }
}
