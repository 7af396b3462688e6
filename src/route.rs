//! Route definition
//!
//! A [`Route`] binds a path pattern to a renderable component and its
//! resolved layout chain. Routes are immutable once built: the table is
//! produced wholesale by [`build_route_table`](crate::table::build_route_table)
//! or assembled route by route through the router's `add_route` methods.

use crate::component::ComponentRef;
use crate::pattern::{compile_pattern, fallback_pattern, CompiledPattern};
use crate::warn_log;

/// A path pattern bound to a component and its layout chain.
#[derive(Clone)]
pub struct Route {
    /// The route path pattern (e.g. `/blog/:slug`).
    pub path: String,
    /// Compiled matcher for the path.
    pub pattern: CompiledPattern,
    /// The page component rendered when this route matches.
    pub component: ComponentRef,
    /// True when the literal path can be compared without running the regex.
    pub exact: bool,
    /// Layout chain, outermost first, nearest ancestor last.
    pub layouts: Vec<ComponentRef>,
    /// Nested child routes, tried before this route's own pattern.
    pub children: Vec<Route>,
    /// True when the pattern failed to compile and the permissive fallback
    /// matcher is in use.
    pub pattern_fallback: bool,
}

impl Route {
    /// Create a route for the given path.
    ///
    /// A malformed path never fails construction: the route falls back to a
    /// permissive matcher and is flagged via `pattern_fallback`, with a
    /// warning logged. A route that matches too much is preferred over no
    /// router at all.
    pub fn new(path: impl Into<String>, component: ComponentRef) -> Self {
        let path = path.into();
        let (pattern, pattern_fallback) = match compile_pattern(&path) {
            Ok(pattern) => (pattern, false),
            Err(err) => {
                warn_log!("route '{}' uses fallback matcher: {}", path, err);
                (fallback_pattern(&path), true)
            }
        };
        let exact = !pattern_fallback && pattern.is_static();

        Self {
            path,
            pattern,
            component,
            exact,
            layouts: Vec::new(),
            children: Vec::new(),
            pattern_fallback,
        }
    }

    /// Override the exact-match fast path flag.
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    /// Set the layout chain, outermost first.
    pub fn layouts(mut self, layouts: Vec<ComponentRef>) -> Self {
        self.layouts = layouts;
        self
    }

    /// Set the child routes. Children carry full paths and are tried before
    /// this route's own pattern when matching.
    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }

    /// Add a single child route.
    pub fn child(mut self, child: Route) -> Self {
        self.children.push(child);
        self
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("exact", &self.exact)
            .field("layouts", &self.layouts.len())
            .field("children", &self.children.len())
            .field("pattern_fallback", &self.pattern_fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{component, ViewNode};

    fn dummy() -> ComponentRef {
        component(|_| Ok(ViewNode::Empty))
    }

    #[test]
    fn static_route_is_exact() {
        let route = Route::new("/about", dummy());
        assert!(route.exact);
        assert!(!route.pattern_fallback);
    }

    #[test]
    fn dynamic_route_is_not_exact() {
        let route = Route::new("/blog/:slug", dummy());
        assert!(!route.exact);
        assert_eq!(route.pattern.param_names(), &["slug"]);
    }

    #[test]
    fn malformed_route_still_constructs() {
        // Unfinished param token: falls back instead of failing.
        let route = Route::new("/users/:", dummy());
        assert!(route.pattern_fallback);
        assert!(!route.exact);
        assert!(route.pattern.is_match("/users/anything/else"));
    }

    #[test]
    fn builder_chain() {
        let route = Route::new("/docs", dummy())
            .layouts(vec![dummy()])
            .child(Route::new("/docs/intro", dummy()));
        assert_eq!(route.layouts.len(), 1);
        assert_eq!(route.children.len(), 1);
    }
}
