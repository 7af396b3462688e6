//! Route matching
//!
//! Finds the best route for a request path. The search is deterministic and
//! runs in registration order:
//!
//! 1. Exact pass: a route flagged `exact` whose literal path equals the
//!    request path wins immediately, skipping the regex entirely.
//! 2. Pattern pass: for each route in order, nested children are tried
//!    before the route's own pattern (children take precedence over the
//!    parent's fallback), and the first compiled-pattern match wins.
//!
//! There is no "most specific wins" scoring: earlier registration beats
//! later, full stop. Matching is a pure function over the immutable table;
//! the not-found fallback is the caller's concern.

use crate::component::ComponentRef;
use crate::params::RouteParams;
use crate::route::Route;
use crate::trace_log;

/// The outcome of matching a request path against the route table.
#[derive(Clone)]
pub struct RouteResolution {
    /// The matched route's path pattern (not the request path).
    pub route_path: String,
    /// The page component to render.
    pub component: ComponentRef,
    /// Parameters extracted from the pattern.
    pub params: RouteParams,
    /// Accumulated layout chain, outermost first.
    pub layouts: Vec<ComponentRef>,
}

impl std::fmt::Debug for RouteResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteResolution")
            .field("route_path", &self.route_path)
            .field("params", &self.params)
            .field("layouts", &self.layouts.len())
            .finish()
    }
}

/// Match a request path against routes in registration order.
///
/// Returns `None` when nothing matches; the router then falls back to the
/// configured not-found component through the same composition step.
pub fn resolve_route(routes: &[Route], path: &str) -> Option<RouteResolution> {
    // Exact pass first: cheap equality, no regex for the common case.
    for route in routes {
        if route.exact && route.path == path {
            trace_log!("exact match '{}' for '{}'", route.path, path);
            return Some(resolution(route, RouteParams::new()));
        }
    }

    for route in routes {
        // Children take precedence over the parent's own pattern. A child
        // match inherits the parent's layouts on the outer side.
        if !route.children.is_empty() {
            if let Some(mut child) = resolve_route(&route.children, path) {
                let mut layouts = route.layouts.clone();
                layouts.extend(child.layouts);
                child.layouts = layouts;
                return Some(child);
            }
        }

        if let Some(params) = route.pattern.matches(path) {
            trace_log!("pattern match '{}' for '{}'", route.path, path);
            return Some(resolution(route, params));
        }
    }

    None
}

fn resolution(route: &Route, params: RouteParams) -> RouteResolution {
    RouteResolution {
        route_path: route.path.clone(),
        component: route.component.clone(),
        params,
        layouts: route.layouts.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{component, el, ComponentRef, PageProps};
    use crate::route::Route;

    fn page(label: &'static str) -> ComponentRef {
        component(move |_: PageProps| Ok(el("main").text(label).build()))
    }

    fn render_label(resolution: &RouteResolution) -> String {
        resolution
            .component
            .render(PageProps::default())
            .unwrap()
            .render_to_string()
    }

    fn noop_layout() -> ComponentRef {
        component(|mut props: PageProps| Ok(props.take_children()))
    }

    #[test]
    fn exact_beats_pattern_regardless_of_order() {
        let routes = vec![
            Route::new("/blog/:slug", page("pattern")),
            Route::new("/blog/featured", page("exact")),
        ];

        let m = resolve_route(&routes, "/blog/featured").unwrap();
        assert_eq!(render_label(&m), "<main>exact</main>");
    }

    #[test]
    fn first_registered_pattern_wins() {
        let routes = vec![
            Route::new("/blog/:slug", page("first")),
            Route::new("/blog/:id", page("second")),
        ];

        let m = resolve_route(&routes, "/blog/x").unwrap();
        assert_eq!(m.route_path, "/blog/:slug");
        assert_eq!(m.params.get("slug"), Some(&"x".to_string()));
    }

    #[test]
    fn first_registered_exact_wins() {
        let routes = vec![
            Route::new("/about", page("first")),
            Route::new("/about", page("second")),
        ];

        let m = resolve_route(&routes, "/about").unwrap();
        assert_eq!(render_label(&m), "<main>first</main>");
    }

    #[test]
    fn trailing_slash_resolves_same_route() {
        let routes = vec![Route::new("/about", page("about"))];

        // Exact pass misses "/about/" but the pattern pass tolerates the
        // trailing slash.
        let a = resolve_route(&routes, "/about").unwrap();
        let b = resolve_route(&routes, "/about/").unwrap();
        assert_eq!(a.route_path, b.route_path);
        assert_eq!(a.params, b.params);
    }

    #[test]
    fn catch_all_params() {
        let routes = vec![Route::new("/docs/*rest", page("docs"))];

        let m = resolve_route(&routes, "/docs/a/b/c").unwrap();
        assert_eq!(m.params.get("rest"), Some(&"a/b/c".to_string()));
    }

    #[test]
    fn no_match_returns_none() {
        let routes = vec![Route::new("/about", page("about"))];
        assert!(resolve_route(&routes, "/missing").is_none());
    }

    #[test]
    fn children_take_precedence_over_parent_pattern() {
        let parent = Route::new("/docs/*rest", page("parent"))
            .layouts(vec![noop_layout()])
            .child(Route::new("/docs/intro", page("child")));

        let m = resolve_route(&[parent], "/docs/intro").unwrap();
        assert_eq!(m.route_path, "/docs/intro");
        assert_eq!(render_label(&m), "<main>child</main>");
    }

    #[test]
    fn child_match_inherits_parent_layouts_on_outer_side() {
        let child = Route::new("/shop/items", page("items")).layouts(vec![noop_layout()]);
        let parent = Route::new("/shop", page("shop"))
            .layouts(vec![noop_layout(), noop_layout()])
            .child(child);

        let m = resolve_route(&[parent], "/shop/items").unwrap();
        // Two parent layouts in front of the child's one.
        assert_eq!(m.layouts.len(), 3);
    }

    #[test]
    fn parent_pattern_still_matches_when_children_miss() {
        let parent = Route::new("/docs/*rest", page("parent"))
            .child(Route::new("/docs/intro", page("child")));

        let m = resolve_route(&[parent], "/docs/other/deep").unwrap();
        assert_eq!(m.route_path, "/docs/*rest");
    }
}
