//! Route table construction from file-convention component keys
//!
//! The build pipeline hands the router a flat key→component map following
//! the app-directory convention:
//!
//! - `app/<segments>/page`   — a routable page
//! - `app/<segments>/layout` — a layout applying to that prefix and its
//!   descendants
//! - `app/layout`            — the global root layout
//! - `app/not-found`         — the global not-found component
//!
//! `<segments>` may contain literal names, `[param]`, or `[...param]`,
//! translated to `:param` and `*param` route tokens.
//!
//! [`build_route_table`] is a pure function over that map; the resulting
//! table is immutable and is rebuilt wholesale whenever the map changes.

use crate::component::ComponentRef;
use crate::route::Route;
use crate::trace_log;
use std::collections::HashMap;

/// Insertion-ordered key→component map.
///
/// Registration order is significant: the matcher searches routes in the
/// order their page keys were inserted, and the first match wins.
#[derive(Default)]
pub struct ComponentMap {
    entries: Vec<(String, ComponentRef)>,
}

impl ComponentMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component under a file-convention key.
    ///
    /// Re-inserting an existing key replaces the component in place without
    /// changing its registration position.
    pub fn insert(&mut self, key: impl Into<String>, component: ComponentRef) {
        let key = key.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = component;
        } else {
            self.entries.push((key, component));
        }
    }

    /// Look up a component by key.
    pub fn get(&self, key: &str) -> Option<&ComponentRef> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentRef)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ComponentRef)> for ComponentMap {
    fn from_iter<I: IntoIterator<Item = (K, ComponentRef)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, component) in iter {
            map.insert(key, component);
        }
        map
    }
}

/// The full ordered collection of routes built from a component map.
#[derive(Clone, Default)]
pub struct RouteTable {
    /// Routes in registration order.
    pub routes: Vec<Route>,
    /// Global root layout (`app/layout`), applied outermost at render time.
    pub root_layout: Option<ComponentRef>,
    /// Global not-found component (`app/not-found`).
    pub not_found: Option<ComponentRef>,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes)
            .field("root_layout", &self.root_layout.is_some())
            .field("not_found", &self.not_found.is_some())
            .finish()
    }
}

/// Build a route table from a file-convention component map.
///
/// Every `*/page` key becomes one route carrying its compiled pattern and
/// the layout chain collected from its ancestor prefixes, nearest ancestor
/// innermost. Pages without layouts get an empty chain; the root layout
/// still applies at render time. Duplicate page paths are all retained, and
/// the first registered wins at match time.
pub fn build_route_table(components: &ComponentMap) -> RouteTable {
    let mut table = RouteTable::default();

    // Index every layout by its derived route-path prefix. The bare
    // `app/layout` key is the root layout, not a prefix layout.
    let mut layouts: HashMap<String, ComponentRef> = HashMap::new();
    for (key, component) in components.iter() {
        match key {
            "app/layout" => table.root_layout = Some(component.clone()),
            "app/not-found" => table.not_found = Some(component.clone()),
            _ => {
                if let Some(prefix) = key.strip_suffix("/layout") {
                    layouts.insert(derive_route_path(prefix), component.clone());
                }
            }
        }
    }

    for (key, component) in components.iter() {
        let Some(prefix) = key.strip_suffix("/page") else {
            continue;
        };
        let path = derive_route_path(prefix);
        let chain = collect_layout_chain(&path, &layouts);
        trace_log!("route '{}' <- '{}' ({} layouts)", path, key, chain.len());
        table
            .routes
            .push(Route::new(path, component.clone()).layouts(chain));
    }

    table
}

/// Derive a route path from a file key with its `/page` or `/layout` suffix
/// already stripped: drop the `app` prefix and translate bracket segments.
fn derive_route_path(key: &str) -> String {
    let rest = key.strip_prefix("app").unwrap_or(key);
    let rest = rest.trim_matches('/');

    if rest.is_empty() {
        return "/".to_string();
    }

    let segments: Vec<String> = rest.split('/').map(translate_segment).collect();
    format!("/{}", segments.join("/"))
}

/// Translate one file-convention segment to route-token syntax:
/// `[...name]` → `*name`, `[name]` → `:name`, anything else verbatim.
fn translate_segment(segment: &str) -> String {
    if let Some(inner) = segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
    {
        if let Some(name) = inner.strip_prefix("...") {
            format!("*{}", name)
        } else {
            format!(":{}", inner)
        }
    } else {
        segment.to_string()
    }
}

/// Walk the path's ancestor prefixes from nearest to root, collecting any
/// indexed layout at each, and return the chain ordered outermost first
/// (nearest ancestor last, i.e. innermost).
fn collect_layout_chain(
    path: &str,
    layouts: &HashMap<String, ComponentRef>,
) -> Vec<ComponentRef> {
    let mut chain = Vec::new();
    let mut prefix = path.to_string();

    loop {
        if let Some(layout) = layouts.get(&prefix) {
            chain.push(layout.clone());
        }
        match prefix.rfind('/') {
            Some(0) if prefix != "/" => prefix = "/".to_string(),
            Some(idx) if idx > 0 => prefix.truncate(idx),
            _ => break,
        }
    }

    // Collected nearest-first; composition wants outermost first.
    chain.reverse();
    chain
}
