//! Navigation widgets
//!
//! Link builders and the declarative redirect. Links render as ordinary
//! anchors; in the browser the router's document click interceptor turns
//! same-origin anchor clicks into navigations, so a link needs no handle of
//! its own. [`NavLink`] and [`Redirect`] do take a [`NavigatorHandle`]: the
//! one to read the current path for active styling, the other to queue the
//! navigation.

use crate::component::{Component, ComponentRef, PageProps, ViewNode};
use crate::error::RenderError;
use crate::router::NavigatorHandle;
use crate::{el, trace_log};
use std::rc::Rc;

/// Builder for a router-handled anchor.
#[derive(Debug, Clone)]
pub struct Link {
    href: String,
    class: Option<String>,
    external: bool,
    children: Vec<ViewNode>,
}

/// Start building a link to `href`.
pub fn link(href: impl Into<String>) -> Link {
    Link {
        href: href.into(),
        class: None,
        external: false,
        children: Vec::new(),
    }
}

impl Link {
    /// Set the class attribute.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Opt out of router handling; the browser follows the link normally.
    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }

    /// Append a text child.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(ViewNode::text(content));
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    /// Finish the anchor.
    pub fn build(self) -> ViewNode {
        let mut builder = el("a").attr("href", self.href);
        if let Some(class) = self.class {
            builder = builder.attr("class", class);
        }
        if self.external {
            builder = builder.attr("data-external", "true");
        }
        for child in self.children {
            builder = builder.child(child);
        }
        builder.build()
    }
}

/// Builder for a link that carries an active class when its target matches
/// the current path.
pub struct NavLink {
    handle: NavigatorHandle,
    href: String,
    class: Option<String>,
    active_class: String,
    exact: bool,
    children: Vec<ViewNode>,
}

/// Start building a nav link to `href`, reading the current path through
/// `handle`.
pub fn nav_link(handle: &NavigatorHandle, href: impl Into<String>) -> NavLink {
    NavLink {
        handle: handle.clone(),
        href: href.into(),
        class: None,
        active_class: "active".to_string(),
        exact: false,
        children: Vec::new(),
    }
}

impl NavLink {
    /// Set the base class attribute.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set the class added when active. Defaults to `active`.
    pub fn active_class(mut self, class: impl Into<String>) -> Self {
        self.active_class = class.into();
        self
    }

    /// Require an exact path match instead of a section prefix match.
    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    /// Append a text child.
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.children.push(ViewNode::text(content));
        self
    }

    /// Append a child node.
    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    /// Finish the anchor, resolving the active state now.
    pub fn build(self) -> ViewNode {
        let active = self
            .handle
            .current_path()
            .is_some_and(|current| is_active(&current, &self.href, self.exact));

        let class = match (self.class, active) {
            (Some(base), true) => Some(format!("{} {}", base, self.active_class)),
            (Some(base), false) => Some(base),
            (None, true) => Some(self.active_class),
            (None, false) => None,
        };

        let mut builder = el("a").attr("href", self.href);
        if let Some(class) = class {
            builder = builder.attr("class", class);
        }
        if active {
            builder = builder.attr("aria-current", "page");
        }
        for child in self.children {
            builder = builder.child(child);
        }
        builder.build()
    }
}

/// Active-state rule shared by nav links.
///
/// Exact links match their path only; section links match their path and
/// anything below it. The root link is always exact, otherwise it would
/// light up on every page.
fn is_active(current: &str, href: &str, exact: bool) -> bool {
    let current = normalize(current);
    let href = normalize(href);

    if exact || href == "/" {
        return current == href;
    }
    current == href || current.starts_with(&format!("{}/", href))
}

/// Trim one trailing slash, keeping the bare root.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// A component that immediately forwards to another path.
///
/// Rendering queues the navigation to run after the current one commits,
/// as a history replacement, and contributes nothing to the view.
pub struct Redirect {
    handle: NavigatorHandle,
    to: String,
}

/// Create a redirect component targeting `to`.
pub fn redirect(handle: &NavigatorHandle, to: impl Into<String>) -> ComponentRef {
    Rc::new(Redirect {
        handle: handle.clone(),
        to: to.into(),
    })
}

impl Component for Redirect {
    fn render(&self, _props: PageProps) -> Result<ViewNode, RenderError> {
        trace_log!("redirect to '{}' queued", self.to);
        self.handle.queue_redirect(&self.to);
        Ok(ViewNode::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::component;
    use crate::router::{Router, RouterOptions};

    fn page(label: &'static str) -> ComponentRef {
        component(move |_: PageProps| Ok(el("main").text(label).build()))
    }

    #[test]
    fn link_renders_anchor() {
        let view = link("/about").class("nav").text("About").build();
        assert_eq!(
            view.render_to_string(),
            "<a class=\"nav\" href=\"/about\">About</a>"
        );
    }

    #[test]
    fn external_link_opts_out() {
        let view = link("https://example.com").external().text("Docs").build();
        assert!(view
            .render_to_string()
            .contains("data-external=\"true\""));
    }

    #[test]
    fn active_rules() {
        // Section links match themselves and descendants.
        assert!(is_active("/blog", "/blog", false));
        assert!(is_active("/blog/post-1", "/blog", false));
        assert!(!is_active("/blogging", "/blog", false));

        // Exact links match only themselves.
        assert!(is_active("/blog", "/blog", true));
        assert!(!is_active("/blog/post-1", "/blog", true));

        // Root never prefix-matches.
        assert!(is_active("/", "/", false));
        assert!(!is_active("/about", "/", false));

        // Trailing slashes compare equal.
        assert!(is_active("/blog/", "/blog", true));
        assert!(is_active("/blog", "/blog/", true));
    }

    #[test]
    fn nav_link_marks_active() {
        let router = Router::new(RouterOptions::new());
        router.add_route("/", page("home"));
        router.add_route("/about", page("about"));
        router.init("#app").unwrap();
        router.navigate("/about").unwrap();

        let handle = router.handle();
        let active = nav_link(&handle, "/about").class("nav").text("About").build();
        let html = active.render_to_string();
        assert!(html.contains("class=\"nav active\""));
        assert!(html.contains("aria-current=\"page\""));

        let inactive = nav_link(&handle, "/").text("Home").build();
        assert!(!inactive.render_to_string().contains("active"));
    }

    #[test]
    fn nav_link_without_router_is_inactive() {
        let router = Router::new(RouterOptions::new());
        let handle = router.handle();
        drop(router);

        let view = nav_link(&handle, "/about").text("About").build();
        assert!(!view.render_to_string().contains("active"));
    }

    #[test]
    fn redirect_runs_after_commit() {
        let router = Router::new(RouterOptions::new());
        let handle = router.handle();
        router.add_route("/", redirect(&handle, "/welcome"));
        router.add_route("/welcome", page("welcome"));
        router.init("#app").unwrap();

        assert_eq!(router.current_path(), "/welcome");
        assert_eq!(router.rendered_html(), "<main>welcome</main>");
    }

    #[test]
    fn redirect_cycle_terminates() {
        let router = Router::new(RouterOptions::new());
        let handle = router.handle();
        router.add_route("/", page("home"));
        router.add_route("/a", redirect(&handle, "/b"));
        router.add_route("/b", redirect(&handle, "/a"));
        router.init("#app").unwrap();

        // The chain stops at the hop limit instead of recursing forever.
        router.navigate("/a").unwrap();
        let current = router.current_path();
        assert!(current == "/a" || current == "/b", "ended at {}", current);
    }

    #[test]
    fn redirect_replaces_history_entry() {
        let router = Router::new(RouterOptions::new());
        let handle = router.handle();
        router.add_route("/", page("home"));
        router.add_route("/old", redirect(&handle, "/new"));
        router.add_route("/new", page("new"));
        router.init("#app").unwrap();

        router.navigate("/old").unwrap();
        assert_eq!(router.current_path(), "/new");

        // Back skips the redirecting entry entirely.
        router.back().unwrap();
        assert_eq!(router.current_path(), "/");
    }
}
