//! Router core
//!
//! Owns the route table, the history driver, the mount root, and the
//! committed state, and runs the navigation sequence:
//!
//! 1. record the URL change
//! 2. unmount the outgoing page
//! 3. resolve the incoming route and record it as current
//! 4. render the composed view and commit it to the mount root
//! 5. schedule `on_mount`, reset scroll, announce `routechange`
//!
//! The incoming route becomes current at step 3, before rendering, so
//! anything rendered during the navigation (a nav bar inside a layout, a
//! redirect) observes the new path rather than the one it replaces.
//!
//! Every navigation takes an epoch token at step 1 and re-checks it before
//! recording state and again before touching the mount root; a navigation
//! started later invalidates the token, so a stale render is dropped
//! instead of committed. Committed state is last write wins.
//!
//! The router is plain data behind an `Rc`; nothing global. Widgets hold a
//! [`NavigatorHandle`] with a weak reference, so a forgotten link cannot
//! keep a dropped router alive.

use crate::component::{component, el, ComponentRef, PageProps};
use crate::compose::ComposedRoute;
use crate::dom::{self, error_panel, MountRoot};
use crate::error::RouterError;
use crate::history::{HistoryDriver, RouterMode};
use crate::matcher::{resolve_route, RouteResolution};
use crate::params::{split_path_and_query, QueryParams, RouteParams};
use crate::route::Route;
use crate::state::RouterState;
use crate::table::{build_route_table, ComponentMap};
use crate::{debug_log, error_log, warn_log};

#[cfg(feature = "cache")]
use crate::cache::ResolutionCache;
#[cfg(feature = "transition")]
use crate::transition::Transition;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Redirect hops allowed per navigation before the chain is cut off.
const MAX_REDIRECT_DEPTH: usize = 10;

/// Router construction options.
#[derive(Default)]
pub struct RouterOptions {
    mode: RouterMode,
    root_layout: Option<ComponentRef>,
    not_found: Option<ComponentRef>,
    #[cfg(feature = "transition")]
    transition: Transition,
    #[cfg(feature = "cache")]
    cache_capacity: Option<usize>,
}

impl RouterOptions {
    /// Start from the defaults: history mode, no transition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how navigations are reflected in the URL.
    pub fn mode(mut self, mode: RouterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the global root layout, applied outermost on every route.
    pub fn root_layout(mut self, layout: ComponentRef) -> Self {
        self.root_layout = Some(layout);
        self
    }

    /// Set the component rendered when no route matches.
    pub fn not_found(mut self, component: ComponentRef) -> Self {
        self.not_found = Some(component);
        self
    }

    /// Set the transition applied when swapping views.
    #[cfg(feature = "transition")]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Override the resolution cache capacity.
    #[cfg(feature = "cache")]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity);
        self
    }
}

struct RouterInner {
    routes: Vec<Route>,
    root_layout: Option<ComponentRef>,
    not_found: Option<ComponentRef>,
    history: HistoryDriver,
    mount: Option<MountRoot>,
    state: RouterState,
    /// The raw path (query included) of the last committed navigation,
    /// compared verbatim for the navigate-to-current no-op.
    current_raw: String,
    /// The page component currently on screen, kept for its `on_unmount`.
    mounted: Option<ComponentRef>,
    /// Bumped at the start of every navigation; a render only commits if
    /// the token it captured is still current.
    epoch: u64,
    #[cfg(feature = "transition")]
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    transition: Transition,
    #[cfg(feature = "cache")]
    cache: ResolutionCache,
}

struct Shared {
    inner: RefCell<RouterInner>,
    /// Redirect targets queued during a render, drained after the commit.
    pending_redirects: RefCell<Vec<String>>,
    /// Redirect hops taken by the navigation currently draining; redirect
    /// cycles are cut off at [`MAX_REDIRECT_DEPTH`].
    redirect_depth: Cell<usize>,
}

/// The client-side router.
pub struct Router {
    shared: Rc<Shared>,
}

impl Router {
    /// Create a router with no routes yet.
    pub fn new(options: RouterOptions) -> Self {
        Self {
            shared: Rc::new(Shared {
                inner: RefCell::new(RouterInner {
                    routes: Vec::new(),
                    root_layout: options.root_layout,
                    not_found: options.not_found,
                    history: HistoryDriver::new(options.mode),
                    mount: None,
                    state: RouterState::new("/"),
                    current_raw: String::new(),
                    mounted: None,
                    epoch: 0,
                    #[cfg(feature = "transition")]
                    transition: options.transition,
                    #[cfg(feature = "cache")]
                    cache: options
                        .cache_capacity
                        .map(ResolutionCache::with_capacity)
                        .unwrap_or_default(),
                }),
                pending_redirects: RefCell::new(Vec::new()),
                redirect_depth: Cell::new(0),
            }),
        }
    }

    /// Create a router from a file-convention component map.
    ///
    /// `app/layout` and `app/not-found` entries become the root layout and
    /// not-found component unless the options already set them.
    pub fn with_components(components: &ComponentMap, options: RouterOptions) -> Self {
        let table = build_route_table(components);
        let router = Self::new(options);
        {
            let mut inner = router.shared.inner.borrow_mut();
            inner.routes = table.routes;
            if inner.root_layout.is_none() {
                inner.root_layout = table.root_layout;
            }
            if inner.not_found.is_none() {
                inner.not_found = table.not_found;
            }
        }
        router
    }

    /// Register a route. Registration order is match order.
    pub fn add_route(&self, path: impl Into<String>, component: ComponentRef) {
        self.add_route_with(Route::new(path, component));
    }

    /// Register a pre-built route, layouts and children included.
    pub fn add_route_with(&self, route: Route) {
        let mut inner = self.shared.inner.borrow_mut();
        inner.routes.push(route);
        #[cfg(feature = "cache")]
        inner.cache.clear();
    }

    /// A weak handle for widgets and components to navigate through.
    pub fn handle(&self) -> NavigatorHandle {
        NavigatorHandle {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Attach the router to the document and render the current URL.
    ///
    /// Wires the history listener (`popstate` or `hashchange` by mode) and
    /// the document click interceptor, then resolves the initial route.
    /// Calling `init` twice is a no-op.
    pub fn init(&self, selector: &str) -> Result<(), RouterError> {
        let initial = {
            let mut inner = self.shared.inner.borrow_mut();
            if inner.mount.is_some() {
                return Ok(());
            }
            inner.mount =
                Some(MountRoot::new(selector).map_err(|e| RouterError::Mount(e.to_string()))?);
            inner.history.current_path()?
        };

        #[cfg(target_arch = "wasm32")]
        self.attach_listeners();

        handle_route_change(&self.shared, &initial)
    }

    /// Navigate to a path, pushing a history entry.
    ///
    /// Navigating to the path already displayed is a no-op: no unmount, no
    /// render, no history entry.
    pub fn navigate(&self, path: &str) -> Result<(), RouterError> {
        navigate_shared(&self.shared, path, false)
    }

    /// Navigate to a path, replacing the current history entry.
    pub fn replace(&self, path: &str) -> Result<(), RouterError> {
        navigate_shared(&self.shared, path, true)
    }

    /// Hint that a path is likely to be visited soon.
    ///
    /// Currently a recorded no-op. Pages render synchronously from
    /// components already in memory, so there is nothing to fetch yet; the
    /// hook exists so call sites are in place when lazy page loading lands.
    pub fn preload(&self, path: &str) {
        debug_log!("preload requested for '{}' (no-op)", path);
    }

    /// Go back one history entry.
    pub fn back(&self) -> Result<(), RouterError> {
        #[cfg(target_arch = "wasm32")]
        {
            let window =
                web_sys::window().ok_or_else(|| RouterError::History("no window".to_string()))?;
            window
                .history()
                .map_err(|e| RouterError::History(format!("{:?}", e)))?
                .back()
                .map_err(|e| RouterError::History(format!("{:?}", e)))
            // The popstate/hashchange listener picks the change up.
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let path = self.shared.inner.borrow_mut().history.back();
            match path {
                Some(path) => handle_route_change(&self.shared, &path),
                None => Ok(()),
            }
        }
    }

    /// Go forward one history entry.
    pub fn forward(&self) -> Result<(), RouterError> {
        #[cfg(target_arch = "wasm32")]
        {
            let window =
                web_sys::window().ok_or_else(|| RouterError::History("no window".to_string()))?;
            window
                .history()
                .map_err(|e| RouterError::History(format!("{:?}", e)))?
                .forward()
                .map_err(|e| RouterError::History(format!("{:?}", e)))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let path = self.shared.inner.borrow_mut().history.forward();
            match path {
                Some(path) => handle_route_change(&self.shared, &path),
                None => Ok(()),
            }
        }
    }

    /// Snapshot of the committed navigation state.
    pub fn state(&self) -> RouterState {
        self.shared.inner.borrow().state.clone()
    }

    /// Path of the currently displayed route.
    pub fn current_path(&self) -> String {
        self.shared.inner.borrow().state.current_path.clone()
    }

    /// HTML last committed to the mount root. Test observation point.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn rendered_html(&self) -> String {
        self.shared
            .inner
            .borrow()
            .mount
            .as_ref()
            .map(|m| m.html().to_string())
            .unwrap_or_default()
    }

    #[cfg(target_arch = "wasm32")]
    fn attach_listeners(&self) {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let Some(window) = web_sys::window() else {
            warn_log!("no window, history listeners not attached");
            return;
        };

        let mode = self.shared.inner.borrow().history.mode();
        let event_name = match mode {
            RouterMode::History => "popstate",
            RouterMode::Hash => "hashchange",
        };

        let weak = Rc::downgrade(&self.shared);
        let on_change = Closure::<dyn FnMut()>::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let path = shared.inner.borrow().history.current_path();
            match path {
                Ok(path) => {
                    if let Err(err) = handle_route_change(&shared, &path) {
                        error_log!("route change failed: {}", err);
                    }
                }
                Err(err) => warn_log!("could not read location: {}", err),
            }
        });
        let _ = window
            .add_event_listener_with_callback(event_name, on_change.as_ref().unchecked_ref());
        on_change.forget();

        // Same-origin anchor clicks become router navigations; everything
        // else stays with the browser.
        let weak = Rc::downgrade(&self.shared);
        let on_click = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(
            move |event: web_sys::MouseEvent| {
                let Some(target) = dom::anchor_target_from_click(&event) else {
                    return;
                };
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                event.prevent_default();
                if let Err(err) = navigate_shared(&shared, &target, false) {
                    error_log!("link navigation failed: {}", err);
                }
            },
        );
        if let Some(document) = window.document() {
            let _ = document
                .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
        }
        on_click.forget();
    }
}

/// A cloneable, weak navigation handle.
///
/// Holds no strong reference; operations on a handle that outlived its
/// router return [`RouterError::RouterGone`].
#[derive(Clone)]
pub struct NavigatorHandle {
    shared: Weak<Shared>,
}

impl NavigatorHandle {
    /// Navigate, pushing a history entry.
    pub fn navigate(&self, path: &str) -> Result<(), RouterError> {
        let shared = self.shared.upgrade().ok_or(RouterError::RouterGone)?;
        navigate_shared(&shared, path, false)
    }

    /// Navigate, replacing the current history entry.
    pub fn replace(&self, path: &str) -> Result<(), RouterError> {
        let shared = self.shared.upgrade().ok_or(RouterError::RouterGone)?;
        navigate_shared(&shared, path, true)
    }

    /// Queue a redirect to run after the in-flight render commits.
    ///
    /// Used by components that decide to redirect during their own render,
    /// when the router is mid-navigation and must not be re-entered.
    pub fn queue_redirect(&self, path: impl Into<String>) {
        if let Some(shared) = self.shared.upgrade() {
            shared.pending_redirects.borrow_mut().push(path.into());
        }
    }

    /// Path of the currently displayed route, if the router is alive.
    pub fn current_path(&self) -> Option<String> {
        let shared = self.shared.upgrade()?;
        let path = shared.inner.borrow().state.current_path.clone();
        Some(path)
    }
}

fn navigate_shared(shared: &Rc<Shared>, path: &str, replace: bool) -> Result<(), RouterError> {
    {
        let inner = shared.inner.borrow();
        if inner.mount.is_none() {
            return Err(RouterError::NotInitialized);
        }
        if inner.current_raw == path {
            debug_log!("navigate to current path '{}' ignored", path);
            return Ok(());
        }
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(unused_variables))]
    let mode = {
        let mut inner = shared.inner.borrow_mut();
        if replace {
            inner.history.replace(path)?;
        } else {
            inner.history.push(path)?;
        }
        inner.history.mode()
    };

    // In hash mode the browser fires hashchange for the assignment above
    // and the listener completes the navigation.
    #[cfg(target_arch = "wasm32")]
    if mode == RouterMode::Hash {
        return Ok(());
    }

    handle_route_change(shared, path)
}

/// Run one navigation end to end. `raw_path` may carry a query string.
fn handle_route_change(shared: &Rc<Shared>, raw_path: &str) -> Result<(), RouterError> {
    let (path, query_str) = split_path_and_query(raw_path);
    let query = query_str.map(QueryParams::parse).unwrap_or_default();

    let (epoch, outgoing, root_layout, not_found, resolution) = {
        let mut inner = shared.inner.borrow_mut();
        inner.epoch += 1;
        (
            inner.epoch,
            inner.mounted.take(),
            inner.root_layout.clone(),
            inner.not_found.clone(),
            resolve_cached(&mut inner, path),
        )
    };

    // Unmount strictly before the next render, outside any borrow so the
    // hook may touch the router.
    if let Some(outgoing) = outgoing {
        outgoing.on_unmount();
    }

    let (page, layouts, params) = match resolution {
        Some(resolution) => (resolution.component, resolution.layouts, resolution.params),
        None => {
            warn_log!("no route matches '{}'", path);
            let page = not_found.unwrap_or_else(default_not_found);
            (page, Vec::new(), RouteParams::new())
        }
    };

    // The matched route is current from here on, before its render runs,
    // so components rendered during this navigation read the incoming path.
    {
        let mut inner = shared.inner.borrow_mut();
        if inner.epoch != epoch {
            debug_log!("navigation to '{}' superseded before render", path);
            return Ok(());
        }
        inner.mounted = Some(page.clone());
        inner.current_raw = raw_path.to_string();
        inner.state.commit(path, params.clone(), query.clone());
    }

    let composed = ComposedRoute::new(page.clone(), layouts, root_layout);
    let view = match composed.render(params.clone(), query) {
        Ok(view) => view,
        Err(err) => {
            error_log!("render failed for '{}': {}", path, err);
            error_panel(&err.to_string())
        }
    };

    {
        let mut inner = shared.inner.borrow_mut();
        if inner.epoch != epoch {
            debug_log!("navigation to '{}' superseded before commit", path);
            return Ok(());
        }
        #[cfg(all(target_arch = "wasm32", feature = "transition"))]
        let fade = match inner.transition {
            Transition::Fade { duration_ms } if duration_ms > 0 => Some(duration_ms),
            _ => None,
        };
        let Some(mount) = inner.mount.as_mut() else {
            return Err(RouterError::NotInitialized);
        };
        #[cfg(all(target_arch = "wasm32", feature = "transition"))]
        let committed = match fade {
            Some(duration_ms) => mount.mount_fade(&view, duration_ms),
            None => mount.mount(&view),
        };
        #[cfg(not(all(target_arch = "wasm32", feature = "transition")))]
        let committed = mount.mount(&view);
        if let Err(err) = committed {
            error_log!("mount failed for '{}': {}", path, err);
        }
    }

    schedule_on_mount(page);
    dom::scroll_to_top();
    dom::dispatch_route_change(path, &params);

    // Redirects queued during the render run now, as replacements so the
    // back button skips the redirecting page. The drain recurses through
    // `navigate_shared`, so a redirect cycle is cut off at a fixed depth
    // rather than overflowing the stack.
    let queued: Vec<String> = shared.pending_redirects.borrow_mut().drain(..).collect();
    for target in queued {
        let depth = shared.redirect_depth.get();
        if depth >= MAX_REDIRECT_DEPTH {
            warn_log!(
                "redirect chain exceeded {} hops, dropping '{}'",
                MAX_REDIRECT_DEPTH,
                target
            );
            shared.pending_redirects.borrow_mut().clear();
            break;
        }
        shared.redirect_depth.set(depth + 1);
        let followed = navigate_shared(shared, &target, true);
        shared.redirect_depth.set(shared.redirect_depth.get().saturating_sub(1));
        followed?;
    }

    Ok(())
}

fn resolve_cached(inner: &mut RouterInner, path: &str) -> Option<RouteResolution> {
    #[cfg(feature = "cache")]
    if let Some(hit) = inner.cache.get(path) {
        return Some(hit);
    }

    let resolution = resolve_route(&inner.routes, path);

    #[cfg(feature = "cache")]
    if let Some(resolution) = &resolution {
        inner.cache.set(path.to_string(), resolution.clone());
    }

    resolution
}

/// `on_mount` fires after the commit, via microtask in the browser.
#[cfg(target_arch = "wasm32")]
fn schedule_on_mount(page: ComponentRef) {
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(move || page.on_mount());
    let _ = window.queue_microtask(callback.unchecked_ref());
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule_on_mount(page: ComponentRef) {
    page.on_mount();
}

fn default_not_found() -> ComponentRef {
    component(|_: PageProps| {
        Ok(el("div")
            .attr("class", "router-not-found")
            .child(el("h1").text("404").build())
            .child(el("p").text("Page not found").build())
            .build())
    })
}
