//! # spa-navigator
//!
//! A client-side router for single-page applications with support for:
//!
//! - **File-convention routes** - `app/blog/[slug]/page` keys become
//!   `/blog/:slug` routes, with `layout` and `not-found` conventions
//! - **Pattern matching** - `:param` segments, `*rest` catch-alls, query
//!   string parsing
//! - **Nested layouts** - layouts accumulate from the root down and wrap the
//!   page innermost-out
//! - **History and hash modes** - clean URLs via the History API or fragment
//!   URLs via `hashchange`
//! - **Lifecycle hooks** - `on_mount` after commit, `on_unmount` strictly
//!   before the next render
//! - **Error containment** - a broken layout drops only its own subtree; a
//!   broken page renders an inline error panel
//!
//! The router core is target-independent: on wasm32 it drives the real DOM
//! and browser history, elsewhere it renders to HTML strings over an
//! in-memory history stack, which is how the test suite exercises it.
//!
//! # Quick Start
//!
//! ```
//! use spa_navigator::{component, el, PageProps, Router, RouterOptions};
//!
//! let router = Router::new(RouterOptions::new());
//! router.add_route("/", component(|_: PageProps| Ok(el("h1").text("Home").build())));
//! router.add_route("/about", component(|_: PageProps| Ok(el("h1").text("About").build())));
//!
//! router.init("#app")?;
//! router.navigate("/about")?;
//! assert_eq!(router.current_path(), "/about");
//! # Ok::<(), spa_navigator::RouterError>(())
//! ```
//!
//! # File-Convention Routing
//!
//! ```
//! use spa_navigator::{component, el, ComponentMap, PageProps, Router, RouterOptions};
//!
//! let mut components = ComponentMap::new();
//! components.insert("app/page", component(|_: PageProps| {
//!     Ok(el("h1").text("Home").build())
//! }));
//! components.insert("app/blog/[slug]/page", component(|props: PageProps| {
//!     let slug = props.params.get("slug").cloned().unwrap_or_default();
//!     Ok(el("article").text(slug).build())
//! }));
//!
//! let router = Router::with_components(&components, RouterOptions::new());
//! router.init("#app")?;
//! router.navigate("/blog/hello-world")?;
//! # Ok::<(), spa_navigator::RouterError>(())
//! ```
//!
//! # Navigation
//!
//! Widgets navigate through a [`NavigatorHandle`], a weak reference handed
//! out by the router; there is no global router instance.
//!
//! ```
//! use spa_navigator::{component, el, link, nav_link, PageProps, Router, RouterOptions};
//!
//! let router = Router::new(RouterOptions::new());
//! router.add_route("/", component(|_: PageProps| Ok(el("h1").text("Home").build())));
//! router.init("#app")?;
//!
//! let handle = router.handle();
//! let nav = nav_link(&handle, "/").text("Home").build();
//! let plain = link("/about").text("About").build();
//! # let _ = (nav, plain);
//! # Ok::<(), spa_navigator::RouterError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually
//!   exclusive with `log`)
//! - `transition` (default) - View transitions on navigation
//! - `cache` (default) - LRU cache for route resolutions

#![doc(html_root_url = "https://docs.rs/spa-navigator/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Core routing modules
pub mod matcher;
pub mod pattern;
pub mod route;
pub mod table;

// Component model and rendering
pub mod component;
pub mod compose;
pub mod dom;

// Navigation
pub mod history;
pub mod router;
pub mod state;

// Error handling
pub mod error;

// Transitions
#[cfg(feature = "transition")]
pub mod transition;

// Other modules
pub mod params;
pub mod widgets;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, ResolutionCache};
pub use component::{component, el, Component, ComponentRef, ElementBuilder, PageProps, ViewNode};
pub use compose::ComposedRoute;
pub use dom::{error_panel, MountRoot};
pub use error::{PatternError, RenderError, RouterError};
pub use history::{HistoryDriver, MemoryHistory, RouterMode};
pub use matcher::{resolve_route, RouteResolution};
pub use params::{split_path_and_query, QueryParams, RouteParams};
pub use pattern::{compile_pattern, CompiledPattern};
pub use route::Route;
pub use router::{NavigatorHandle, Router, RouterOptions};
pub use state::RouterState;
pub use table::{build_route_table, ComponentMap, RouteTable};
#[cfg(feature = "transition")]
pub use transition::Transition;
pub use widgets::{link, nav_link, redirect, Link, NavLink, Redirect};
