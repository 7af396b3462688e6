//! Error handling for the router
//!
//! Error taxonomy:
//!
//! - A pattern that fails to compile is recovered locally with a permissive
//!   fallback matcher and surfaced as a warning, never to the caller.
//! - A path with no matching route is not an error; it resolves through the
//!   configured not-found component.
//! - A component or layout that fails to render is isolated at the nearest
//!   layout boundary; a top-level render failure becomes a visible inline
//!   error panel instead of a blank page.

use thiserror::Error;

/// Errors raised while compiling a route path pattern.
///
/// These never escape route table construction: the builder recovers with a
/// permissive fallback matcher and marks the route (see
/// [`Route::pattern_fallback`](crate::route::Route)).
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    /// Pattern string exceeds the maximum allowed length.
    #[error("pattern length {len} exceeds maximum of {max} bytes")]
    TooLong { len: usize, max: usize },

    /// A `:param` or `*param` token has no identifier after it.
    #[error("parameter name missing in pattern '{pattern}'")]
    EmptyParamName { pattern: String },

    /// The generated regex failed to compile.
    #[error("failed to compile pattern '{pattern}': {message}")]
    Regex { pattern: String, message: String },
}

/// Errors raised by a component or layout render.
#[derive(Debug, Clone, Error)]
pub enum RenderError {
    /// The component itself reported a failure.
    #[error("component render failed: {0}")]
    Component(String),

    /// A layout in the composition chain failed.
    #[error("layout {index} render failed: {message}")]
    Layout { index: usize, message: String },

    /// The produced view could not be attached to the document.
    #[cfg(target_arch = "wasm32")]
    #[error("failed to materialize view: {0}")]
    Dom(String),
}

impl RenderError {
    /// Convenience constructor for component failures.
    pub fn component(message: impl Into<String>) -> Self {
        Self::Component(message.into())
    }
}

/// Errors surfaced by router operations.
#[derive(Debug, Clone, Error)]
pub enum RouterError {
    /// The router was used before `init()` wired it to the document.
    #[error("router is not initialized")]
    NotInitialized,

    /// The browser history API rejected an operation.
    #[error("history operation failed: {0}")]
    History(String),

    /// The mount root could not be created.
    #[error("mount failed: {0}")]
    Mount(String),

    /// The router handle outlived the router it pointed at.
    #[error("router instance has been dropped")]
    RouterGone,
}
