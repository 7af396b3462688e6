//! Route transition effects
//!
//! Visual handoff between the outgoing and incoming view. The driver applies
//! these as opacity changes on the mount root; the route change itself never
//! waits for the animation.

use std::time::Duration;

/// Built-in transition types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Swap views immediately.
    #[default]
    None,

    /// Fade the old view out and the new view in.
    Fade {
        /// Duration of each half of the fade, in milliseconds.
        duration_ms: u64,
    },
}

impl Transition {
    /// Create a fade transition.
    pub fn fade(duration_ms: u64) -> Self {
        Self::Fade { duration_ms }
    }

    /// Get the duration of this transition.
    pub fn duration(&self) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Fade { duration_ms } => Duration::from_millis(*duration_ms),
        }
    }

    /// Check if this is a no-op transition.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
