//! URL history management
//!
//! The router speaks to the address bar through [`HistoryDriver`]. On
//! wasm32 the driver wraps the browser History and Location APIs; on every
//! other target it wraps an in-memory stack, which is what the test suite
//! drives. Both backends share the same surface so the router core never
//! branches on target.
//!
//! In [`RouterMode::History`] a push uses `history.pushState` and the
//! router handles the change synchronously, because `pushState` fires no
//! event. In [`RouterMode::Hash`] a push only sets `location.hash`; the
//! resulting `hashchange` event drives the route change.

use crate::error::RouterError;

/// How navigations are reflected in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterMode {
    /// Clean URLs via the History API plus a `popstate` listener.
    #[default]
    History,
    /// Fragment URLs (`#/path`) plus a `hashchange` listener.
    Hash,
}

/// In-memory history stack.
///
/// Backs the driver off-browser and mirrors the browser contract: pushing
/// truncates any forward entries, replace swaps the current entry in place,
/// and back/forward move the cursor without growing the stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    current: usize,
}

impl MemoryHistory {
    /// Create a stack holding the initial path.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            entries: vec![initial_path.into()],
            current: 0,
        }
    }

    /// The path at the cursor.
    pub fn current_path(&self) -> &str {
        &self.entries[self.current]
    }

    /// Push a new path, truncating forward entries.
    pub fn push(&mut self, path: impl Into<String>) {
        self.entries.truncate(self.current + 1);
        self.entries.push(path.into());
        self.current += 1;
    }

    /// Replace the current entry in place.
    pub fn replace(&mut self, path: impl Into<String>) {
        self.entries[self.current] = path.into();
    }

    /// Move the cursor back. Returns the new current path.
    pub fn back(&mut self) -> Option<&str> {
        if self.current > 0 {
            self.current -= 1;
            Some(self.current_path())
        } else {
            None
        }
    }

    /// Move the cursor forward. Returns the new current path.
    pub fn forward(&mut self) -> Option<&str> {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
            Some(self.current_path())
        } else {
            None
        }
    }

    /// Number of entries on the stack.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the stack retains at least the initial entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Address-bar access for one router instance.
#[derive(Debug)]
pub struct HistoryDriver {
    mode: RouterMode,
    #[cfg(not(target_arch = "wasm32"))]
    memory: MemoryHistory,
}

impl HistoryDriver {
    /// Create a driver for the given mode, starting at the current URL
    /// (browser) or at `/` (in-memory).
    pub fn new(mode: RouterMode) -> Self {
        Self {
            mode,
            #[cfg(not(target_arch = "wasm32"))]
            memory: MemoryHistory::default(),
        }
    }

    /// The URL mode this driver was built with.
    pub fn mode(&self) -> RouterMode {
        self.mode
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl HistoryDriver {
    /// Read the current route path.
    pub fn current_path(&self) -> Result<String, RouterError> {
        Ok(self.memory.current_path().to_string())
    }

    /// Record a new entry.
    pub fn push(&mut self, path: &str) -> Result<(), RouterError> {
        self.memory.push(path);
        Ok(())
    }

    /// Replace the current entry without growing the stack.
    pub fn replace(&mut self, path: &str) -> Result<(), RouterError> {
        self.memory.replace(path);
        Ok(())
    }

    /// Step back, returning the new path when there is one.
    pub fn back(&mut self) -> Option<String> {
        self.memory.back().map(str::to_string)
    }

    /// Step forward, returning the new path when there is one.
    pub fn forward(&mut self) -> Option<String> {
        self.memory.forward().map(str::to_string)
    }
}

#[cfg(target_arch = "wasm32")]
impl HistoryDriver {
    /// Read the current route path from the browser URL.
    ///
    /// History mode reads pathname plus search; hash mode reads the
    /// fragment, defaulting to `/` when it is empty or a bare `#`.
    pub fn current_path(&self) -> Result<String, RouterError> {
        let location = window()?.location();
        match self.mode {
            RouterMode::History => {
                let pathname = location
                    .pathname()
                    .map_err(|e| RouterError::History(format!("{:?}", e)))?;
                let search = location.search().unwrap_or_default();
                Ok(format!("{}{}", pathname, search))
            }
            RouterMode::Hash => {
                let hash = location.hash().unwrap_or_default();
                let path = hash.trim_start_matches('#');
                if path.is_empty() {
                    Ok("/".to_string())
                } else {
                    Ok(path.to_string())
                }
            }
        }
    }

    /// Record a new entry in the browser URL.
    ///
    /// History mode pushes silently; the caller must handle the change
    /// itself. Hash mode assigns `location.hash`, and the browser's
    /// `hashchange` event carries the change to the router.
    pub fn push(&mut self, path: &str) -> Result<(), RouterError> {
        match self.mode {
            RouterMode::History => window()?
                .history()
                .map_err(|e| RouterError::History(format!("{:?}", e)))?
                .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
                .map_err(|e| RouterError::History(format!("{:?}", e))),
            RouterMode::Hash => {
                window()?.location().set_hash(path).map_err(|e| {
                    RouterError::History(format!("{:?}", e))
                })
            }
        }
    }

    /// Replace the current browser entry without adding one.
    pub fn replace(&mut self, path: &str) -> Result<(), RouterError> {
        let window = window()?;
        match self.mode {
            RouterMode::History => window
                .history()
                .map_err(|e| RouterError::History(format!("{:?}", e)))?
                .replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
                .map_err(|e| RouterError::History(format!("{:?}", e))),
            RouterMode::Hash => {
                let href = window
                    .location()
                    .href()
                    .map_err(|e| RouterError::History(format!("{:?}", e)))?;
                let base = href.split('#').next().unwrap_or(&href);
                window
                    .location()
                    .replace(&format!("{}#{}", base, path))
                    .map_err(|e| RouterError::History(format!("{:?}", e)))
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn window() -> Result<web_sys::Window, RouterError> {
    web_sys::window().ok_or_else(|| RouterError::History("no window".to_string()))
}
