//! Page window tracking.
//!
//! The window is the number of results requested for the current term. It
//! grows by a fixed increment each time the user reaches the end of the list
//! and never shrinks until the term changes.

use serde::Serialize;

/// Outcome of recording a settled fetch against the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUpdate {
    /// The server filled the request; the window adopted the requested size.
    Grew { page_size: usize },
    /// The server returned fewer items than requested.
    Exhausted { returned: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    initial: usize,
    increment: usize,
    page_size: usize,
    has_more: bool,
}

impl PageWindow {
    /// Create a window. Zero sizes are bumped to one so the loader always
    /// makes progress.
    pub fn new(initial: usize, increment: usize) -> Self {
        let initial = initial.max(1);
        Self {
            initial,
            increment: increment.max(1),
            page_size: initial,
            has_more: true,
        }
    }

    /// Back to the initial window with more results assumed.
    pub fn reset(&mut self) {
        self.page_size = self.initial;
        self.has_more = true;
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Size of the next incremental request.
    pub fn next_size(&self) -> usize {
        self.page_size + self.increment
    }

    /// Record that a request for `requested` items returned `returned`.
    pub fn record(&mut self, requested: usize, returned: usize) -> WindowUpdate {
        if returned < requested {
            self.has_more = false;
            return WindowUpdate::Exhausted { returned };
        }

        self.page_size = self.page_size.max(requested);
        WindowUpdate::Grew {
            page_size: self.page_size,
        }
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(
            mealscout_config::DEFAULT_PAGE_SIZE,
            mealscout_config::DEFAULT_PAGE_SIZE,
        )
    }
}
