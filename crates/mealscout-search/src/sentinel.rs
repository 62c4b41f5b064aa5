//! Scroll sentinel edge detection.

/// Tracks whether the end-of-list marker is in view.
///
/// Only a hidden → visible transition counts as a trigger; repeated
/// "visible" reports from the view layer are ignored until it is hidden
/// again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sentinel {
    visible: bool,
}

impl Sentinel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Record a visibility report. Returns `true` on a rising edge.
    pub fn observe(&mut self, visible: bool) -> bool {
        let rising = visible && !self.visible;
        self.visible = visible;
        rising
    }

    /// Forget visibility, as when the list is replaced and the marker
    /// unmounts.
    pub fn reset(&mut self) {
        self.visible = false;
    }
}
