//! Clipboard copy controls with transient visual confirmation.
//!
//! Each copy button owns a [`CopyControl`]. Triggering one writes to the
//! system clipboard and, on success, swaps the button glyph to a check mark
//! for a fixed window before reverting. Failures are logged and leave the
//! glyph untouched.

use std::time::{Duration, Instant};

/// Glyph shown while the control is idle.
pub const COPY_GLYPH: &str = "📋";

/// Glyph shown while a successful copy is being confirmed.
pub const CONFIRM_GLYPH: &str = "✔";

/// How long the confirmation glyph stays up after a successful copy.
pub const FEEDBACK_WINDOW: Duration = Duration::from_millis(1500);

/// State for one copy button.
#[derive(Debug, Clone)]
pub struct CopyControl {
    feedback_window: Duration,
    confirmed_at: Option<Instant>,
}

impl CopyControl {
    pub fn new(feedback_window: Duration) -> Self {
        Self {
            feedback_window,
            confirmed_at: None,
        }
    }

    /// Write `text` to the system clipboard. Success starts the confirmation
    /// window; failure is logged and the control stays idle.
    pub fn trigger(&mut self, text: &str) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.mark_confirmed(Instant::now()),
            Err(e) => log::warn!("failed to copy to clipboard: {e}"),
        }
    }

    /// Record a successful copy at `at`. Split out from [`trigger`] so the
    /// window logic is testable without a real clipboard.
    ///
    /// [`trigger`]: CopyControl::trigger
    pub fn mark_confirmed(&mut self, at: Instant) {
        self.confirmed_at = Some(at);
    }

    /// Whether the confirmation glyph is still up at `now`.
    pub fn is_confirming(&self, now: Instant) -> bool {
        self.confirmed_at
            .is_some_and(|at| now.duration_since(at) < self.feedback_window)
    }

    /// Glyph to display at `now`.
    pub fn glyph(&self, now: Instant) -> &'static str {
        if self.is_confirming(now) {
            CONFIRM_GLYPH
        } else {
            COPY_GLYPH
        }
    }

    /// Instant at which the glyph reverts, while a confirmation is up.
    /// The event loop uses this to schedule its next wake.
    pub fn revert_deadline(&self, now: Instant) -> Option<Instant> {
        self.confirmed_at
            .map(|at| at + self.feedback_window)
            .filter(|&deadline| deadline > now)
    }
}

impl Default for CopyControl {
    fn default() -> Self {
        Self::new(FEEDBACK_WINDOW)
    }
}
