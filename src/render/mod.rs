//! Rendering: frames, surfaces and repaint throttling.
//!
//! A [`Frame`] is a read-only projection of the [`crate::processing::ViewModel`] and the
//! [`crate::ingestion::LoadingStatus`]. A [`Surface`] paints frames; [`TextSurface`] renders
//! them as plain text. [`RenderThrottle`] limits how often batch arrivals repaint.

pub mod format;
pub mod frame;
pub mod surface;
pub mod throttle;

use std::time::Duration;

use serde::Deserialize;

pub use format::{format_count, format_number};
pub use frame::{Frame, HeaderCell, StatusLine, TableFrame, display_cells};
pub use surface::{Surface, TextSurface, render_text};
pub use throttle::{DEFAULT_THROTTLE, RenderThrottle};

/// Renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Minimum milliseconds between two batch-triggered paints.
    pub throttle_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE.as_millis() as u64,
        }
    }
}

impl RenderOptions {
    pub fn throttle(&self) -> RenderThrottle {
        RenderThrottle::new(Duration::from_millis(self.throttle_ms))
    }
}
