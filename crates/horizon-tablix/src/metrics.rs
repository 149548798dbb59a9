//! Platform measurement capability.
//!
//! The virtualization and reconciliation algorithms never touch a platform
//! text stack directly. Everything pixel-dependent goes through
//! [`MetricsProvider`], so the engine runs headless in tests.

use crate::geometry::Size;

/// Measures text and reports the accumulated display scale.
pub trait MetricsProvider: Send + Sync {
    /// Intrinsic size of `text` in logical pixels, excluding padding.
    fn measure_text(&self, text: &str) -> Size;

    /// Product of every scale transform between the control and the screen.
    ///
    /// Pointer deltas are divided by this so drags stay 1:1 under zoom.
    fn accumulated_scale(&self) -> f32 {
        1.0
    }
}

/// A monospace measurer: `chars × char_width` by `lines × line_height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMetrics {
    pub char_width: f32,
    pub line_height: f32,
    pub scale: f32,
}

impl FixedMetrics {
    /// Create a measurer with the given glyph box.
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
            scale: 1.0,
        }
    }

    /// Set the accumulated scale reported to the resizer.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self::new(7.0, 16.0)
    }
}

impl MetricsProvider for FixedMetrics {
    fn measure_text(&self, text: &str) -> Size {
        let lines = text.lines().count().max(1);
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f32 * self.char_width,
            lines as f32 * self.line_height,
        )
    }

    fn accumulated_scale(&self) -> f32 {
        self.scale
    }
}
