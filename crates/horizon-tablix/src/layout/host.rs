//! Size estimation hosts.

use std::fmt;
use std::sync::Arc;

use crate::config::TablixConfig;
use crate::geometry::Size;
use crate::metrics::MetricsProvider;

/// Where the control is hosted, which decides how content is measured.
///
/// The virtualization algorithm is identical for both; only the size
/// estimate differs.
#[derive(Clone)]
pub enum LayoutHost {
    /// Attached to a live surface; text is measured by the platform.
    Canvas(Arc<dyn MetricsProvider>),
    /// Possibly detached; text is estimated from character and line counts.
    DashboardTile,
}

impl LayoutHost {
    /// A canvas host measuring through `metrics`.
    pub fn canvas(metrics: impl MetricsProvider + 'static) -> Self {
        LayoutHost::Canvas(Arc::new(metrics))
    }

    /// A dashboard-tile host.
    pub fn dashboard_tile() -> Self {
        LayoutHost::DashboardTile
    }

    /// Intrinsic size of `text`, without padding.
    pub fn estimate_text_size(&self, text: &str, config: &TablixConfig) -> Size {
        match self {
            LayoutHost::Canvas(metrics) => metrics.measure_text(text),
            LayoutHost::DashboardTile => {
                let lines = text.lines().count().max(1);
                let widest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
                Size::new(
                    widest as f32 * config.analytic_char_width,
                    lines as f32 * config.analytic_line_height,
                )
            }
        }
    }

    /// Content size of a cell showing `text`, padding included.
    pub fn estimate_cell_size(&self, text: &str, config: &TablixConfig) -> Size {
        let text = self.estimate_text_size(text, config);
        Size::new(
            text.width + 2.0 * config.cell_padding_x,
            text.height + 2.0 * config.cell_padding_y,
        )
    }

    /// Accumulated display scale; 1 for a tile.
    pub fn accumulated_scale(&self) -> f32 {
        match self {
            LayoutHost::Canvas(metrics) => {
                let scale = metrics.accumulated_scale();
                if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
            }
            LayoutHost::DashboardTile => 1.0,
        }
    }
}

impl Default for LayoutHost {
    fn default() -> Self {
        LayoutHost::DashboardTile
    }
}

impl fmt::Debug for LayoutHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutHost::Canvas(_) => f.write_str("LayoutHost::Canvas"),
            LayoutHost::DashboardTile => f.write_str("LayoutHost::DashboardTile"),
        }
    }
}
