//! Tunable constants for the grid engine.
//!
//! Every numeric threshold the engine relies on lives in [`TablixConfig`],
//! so hosts can tune realization and gesture behaviour without patching
//! code. Configurations round-trip through serde:
//!
//! ```
//! use horizon_tablix::config::TablixConfig;
//!
//! let config: TablixConfig = serde_json::from_str(r#"{ "adjustment_factor": 0.25 }"#).unwrap();
//! assert_eq!(config.adjustment_factor, 0.25);
//! assert_eq!(config.min_size, horizon_tablix::config::DEFAULT_MIN_SIZE);
//! ```

use serde::{Deserialize, Serialize};

/// Default smoothing factor for the realization size estimate.
pub const DEFAULT_ADJUSTMENT_FACTOR: f32 = 0.5;

/// Default viewport change (in pixels) below which no re-measure happens.
pub const DEFAULT_VIEWPORT_EPSILON: f32 = 0.5;

/// Default cap on leaves realized in a single iteration.
pub const DEFAULT_MAX_ITEMS_PER_ITERATION: usize = 500;

/// Default cap on iterations per rendering session.
pub const DEFAULT_MAX_ITERATIONS: usize = 64;

/// Minimum size of any row or column, in pixels.
pub const DEFAULT_MIN_SIZE: f32 = 20.0;

/// Width of the resize hot zone around a header's trailing edge.
pub const DEFAULT_RESIZE_HANDLE_WIDTH: f32 = 5.0;

/// Initial row height estimate before anything is measured.
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Initial column width estimate before anything is measured.
pub const DEFAULT_COLUMN_WIDTH: f32 = 64.0;

/// Horizontal padding on each side of cell content.
pub const DEFAULT_CELL_PADDING_X: f32 = 4.0;

/// Vertical padding on each side of cell content.
pub const DEFAULT_CELL_PADDING_Y: f32 = 2.0;

/// Average glyph width used by the analytic (non-measuring) estimator.
pub const DEFAULT_ANALYTIC_CHAR_WIDTH: f32 = 7.0;

/// Line height used by the analytic (non-measuring) estimator.
pub const DEFAULT_ANALYTIC_LINE_HEIGHT: f32 = 16.0;

/// Default movement before a drag is classified for axis lock.
pub const DEFAULT_LOCK_THRESHOLD: f32 = 8.0;

/// Default angular tolerance, in degrees, for axis lock.
pub const DEFAULT_ANGLE_TOLERANCE_DEGREES: f32 = 20.0;

/// Default number of consecutive agreeing samples before locking.
pub const DEFAULT_LOCK_SAMPLES: usize = 3;

/// Axis-lock parameters for the gesture router.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Cumulative movement (pixels) before classification starts.
    pub lock_threshold: f32,
    /// Maximum deviation from an axis, in degrees, to count as aligned.
    pub angle_tolerance_degrees: f32,
    /// Consecutive samples that must agree before the lock is taken.
    pub lock_samples: usize,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            lock_threshold: DEFAULT_LOCK_THRESHOLD,
            angle_tolerance_degrees: DEFAULT_ANGLE_TOLERANCE_DEGREES,
            lock_samples: DEFAULT_LOCK_SAMPLES,
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TablixConfig {
    /// Exponential moving average factor α in `(0, 1]`.
    pub adjustment_factor: f32,
    /// Viewport delta below which `update_viewport` is ignored.
    pub viewport_epsilon: f32,
    /// Maximum leaves realized per iteration.
    pub max_items_per_iteration: usize,
    /// Maximum iterations per session.
    pub max_iterations: usize,
    /// Minimum row/column size for both auto-measure and user resize.
    pub min_size: f32,
    /// Width of the resize hot zone.
    pub resize_handle_width: f32,
    /// Initial row height estimate.
    pub default_row_height: f32,
    /// Initial column width estimate.
    pub default_column_width: f32,
    /// Horizontal cell padding (each side).
    pub cell_padding_x: f32,
    /// Vertical cell padding (each side).
    pub cell_padding_y: f32,
    /// Glyph width for analytic estimation.
    pub analytic_char_width: f32,
    /// Line height for analytic estimation.
    pub analytic_line_height: f32,
    /// Gesture router settings.
    pub gesture: GestureConfig,
}

impl Default for TablixConfig {
    fn default() -> Self {
        Self {
            adjustment_factor: DEFAULT_ADJUSTMENT_FACTOR,
            viewport_epsilon: DEFAULT_VIEWPORT_EPSILON,
            max_items_per_iteration: DEFAULT_MAX_ITEMS_PER_ITERATION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_size: DEFAULT_MIN_SIZE,
            resize_handle_width: DEFAULT_RESIZE_HANDLE_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            cell_padding_x: DEFAULT_CELL_PADDING_X,
            cell_padding_y: DEFAULT_CELL_PADDING_Y,
            analytic_char_width: DEFAULT_ANALYTIC_CHAR_WIDTH,
            analytic_line_height: DEFAULT_ANALYTIC_LINE_HEIGHT,
            gesture: GestureConfig::default(),
        }
    }
}

impl TablixConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the realization adjustment factor α.
    pub fn with_adjustment_factor(mut self, factor: f32) -> Self {
        self.adjustment_factor = factor;
        self
    }

    /// Set the viewport epsilon.
    pub fn with_viewport_epsilon(mut self, epsilon: f32) -> Self {
        self.viewport_epsilon = epsilon;
        self
    }

    /// Set the per-iteration realization cap.
    pub fn with_max_items_per_iteration(mut self, cap: usize) -> Self {
        self.max_items_per_iteration = cap;
        self
    }

    /// Set the per-session iteration cap.
    pub fn with_max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = cap;
        self
    }

    /// Set the minimum row/column size.
    pub fn with_min_size(mut self, min_size: f32) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the padding applied around measured content.
    pub fn with_cell_padding(mut self, x: f32, y: f32) -> Self {
        self.cell_padding_x = x;
        self.cell_padding_y = y;
        self
    }

    /// Set the initial size estimates.
    pub fn with_default_sizes(mut self, row_height: f32, column_width: f32) -> Self {
        self.default_row_height = row_height;
        self.default_column_width = column_width;
        self
    }

    /// Set the gesture configuration.
    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    /// Return a copy with every field forced into its valid range.
    ///
    /// Non-finite or non-positive values fall back to the defaults so a bad
    /// configuration file can never stall realization.
    pub fn validated(mut self) -> Self {
        fn positive(value: f32, fallback: f32) -> f32 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }

        self.adjustment_factor =
            positive(self.adjustment_factor, DEFAULT_ADJUSTMENT_FACTOR).min(1.0);
        self.viewport_epsilon = if self.viewport_epsilon.is_finite() {
            self.viewport_epsilon.max(0.0)
        } else {
            DEFAULT_VIEWPORT_EPSILON
        };
        self.max_items_per_iteration = self.max_items_per_iteration.max(1);
        self.max_iterations = self.max_iterations.max(1);
        self.min_size = positive(self.min_size, DEFAULT_MIN_SIZE);
        self.resize_handle_width = positive(self.resize_handle_width, DEFAULT_RESIZE_HANDLE_WIDTH);
        self.default_row_height = positive(self.default_row_height, DEFAULT_ROW_HEIGHT);
        self.default_column_width = positive(self.default_column_width, DEFAULT_COLUMN_WIDTH);
        self.cell_padding_x = self.cell_padding_x.max(0.0);
        self.cell_padding_y = self.cell_padding_y.max(0.0);
        self.analytic_char_width = positive(self.analytic_char_width, DEFAULT_ANALYTIC_CHAR_WIDTH);
        self.analytic_line_height =
            positive(self.analytic_line_height, DEFAULT_ANALYTIC_LINE_HEIGHT);
        self.gesture.lock_threshold = self.gesture.lock_threshold.max(0.0);
        self.gesture.angle_tolerance_degrees =
            self.gesture.angle_tolerance_degrees.clamp(0.0, 45.0);
        self.gesture.lock_samples = self.gesture.lock_samples.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TablixConfig::default();
        assert_eq!(config.adjustment_factor, 0.5);
        assert_eq!(config.min_size, 20.0);
        assert_eq!(config.resize_handle_width, 5.0);
        assert_eq!(config.gesture.lock_samples, 3);
    }

    #[test]
    fn test_builder() {
        let config = TablixConfig::new()
            .with_adjustment_factor(0.3)
            .with_cell_padding(0.0, 0.0)
            .with_max_iterations(8);
        assert_eq!(config.adjustment_factor, 0.3);
        assert_eq!(config.cell_padding_x, 0.0);
        assert_eq!(config.max_iterations, 8);
    }

    #[test]
    fn test_validated_repairs_bad_values() {
        let config = TablixConfig {
            adjustment_factor: 3.0,
            max_items_per_iteration: 0,
            min_size: -4.0,
            default_row_height: f32::NAN,
            ..Default::default()
        }
        .validated();

        assert_eq!(config.adjustment_factor, 1.0);
        assert_eq!(config.max_items_per_iteration, 1);
        assert_eq!(config.min_size, DEFAULT_MIN_SIZE);
        assert_eq!(config.default_row_height, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_partial_json() {
        let config: TablixConfig =
            serde_json::from_str(r#"{ "max_iterations": 4, "gesture": { "lock_samples": 5 } }"#)
                .unwrap();
        assert_eq!(config.max_iterations, 4);
        assert_eq!(config.gesture.lock_samples, 5);
        assert_eq!(config.gesture.lock_threshold, DEFAULT_LOCK_THRESHOLD);
        assert_eq!(config.viewport_epsilon, DEFAULT_VIEWPORT_EPSILON);
    }
}
