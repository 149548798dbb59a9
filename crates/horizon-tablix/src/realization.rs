//! Adaptive realization estimate.
//!
//! Before each rendering iteration the [`RealizationManager`] estimates how
//! many more leaves fill the remaining extent. After the iteration it folds
//! the measured average into its estimate with an exponential moving average:
//!
//! ```text
//! avg' = avg * (1 - α) + measured_avg * α
//! ```

use horizon_tablix_core::logging::targets;

use crate::config::TablixConfig;
use crate::events::Dimension;

/// Smoothed item-size estimate for one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct RealizationManager {
    dimension: Dimension,
    average_item_size: f32,
    adjustment_factor: f32,
    max_items_per_iteration: usize,
}

impl RealizationManager {
    /// Create a manager with an initial estimate.
    pub fn new(dimension: Dimension, initial_size: f32, adjustment_factor: f32, max_items_per_iteration: usize) -> Self {
        Self {
            dimension,
            average_item_size: initial_size.max(1.0),
            adjustment_factor: adjustment_factor.clamp(f32::EPSILON, 1.0),
            max_items_per_iteration: max_items_per_iteration.max(1),
        }
    }

    /// Create a manager seeded from the configured default size.
    pub fn from_config(dimension: Dimension, config: &TablixConfig) -> Self {
        let initial = match dimension {
            Dimension::Row => config.default_row_height,
            Dimension::Column => config.default_column_width,
        };
        Self::new(
            dimension,
            initial,
            config.adjustment_factor,
            config.max_items_per_iteration,
        )
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Current estimate of one item's size.
    pub fn average_item_size(&self) -> f32 {
        self.average_item_size
    }

    pub fn adjustment_factor(&self) -> f32 {
        self.adjustment_factor
    }

    pub fn max_items_per_iteration(&self) -> usize {
        self.max_items_per_iteration
    }

    /// Number of leaves to realize for `remaining_extent` pixels.
    ///
    /// At least one while leaves remain, never more than the per-iteration
    /// cap or `remaining_leaves`.
    pub fn items_to_realize(&self, remaining_extent: f32, remaining_leaves: usize) -> usize {
        if remaining_leaves == 0 {
            return 0;
        }
        let estimate = if remaining_extent.is_finite() && remaining_extent > 0.0 {
            (remaining_extent / self.average_item_size).ceil() as usize
        } else {
            1
        };
        estimate
            .clamp(1, self.max_items_per_iteration)
            .min(remaining_leaves)
    }

    /// Fold a measured extent covering `measured_count` items into the
    /// estimate.
    pub fn on_end_rendering_iteration(&mut self, measured_extent: f32, measured_count: usize) {
        if measured_count == 0 {
            return;
        }
        let measured = measured_extent / measured_count as f32;
        if !measured.is_finite() || measured <= 0.0 {
            tracing::warn!(
                target: targets::REALIZATION,
                dimension = ?self.dimension,
                measured_extent,
                measured_count,
                "ignoring degenerate measurement"
            );
            return;
        }
        let alpha = self.adjustment_factor;
        self.average_item_size = self.average_item_size * (1.0 - alpha) + measured * alpha;
        tracing::trace!(
            target: targets::REALIZATION,
            dimension = ?self.dimension,
            average = self.average_item_size,
            "estimate updated"
        );
    }

    /// Restart from a fresh estimate.
    pub fn reset(&mut self, initial_size: f32) {
        self.average_item_size = initial_size.max(1.0);
    }
}
