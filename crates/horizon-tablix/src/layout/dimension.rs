//! Per-axis rendering session state machine.
//!
//! ```text
//! Idle ──start──▶ Measuring ──iterate──▶ Realizing ──end──▶ Fixed
//!   │                                                        ▲
//!   └──────start(scrolling)──▶ Scrolling ──iterate/end───────┘
//! ```
//!
//! A manager owns the scroll state and realization estimate of its axis. It
//! drives realization of leaves into the grid, measures their content,
//! trims what falls past the viewport and assigns final positions.

use std::collections::HashMap;

use horizon_tablix_core::logging::targets;

use crate::config::TablixConfig;
use crate::events::Dimension;
use crate::grid::{BindContext, Grid, ItemId};
use crate::layout::span;
use crate::persistence::SizePersistence;
use crate::realization::RealizationManager;

/// Session state of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutState {
    #[default]
    Idle,
    Measuring,
    Realizing,
    Scrolling,
    /// Sizes are stable until the next session.
    Fixed,
}

/// First visible leaf plus the fraction of it scrolled out of view.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub integer_offset: usize,
    /// In `[0, 1)`.
    pub fractional_offset: f32,
}

impl ScrollState {
    /// Split a position in leaf units.
    pub fn from_position(position: f64) -> Self {
        let position = if position.is_finite() { position.max(0.0) } else { 0.0 };
        let integer = position.floor();
        Self {
            integer_offset: integer as usize,
            fractional_offset: ((position - integer) as f32).clamp(0.0, 1.0 - f32::EPSILON),
        }
    }

    /// Position in leaf units.
    pub fn position(&self) -> f64 {
        self.integer_offset as f64 + f64::from(self.fractional_offset)
    }
}

/// Result of a scroll position update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollChange {
    pub previous: ScrollState,
    pub current: ScrollState,
}

impl ScrollChange {
    /// Change of the first visible leaf.
    pub fn integer_delta(&self) -> isize {
        self.current.integer_offset as isize - self.previous.integer_offset as isize
    }

    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Drives realization and layout of one axis.
#[derive(Debug, Clone)]
pub struct DimensionLayoutManager {
    dimension: Dimension,
    state: LayoutState,
    realization: RealizationManager,
    scroll: ScrollState,
    viewport_extent: f32,
    /// Extent available to leaves, from the last iteration.
    available_extent: f32,
    /// Only unmeasured items are measured this session.
    frozen: bool,
    filled: bool,
    exhausted: bool,
    iteration_start: usize,
    at_end: bool,
}

impl DimensionLayoutManager {
    pub fn new(dimension: Dimension, config: &TablixConfig) -> Self {
        Self {
            dimension,
            state: LayoutState::Idle,
            realization: RealizationManager::from_config(dimension, config),
            scroll: ScrollState::default(),
            viewport_extent: 0.0,
            available_extent: 0.0,
            frozen: false,
            filled: false,
            exhausted: false,
            iteration_start: 0,
            at_end: false,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn realization(&self) -> &RealizationManager {
        &self.realization
    }

    pub fn average_item_size(&self) -> f32 {
        self.realization.average_item_size()
    }

    pub fn viewport_extent(&self) -> f32 {
        self.viewport_extent
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether realization has nothing left to do this session.
    pub fn is_complete(&self) -> bool {
        self.filled || self.exhausted
    }

    fn transition(&mut self, state: LayoutState) {
        if self.state != state {
            tracing::debug!(
                target: targets::LAYOUT,
                dimension = ?self.dimension,
                from = ?self.state,
                to = ?state,
                "layout state"
            );
            self.state = state;
        }
    }

    /// Begin a session over `viewport_extent` pixels.
    ///
    /// `scrolling` names the dimension being scrolled, if any. Scroll
    /// sessions leave measured sizes of both axes untouched.
    pub fn on_start_rendering_session(&mut self, viewport_extent: f32, scrolling: Option<Dimension>) {
        self.viewport_extent = viewport_extent.max(0.0);
        self.frozen = scrolling.is_some();
        self.filled = false;
        self.exhausted = false;
        let next = if scrolling == Some(self.dimension) {
            LayoutState::Scrolling
        } else {
            LayoutState::Measuring
        };
        self.transition(next);
    }

    /// Bring the realized window in line with the scroll offset.
    ///
    /// A move smaller than the window rotates leaves between its edges;
    /// a larger one releases the window so it is re-realized at the new
    /// offset.
    pub fn sync_window(&mut self, grid: &mut Grid, ctx: &BindContext<'_>) {
        let leaf_count = ctx.navigator.leaf_count(self.dimension);
        if self.scroll.integer_offset >= leaf_count && leaf_count > 0 {
            self.scroll = ScrollState::from_position((leaf_count - 1) as f64);
        }
        let target = self.scroll.integer_offset;
        if !self.frozen {
            grid.revalidate(ctx, self.dimension);
        }
        let window = grid.axis(self.dimension).window();
        let realized = window.len();
        if realized == 0 {
            grid.release_leaves(ctx, self.dimension, target);
            return;
        }
        let delta = target as isize - window.start as isize;
        if delta == 0 {
            return;
        }
        if delta.unsigned_abs() < realized {
            let moved = grid.rotate(ctx, self.dimension, delta);
            tracing::trace!(target: targets::LAYOUT, dimension = ?self.dimension, delta, moved, "rotated window");
        } else {
            tracing::trace!(target: targets::LAYOUT, dimension = ?self.dimension, delta, "window replaced");
            grid.release_leaves(ctx, self.dimension, target);
        }
    }

    /// Pixels of the first leaf scrolled out of view.
    pub fn fractional_pixels(&self, first_size: f32) -> f32 {
        self.scroll.fractional_offset * first_size
    }

    fn first_leaf_pan(&self, grid: &Grid) -> f32 {
        let axis = grid.axis(self.dimension);
        axis.first_leaf()
            .and_then(|id| axis.get(id))
            .map_or(0.0, |item| self.fractional_pixels(item.size()))
    }

    /// Start an iteration and return how many leaves to realize.
    pub fn on_start_rendering_iteration(&mut self, grid: &Grid, leaf_count: usize) -> usize {
        if self.state != LayoutState::Scrolling {
            self.transition(LayoutState::Realizing);
        }
        let axis = grid.axis(self.dimension);
        self.available_extent = (self.viewport_extent - axis.header_extent() - axis.footer_extent()).max(0.0);
        let consumed = axis.leaves_extent() - self.first_leaf_pan(grid);
        let remaining = self.available_extent - consumed;
        let window = axis.window();
        let remaining_leaves = leaf_count.saturating_sub(window.end);

        self.filled = remaining <= 0.0;
        self.exhausted = remaining_leaves == 0;
        self.iteration_start = window.end;
        if self.is_complete() {
            return 0;
        }
        self.realization.items_to_realize(remaining, remaining_leaves)
    }

    /// Realize `count` leaves at the trailing edge. Returns how many were
    /// realized.
    pub fn realize(&self, grid: &mut Grid, ctx: &BindContext<'_>, count: usize) -> usize {
        let start = grid.axis(self.dimension).window().end;
        (start..start + count)
            .take_while(|index| grid.get_or_create_leaf(ctx, self.dimension, *index).is_some())
            .count()
    }

    /// Measure item content sizes from their single-span cells.
    ///
    /// A spanning header clipped down to one realized leaf still belongs to
    /// span reconciliation, not to that leaf.
    ///
    /// Items without cells fall back to the configured default. Auto sizes
    /// never go below the minimum. Newly bound items pick up persisted user
    /// sizes by key.
    pub fn measure(&self, grid: &mut Grid, persistence: &SizePersistence, config: &TablixConfig) {
        let mut extents: HashMap<ItemId, f32> = HashMap::new();
        for cell in grid.cells() {
            if cell.span(self.dimension) == 1 && cell.clip_along(self.dimension).is_complete() {
                let extent = extents.entry(cell.anchor(self.dimension)).or_insert(0.0);
                *extent = extent.max(cell.content_extent(self.dimension));
            }
        }
        let default_size = match self.dimension {
            Dimension::Row => config.default_row_height,
            Dimension::Column => config.default_column_width,
        };

        let axis = grid.axis_mut(self.dimension);
        for id in axis.ordered() {
            let Some(item) = axis.get_mut(id) else {
                continue;
            };
            if self.frozen && item.measured {
                continue;
            }
            if !item.measured
                && let Some(size) = persistence.get(self.dimension, &item.key())
            {
                item.fixed_size = Some(size.max(config.min_size));
            }
            item.content_size = extents
                .get(&id)
                .copied()
                .unwrap_or(default_size)
                .max(config.min_size);
            item.measured = true;
        }
    }

    /// Align sizes along this axis with the spanning headers.
    pub fn reconcile(&self, grid: &mut Grid) -> usize {
        span::reconcile(grid, self.dimension)
    }

    /// Fold the leaves realized this iteration into the estimate.
    pub fn on_end_rendering_iteration(&mut self, grid: &Grid) {
        let axis = grid.axis(self.dimension);
        let window = axis.window();
        let skip = self.iteration_start.saturating_sub(window.start);
        let (extent, count) = axis
            .leaf_ids()
            .iter()
            .skip(skip)
            .filter_map(|id| axis.get(*id))
            .fold((0.0, 0), |(extent, count), item| (extent + item.size(), count + 1));
        self.realization.on_end_rendering_iteration(extent, count);
    }

    /// Release trailing leaves that start past the viewport.
    pub fn trim(&mut self, grid: &mut Grid, ctx: &BindContext<'_>) -> usize {
        let mut released = 0;
        loop {
            let pan = self.first_leaf_pan(grid);
            let axis = grid.axis(self.dimension);
            let Some(last) = axis.last_leaf().and_then(|id| axis.get(id)) else {
                break;
            };
            let last_start = axis.leaves_extent() - last.size() - pan;
            if last_start < self.available_extent {
                break;
            }
            grid.release_last_leaf(ctx, self.dimension);
            released += 1;
        }
        if released > 0 {
            tracing::trace!(target: targets::LAYOUT, dimension = ?self.dimension, released, "trimmed");
            self.filled = true;
        }
        released
    }

    /// End the session; sizes are fixed until the next one.
    pub fn on_end_rendering_session(&mut self) {
        self.transition(LayoutState::Fixed);
    }

    /// Assign positions and visible extents to every item. Returns the
    /// pixels of the first leaf scrolled out of view.
    pub fn arrange(&self, grid: &mut Grid) -> f32 {
        let pan = self.first_leaf_pan(grid);
        let axis = grid.axis_mut(self.dimension);
        let first = axis.first_leaf();
        let mut position = 0.0;
        for id in axis.header_ids().to_vec().into_iter().chain(axis.leaf_ids()) {
            if let Some(item) = axis.get_mut(id) {
                let size = item.size();
                item.extent = if Some(id) == first { (size - pan).max(0.0) } else { size };
                item.position = position;
                position += item.extent;
            }
        }
        let header_extent = axis.header_extent();
        if let Some(id) = axis.footer_id()
            && let Some(item) = axis.get_mut(id)
        {
            let size = item.size();
            item.extent = size;
            item.position = position.min(self.viewport_extent - size).max(header_extent);
        }
        pan
    }

    /// Largest scroll position that still fills the viewport, estimated from
    /// the average item size.
    pub fn max_scroll_position(&self, leaf_count: usize) -> f64 {
        let visible = f64::from(self.available_extent) / f64::from(self.realization.average_item_size());
        (leaf_count as f64 - visible).max(0.0)
    }

    /// Clamp `position` to `[0, max]` and store it.
    pub fn set_scroll_position(&mut self, position: f64, max: f64) -> ScrollChange {
        let clamped = if position.is_finite() { position.clamp(0.0, max.max(0.0)) } else { 0.0 };
        let previous = self.scroll;
        self.scroll = ScrollState::from_position(clamped);
        ScrollChange {
            previous,
            current: self.scroll,
        }
    }

    /// Clamp the stored position after the leaf count changed.
    pub fn clamp_scroll(&mut self, leaf_count: usize) {
        let max = self.max_scroll_position(leaf_count);
        if self.scroll.position() > max {
            self.scroll = ScrollState::from_position(max);
        }
    }

    /// Record whether the window reaches the last leaf; true on the
    /// transition into that state.
    pub fn note_window_end(&mut self, grid: &Grid, leaf_count: usize) -> bool {
        let window = grid.axis(self.dimension).window();
        let at_end = leaf_count > 0 && window.end >= leaf_count;
        let reached = at_end && !self.at_end;
        self.at_end = at_end;
        reached
    }

    /// Forget the estimate and scroll position.
    pub fn reset(&mut self, config: &TablixConfig, reset_scroll: bool) {
        let initial = match self.dimension {
            Dimension::Row => config.default_row_height,
            Dimension::Column => config.default_column_width,
        };
        self.realization.reset(initial);
        self.at_end = false;
        if reset_scroll {
            self.scroll = ScrollState::default();
        }
    }
}
