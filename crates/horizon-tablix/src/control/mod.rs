//! The public control façade.
//!
//! [`TablixControl`] ties the pieces together: it owns the navigator, the
//! realized [`Grid`], one [`DimensionLayoutManager`] and [`Scrollbar`] per
//! axis, the gesture router and the resizer. Every public entry point that
//! changes what is visible ends in a rendering session.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_tablix::prelude::*;
//!
//! let navigator = TableNavigator::from_records(
//!     ["Name", "Qty"],
//!     (0..100).map(|i| vec![format!("item {i}"), i.to_string()]),
//! );
//! let mut control = TablixControl::new(
//!     Box::new(navigator),
//!     Arc::new(TextCellBinder),
//!     LayoutHost::dashboard_tile(),
//! );
//! control.update_viewport(Size::new(400.0, 200.0));
//! assert!(control.realized_row_count() > 0);
//!
//! control.scroll_to(Dimension::Row, 5.0);
//! assert_eq!(control.scroll_state(Dimension::Row).integer_offset, 5);
//! ```

mod pointer;
mod session;

use std::sync::Arc;

use horizon_tablix_core::Signal;
use horizon_tablix_core::logging::targets;

use crate::config::TablixConfig;
use crate::events::{Dimension, ResizeCommit, ScrollEvent};
use crate::geometry::Size;
use crate::gesture::TouchManager;
use crate::grid::{BindContext, Grid, GridStats, ItemId, TablixCell};
use crate::layout::{DimensionLayoutManager, LayoutHost, LayoutState, ScrollState};
use crate::model::{CellBinder, Hierarchy, HierarchyNavigator};
use crate::persistence::SizePersistence;
use crate::resizer::Resizer;
use crate::scrollbar::Scrollbar;

/// Positions change by less than this are treated as no change.
const SCROLL_EPSILON: f64 = 1e-9;

fn slot(dimension: Dimension) -> usize {
    match dimension {
        Dimension::Column => 0,
        Dimension::Row => 1,
    }
}

/// A virtualized hierarchical grid.
///
/// # Signals
///
/// - `scrolled`: the first visible leaf or its fraction changed
/// - `resize_committed`: a user resize was released
/// - `need_more_data`: the realized window reached the last leaf
pub struct TablixControl {
    navigator: Box<dyn HierarchyNavigator>,
    binder: Arc<dyn CellBinder>,
    host: LayoutHost,
    config: TablixConfig,
    grid: Grid,
    /// Indexed column, row.
    layouts: [DimensionLayoutManager; 2],
    scrollbars: [Scrollbar; 2],
    touch: TouchManager,
    resizer: Resizer,
    persistence: SizePersistence,
    viewport: Size,
    last_session_iterations: usize,

    /// Emitted after a scroll moved the view.
    pub scrolled: Signal<ScrollEvent>,
    /// Emitted when a resize gesture is released.
    pub resize_committed: Signal<ResizeCommit>,
    /// Emitted when the window first reaches the last leaf of a dimension.
    pub need_more_data: Signal<Dimension>,
}

impl TablixControl {
    /// Create a control with the default configuration.
    ///
    /// Nothing is realized until the first viewport update or refresh.
    pub fn new(navigator: Box<dyn HierarchyNavigator>, binder: Arc<dyn CellBinder>, host: LayoutHost) -> Self {
        let config = TablixConfig::default();
        Self {
            navigator,
            binder,
            host,
            layouts: [
                DimensionLayoutManager::new(Dimension::Column, &config),
                DimensionLayoutManager::new(Dimension::Row, &config),
            ],
            scrollbars: [Scrollbar::new(), Scrollbar::new()],
            touch: TouchManager::new(config.gesture),
            resizer: Resizer::from_config(&config),
            config,
            grid: Grid::new(),
            persistence: SizePersistence::new(),
            viewport: Size::ZERO,
            last_session_iterations: 0,
            scrolled: Signal::new(),
            resize_committed: Signal::new(),
            need_more_data: Signal::new(),
        }
    }

    /// Replace the configuration. Out-of-range values fall back to defaults.
    pub fn with_config(mut self, config: TablixConfig) -> Self {
        let config = config.validated();
        self.layouts = [
            DimensionLayoutManager::new(Dimension::Column, &config),
            DimensionLayoutManager::new(Dimension::Row, &config),
        ];
        self.touch = TouchManager::new(config.gesture);
        self.resizer = Resizer::from_config(&config);
        self.config = config;
        self
    }

    /// Start from previously persisted user sizes.
    pub fn with_persistence(mut self, persistence: SizePersistence) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn config(&self) -> &TablixConfig {
        &self.config
    }

    pub fn host(&self) -> &LayoutHost {
        &self.host
    }

    pub fn navigator(&self) -> &dyn HierarchyNavigator {
        self.navigator.as_ref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn stats(&self) -> GridStats {
        self.grid.stats()
    }

    pub fn persistence(&self) -> &SizePersistence {
        &self.persistence
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn layout(&self, dimension: Dimension) -> &DimensionLayoutManager {
        &self.layouts[slot(dimension)]
    }

    pub fn layout_state(&self, dimension: Dimension) -> LayoutState {
        self.layout(dimension).state()
    }

    pub fn scroll_state(&self, dimension: Dimension) -> ScrollState {
        self.layout(dimension).scroll()
    }

    pub fn scrollbar(&self, dimension: Dimension) -> &Scrollbar {
        &self.scrollbars[slot(dimension)]
    }

    pub fn touch(&self) -> &TouchManager {
        &self.touch
    }

    /// Iterations the last rendering session took.
    pub fn last_session_iterations(&self) -> usize {
        self.last_session_iterations
    }

    /// Realized leaf rows.
    pub fn realized_row_count(&self) -> usize {
        self.grid.leaf_row_count()
    }

    /// Realized leaf columns.
    pub fn realized_column_count(&self) -> usize {
        self.grid.leaf_column_count()
    }

    /// Realized rows, header rows first.
    pub fn row_ids(&self) -> Vec<ItemId> {
        self.grid.row_ids()
    }

    /// Realized columns, header columns first.
    pub fn column_ids(&self) -> Vec<ItemId> {
        self.grid.column_ids()
    }

    pub fn cell(&self, row: ItemId, column: ItemId) -> Option<&TablixCell> {
        self.grid.cell(row, column)
    }

    pub fn row_size(&self, row: ItemId) -> Option<f32> {
        self.grid.rows().get(row).map(|item| item.size())
    }

    pub fn column_size(&self, column: ItemId) -> Option<f32> {
        self.grid.columns().get(column).map(|item| item.size())
    }

    fn leaf_count(&self, dimension: Dimension) -> usize {
        self.navigator.leaf_count(dimension)
    }

    /// Swap in new row and/or column hierarchies.
    ///
    /// Does nothing when both are `None`. With `reset`, scroll positions
    /// return to the origin; otherwise they are clamped to the new model.
    pub fn update_model(&mut self, rows: Option<Hierarchy>, columns: Option<Hierarchy>, reset: bool) {
        if rows.is_none() && columns.is_none() {
            return;
        }
        self.navigator.update(rows, columns);
        let leaf_counts = [self.leaf_count(Dimension::Column), self.leaf_count(Dimension::Row)];
        tracing::debug!(
            target: targets::CONTROL,
            rows = leaf_counts[1],
            columns = leaf_counts[0],
            reset,
            "model updated"
        );

        // Realized leaves stay put; the session revalidates them against the
        // new model and only rebinds what changed.
        for dimension in Dimension::ALL {
            let layout = &mut self.layouts[slot(dimension)];
            layout.reset(&self.config, reset);
            layout.clamp_scroll(leaf_counts[slot(dimension)]);
            self.grid.axis_mut(dimension).forget_leaf_sizes();
        }
        self.run_session(None);
    }

    /// Resize the viewport. Changes within the configured epsilon are
    /// ignored; returns whether a session ran.
    pub fn update_viewport(&mut self, viewport: Size) -> bool {
        if !viewport.differs_from(&self.viewport, self.config.viewport_epsilon) {
            return false;
        }
        tracing::debug!(target: targets::CONTROL, width = viewport.width, height = viewport.height, "viewport changed");
        self.viewport = viewport;
        for dimension in Dimension::ALL {
            let leaf_count = self.leaf_count(dimension);
            self.layouts[slot(dimension)].clamp_scroll(leaf_count);
        }
        self.run_session(None);
        true
    }

    /// Run a full session. With `clear`, every cell is unbound and rebound
    /// and every item re-measured.
    pub fn refresh(&mut self, clear: bool) {
        if clear {
            let ctx = BindContext {
                navigator: self.navigator.as_ref(),
                binder: self.binder.as_ref(),
                host: &self.host,
                config: &self.config,
            };
            self.grid.clear(&ctx);
        }
        self.run_session(None);
    }

    /// Largest valid scroll position along `dimension`.
    pub fn max_scroll_position(&self, dimension: Dimension) -> f64 {
        self.layout(dimension).max_scroll_position(self.leaf_count(dimension))
    }

    /// Scroll so that leaf position `position` is at the leading edge.
    ///
    /// The position is clamped to the valid range. Returns false, without a
    /// session or signal, when the clamped position equals the current one.
    pub fn scroll_to(&mut self, dimension: Dimension, position: f64) -> bool {
        let max = self.max_scroll_position(dimension);
        let target = if position.is_finite() { position.clamp(0.0, max) } else { 0.0 };
        let layout = &mut self.layouts[slot(dimension)];
        if (layout.scroll().position() - target).abs() < SCROLL_EPSILON {
            return false;
        }
        let change = layout.set_scroll_position(target, max);
        if change.is_noop() {
            return false;
        }
        tracing::trace!(
            target: targets::CONTROL,
            ?dimension,
            from = change.previous.position(),
            to = change.current.position(),
            "scroll"
        );
        self.run_session(Some(dimension));
        self.scrolled.emit(ScrollEvent {
            dimension,
            integer_offset: change.current.integer_offset,
            fractional_offset: change.current.fractional_offset,
        });
        true
    }

    /// Scroll by `delta` leaves.
    pub fn scroll_by(&mut self, dimension: Dimension, delta: f64) -> bool {
        if delta == 0.0 {
            return false;
        }
        let current = self.scroll_state(dimension).position();
        self.scroll_to(dimension, current + delta)
    }

    /// Apply a wheel rotation along `dimension`.
    pub fn wheel(&mut self, dimension: Dimension, delta: f64) -> bool {
        let bar = &self.scrollbars[slot(dimension)];
        if !bar.wheel(delta) {
            return false;
        }
        let position = bar.view_min();
        self.scroll_to(dimension, position)
    }

    /// Scroll one page forward or back.
    pub fn page(&mut self, dimension: Dimension, forward: bool) -> bool {
        let bar = &self.scrollbars[slot(dimension)];
        if !bar.page(forward) {
            return false;
        }
        let position = bar.view_min();
        self.scroll_to(dimension, position)
    }

    /// Drag the scrollbar thumb `track_delta` pixels from where it was at
    /// `start_position`, on a track `track_length` pixels long.
    pub fn drag_scrollbar(
        &mut self,
        dimension: Dimension,
        track_delta: f32,
        track_length: f32,
        start_position: f64,
    ) -> bool {
        let bar = &self.scrollbars[slot(dimension)];
        if !bar.drag_to(track_delta, track_length, start_position) {
            return false;
        }
        let position = bar.view_min();
        self.scroll_to(dimension, position)
    }
}

impl std::fmt::Debug for TablixControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablixControl")
            .field("host", &self.host)
            .field("viewport", &self.viewport)
            .field("rows", &self.realized_row_count())
            .field("columns", &self.realized_column_count())
            .field("row_scroll", &self.scroll_state(Dimension::Row))
            .field("column_scroll", &self.scroll_state(Dimension::Column))
            .finish()
    }
}

static_assertions::assert_impl_all!(TablixControl: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HierarchyNode, MatrixNavigator, TableNavigator, TextCellBinder};
    use parking_lot::Mutex;

    fn table(rows: usize) -> TablixControl {
        let navigator = TableNavigator::from_records(
            ["A", "B", "C"],
            (0..rows).map(|i| vec![format!("a{i}"), format!("b{i}"), format!("c{i}")]),
        );
        TablixControl::new(Box::new(navigator), Arc::new(TextCellBinder), LayoutHost::dashboard_tile())
    }

    #[test]
    fn test_nothing_realized_before_viewport() {
        let control = table(10);
        assert_eq!(control.realized_row_count(), 0);
        assert_eq!(control.layout_state(Dimension::Row), LayoutState::Idle);
    }

    #[test]
    fn test_viewport_epsilon() {
        let mut control = table(10);
        assert!(control.update_viewport(Size::new(300.0, 200.0)));
        assert!(!control.update_viewport(Size::new(300.2, 200.3)));
        assert!(control.update_viewport(Size::new(300.0, 260.0)));
        assert_eq!(control.layout_state(Dimension::Row), LayoutState::Fixed);
    }

    #[test]
    fn test_update_model_without_hierarchies_is_noop() {
        let mut control = table(10);
        control.update_viewport(Size::new(300.0, 200.0));
        let stats = control.stats();
        let iterations = control.last_session_iterations();
        control.update_model(None, None, true);
        assert_eq!(control.stats(), stats);
        assert_eq!(control.last_session_iterations(), iterations);
    }

    #[test]
    fn test_scroll_to_clamps_and_ignores_repeats() {
        let mut control = table(100);
        control.update_viewport(Size::new(300.0, 200.0));
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        control.scrolled.connect(move |e: &ScrollEvent| sink.lock().push(e.integer_offset));

        assert!(control.scroll_to(Dimension::Row, 1_000.0));
        let max = control.max_scroll_position(Dimension::Row);
        assert!((control.scroll_state(Dimension::Row).position() - max).abs() < 1e-4);
        assert!(!control.scroll_to(Dimension::Row, 2_000.0));
        assert!(control.scroll_to(Dimension::Row, -5.0));
        assert_eq!(control.scroll_state(Dimension::Row).position(), 0.0);
        assert_eq!(events.lock().len(), 2);
    }

    #[test]
    fn test_update_model_resets_scroll() {
        let mut control = table(100);
        control.update_viewport(Size::new(300.0, 200.0));
        control.scroll_to(Dimension::Row, 20.0);

        let rows = Hierarchy::flat((0..50).map(|i| format!("r{i}")));
        control.update_model(Some(rows.clone()), None, false);
        assert_eq!(control.scroll_state(Dimension::Row).integer_offset, 20);

        control.update_model(Some(rows), None, true);
        assert_eq!(control.scroll_state(Dimension::Row).integer_offset, 0);
    }

    #[test]
    fn test_matrix_realizes_headers() {
        let rows = Hierarchy::new(vec![
            HierarchyNode::new("east", "East").with_children(vec![HierarchyNode::leaf("NY"), HierarchyNode::leaf("MA")]),
        ]);
        let columns = Hierarchy::flat(["2023", "2024"]);
        let navigator = MatrixNavigator::new(rows, columns);
        let mut control =
            TablixControl::new(Box::new(navigator), Arc::new(TextCellBinder), LayoutHost::dashboard_tile());
        control.update_viewport(Size::new(400.0, 400.0));

        assert_eq!(control.realized_row_count(), 2);
        assert_eq!(control.realized_column_count(), 2);
        // One header row above two leaf rows; two header columns beside two
        // leaf columns.
        assert_eq!(control.row_ids().len(), 3);
        assert_eq!(control.column_ids().len(), 4);
    }
}
