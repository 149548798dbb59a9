//! The rendering session loop.

use horizon_tablix_core::PerfSpan;
use horizon_tablix_core::logging::{span_names, targets};

use super::{TablixControl, slot};
use crate::config::TablixConfig;
use crate::events::{Dimension, TablixRegion};
use crate::geometry::{Rect, Size};
use crate::gesture::TouchManager;
use crate::grid::{BindContext, Grid};
use crate::layout::DimensionLayoutManager;
use crate::persistence::SizePersistence;

fn measure_and_reconcile(
    grid: &mut Grid,
    layouts: &[DimensionLayoutManager; 2],
    persistence: &SizePersistence,
    config: &TablixConfig,
) {
    for layout in layouts {
        layout.measure(grid, persistence, config);
    }
    let _reconcile = PerfSpan::new(span_names::RECONCILE);
    for layout in layouts {
        layout.reconcile(grid);
    }
}

/// Register the five regions for the arranged grid.
fn register_regions(touch: &mut TouchManager, grid: &Grid, viewport: Size) {
    let header_width = grid.columns().header_extent().min(viewport.width);
    let header_height = grid.rows().header_extent().min(viewport.height);
    let footer = grid.rows().footer_id().and_then(|id| grid.rows().get(id));
    let (footer_top, footer_height) = footer.map_or((viewport.height, 0.0), |item| (item.position(), item.extent()));
    let body_width = (viewport.width - header_width).max(0.0);
    let body_height = (footer_top - header_height).max(0.0);

    touch.register_region(TablixRegion::Corner, Rect::new(0.0, 0.0, header_width, header_height));
    touch.register_region(
        TablixRegion::ColumnHeader,
        Rect::new(header_width, 0.0, body_width, header_height),
    );
    touch.register_region(
        TablixRegion::RowHeader,
        Rect::new(0.0, header_height, header_width, body_height),
    );
    touch.register_region(
        TablixRegion::Body,
        Rect::new(header_width, header_height, body_width, body_height),
    );
    touch.register_region(
        TablixRegion::Footer,
        Rect::new(header_width, footer_top, body_width, footer_height),
    );
}

impl TablixControl {
    /// Realize, measure and arrange both axes for the current viewport and
    /// scroll positions.
    ///
    /// `scrolling` names the dimension a scroll session was started for;
    /// such sessions only measure newly realized items.
    pub(super) fn run_session(&mut self, scrolling: Option<Dimension>) {
        let _perf = PerfSpan::new(if scrolling.is_some() {
            span_names::SCROLL
        } else {
            span_names::SESSION
        });

        let Self {
            navigator,
            binder,
            host,
            config,
            grid,
            layouts,
            scrollbars,
            touch,
            persistence,
            viewport,
            last_session_iterations,
            need_more_data,
            ..
        } = self;
        let ctx = BindContext {
            navigator: &**navigator,
            binder: &**binder,
            host,
            config,
        };
        let leaf_counts = Dimension::ALL.map(|dimension| ctx.navigator.leaf_count(dimension));
        let extents = Dimension::ALL.map(|dimension| match dimension {
            Dimension::Column => viewport.width,
            Dimension::Row => viewport.height,
        });

        grid.ensure_structure(&ctx);
        for dimension in Dimension::ALL {
            let layout = &mut layouts[slot(dimension)];
            layout.on_start_rendering_session(extents[slot(dimension)], scrolling);
            layout.sync_window(grid, &ctx);
        }
        grid.materialize(&ctx);
        measure_and_reconcile(grid, layouts, persistence, ctx.config);

        let mut iterations = 0;
        let mut settled = false;
        while iterations < ctx.config.max_iterations {
            let counts = Dimension::ALL
                .map(|dimension| layouts[slot(dimension)].on_start_rendering_iteration(grid, leaf_counts[slot(dimension)]));
            if counts.iter().all(|count| *count == 0) {
                settled = true;
                break;
            }
            iterations += 1;
            let _iteration = PerfSpan::new(span_names::ITERATION);

            let realized: usize = Dimension::ALL
                .iter()
                .map(|dimension| layouts[slot(*dimension)].realize(grid, &ctx, counts[slot(*dimension)]))
                .sum();
            grid.materialize(&ctx);
            measure_and_reconcile(grid, layouts, persistence, ctx.config);
            for layout in layouts.iter_mut() {
                layout.on_end_rendering_iteration(grid);
            }

            if realized == 0 {
                tracing::warn!(
                    target: targets::CONTROL,
                    ?counts,
                    "navigator reported leaves it could not provide; ending session"
                );
                settled = true;
                break;
            }
        }
        if !settled {
            tracing::warn!(
                target: targets::CONTROL,
                iterations,
                "session hit the iteration cap before filling the viewport"
            );
        }

        let mut trimmed = 0;
        for layout in layouts.iter_mut() {
            trimmed += layout.trim(grid, &ctx);
        }
        if trimmed > 0 {
            grid.materialize(&ctx);
            for layout in layouts.iter() {
                layout.reconcile(grid);
            }
        }

        for layout in layouts.iter_mut() {
            layout.on_end_rendering_session();
        }
        let column_pan = layouts[slot(Dimension::Column)].arrange(grid);
        let row_pan = layouts[slot(Dimension::Row)].arrange(grid);
        grid.place_cells(row_pan, column_pan);

        for dimension in Dimension::ALL {
            let layout = &layouts[slot(dimension)];
            let leaf_count = leaf_counts[slot(dimension)] as f64;
            let max = layout.max_scroll_position(leaf_counts[slot(dimension)]);
            let bar = &mut scrollbars[slot(dimension)];
            bar.set_params(0.0, leaf_count, leaf_count - max);
            bar.set_view_min_silent(layout.scroll().position());
        }

        touch.seed_average_sizes(
            layouts[slot(Dimension::Row)].average_item_size(),
            layouts[slot(Dimension::Column)].average_item_size(),
        );
        register_regions(touch, grid, *viewport);

        for dimension in Dimension::ALL {
            if layouts[slot(dimension)].note_window_end(grid, leaf_counts[slot(dimension)]) {
                tracing::debug!(target: targets::CONTROL, ?dimension, "window reached the last leaf");
                need_more_data.emit(dimension);
            }
        }

        *last_session_iterations = iterations;
        tracing::debug!(
            target: targets::CONTROL,
            rows = grid.leaf_row_count(),
            columns = grid.leaf_column_count(),
            cells = grid.cell_count(),
            iterations,
            "session complete"
        );
    }
}
