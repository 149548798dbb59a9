//! Realization, reuse and reconciliation across whole sessions.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use horizon_tablix::debug::GridDebug;
use horizon_tablix::prelude::*;
use parking_lot::Mutex;

use common::*;

#[test]
fn test_table_realizes_only_visible_rows() {
    init_tracing();
    let mut control = table_control(100);
    control.update_viewport(TEN_ROWS);

    let rows = control.realized_row_count();
    assert!(rows <= 11, "realized {rows} rows");
    assert!(rows >= 10, "realized {rows} rows");
    assert_eq!(control.realized_column_count(), 3);
    assert_eq!(control.layout_state(Dimension::Row), LayoutState::Fixed);
}

#[test]
fn test_scrolling_one_row_reuses_nine_rows() {
    let mut control = table_control(100);
    control.update_viewport(TEN_ROWS);
    let before = leaf_rows(&control);
    assert_eq!(before.len(), 10);
    let bound_before = control.stats().rows_bound;

    assert!(control.scroll_to(Dimension::Row, 1.0));

    let after = leaf_rows(&control);
    assert_eq!(after.len(), 10);
    assert_eq!(&after[..9], &before[1..]);
    assert_eq!(control.stats().rows_bound - bound_before, 1);

    // The recycled row now shows leaf 10.
    let recycled = control.grid().rows().get(after[9]).unwrap();
    assert_eq!(recycled.leaf_index(), Some(10));
    assert_eq!(after[9], before[0]);
}

#[test]
fn test_scroll_back_rotates_the_other_way() {
    let mut control = table_control(100);
    control.update_viewport(TEN_ROWS);
    control.scroll_to(Dimension::Row, 5.0);
    let before = leaf_rows(&control);

    control.scroll_to(Dimension::Row, 4.0);
    let after = leaf_rows(&control);
    assert_eq!(&after[1..], &before[..9]);
    assert_eq!(control.grid().rows().window(), 4..14);
}

#[test]
fn test_long_jump_replaces_window() {
    let mut control = table_control(100);
    control.update_viewport(TEN_ROWS);
    control.scroll_to(Dimension::Row, 60.0);

    let window = control.grid().rows().window();
    assert_eq!(window.start, 60);
    assert_eq!(window.len(), 10);
    let first = control.grid().rows().first_leaf().unwrap();
    let column = control.grid().columns().first_leaf().unwrap();
    assert_eq!(control.cell(first, column).unwrap().text(), "a60");
}

#[test]
fn test_scroll_monotonicity() {
    let mut control = table_control(500);
    control.update_viewport(TEN_ROWS);
    let mut last = 0;
    for position in [0.5, 1.0, 3.7, 3.9, 10.0, 42.2, 250.0, 489.9] {
        control.scroll_to(Dimension::Row, position);
        let offset = control.scroll_state(Dimension::Row).integer_offset;
        assert!(offset >= last, "{position}: {offset} < {last}");
        last = offset;
    }
}

#[test]
fn test_fractional_scroll_offsets_first_row() {
    let mut control = table_control(100);
    control.update_viewport(TEN_ROWS);
    control.scroll_to(Dimension::Row, 2.5);

    let state = control.scroll_state(Dimension::Row);
    assert_eq!(state.integer_offset, 2);
    assert!((state.fractional_offset - 0.5).abs() < 1e-6);

    let rows = control.grid().rows();
    let first = rows.get(rows.first_leaf().unwrap()).unwrap();
    assert!((first.extent() - 10.0).abs() < 1e-4);
    let column = control.grid().columns().first_leaf().unwrap();
    let cell = control.cell(rows.first_leaf().unwrap(), column).unwrap();
    assert!((cell.scroll_offset().dy + 10.0).abs() < 1e-4);
}

#[test]
fn test_refresh_is_idempotent() {
    let (mut control, binder) = counted_table_control(100);
    control.update_viewport(TEN_ROWS);
    control.refresh(false);

    let snapshot = |control: &TablixControl| -> BTreeSet<String> {
        control
            .grid()
            .cells()
            .map(|cell| format!("{:?}|{}|{}x{}", cell.kind(), cell.text(), cell.row_span(), cell.col_span()))
            .collect()
    };
    let stats = control.stats();
    let cells = snapshot(&control);
    let binds = binder.binds();
    let unbinds = binder.unbinds();

    control.refresh(false);

    assert_eq!(control.stats(), stats);
    assert_eq!(snapshot(&control), cells);
    assert_eq!(binder.binds(), binds);
    assert_eq!(binder.unbinds(), unbinds);
}

#[test]
fn test_refresh_with_clear_rebinds_every_cell() {
    let (mut control, binder) = counted_table_control(20);
    control.update_viewport(TEN_ROWS);
    let cells = control.grid().cell_count();
    let binds = binder.binds();

    control.refresh(true);

    assert_eq!(binder.binds() - binds, cells);
    assert_eq!(control.grid().cell_count(), cells);
}

#[test]
fn test_binds_and_unbinds_pair_up() {
    let (mut control, binder) = counted_table_control(300);
    control.update_viewport(TEN_ROWS);
    for position in [1.0, 7.0, 50.0, 49.0, 0.0, 200.0] {
        control.scroll_to(Dimension::Row, position);
    }
    let live = control.grid().cells().filter(|cell| cell.is_bound()).count();
    assert_eq!(binder.binds() - binder.unbinds(), live);
}

#[test]
fn test_sessions_terminate_for_any_size() {
    for rows in [0, 1, 10, 10_000] {
        let mut control = table_control(rows);
        control.update_viewport(TEN_ROWS);
        assert!(control.last_session_iterations() < control.config().max_iterations);
        assert_eq!(control.realized_row_count(), rows.min(10));

        control.scroll_to(Dimension::Row, rows as f64);
        assert!(control.last_session_iterations() < control.config().max_iterations);
        assert!(control.realized_row_count() <= 11);
    }
}

#[test]
fn test_matrix_sessions_terminate_for_any_size() {
    for leaves in [0, 1, 10, 10_000] {
        let rows = if leaves == 0 {
            Hierarchy::default()
        } else {
            Hierarchy::new(vec![
                HierarchyNode::new("all", "All")
                    .with_children((0..leaves).map(|i| HierarchyNode::leaf(format!("r{i}"))).collect()),
            ])
        };
        let columns = Hierarchy::flat((0..leaves).map(|i| format!("c{i}")));
        let mut control = TablixControl::new(
            Box::new(MatrixNavigator::new(rows, columns)),
            Arc::new(TextCellBinder),
            LayoutHost::dashboard_tile(),
        );
        control.update_viewport(Size::new(800.0, 600.0));
        assert!(control.last_session_iterations() < control.config().max_iterations);
        assert!(control.realized_row_count() <= leaves);
        assert!(control.realized_column_count() <= leaves);
    }
}

#[test]
fn test_empty_viewport_realizes_nothing() {
    let mut control = table_control(100);
    control.update_viewport(Size::new(0.0, 0.0));
    control.refresh(false);
    assert_eq!(control.realized_row_count(), 0);
}

/// Measures "Group" as 80px tall and everything else as 20px.
struct GroupMetrics;

impl MetricsProvider for GroupMetrics {
    fn measure_text(&self, text: &str) -> Size {
        let width = text.chars().count() as f32 * 7.0;
        if text == "Group" {
            Size::new(width, 80.0)
        } else {
            Size::new(width, 20.0)
        }
    }
}

#[test]
fn test_spanning_header_excess_goes_to_last_leaf() {
    let rows = Hierarchy::new(vec![HierarchyNode::new("g", "Group").with_children(vec![
        HierarchyNode::leaf("a").with_values(["1"]),
        HierarchyNode::leaf("b").with_values(["2"]),
        HierarchyNode::leaf("c").with_values(["3"]),
    ])]);
    let columns = Hierarchy::flat(["x"]);
    let mut control = TablixControl::new(
        Box::new(MatrixNavigator::new(rows, columns)),
        Arc::new(TextCellBinder),
        LayoutHost::canvas(GroupMetrics),
    )
    .with_config(TablixConfig::default().with_cell_padding(0.0, 0.0));
    control.update_viewport(Size::new(400.0, 1000.0));

    assert_eq!(leaf_row_sizes(&control), vec![20.0, 20.0, 40.0]);
    let total: f32 = leaf_row_sizes(&control).iter().sum();
    assert_eq!(total, 80.0);

    // Sizes are stable across a refresh.
    control.refresh(false);
    assert_eq!(leaf_row_sizes(&control), vec![20.0, 20.0, 40.0]);
}

/// Size of the realized row at `leaf_index`, if it is in the window.
fn row_size_at(control: &TablixControl, leaf_index: usize) -> Option<f32> {
    let rows = control.grid().rows();
    rows.leaf_ids()
        .into_iter()
        .filter_map(|id| rows.get(id))
        .find(|item| item.leaf_index() == Some(leaf_index))
        .map(|item| item.size())
}

#[test]
fn test_last_child_keeps_aligned_size_while_group_scrolls_away() {
    let mut roots = vec![HierarchyNode::new("g", "Group").with_children(vec![
        HierarchyNode::leaf("a").with_values(["1"]),
        HierarchyNode::leaf("b").with_values(["2"]),
        HierarchyNode::leaf("c").with_values(["3"]),
    ])];
    roots.extend((0..50).map(|i| HierarchyNode::leaf(format!("r{i}")).with_values(["0"])));
    let mut control = TablixControl::new(
        Box::new(MatrixNavigator::new(Hierarchy::new(roots), Hierarchy::flat(["x"]))),
        Arc::new(TextCellBinder),
        LayoutHost::canvas(GroupMetrics),
    )
    .with_config(TablixConfig::default().with_cell_padding(0.0, 0.0));
    control.update_viewport(Size::new(400.0, 200.0));
    assert_eq!(leaf_row_sizes(&control)[..3], [20.0, 20.0, 40.0]);

    // One leaf at a time: first "a", then "b" leave the window.
    control.scroll_to(Dimension::Row, 1.0);
    assert_eq!(row_size_at(&control, 1), Some(20.0));
    assert_eq!(row_size_at(&control, 2), Some(40.0));

    control.scroll_to(Dimension::Row, 2.0);
    assert_eq!(row_size_at(&control, 2), Some(40.0));
    assert_eq!(row_size_at(&control, 3), Some(20.0));

    control.scroll_to(Dimension::Row, 3.0);
    assert_eq!(row_size_at(&control, 2), None);
    assert_eq!(row_size_at(&control, 3), Some(20.0));

    control.scroll_to(Dimension::Row, 0.0);
    assert_eq!(leaf_row_sizes(&control)[..3], [20.0, 20.0, 40.0]);
}

#[test]
fn test_footer_is_pinned_below_rows() {
    let rows = Hierarchy::flat((0..5).map(|i| format!("r{i}"))).with_totals(["99"]);
    let columns = Hierarchy::flat(["Total"]);
    let mut control = TablixControl::new(
        Box::new(MatrixNavigator::new(rows, columns)),
        Arc::new(TextCellBinder),
        LayoutHost::canvas(FixedMetrics::default()),
    );
    control.update_viewport(Size::new(400.0, 400.0));

    let grid = control.grid();
    let footer = grid.rows().footer_id().expect("footer row");
    let column = grid.columns().first_leaf().unwrap();
    let cell = grid.cell(footer, column).unwrap();
    assert_eq!(cell.text(), "99");
    assert_eq!(cell.kind(), CellKind::Footer);

    let last = grid.rows().last_leaf().unwrap();
    let last_item = grid.rows().get(last).unwrap();
    let footer_item = grid.rows().get(footer).unwrap();
    assert_eq!(footer_item.position(), last_item.position() + last_item.extent());
}

#[test]
fn test_need_more_data_fires_once_at_the_end() {
    let mut control = table_control(15);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    control.need_more_data.connect(move |dimension: &Dimension| sink.lock().push(*dimension));

    control.update_viewport(TEN_ROWS);
    let rows = |seen: &Mutex<Vec<Dimension>>| seen.lock().iter().filter(|d| **d == Dimension::Row).count();
    assert_eq!(rows(&seen), 0);

    control.scroll_to(Dimension::Row, 5.0);
    assert_eq!(rows(&seen), 1);

    control.refresh(false);
    assert_eq!(rows(&seen), 1);
}

#[test]
fn test_update_model_rebinds_changed_rows() {
    let mut control = table_control(100);
    control.update_viewport(TEN_ROWS);
    control.scroll_to(Dimension::Row, 30.0);

    let records = Hierarchy::new(
        (0..40)
            .map(|i| HierarchyNode::leaf(format!("k{i}")).with_values([format!("new{i}"), String::new(), String::new()]))
            .collect(),
    );
    control.update_model(Some(records), None, false);

    let state = control.scroll_state(Dimension::Row);
    assert_eq!(state.integer_offset, 30);
    let first = control.grid().rows().first_leaf().unwrap();
    let column = control.grid().columns().first_leaf().unwrap();
    assert_eq!(control.cell(first, column).unwrap().text(), "new30");
    assert!(control.realized_row_count() <= 10);
}

#[test]
fn test_identical_model_update_binds_nothing() {
    let (mut control, binder) = counted_table_control(100);
    control.update_viewport(TEN_ROWS);
    control.scroll_to(Dimension::Row, 12.0);
    let window = leaf_rows(&control);
    let binds = binder.binds();
    let unbinds = binder.unbinds();

    let same = Hierarchy::new(
        (0..100)
            .map(|i| HierarchyNode::leaf(i.to_string()).with_values([format!("a{i}"), format!("b{i}"), format!("c{i}")]))
            .collect(),
    );
    control.update_model(Some(same), None, false);

    assert_eq!(binder.binds(), binds);
    assert_eq!(binder.unbinds(), unbinds);
    assert_eq!(leaf_rows(&control), window);
    assert_eq!(control.scroll_state(Dimension::Row).integer_offset, 12);
}

#[test]
fn test_grid_debug_dump() {
    let mut control = table_control(3);
    control.update_viewport(TEN_ROWS);
    let dump = GridDebug::new(control.grid()).dump();
    assert!(dump.starts_with("grid rows=4 columns=3"));
    assert!(dump.contains("\"Alpha\""));
    assert!(dump.contains("\"c2\""));
}
