//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use horizon_tablix::error::BindError;
use horizon_tablix::prelude::*;

/// Viewport fitting one header row and ten 20px rows.
pub const TEN_ROWS: Size = Size::new(1000.0, 220.0);

/// Writes text like [`TextCellBinder`] and counts binds and unbinds.
#[derive(Debug, Default)]
pub struct CountingBinder {
    pub binds: AtomicUsize,
    pub unbinds: AtomicUsize,
}

impl CountingBinder {
    pub fn binds(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }

    pub fn unbinds(&self) -> usize {
        self.unbinds.load(Ordering::SeqCst)
    }

    fn bound(&self, cell: &mut TablixCell, text: &str) -> Result<(), BindError> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        cell.set_text(text);
        Ok(())
    }

    fn unbound(&self, cell: &mut TablixCell) -> Result<(), BindError> {
        self.unbinds.fetch_add(1, Ordering::SeqCst);
        cell.clear_text();
        Ok(())
    }
}

impl CellBinder for CountingBinder {
    fn bind_row_header(&self, member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        self.bound(cell, &member.label)
    }

    fn bind_column_header(&self, member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        self.bound(cell, &member.label)
    }

    fn bind_corner_cell(&self, item: &CornerItem, cell: &mut TablixCell) -> Result<(), BindError> {
        self.bound(cell, item.text.as_deref().unwrap_or_default())
    }

    fn bind_body_cell(&self, item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
        self.bound(cell, &item.value)
    }

    fn unbind_row_header(&self, _member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        self.unbound(cell)
    }

    fn unbind_column_header(&self, _member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        self.unbound(cell)
    }

    fn unbind_corner_cell(&self, _item: &CornerItem, cell: &mut TablixCell) -> Result<(), BindError> {
        self.unbound(cell)
    }

    fn unbind_body_cell(&self, _item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
        self.unbound(cell)
    }
}

/// A table of `rows` records over three columns.
pub fn table_navigator(rows: usize) -> TableNavigator {
    TableNavigator::from_records(
        ["Alpha", "Beta", "Gamma"],
        (0..rows).map(|i| vec![format!("a{i}"), format!("b{i}"), format!("c{i}")]),
    )
}

/// A canvas-hosted table control; nothing is realized yet.
pub fn table_control(rows: usize) -> TablixControl {
    TablixControl::new(
        Box::new(table_navigator(rows)),
        Arc::new(TextCellBinder),
        LayoutHost::canvas(FixedMetrics::default()),
    )
}

/// A table control with a shared counting binder.
pub fn counted_table_control(rows: usize) -> (TablixControl, Arc<CountingBinder>) {
    let binder = Arc::new(CountingBinder::default());
    let control = TablixControl::new(
        Box::new(table_navigator(rows)),
        binder.clone(),
        LayoutHost::canvas(FixedMetrics::default()),
    );
    (control, binder)
}

/// Realized leaf row ids, in order.
pub fn leaf_rows(control: &TablixControl) -> Vec<ItemId> {
    control.grid().rows().leaf_ids()
}

/// Sizes of the realized leaf rows.
pub fn leaf_row_sizes(control: &TablixControl) -> Vec<f32> {
    let rows = control.grid().rows();
    rows.leaf_ids()
        .into_iter()
        .filter_map(|id| rows.get(id).map(|item| item.size()))
        .collect()
}

/// Initialize a test subscriber so warnings show up in failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
