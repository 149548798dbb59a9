//! The cell binding contract.
//!
//! A [`CellBinder`] turns logical items into visible cell content. Every
//! successful `bind_*` is eventually paired with the matching `unbind_*`,
//! issued when the cell is rebound to another item, released, or cleared.
//! Binder errors are caught by the grid, logged, and leave the cell empty.

use crate::error::BindError;
use crate::grid::TablixCell;
use crate::model::navigator::{BodyItem, CornerItem, HierarchyMember};

/// Supplies content for realized cells.
pub trait CellBinder: Send + Sync {
    fn bind_row_header(&self, member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError>;

    fn bind_column_header(&self, member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError>;

    fn bind_corner_cell(&self, item: &CornerItem, cell: &mut TablixCell) -> Result<(), BindError>;

    fn bind_body_cell(&self, item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError>;

    /// Footer cells bind like body cells unless overridden.
    fn bind_footer_cell(&self, item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
        self.bind_body_cell(item, cell)
    }

    fn unbind_row_header(&self, _member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.clear_text();
        Ok(())
    }

    fn unbind_column_header(&self, _member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.clear_text();
        Ok(())
    }

    fn unbind_corner_cell(&self, _item: &CornerItem, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.clear_text();
        Ok(())
    }

    fn unbind_body_cell(&self, _item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.clear_text();
        Ok(())
    }

    fn unbind_footer_cell(&self, item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
        self.unbind_body_cell(item, cell)
    }

    /// Text used to estimate a header's size. Not used for rendering.
    fn header_label(&self, member: &HierarchyMember) -> String {
        member.label.to_string()
    }

    /// Text used to estimate a body cell's size. Not used for rendering.
    fn cell_content(&self, item: &BodyItem) -> String {
        item.value.to_string()
    }
}

/// Writes labels and values into the cell text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCellBinder;

impl CellBinder for TextCellBinder {
    fn bind_row_header(&self, member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.set_text(member.label.as_ref());
        Ok(())
    }

    fn bind_column_header(&self, member: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.set_text(member.label.as_ref());
        Ok(())
    }

    fn bind_corner_cell(&self, item: &CornerItem, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.set_text(item.text.as_deref().unwrap_or_default());
        Ok(())
    }

    fn bind_body_cell(&self, item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
        cell.set_text(item.value.as_ref());
        Ok(())
    }
}
