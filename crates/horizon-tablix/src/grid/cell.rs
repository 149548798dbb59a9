//! Realized cells.

use crate::events::Dimension;
use crate::geometry::{Rect, Vector};
use crate::grid::ItemId;
use crate::model::{BodyItem, CornerItem, HierarchyMember, HierarchyNavigator};

/// What a cell is bound to. One case per cell kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CellItem {
    /// Corner block cell.
    Corner(CornerItem),
    /// Row header (a member of the row hierarchy).
    RowHeader(HierarchyMember),
    /// Column header (a member of the column hierarchy).
    ColumnHeader(HierarchyMember),
    /// Body intersection. `None` when the navigator has no value.
    Body(Option<BodyItem>),
    /// Footer total. `None` when the navigator has no value.
    Footer(Option<BodyItem>),
}

/// Discriminant of [`CellItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Corner,
    RowHeader,
    ColumnHeader,
    Body,
    Footer,
}

impl CellItem {
    /// The kind of this item.
    pub fn kind(&self) -> CellKind {
        match self {
            CellItem::Corner(_) => CellKind::Corner,
            CellItem::RowHeader(_) => CellKind::RowHeader,
            CellItem::ColumnHeader(_) => CellKind::ColumnHeader,
            CellItem::Body(_) => CellKind::Body,
            CellItem::Footer(_) => CellKind::Footer,
        }
    }

    /// Whether both items denote the same logical cell according to the
    /// navigator's equality predicates.
    pub fn same_as(&self, other: &CellItem, navigator: &dyn HierarchyNavigator) -> bool {
        match (self, other) {
            (CellItem::Corner(a), CellItem::Corner(b)) => navigator.corner_items_equal(a, b),
            (CellItem::RowHeader(a), CellItem::RowHeader(b))
            | (CellItem::ColumnHeader(a), CellItem::ColumnHeader(b)) => {
                navigator.header_items_equal(a, b)
            }
            (CellItem::Body(a), CellItem::Body(b)) | (CellItem::Footer(a), CellItem::Footer(b)) => {
                match (a, b) {
                    (Some(a), Some(b)) => navigator.body_items_equal(a, b),
                    (None, None) => true,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// The header member, for header cells.
    pub fn member(&self) -> Option<&HierarchyMember> {
        match self {
            CellItem::RowHeader(m) | CellItem::ColumnHeader(m) => Some(m),
            _ => None,
        }
    }
}

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlignment {
    /// Headers read left to right; values line up on the right.
    pub fn default_for(kind: CellKind) -> Self {
        match kind {
            CellKind::Body | CellKind::Footer => TextAlignment::End,
            _ => TextAlignment::Start,
        }
    }
}

/// Which ends of a span reach past the realized window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpanClip {
    pub leading: bool,
    pub trailing: bool,
    /// Leaves of the span before the window start.
    pub hidden_leading: usize,
}

impl SpanClip {
    /// Whether the span is entirely inside the realized window.
    pub fn is_complete(&self) -> bool {
        !self.leading && !self.trailing
    }
}

/// One realized screen cell.
#[derive(Debug, Clone)]
pub struct TablixCell {
    pub(crate) item: CellItem,
    pub(crate) row: ItemId,
    pub(crate) column: ItemId,
    pub(crate) row_span: usize,
    pub(crate) col_span: usize,
    pub(crate) clip: SpanClip,
    pub(crate) content_width: f32,
    pub(crate) content_height: f32,
    pub(crate) alignment: TextAlignment,
    pub(crate) scroll_offset: Vector,
    pub(crate) bounds: Rect,
    pub(crate) bound: bool,
    text: String,
}

impl TablixCell {
    /// Create an unplaced, unbound cell for `item`.
    pub fn new(item: CellItem) -> Self {
        let alignment = TextAlignment::default_for(item.kind());
        Self {
            item,
            row: ItemId::default(),
            column: ItemId::default(),
            row_span: 1,
            col_span: 1,
            clip: SpanClip::default(),
            content_width: 0.0,
            content_height: 0.0,
            alignment,
            scroll_offset: Vector::ZERO,
            bounds: Rect::ZERO,
            bound: false,
            text: String::new(),
        }
    }

    /// Reinitialize a pooled cell for a new item.
    pub(crate) fn reset(&mut self, item: CellItem) {
        self.alignment = TextAlignment::default_for(item.kind());
        self.item = item;
        self.row_span = 1;
        self.col_span = 1;
        self.clip = SpanClip::default();
        self.content_width = 0.0;
        self.content_height = 0.0;
        self.scroll_offset = Vector::ZERO;
        self.bounds = Rect::ZERO;
        self.bound = false;
        self.text.clear();
    }

    pub fn item(&self) -> &CellItem {
        &self.item
    }

    pub fn kind(&self) -> CellKind {
        self.item.kind()
    }

    /// Row this cell is anchored in.
    pub fn row(&self) -> ItemId {
        self.row
    }

    /// Column this cell is anchored in.
    pub fn column(&self) -> ItemId {
        self.column
    }

    pub fn row_span(&self) -> usize {
        self.row_span
    }

    /// Anchor item along `dimension`.
    pub fn anchor(&self, dimension: Dimension) -> ItemId {
        match dimension {
            Dimension::Row => self.row,
            Dimension::Column => self.column,
        }
    }

    /// Number of items covered along `dimension`.
    pub fn span(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Row => self.row_span,
            Dimension::Column => self.col_span,
        }
    }

    /// Intrinsic content extent along `dimension`.
    pub fn content_extent(&self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Row => self.content_height,
            Dimension::Column => self.content_width,
        }
    }

    /// Clipping of the span along `dimension`. Only header spans over leaves
    /// can be clipped; depth spans of ragged leaves never are.
    pub(crate) fn clip_along(&self, dimension: Dimension) -> SpanClip {
        match (self.kind(), dimension) {
            (CellKind::RowHeader, Dimension::Row) | (CellKind::ColumnHeader, Dimension::Column) => {
                self.clip
            }
            _ => SpanClip::default(),
        }
    }

    pub fn col_span(&self) -> usize {
        self.col_span
    }

    /// Span clipping along the spanned axis.
    pub fn span_clip(&self) -> SpanClip {
        self.clip
    }

    /// Intrinsic content width including padding, before spanning.
    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    /// Intrinsic content height including padding, before spanning.
    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: TextAlignment) {
        self.alignment = alignment;
    }

    /// Pan applied to the content of a partially scrolled cell.
    pub fn scroll_offset(&self) -> Vector {
        self.scroll_offset
    }

    /// Placement in control coordinates, covering the whole span.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether a bind succeeded and is awaiting its unbind.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear_text(&mut self) {
        self.text.clear();
    }
}
