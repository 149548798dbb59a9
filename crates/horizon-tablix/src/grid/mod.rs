//! The realized grid object graph.
//!
//! A [`Grid`] holds what is currently materialized: two [`Axis`] of pooled
//! rows and columns, and an arena of [`TablixCell`]s keyed by the
//! (row, column) they are anchored at.
//!
//! # Layout of the grid
//!
//! ```text
//!            header columns      leaf columns
//!          +----------------+---------------------+
//! header   |  corner block  |  column headers     |
//! rows     |                |                     |
//!          +----------------+---------------------+
//! leaf     |  row headers   |  body               |
//! rows     |                |                     |
//!          +----------------+---------------------+
//! footer   |                |  footer totals      |
//!          +----------------+---------------------+
//! ```
//!
//! Header rows are the levels of the column hierarchy; header columns are
//! the levels of the row hierarchy.
//!
//! # Reuse
//!
//! Every `get_or_create_*` call first looks at the cell already anchored at
//! the position. When the navigator's equality predicate says it shows the
//! same logical item it is returned untouched; otherwise it is unbound and
//! rebound. Binder failures are logged and leave the cell empty.

mod axis;
mod cell;
mod item;

use std::collections::{HashMap, HashSet};

use slotmap::{SlotMap, new_key_type};

use horizon_tablix_core::logging::targets;

use crate::config::TablixConfig;
use crate::events::Dimension;
use crate::geometry::{Rect, Vector};
use crate::layout::LayoutHost;
use crate::model::{CellBinder, CornerItem, HierarchyMember, HierarchyNavigator};

pub use axis::Axis;
pub use cell::{CellItem, CellKind, SpanClip, TablixCell, TextAlignment};
pub use item::{DimensionItem, FOOTER_KEY, ItemRole};

new_key_type! {
    /// Identifier of a realized row or column.
    pub struct ItemId;
    /// Identifier of a realized cell.
    pub struct CellId;
}

/// Collaborators needed to bind and measure cells.
#[derive(Clone, Copy)]
pub struct BindContext<'a> {
    pub navigator: &'a dyn HierarchyNavigator,
    pub binder: &'a dyn CellBinder,
    pub host: &'a LayoutHost,
    pub config: &'a TablixConfig,
}

/// Running counters of binding work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridStats {
    /// Leaf rows bound to a (new) member.
    pub rows_bound: usize,
    /// Leaf rows returned to the pool.
    pub rows_released: usize,
    /// Leaf columns bound to a (new) member.
    pub columns_bound: usize,
    /// Leaf columns returned to the pool.
    pub columns_released: usize,
    pub cells_bound: usize,
    pub cells_unbound: usize,
    /// Binder calls that returned an error.
    pub bind_failures: usize,
}

impl GridStats {
    /// Leaf items bound along `dimension`.
    pub fn bound(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Row => self.rows_bound,
            Dimension::Column => self.columns_bound,
        }
    }

    /// Leaf items released along `dimension`.
    pub fn released(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Row => self.rows_released,
            Dimension::Column => self.columns_released,
        }
    }

    fn record_bound(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Row => self.rows_bound += 1,
            Dimension::Column => self.columns_bound += 1,
        }
    }

    fn record_released(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Row => self.rows_released += 1,
            Dimension::Column => self.columns_released += 1,
        }
    }
}

/// The realized rows × columns and their cells.
#[derive(Debug)]
pub struct Grid {
    rows: Axis,
    columns: Axis,
    cells: SlotMap<CellId, TablixCell>,
    positions: HashMap<(ItemId, ItemId), CellId>,
    spare_cells: Vec<CellId>,
    stats: GridStats,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        Self {
            rows: Axis::new(Dimension::Row),
            columns: Axis::new(Dimension::Column),
            cells: SlotMap::with_key(),
            positions: HashMap::new(),
            spare_cells: Vec::new(),
            stats: GridStats::default(),
        }
    }

    pub fn rows(&self) -> &Axis {
        &self.rows
    }

    pub fn columns(&self) -> &Axis {
        &self.columns
    }

    pub fn axis(&self, dimension: Dimension) -> &Axis {
        match dimension {
            Dimension::Row => &self.rows,
            Dimension::Column => &self.columns,
        }
    }

    pub(crate) fn axis_mut(&mut self, dimension: Dimension) -> &mut Axis {
        match dimension {
            Dimension::Row => &mut self.rows,
            Dimension::Column => &mut self.columns,
        }
    }

    pub fn stats(&self) -> GridStats {
        self.stats
    }

    /// Every active row, headers first.
    pub fn row_ids(&self) -> Vec<ItemId> {
        self.rows.ordered()
    }

    /// Every active column, headers first.
    pub fn column_ids(&self) -> Vec<ItemId> {
        self.columns.ordered()
    }

    pub fn leaf_row_count(&self) -> usize {
        self.rows.realized_leaves()
    }

    pub fn leaf_column_count(&self) -> usize {
        self.columns.realized_leaves()
    }

    /// The cell anchored at (row, column).
    pub fn cell(&self, row: ItemId, column: ItemId) -> Option<&TablixCell> {
        self.positions
            .get(&(row, column))
            .and_then(|id| self.cells.get(*id))
    }

    /// Identifier of the cell anchored at (row, column).
    pub fn cell_id(&self, row: ItemId, column: ItemId) -> Option<CellId> {
        self.positions.get(&(row, column)).copied()
    }

    /// Every placed cell.
    pub fn cells(&self) -> impl Iterator<Item = &TablixCell> {
        self.positions.values().filter_map(|id| self.cells.get(*id))
    }

    /// Number of placed cells.
    pub fn cell_count(&self) -> usize {
        self.positions.len()
    }

    /// Match header rows, header columns and the footer to the navigator.
    pub(crate) fn ensure_structure(&mut self, ctx: &BindContext<'_>) {
        let header_rows = ctx.navigator.depth(Dimension::Column);
        let header_columns = ctx.navigator.depth(Dimension::Row);
        for id in self.rows.set_header_count(header_rows) {
            self.release_cells_in(ctx, Dimension::Row, id);
        }
        for id in self.columns.set_header_count(header_columns) {
            self.release_cells_in(ctx, Dimension::Column, id);
        }
        if let Some(id) = self.rows.set_footer(ctx.navigator.has_footer()) {
            self.release_cells_in(ctx, Dimension::Row, id);
        }
    }

    /// Row for leaf `index`, realizing it at an edge of the window if needed.
    pub fn get_or_create_row(&mut self, ctx: &BindContext<'_>, index: usize) -> Option<ItemId> {
        self.get_or_create_leaf(ctx, Dimension::Row, index)
    }

    /// Column for leaf `index`, realizing it at an edge of the window if
    /// needed.
    pub fn get_or_create_column(&mut self, ctx: &BindContext<'_>, index: usize) -> Option<ItemId> {
        self.get_or_create_leaf(ctx, Dimension::Column, index)
    }

    pub(crate) fn get_or_create_leaf(
        &mut self,
        ctx: &BindContext<'_>,
        dimension: Dimension,
        index: usize,
    ) -> Option<ItemId> {
        let window = self.axis(dimension).window();
        if window.contains(&index) {
            return self.axis(dimension).leaf_at_offset(index - window.start);
        }
        let member = ctx.navigator.leaf_at(dimension, index)?;
        let axis = self.axis_mut(dimension);
        let id = if window.is_empty() {
            axis.reset_window(index);
            axis.push_leaf_back(member)
        } else if index == window.end {
            axis.push_leaf_back(member)
        } else if index + 1 == window.start {
            axis.push_leaf_front(member)
        } else {
            tracing::warn!(
                target: targets::GRID,
                ?dimension,
                index,
                ?window,
                "ignoring leaf request outside the realized window"
            );
            return None;
        };
        self.stats.record_bound(dimension);
        Some(id)
    }

    /// Release the last realized leaf along `dimension`.
    pub(crate) fn release_last_leaf(&mut self, ctx: &BindContext<'_>, dimension: Dimension) -> bool {
        match self.axis_mut(dimension).pop_leaf_back() {
            Some(id) => {
                self.release_detached(ctx, dimension, id);
                true
            }
            None => false,
        }
    }

    /// Release the first realized leaf along `dimension`.
    pub(crate) fn release_first_leaf(&mut self, ctx: &BindContext<'_>, dimension: Dimension) -> bool {
        match self.axis_mut(dimension).pop_leaf_front() {
            Some(id) => {
                self.release_detached(ctx, dimension, id);
                true
            }
            None => false,
        }
    }

    /// Release a row leaf and its cells.
    pub fn release_row(&mut self, ctx: &BindContext<'_>, from_front: bool) -> bool {
        if from_front {
            self.release_first_leaf(ctx, Dimension::Row)
        } else {
            self.release_last_leaf(ctx, Dimension::Row)
        }
    }

    /// Release a column leaf and its cells.
    pub fn release_column(&mut self, ctx: &BindContext<'_>, from_front: bool) -> bool {
        if from_front {
            self.release_first_leaf(ctx, Dimension::Column)
        } else {
            self.release_last_leaf(ctx, Dimension::Column)
        }
    }

    /// Release every realized leaf and restart the window at `start`.
    pub(crate) fn release_leaves(&mut self, ctx: &BindContext<'_>, dimension: Dimension, start: usize) {
        while self.release_last_leaf(ctx, dimension) {}
        self.axis_mut(dimension).reset_window(start);
    }

    fn release_detached(&mut self, ctx: &BindContext<'_>, dimension: Dimension, id: ItemId) {
        self.release_cells_in(ctx, dimension, id);
        self.axis_mut(dimension).release(id);
        self.stats.record_released(dimension);
    }

    /// Move `delta` leaves from one edge of the window to the other.
    ///
    /// Positive deltas move leading leaves to the trailing edge (scrolling
    /// forward). Leaves that stay are untouched; moved leaves are rebound
    /// to their new members and their cells rebind on the next
    /// materialization. Returns the number of leaves moved.
    pub(crate) fn rotate(&mut self, ctx: &BindContext<'_>, dimension: Dimension, delta: isize) -> usize {
        let mut moved = 0;
        for _ in 0..delta.unsigned_abs() {
            let window = self.axis(dimension).window();
            if delta > 0 {
                let Some(id) = self.axis_mut(dimension).pop_leaf_front() else {
                    break;
                };
                match ctx.navigator.leaf_at(dimension, window.end) {
                    Some(member) => self.axis_mut(dimension).attach_back(id, member),
                    None => {
                        self.release_detached(ctx, dimension, id);
                        continue;
                    }
                }
            } else {
                if window.start == 0 {
                    break;
                }
                let Some(member) = ctx.navigator.leaf_at(dimension, window.start - 1) else {
                    break;
                };
                let Some(id) = self.axis_mut(dimension).pop_leaf_back() else {
                    break;
                };
                self.axis_mut(dimension).attach_front(id, member);
            }
            self.stats.record_bound(dimension);
            moved += 1;
        }
        moved
    }

    /// Rotate rows; see [`rotate`](Self::rotate).
    pub fn rotate_rows(&mut self, ctx: &BindContext<'_>, delta: isize) -> usize {
        self.rotate(ctx, Dimension::Row, delta)
    }

    /// Rotate columns; see [`rotate`](Self::rotate).
    pub fn rotate_columns(&mut self, ctx: &BindContext<'_>, delta: isize) -> usize {
        self.rotate(ctx, Dimension::Column, delta)
    }

    /// Re-check realized leaves against the navigator.
    ///
    /// Leaves whose member changed are rebound; leaves past the new leaf
    /// count are released.
    pub(crate) fn revalidate(&mut self, ctx: &BindContext<'_>, dimension: Dimension) {
        let window = self.axis(dimension).window();
        let ids = self.axis(dimension).leaf_ids();
        for (offset, id) in ids.iter().enumerate() {
            let Some(member) = ctx.navigator.leaf_at(dimension, window.start + offset) else {
                for _ in offset..ids.len() {
                    self.release_last_leaf(ctx, dimension);
                }
                break;
            };
            let axis = self.axis_mut(dimension);
            let same = axis
                .get(*id)
                .and_then(DimensionItem::member)
                .is_some_and(|current| ctx.navigator.header_items_equal(current, &member));
            if same {
                if let Some(item) = axis.get_mut(*id)
                    && let ItemRole::Leaf { member: current, .. } = &mut item.role
                {
                    *current = member;
                }
            } else {
                axis.rebind_leaf(*id, member);
                self.stats.record_bound(dimension);
            }
        }
    }

    /// Header cell for `member` at (row, column).
    pub fn get_or_create_header_cell(
        &mut self,
        ctx: &BindContext<'_>,
        row: ItemId,
        column: ItemId,
        member: HierarchyMember,
    ) -> CellId {
        let item = match member.dimension {
            Dimension::Row => CellItem::RowHeader(member),
            Dimension::Column => CellItem::ColumnHeader(member),
        };
        self.get_or_create_cell(ctx, row, column, item)
    }

    /// Body cell at the intersection of a leaf row and a leaf column.
    ///
    /// A missing intersection yields an empty cell.
    pub fn get_or_create_body_cell(&mut self, ctx: &BindContext<'_>, row: ItemId, column: ItemId) -> CellId {
        let body = match (self.leaf_member(Dimension::Row, row), self.leaf_member(Dimension::Column, column)) {
            (Some(r), Some(c)) => ctx.navigator.intersection(r, c),
            _ => None,
        };
        self.get_or_create_cell(ctx, row, column, CellItem::Body(body))
    }

    /// Corner cell at the given hierarchy levels.
    pub fn get_or_create_corner_cell(
        &mut self,
        ctx: &BindContext<'_>,
        row_level: usize,
        column_level: usize,
    ) -> Option<CellId> {
        let row = *self.rows.header_ids().get(column_level)?;
        let column = *self.columns.header_ids().get(row_level)?;
        let item = CellItem::Corner(CornerItem {
            row_level,
            column_level,
            text: ctx.navigator.corner(row_level, column_level),
        });
        Some(self.get_or_create_cell(ctx, row, column, item))
    }

    /// Footer cell below a leaf column.
    pub fn get_or_create_footer_cell(&mut self, ctx: &BindContext<'_>, column: ItemId) -> Option<CellId> {
        let row = self.rows.footer_id()?;
        let footer = self
            .leaf_member(Dimension::Column, column)
            .and_then(|member| ctx.navigator.footer(member));
        Some(self.get_or_create_cell(ctx, row, column, CellItem::Footer(footer)))
    }

    fn leaf_member(&self, dimension: Dimension, id: ItemId) -> Option<&HierarchyMember> {
        self.axis(dimension).get(id).and_then(DimensionItem::member)
    }

    fn get_or_create_cell(&mut self, ctx: &BindContext<'_>, row: ItemId, column: ItemId, item: CellItem) -> CellId {
        if let Some(&id) = self.positions.get(&(row, column))
            && let Some(cell) = self.cells.get_mut(id)
        {
            if cell.item.same_as(&item, ctx.navigator) {
                cell.item = item;
                return id;
            }
            unbind_cell(ctx, &mut self.stats, cell);
            cell.reset(item);
            cell.row = row;
            cell.column = column;
            bind_cell(ctx, &mut self.stats, cell);
            return id;
        }

        let mut cell = TablixCell::new(item);
        cell.row = row;
        cell.column = column;
        bind_cell(ctx, &mut self.stats, &mut cell);
        let id = match self.spare_cells.pop() {
            Some(id) if self.cells.contains_key(id) => {
                self.cells[id] = cell;
                id
            }
            _ => self.cells.insert(cell),
        };
        self.positions.insert((row, column), id);
        id
    }

    fn set_span(&mut self, id: CellId, row_span: usize, col_span: usize, clip: SpanClip) {
        if let Some(cell) = self.cells.get_mut(id) {
            cell.row_span = row_span.max(1);
            cell.col_span = col_span.max(1);
            cell.clip = clip;
        }
    }

    /// Create, reuse or release cells so the grid shows exactly the cells
    /// implied by the realized rows and columns.
    pub fn materialize(&mut self, ctx: &BindContext<'_>) {
        let mut live: HashSet<(ItemId, ItemId)> = HashSet::new();
        let header_rows = self.rows.header_ids().to_vec();
        let header_columns = self.columns.header_ids().to_vec();

        for column_level in 0..header_rows.len() {
            for row_level in 0..header_columns.len() {
                if let Some(id) = self.get_or_create_corner_cell(ctx, row_level, column_level) {
                    live.insert((header_rows[column_level], header_columns[row_level]));
                    self.set_span(id, 1, 1, SpanClip::default());
                }
            }
        }

        let (column_ids, column_members) = leaf_pairs(&self.columns);
        let column_start = self.columns.window().start;
        for (level, &row) in header_rows.iter().enumerate() {
            let spans = header_spans(ctx.navigator, &column_members, column_start, level, header_rows.len());
            for span in spans {
                let column = column_ids[span.offset];
                let id = self.get_or_create_header_cell(ctx, row, column, span.member);
                self.set_span(id, span.depth_span, span.span, span.clip);
                live.insert((row, column));
            }
        }

        let (row_ids, row_members) = leaf_pairs(&self.rows);
        let row_start = self.rows.window().start;
        for (level, &column) in header_columns.iter().enumerate() {
            let spans = header_spans(ctx.navigator, &row_members, row_start, level, header_columns.len());
            for span in spans {
                let row = row_ids[span.offset];
                let id = self.get_or_create_header_cell(ctx, row, column, span.member);
                self.set_span(id, span.span, span.depth_span, span.clip);
                live.insert((row, column));
            }
        }

        for &row in &row_ids {
            for &column in &column_ids {
                let id = self.get_or_create_body_cell(ctx, row, column);
                self.set_span(id, 1, 1, SpanClip::default());
                live.insert((row, column));
            }
        }

        if let Some(footer) = self.rows.footer_id() {
            for &column in &column_ids {
                if let Some(id) = self.get_or_create_footer_cell(ctx, column) {
                    self.set_span(id, 1, 1, SpanClip::default());
                    live.insert((footer, column));
                }
            }
        }

        let stale: Vec<_> = self
            .positions
            .keys()
            .filter(|key| !live.contains(key))
            .copied()
            .collect();
        for key in stale {
            self.release_cell_at(ctx, key);
        }
    }

    /// Unbind every cell and return it to the pool. Items keep their places
    /// but are measured again.
    pub fn clear(&mut self, ctx: &BindContext<'_>) {
        let keys: Vec<_> = self.positions.keys().copied().collect();
        for key in keys {
            self.release_cell_at(ctx, key);
        }
        for dimension in Dimension::ALL {
            let axis = self.axis_mut(dimension);
            for id in axis.ordered() {
                if let Some(item) = axis.get_mut(id) {
                    item.measured = false;
                }
            }
            axis.forget_leaf_sizes();
        }
    }

    fn release_cells_in(&mut self, ctx: &BindContext<'_>, dimension: Dimension, id: ItemId) {
        let keys: Vec<_> = self
            .positions
            .keys()
            .filter(|(row, column)| match dimension {
                Dimension::Row => *row == id,
                Dimension::Column => *column == id,
            })
            .copied()
            .collect();
        for key in keys {
            self.release_cell_at(ctx, key);
        }
    }

    fn release_cell_at(&mut self, ctx: &BindContext<'_>, key: (ItemId, ItemId)) {
        let Some(id) = self.positions.remove(&key) else {
            return;
        };
        if let Some(cell) = self.cells.get_mut(id) {
            unbind_cell(ctx, &mut self.stats, cell);
            cell.reset(CellItem::Body(None));
            self.spare_cells.push(id);
        }
    }

    /// Compute cell bounds from item positions.
    ///
    /// `row_pan` and `column_pan` are the pixels of the first leaf scrolled
    /// out of view; they become the content offset of cells anchored there.
    pub(crate) fn place_cells(&mut self, row_pan: f32, column_pan: f32) {
        let rows = Placement::new(&self.rows);
        let columns = Placement::new(&self.columns);
        let first_row = self.rows.first_leaf();
        let first_column = self.columns.first_leaf();
        for id in self.positions.values() {
            let Some(cell) = self.cells.get_mut(*id) else {
                continue;
            };
            let (y, height) = rows.span(&self.rows, cell.row, cell.row_span);
            let (x, width) = columns.span(&self.columns, cell.column, cell.col_span);
            cell.bounds = Rect::new(x, y, width, height);
            cell.scroll_offset = Vector::new(
                if Some(cell.column) == first_column { -column_pan } else { 0.0 },
                if Some(cell.row) == first_row { -row_pan } else { 0.0 },
            );
        }
    }
}

fn bind_cell(ctx: &BindContext<'_>, stats: &mut GridStats, cell: &mut TablixCell) {
    let item = cell.item.clone();
    let (result, estimate) = match &item {
        CellItem::Corner(corner) => (
            ctx.binder.bind_corner_cell(corner, cell),
            corner.text.as_deref().unwrap_or_default().to_string(),
        ),
        CellItem::RowHeader(member) => (
            ctx.binder.bind_row_header(member, cell),
            ctx.binder.header_label(member),
        ),
        CellItem::ColumnHeader(member) => (
            ctx.binder.bind_column_header(member, cell),
            ctx.binder.header_label(member),
        ),
        CellItem::Body(Some(body)) => (ctx.binder.bind_body_cell(body, cell), ctx.binder.cell_content(body)),
        CellItem::Footer(Some(body)) => (ctx.binder.bind_footer_cell(body, cell), ctx.binder.cell_content(body)),
        CellItem::Body(None) | CellItem::Footer(None) => (Ok(()), String::new()),
    };

    let has_content = !matches!(item, CellItem::Body(None) | CellItem::Footer(None));
    match result {
        Ok(()) if has_content => {
            cell.bound = true;
            stats.cells_bound += 1;
        }
        Ok(()) => {}
        Err(err) => {
            tracing::warn!(target: targets::GRID, kind = ?item.kind(), error = %err, "binder failed; cell left empty");
            cell.clear_text();
            cell.bound = false;
            stats.bind_failures += 1;
        }
    }

    let size = ctx.host.estimate_cell_size(&estimate, ctx.config);
    cell.content_width = size.width;
    cell.content_height = size.height;
}

fn unbind_cell(ctx: &BindContext<'_>, stats: &mut GridStats, cell: &mut TablixCell) {
    if !cell.bound {
        return;
    }
    let item = cell.item.clone();
    let result = match &item {
        CellItem::Corner(corner) => ctx.binder.unbind_corner_cell(corner, cell),
        CellItem::RowHeader(member) => ctx.binder.unbind_row_header(member, cell),
        CellItem::ColumnHeader(member) => ctx.binder.unbind_column_header(member, cell),
        CellItem::Body(Some(body)) => ctx.binder.unbind_body_cell(body, cell),
        CellItem::Footer(Some(body)) => ctx.binder.unbind_footer_cell(body, cell),
        CellItem::Body(None) | CellItem::Footer(None) => Ok(()),
    };
    if let Err(err) = result {
        tracing::warn!(target: targets::GRID, kind = ?item.kind(), error = %err, "unbind failed");
        stats.bind_failures += 1;
    }
    cell.bound = false;
    stats.cells_unbound += 1;
}

fn leaf_pairs(axis: &Axis) -> (Vec<ItemId>, Vec<HierarchyMember>) {
    axis.leaf_ids()
        .into_iter()
        .filter_map(|id| axis.get(id).and_then(DimensionItem::member).map(|m| (id, m.clone())))
        .unzip()
}

/// One header cell along a run of realized leaves.
#[derive(Debug, Clone, PartialEq)]
struct HeaderSpan {
    /// Offset of the anchor leaf within the realized window.
    offset: usize,
    member: HierarchyMember,
    /// Realized leaves covered.
    span: usize,
    /// Header levels covered; more than one for a leaf shallower than the
    /// axis depth.
    depth_span: usize,
    clip: SpanClip,
}

/// Header cells at `level` over the realized `leaves`, clamped to the
/// window.
fn header_spans(
    navigator: &dyn HierarchyNavigator,
    leaves: &[HierarchyMember],
    window_start: usize,
    level: usize,
    depth: usize,
) -> Vec<HeaderSpan> {
    let window_end = window_start + leaves.len();
    let mut spans = Vec::new();
    let mut offset = 0;
    while offset < leaves.len() {
        let Some(member) = navigator.ancestor_at_level(&leaves[offset], level) else {
            offset += 1;
            continue;
        };
        let range = navigator.leaf_range(&member);
        let span = range
            .end
            .min(window_end)
            .saturating_sub(window_start + offset)
            .max(1);
        let depth_span = if navigator.is_leaf(&member) {
            depth.saturating_sub(level).max(1)
        } else {
            1
        };
        spans.push(HeaderSpan {
            offset,
            member,
            span,
            depth_span,
            clip: SpanClip {
                leading: range.start < window_start + offset,
                trailing: range.end > window_end,
                hidden_leading: (window_start + offset).saturating_sub(range.start),
            },
        });
        offset += span;
    }
    spans
}

/// Index of every active item of an axis, for span geometry.
struct Placement {
    order: Vec<ItemId>,
    index: HashMap<ItemId, usize>,
}

impl Placement {
    fn new(axis: &Axis) -> Self {
        let order = axis.ordered();
        let index = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        Self { order, index }
    }

    /// Start and visible extent of `span` items beginning at `anchor`.
    fn span(&self, axis: &Axis, anchor: ItemId, span: usize) -> (f32, f32) {
        let Some(&start) = self.index.get(&anchor) else {
            return (0.0, 0.0);
        };
        let end = (start + span.max(1)).min(self.order.len());
        let items = self.order[start..end].iter().filter_map(|id| axis.get(*id));
        let mut position = None;
        let mut extent = 0.0;
        for item in items {
            position.get_or_insert(item.position);
            extent += item.extent;
        }
        (position.unwrap_or_default(), extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindError;
    use crate::metrics::FixedMetrics;
    use crate::model::{BodyItem, Hierarchy, HierarchyNode, MatrixNavigator, TableNavigator, TextCellBinder};
    use std::sync::Arc;

    struct Fixture {
        navigator: Box<dyn HierarchyNavigator>,
        binder: Box<dyn CellBinder>,
        host: LayoutHost,
        config: TablixConfig,
    }

    impl Fixture {
        fn new(navigator: impl HierarchyNavigator + 'static) -> Self {
            Self {
                navigator: Box::new(navigator),
                binder: Box::new(TextCellBinder),
                host: LayoutHost::canvas(FixedMetrics::default()),
                config: TablixConfig::default(),
            }
        }

        fn ctx(&self) -> BindContext<'_> {
            BindContext {
                navigator: self.navigator.as_ref(),
                binder: self.binder.as_ref(),
                host: &self.host,
                config: &self.config,
            }
        }
    }

    fn table(rows: usize) -> TableNavigator {
        TableNavigator::from_records(
            ["a", "b", "c"],
            (0..rows).map(|r| vec![format!("{r}a"), format!("{r}b"), format!("{r}c")]),
        )
    }

    fn realize(grid: &mut Grid, ctx: &BindContext<'_>, rows: std::ops::Range<usize>, columns: usize) {
        grid.ensure_structure(ctx);
        for c in 0..columns {
            grid.get_or_create_column(ctx, c);
        }
        for r in rows {
            grid.get_or_create_row(ctx, r);
        }
        grid.materialize(ctx);
    }

    #[test]
    fn test_materialize_table() {
        let fixture = Fixture::new(table(10));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..4, 3);

        assert_eq!(grid.rows().header_ids().len(), 1);
        assert!(grid.columns().header_ids().is_empty());
        // 3 column headers + 4 × 3 body cells.
        assert_eq!(grid.cell_count(), 15);

        let row = grid.rows().leaf_at_offset(2).unwrap();
        let column = grid.columns().leaf_at_offset(1).unwrap();
        assert_eq!(grid.cell(row, column).unwrap().text(), "2b");
    }

    #[test]
    fn test_rematerialize_reuses_cells() {
        let fixture = Fixture::new(table(10));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..4, 3);
        let before = grid.stats();
        grid.materialize(&ctx);
        assert_eq!(grid.stats(), before);
    }

    #[test]
    fn test_rotate_keeps_staying_rows() {
        let fixture = Fixture::new(table(10));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..4, 3);
        let before = grid.rows().leaf_ids();
        let bound = grid.stats().rows_bound;

        assert_eq!(grid.rotate_rows(&ctx, 1), 1);
        grid.materialize(&ctx);

        let after = grid.rows().leaf_ids();
        assert_eq!(&after[..3], &before[1..]);
        assert_eq!(after[3], before[0]);
        assert_eq!(grid.stats().rows_bound - bound, 1);
        assert_eq!(grid.rows().window(), 1..5);
        assert_eq!(grid.cell(after[3], grid.columns().leaf_at_offset(0).unwrap()).unwrap().text(), "4a");
    }

    #[test]
    fn test_noncontiguous_leaf_is_ignored() {
        let fixture = Fixture::new(table(10));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..2, 1);
        assert!(grid.get_or_create_row(&ctx, 7).is_none());
        assert!(grid.get_or_create_row(&ctx, 99).is_none());
        assert_eq!(grid.leaf_row_count(), 2);
    }

    #[test]
    fn test_release_row_unbinds_cells() {
        let fixture = Fixture::new(table(10));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..2, 3);
        let unbound = grid.stats().cells_unbound;
        assert!(grid.release_row(&ctx, false));
        assert_eq!(grid.stats().cells_unbound - unbound, 3);
        assert_eq!(grid.rows().spare_count(), 1);
        assert_eq!(grid.stats().rows_released, 1);
    }

    #[test]
    fn test_clear_rebinds_everything() {
        let fixture = Fixture::new(table(3));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..3, 3);
        let bound = grid.stats().cells_bound;
        grid.clear(&ctx);
        assert_eq!(grid.cell_count(), 0);
        grid.materialize(&ctx);
        assert_eq!(grid.stats().cells_bound - bound, 12);
    }

    #[test]
    fn test_missing_intersection_is_empty_cell() {
        let fixture = Fixture::new(TableNavigator::from_records(["a", "b"], vec![vec!["1"]]));
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..1, 2);
        let row = grid.rows().leaf_at_offset(0).unwrap();
        let column = grid.columns().leaf_at_offset(1).unwrap();
        let cell = grid.cell(row, column).unwrap();
        assert_eq!(cell.item(), &CellItem::Body(None));
        assert!(!cell.is_bound());
    }

    struct FailingBinder;

    impl CellBinder for FailingBinder {
        fn bind_row_header(&self, _: &HierarchyMember, _: &mut TablixCell) -> Result<(), BindError> {
            Ok(())
        }
        fn bind_column_header(&self, _: &HierarchyMember, cell: &mut TablixCell) -> Result<(), BindError> {
            cell.set_text("partial");
            Err(BindError::new("header formatter unavailable"))
        }
        fn bind_corner_cell(&self, _: &CornerItem, _: &mut TablixCell) -> Result<(), BindError> {
            Ok(())
        }
        fn bind_body_cell(&self, item: &BodyItem, cell: &mut TablixCell) -> Result<(), BindError> {
            cell.set_text(item.value.as_ref());
            Ok(())
        }
    }

    #[test]
    fn test_binder_failure_leaves_cell_empty() {
        let mut fixture = Fixture::new(table(2));
        fixture.binder = Box::new(FailingBinder);
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..2, 3);

        let header = grid.rows().header_ids()[0];
        let column = grid.columns().leaf_at_offset(0).unwrap();
        let cell = grid.cell(header, column).unwrap();
        assert_eq!(cell.text(), "");
        assert!(!cell.is_bound());
        assert_eq!(grid.stats().bind_failures, 3);
        assert_eq!(grid.cell(grid.rows().leaf_at_offset(0).unwrap(), column).unwrap().text(), "0a");
    }

    fn regions() -> MatrixNavigator {
        let rows = Hierarchy::new(vec![
            HierarchyNode::new("East", "East").with_children(vec![
                HierarchyNode::leaf("NY").with_values(["1"]),
                HierarchyNode::leaf("MA").with_values(["2"]),
                HierarchyNode::leaf("CT").with_values(["3"]),
            ]),
            HierarchyNode::leaf("Other").with_values(["4"]),
        ])
        .with_level_names(["Region", "State"]);
        MatrixNavigator::new(rows, Hierarchy::flat(["Sales"]))
    }

    #[test]
    fn test_row_header_spans() {
        let fixture = Fixture::new(regions());
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..4, 1);

        let level0 = grid.columns().header_ids()[0];
        let first = grid.rows().leaf_at_offset(0).unwrap();
        let east = grid.cell(first, level0).unwrap();
        assert_eq!(east.text(), "East");
        assert_eq!(east.row_span(), 3);
        assert!(east.span_clip().is_complete());

        // A ragged leaf spans both header columns.
        let other_row = grid.rows().leaf_at_offset(3).unwrap();
        let other = grid.cell(other_row, level0).unwrap();
        assert_eq!(other.col_span(), 2);
        let level1 = grid.columns().header_ids()[1];
        assert!(grid.cell(other_row, level1).is_none());
    }

    #[test]
    fn test_clipped_span_is_clamped_to_window() {
        let fixture = Fixture::new(regions());
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 1..3, 1);

        let level0 = grid.columns().header_ids()[0];
        let first = grid.rows().leaf_at_offset(0).unwrap();
        let east = grid.cell(first, level0).unwrap();
        assert_eq!(east.row_span(), 2);
        assert!(east.span_clip().leading);
        assert!(!east.span_clip().trailing);
        assert_eq!(east.span_clip().hidden_leading, 1);

        grid.release_row(&ctx, false);
        grid.materialize(&ctx);
        let east = grid.cell(first, level0).unwrap();
        assert_eq!(east.row_span(), 1);
        assert!(east.span_clip().trailing);
    }

    #[test]
    fn test_corner_cells() {
        let fixture = Fixture::new(regions());
        let ctx = fixture.ctx();
        let mut grid = Grid::new();
        realize(&mut grid, &ctx, 0..1, 1);
        let header_row = grid.rows().header_ids()[0];
        let texts: Vec<_> = grid
            .columns()
            .header_ids()
            .iter()
            .map(|c| grid.cell(header_row, *c).unwrap().text().to_string())
            .collect();
        assert_eq!(texts, vec!["Region", "State"]);
    }

    #[test]
    fn test_header_spans_skip_missing_levels() {
        let nav = regions();
        let leaves: Vec<_> = (0..4).filter_map(|i| nav.leaf_at(Dimension::Row, i)).collect();
        let spans = header_spans(&nav, &leaves, 0, 1, 2);
        let labels: Vec<_> = spans.iter().map(|s| Arc::clone(&s.member.label)).collect();
        assert_eq!(labels.len(), 3);
        assert!(spans.iter().all(|s| s.span == 1 && s.depth_span == 1));
    }
}
