//! Pointer input and resizing.

use horizon_tablix_core::logging::targets;

use super::{TablixControl, slot};
use crate::events::{Dimension, PointerEvent, PointerPhase, ResizeCommit};
use crate::geometry::Point;
use crate::grid::{Axis, ItemId};

/// Coordinate of `point` along `dimension`.
fn along(dimension: Dimension, point: Point) -> f32 {
    match dimension {
        Dimension::Row => point.y,
        Dimension::Column => point.x,
    }
}

fn find_by_key(axis: &Axis, key: &str) -> Option<ItemId> {
    axis.ordered()
        .into_iter()
        .find(|id| axis.get(*id).is_some_and(|item| &*item.key() == key))
}

impl TablixControl {
    /// Trailing edges of the items along `dimension`, as (index, edge).
    fn resize_edges(&self, dimension: Dimension) -> Vec<(usize, f32)> {
        let axis = self.grid.axis(dimension);
        axis.ordered()
            .into_iter()
            .enumerate()
            .filter_map(|(index, id)| axis.get(id).map(|item| (index, item.position() + item.extent())))
            .collect()
    }

    /// The resize edge under `position`, if any.
    ///
    /// Column edges are live within the header rows, row edges within the
    /// header columns.
    pub fn resize_edge_at(&self, position: Point) -> Option<(Dimension, usize)> {
        let header_height = self.grid.rows().header_extent();
        let header_width = self.grid.columns().header_extent();
        if position.y < header_height
            && let Some(index) = self.resizer.hit_test(position.x, &self.resize_edges(Dimension::Column))
        {
            return Some((Dimension::Column, index));
        }
        if position.x < header_width
            && let Some(index) = self.resizer.hit_test(position.y, &self.resize_edges(Dimension::Row))
        {
            return Some((Dimension::Row, index));
        }
        None
    }

    /// Route a pointer event. Returns whether the event changed anything.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> bool {
        match event.phase {
            PointerPhase::Down => {
                if let Some((dimension, index)) = self.resize_edge_at(event.position) {
                    if event.click_count >= 2 {
                        return self.reset_size(dimension, index);
                    }
                    return self.begin_resize(dimension, index, along(dimension, event.position));
                }
                self.touch.pointer_down(event.position).is_some()
            }
            PointerPhase::Move => {
                if let Some(dimension) = self.resizer.state().map(|state| state.dimension) {
                    return self.update_resize(along(dimension, event.position)).is_some();
                }
                let Some(output) = self.touch.pointer_move(event.delta) else {
                    return false;
                };
                // Content follows the pointer.
                let columns = self.scroll_by(Dimension::Column, -output.delta.columns);
                let rows = self.scroll_by(Dimension::Row, -output.delta.rows);
                columns || rows
            }
            PointerPhase::Up => {
                if self.resizer.is_active() {
                    return self.end_resize().is_some();
                }
                !self.touch.pointer_up(event.position).is_empty()
            }
            PointerPhase::Wheel => {
                let columns = event.delta.dx != 0.0 && self.wheel(Dimension::Column, f64::from(event.delta.dx));
                let rows = event.delta.dy != 0.0 && self.wheel(Dimension::Row, f64::from(event.delta.dy));
                columns || rows
            }
        }
    }

    /// Start resizing the item at `index` (header items first) with the
    /// pointer at `position` along the dimension.
    pub fn begin_resize(&mut self, dimension: Dimension, index: usize, position: f32) -> bool {
        let axis = self.grid.axis(dimension);
        let Some(id) = axis.ordered().get(index).copied() else {
            tracing::debug!(target: targets::RESIZE, ?dimension, index, "no item to resize");
            return false;
        };
        let Some(item) = axis.get(id) else {
            return false;
        };
        let (key, size) = (item.key(), item.size());
        self.resizer.begin(dimension, index, id, key, position, size);
        true
    }

    /// Move an in-progress resize. Returns the previewed size.
    pub fn update_resize(&mut self, position: f32) -> Option<f32> {
        let scale = self.host.accumulated_scale();
        let size = self.resizer.update(position, scale)?;
        let state = self.resizer.state()?;
        let dimension = state.dimension;
        let key = state.key.clone();
        self.apply_fixed_size(dimension, &key, Some(size));
        self.run_session(None);
        Some(size)
    }

    /// Commit an in-progress resize: the size is persisted under the item's
    /// key and `resize_committed` is emitted.
    pub fn end_resize(&mut self) -> Option<ResizeCommit> {
        let commit = self.resizer.end()?;
        self.persistence.set(commit.dimension, &commit.key, commit.size);
        self.apply_fixed_size(commit.dimension, &commit.key, Some(commit.size));
        self.run_session(None);
        self.resize_committed.emit(commit.clone());
        Some(commit)
    }

    /// Abandon an in-progress resize, restoring the persisted or automatic
    /// size.
    pub fn cancel_resize(&mut self) -> bool {
        let Some(state) = self.resizer.cancel() else {
            return false;
        };
        let restored = self.persistence.get(state.dimension, &state.key);
        self.apply_fixed_size(state.dimension, &state.key, restored);
        self.run_session(None);
        true
    }

    /// Return the item at `index` to its automatic size and forget any
    /// persisted size for it.
    pub fn reset_size(&mut self, dimension: Dimension, index: usize) -> bool {
        let axis = self.grid.axis(dimension);
        let Some(key) = axis.ordered().get(index).and_then(|id| axis.get(*id)).map(|item| item.key()) else {
            return false;
        };
        self.persistence.remove(dimension, &key);
        self.apply_fixed_size(dimension, &key, None);
        tracing::debug!(target: targets::RESIZE, ?dimension, index, %key, "size reset");
        self.run_session(None);
        true
    }

    fn apply_fixed_size(&mut self, dimension: Dimension, key: &str, size: Option<f32>) {
        let min_size = self.config.min_size;
        let axis = self.grid.axis_mut(dimension);
        let Some(id) = find_by_key(axis, key) else {
            return;
        };
        if let Some(item) = axis.get_mut(id) {
            item.fixed_size = size.map(|size| size.max(min_size));
            item.measured = size.is_some();
        }
        // Scroll bounds depend on sizes; keep the position valid.
        let leaf_count = self.navigator.leaf_count(dimension);
        self.layouts[slot(dimension)].clamp_scroll(leaf_count);
    }
}
