//! Interactive item resizing.
//!
//! A resize starts on a pointer down within the handle width of an item's
//! trailing edge. While the pointer moves, the item is previewed at
//! `start_size + delta / scale`, never below the minimum size. Releasing the
//! pointer yields a [`ResizeCommit`].

use std::sync::Arc;

use horizon_tablix_core::logging::targets;

use crate::config::TablixConfig;
use crate::events::{Dimension, ResizeCommit};
use crate::grid::ItemId;

/// An in-progress resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub dimension: Dimension,
    /// Index of the item among the axis' ordered items.
    pub index: usize,
    pub item: ItemId,
    pub key: Arc<str>,
    pub start_pos: f32,
    pub start_size: f32,
    pub current_size: f32,
}

/// Tracks a single resize gesture.
#[derive(Debug, Clone)]
pub struct Resizer {
    min_size: f32,
    handle_width: f32,
    state: Option<ResizeState>,
}

impl Resizer {
    pub fn new(min_size: f32, handle_width: f32) -> Self {
        Self {
            min_size: min_size.max(0.0),
            handle_width: handle_width.max(0.0),
            state: None,
        }
    }

    pub fn from_config(config: &TablixConfig) -> Self {
        Self::new(config.min_size, config.resize_handle_width)
    }

    pub fn min_size(&self) -> f32 {
        self.min_size
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&ResizeState> {
        self.state.as_ref()
    }

    /// Find the edge under `pos`. `edges` pairs an item index with the
    /// coordinate of its trailing edge.
    pub fn hit_test(&self, pos: f32, edges: &[(usize, f32)]) -> Option<usize> {
        edges
            .iter()
            .find(|(_, edge)| (pos - edge).abs() < self.handle_width)
            .map(|(index, _)| *index)
    }

    /// Start resizing an item currently `start_size` pixels long.
    pub fn begin(
        &mut self,
        dimension: Dimension,
        index: usize,
        item: ItemId,
        key: Arc<str>,
        start_pos: f32,
        start_size: f32,
    ) {
        tracing::debug!(target: targets::RESIZE, ?dimension, index, %key, start_size, "resize started");
        self.state = Some(ResizeState {
            dimension,
            index,
            item,
            key,
            start_pos,
            start_size,
            current_size: start_size,
        });
    }

    /// Preview size for the pointer at `pos`, or `None` when idle.
    pub fn update(&mut self, pos: f32, scale: f32) -> Option<f32> {
        let min_size = self.min_size;
        let state = self.state.as_mut()?;
        let scale = if scale > 0.0 && scale.is_finite() { scale } else { 1.0 };
        let size = (state.start_size + (pos - state.start_pos) / scale).max(min_size);
        state.current_size = size;
        Some(size)
    }

    /// Finish the resize.
    pub fn end(&mut self) -> Option<ResizeCommit> {
        let state = self.state.take()?;
        tracing::debug!(
            target: targets::RESIZE,
            dimension = ?state.dimension,
            index = state.index,
            size = state.current_size,
            "resize committed"
        );
        Some(ResizeCommit {
            dimension: state.dimension,
            index: state.index,
            key: state.key,
            size: state.current_size,
        })
    }

    /// Abandon the resize; returns the state it had.
    pub fn cancel(&mut self) -> Option<ResizeState> {
        self.state.take()
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::from_config(&TablixConfig::default())
    }
}
