//! Span reconciliation.
//!
//! A header spanning several leaves is drawn across the sum of their sizes.
//! When the header's own content is larger than that sum, the excess is
//! pushed onto the last spanned leaf as its aligning size, so totals stay
//! exact and the oddity stays confined to one edge.

use std::collections::HashMap;

use horizon_tablix_core::logging::targets;

use crate::events::Dimension;
use crate::grid::{Axis, DimensionItem, Grid, ItemId};

/// Amount by which `header_size` exceeds the sum of `spanned`.
pub fn alignment_excess(spanned: &[f32], header_size: f32) -> f32 {
    let sum: f32 = spanned.iter().sum();
    (header_size - sum).max(0.0)
}

/// The spanned sizes after the header's excess is absorbed by the last one.
///
/// ```
/// use horizon_tablix::layout::span::align_spanned_sizes;
///
/// assert_eq!(align_spanned_sizes(&[20.0, 20.0, 20.0], 80.0), vec![20.0, 20.0, 40.0]);
/// assert_eq!(align_spanned_sizes(&[20.0, 20.0, 20.0], 50.0), vec![20.0, 20.0, 20.0]);
/// ```
pub fn align_spanned_sizes(spanned: &[f32], header_size: f32) -> Vec<f32> {
    let excess = alignment_excess(spanned, header_size);
    let mut aligned = spanned.to_vec();
    if let Some(last) = aligned.last_mut() {
        *last += excess;
    }
    aligned
}

/// A spanning header located in the axis order.
struct SpanRun {
    start: usize,
    span: usize,
    header_size: f32,
    hidden_leading: usize,
}

impl SpanRun {
    fn total_leaves(&self) -> usize {
        self.span + self.hidden_leading
    }
}

/// Size of the leaves of a span that lie before the window, from the sizes
/// they last had. Leaves never realized count as `fallback`.
fn hidden_extent(axis: &Axis, first_visible: usize, hidden: usize, fallback: f32) -> f32 {
    (first_visible.saturating_sub(hidden)..first_visible)
        .map(|index| axis.remembered_size(index).unwrap_or(fallback))
        .sum()
}

/// Recompute aligning sizes along `dimension` from the spanning cells.
///
/// Inner spans are aligned before the spans that contain them, so each
/// level sees the aligning sizes of the levels below. Spans running past the
/// trailing edge of the window are skipped, since their last leaf is not
/// realized. Leaves of a span that scrolled out at the leading edge count
/// with their remembered sizes, so the last leaf keeps its size while the
/// span scrolls. Returns the number of items adjusted.
pub fn reconcile(grid: &mut Grid, dimension: Dimension) -> usize {
    let order = grid.axis(dimension).ordered();
    let index: HashMap<ItemId, usize> = order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut runs: Vec<SpanRun> = grid
        .cells()
        .filter_map(|cell| {
            let clip = cell.clip_along(dimension);
            let span = cell.span(dimension);
            if clip.trailing || (span < 2 && clip.hidden_leading == 0) {
                return None;
            }
            index.get(&cell.anchor(dimension)).map(|start| SpanRun {
                start: *start,
                span,
                header_size: cell.content_extent(dimension),
                hidden_leading: clip.hidden_leading,
            })
        })
        .collect();
    runs.sort_by_key(|run| (run.total_leaves(), run.start));

    let axis = grid.axis_mut(dimension);
    for id in &order {
        if let Some(item) = axis.get_mut(*id) {
            item.aligning_size = 0.0;
        }
    }

    let mut adjusted = 0;
    for run in runs {
        let end = (run.start + run.span).min(order.len());
        let items: Vec<&DimensionItem> = order[run.start..end].iter().filter_map(|id| axis.get(*id)).collect();
        let mut sizes: Vec<f32> = items.iter().map(|item| item.size()).collect();
        if run.hidden_leading > 0
            && let Some(first) = items.first().and_then(|item| item.leaf_index())
        {
            let fallback = if sizes.is_empty() { 0.0 } else { sizes.iter().sum::<f32>() / sizes.len() as f32 };
            sizes.push(hidden_extent(axis, first, run.hidden_leading, fallback));
        }
        let excess = alignment_excess(&sizes, run.header_size);
        if excess <= 0.0 {
            continue;
        }
        if let Some(last) = axis.get_mut(order[end - 1]) {
            if last.is_fixed() {
                tracing::debug!(
                    target: targets::LAYOUT,
                    ?dimension,
                    excess,
                    "last spanned item is fixed; excess not absorbed"
                );
                continue;
            }
            last.aligning_size += excess;
            adjusted += 1;
        }
    }
    axis.remember_leaf_sizes();
    adjusted
}
