//! One dimension of the grid: header items, a contiguous window of leaves,
//! and an optional footer, all drawn from a pooled arena.

use std::collections::{HashMap, VecDeque};
use std::ops::Range;

use slotmap::SlotMap;

use crate::events::Dimension;
use crate::grid::ItemId;
use crate::grid::item::{DimensionItem, ItemRole};
use crate::model::HierarchyMember;

/// Realized items of one dimension.
///
/// Released items stay in the arena and go to a spare pool; they are reused
/// before new slots are allocated.
#[derive(Debug)]
pub struct Axis {
    dimension: Dimension,
    items: SlotMap<ItemId, DimensionItem>,
    headers: Vec<ItemId>,
    leaves: VecDeque<ItemId>,
    footer: Option<ItemId>,
    spare: Vec<ItemId>,
    window_start: usize,
    /// Last known size of every leaf that has been realized, by leaf index.
    leaf_sizes: HashMap<usize, f32>,
}

impl Axis {
    pub(crate) fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            items: SlotMap::with_key(),
            headers: Vec::new(),
            leaves: VecDeque::new(),
            footer: None,
            spare: Vec::new(),
            window_start: 0,
            leaf_sizes: HashMap::new(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn get(&self, id: ItemId) -> Option<&DimensionItem> {
        self.items.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut DimensionItem> {
        self.items.get_mut(id)
    }

    /// Header items, outermost level first.
    pub fn header_ids(&self) -> &[ItemId] {
        &self.headers
    }

    /// Realized leaves in order.
    pub fn leaf_ids(&self) -> Vec<ItemId> {
        self.leaves.iter().copied().collect()
    }

    pub fn footer_id(&self) -> Option<ItemId> {
        self.footer
    }

    /// Every active item in display order: headers, leaves, footer.
    pub fn ordered(&self) -> Vec<ItemId> {
        self.headers
            .iter()
            .chain(self.leaves.iter())
            .chain(self.footer.iter())
            .copied()
            .collect()
    }

    /// Leaf indices currently realized.
    pub fn window(&self) -> Range<usize> {
        self.window_start..self.window_start + self.leaves.len()
    }

    /// Number of realized leaves.
    pub fn realized_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Leaf at `offset` from the start of the window.
    pub fn leaf_at_offset(&self, offset: usize) -> Option<ItemId> {
        self.leaves.get(offset).copied()
    }

    pub fn first_leaf(&self) -> Option<ItemId> {
        self.leaves.front().copied()
    }

    pub fn last_leaf(&self) -> Option<ItemId> {
        self.leaves.back().copied()
    }

    /// Last known size of leaf `leaf_index`, realized or not.
    pub fn remembered_size(&self, leaf_index: usize) -> Option<f32> {
        self.leaf_sizes.get(&leaf_index).copied()
    }

    /// Record the current size of every realized leaf.
    pub(crate) fn remember_leaf_sizes(&mut self) {
        for id in &self.leaves {
            if let Some(item) = self.items.get(*id)
                && let Some(index) = item.leaf_index()
            {
                self.leaf_sizes.insert(index, item.size());
            }
        }
    }

    /// Drop remembered sizes; leaf indices no longer name the same members.
    pub(crate) fn forget_leaf_sizes(&mut self) {
        self.leaf_sizes.clear();
    }

    /// Number of pooled, inactive items.
    pub fn spare_count(&self) -> usize {
        self.spare.len()
    }

    /// Total size of the header items.
    pub fn header_extent(&self) -> f32 {
        self.sum(self.headers.iter())
    }

    /// Total size of the realized leaves.
    pub fn leaves_extent(&self) -> f32 {
        self.sum(self.leaves.iter())
    }

    /// Size of the footer, or zero.
    pub fn footer_extent(&self) -> f32 {
        self.sum(self.footer.iter())
    }

    fn sum<'a>(&self, ids: impl Iterator<Item = &'a ItemId>) -> f32 {
        ids.filter_map(|id| self.items.get(*id)).map(DimensionItem::size).sum()
    }

    pub(crate) fn acquire(&mut self, role: ItemRole) -> ItemId {
        if let Some(id) = self.spare.pop()
            && let Some(item) = self.items.get_mut(id)
        {
            item.reset(role);
            return id;
        }
        self.items.insert(DimensionItem::new(role))
    }

    pub(crate) fn release(&mut self, id: ItemId) {
        if self.items.contains_key(id) {
            self.spare.push(id);
        }
    }

    /// Grow or shrink the header items to `count`, returning released ids.
    pub(crate) fn set_header_count(&mut self, count: usize) -> Vec<ItemId> {
        let mut released = Vec::new();
        while self.headers.len() > count {
            if let Some(id) = self.headers.pop() {
                self.release(id);
                released.push(id);
            }
        }
        while self.headers.len() < count {
            let level = self.headers.len();
            let id = self.acquire(ItemRole::Header { level });
            self.headers.push(id);
        }
        released
    }

    /// Add or remove the footer item, returning a released id.
    pub(crate) fn set_footer(&mut self, present: bool) -> Option<ItemId> {
        match (present, self.footer) {
            (true, None) => {
                self.footer = Some(self.acquire(ItemRole::Footer));
                None
            }
            (false, Some(id)) => {
                self.footer = None;
                self.release(id);
                Some(id)
            }
            _ => None,
        }
    }

    /// Move an empty window to start at `start`.
    pub(crate) fn reset_window(&mut self, start: usize) {
        debug_assert!(self.leaves.is_empty());
        self.window_start = start;
    }

    pub(crate) fn push_leaf_back(&mut self, member: HierarchyMember) -> ItemId {
        let leaf_index = self.window_start + self.leaves.len();
        let id = self.acquire(ItemRole::Leaf { member, leaf_index });
        self.leaves.push_back(id);
        id
    }

    pub(crate) fn push_leaf_front(&mut self, member: HierarchyMember) -> ItemId {
        self.window_start = self.window_start.saturating_sub(1);
        let leaf_index = self.window_start;
        let id = self.acquire(ItemRole::Leaf { member, leaf_index });
        self.leaves.push_front(id);
        id
    }

    /// Detach the first leaf without releasing it.
    pub(crate) fn pop_leaf_front(&mut self) -> Option<ItemId> {
        let id = self.leaves.pop_front()?;
        self.window_start += 1;
        Some(id)
    }

    /// Detach the last leaf without releasing it.
    pub(crate) fn pop_leaf_back(&mut self) -> Option<ItemId> {
        self.leaves.pop_back()
    }

    /// Re-attach a detached leaf at the trailing edge, bound to `member`.
    pub(crate) fn attach_back(&mut self, id: ItemId, member: HierarchyMember) {
        let leaf_index = self.window_start + self.leaves.len();
        if let Some(item) = self.items.get_mut(id) {
            item.reset(ItemRole::Leaf { member, leaf_index });
            self.leaves.push_back(id);
        }
    }

    /// Re-attach a detached leaf at the leading edge, bound to `member`.
    pub(crate) fn attach_front(&mut self, id: ItemId, member: HierarchyMember) {
        if let Some(item) = self.items.get_mut(id) {
            self.window_start = self.window_start.saturating_sub(1);
            item.reset(ItemRole::Leaf {
                member,
                leaf_index: self.window_start,
            });
            self.leaves.push_front(id);
        }
    }

    /// Rebind a realized leaf in place.
    pub(crate) fn rebind_leaf(&mut self, id: ItemId, member: HierarchyMember) {
        if let Some(item) = self.items.get_mut(id)
            && let ItemRole::Leaf { leaf_index, .. } = item.role
        {
            item.reset(ItemRole::Leaf { member, leaf_index });
        }
    }
}
