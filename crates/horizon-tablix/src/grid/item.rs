//! Rows and columns.

use std::sync::Arc;

use crate::model::HierarchyMember;

/// Key under which the footer row's size is persisted.
pub const FOOTER_KEY: &str = "#footer";

/// What a dimension item stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRole {
    /// A header row (column-hierarchy level) or header column (row-hierarchy
    /// level).
    Header { level: usize },
    /// A realized leaf of the hierarchy.
    Leaf {
        member: HierarchyMember,
        leaf_index: usize,
    },
    /// The footer row.
    Footer,
}

/// A realized row or column.
///
/// The effective size is the user-fixed size when present, otherwise the
/// measured content size plus the aligning size pushed onto it by a spanning
/// header.
#[derive(Debug, Clone)]
pub struct DimensionItem {
    pub(crate) role: ItemRole,
    pub(crate) content_size: f32,
    pub(crate) aligning_size: f32,
    pub(crate) fixed_size: Option<f32>,
    /// Cleared whenever the item is (re)bound; set once measured.
    pub(crate) measured: bool,
    pub(crate) position: f32,
    pub(crate) extent: f32,
}

impl DimensionItem {
    pub(crate) fn new(role: ItemRole) -> Self {
        Self {
            role,
            content_size: 0.0,
            aligning_size: 0.0,
            fixed_size: None,
            measured: false,
            position: 0.0,
            extent: 0.0,
        }
    }

    /// Reinitialize a pooled item.
    pub(crate) fn reset(&mut self, role: ItemRole) {
        *self = Self::new(role);
    }

    pub fn role(&self) -> &ItemRole {
        &self.role
    }

    /// The bound leaf member, if this is a leaf.
    pub fn member(&self) -> Option<&HierarchyMember> {
        match &self.role {
            ItemRole::Leaf { member, .. } => Some(member),
            _ => None,
        }
    }

    pub fn leaf_index(&self) -> Option<usize> {
        match self.role {
            ItemRole::Leaf { leaf_index, .. } => Some(leaf_index),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.role, ItemRole::Leaf { .. })
    }

    /// Effective size.
    pub fn size(&self) -> f32 {
        self.fixed_size
            .unwrap_or(self.content_size + self.aligning_size)
    }

    pub fn content_size(&self) -> f32 {
        self.content_size
    }

    pub fn aligning_size(&self) -> f32 {
        self.aligning_size
    }

    pub fn fixed_size(&self) -> Option<f32> {
        self.fixed_size
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_size.is_some()
    }

    /// Leading edge in control coordinates, as of the last layout pass.
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Visible extent; smaller than [`size`](Self::size) for a partially
    /// scrolled first leaf.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Stable key used for persisted sizes.
    pub fn key(&self) -> Arc<str> {
        match &self.role {
            ItemRole::Header { level } => Arc::from(format!("#level{level}")),
            ItemRole::Leaf { member, .. } => member.key.clone(),
            ItemRole::Footer => Arc::from(FOOTER_KEY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Dimension;

    fn leaf(key: &str) -> ItemRole {
        ItemRole::Leaf {
            member: HierarchyMember {
                dimension: Dimension::Row,
                slot: 0,
                key: Arc::from(key),
                label: Arc::from(key),
                level: 0,
                is_leaf: true,
            },
            leaf_index: 4,
        }
    }

    #[test]
    fn test_size_prefers_fixed() {
        let mut item = DimensionItem::new(leaf("a"));
        item.content_size = 20.0;
        item.aligning_size = 15.0;
        assert_eq!(item.size(), 35.0);
        item.fixed_size = Some(50.0);
        assert_eq!(item.size(), 50.0);
        assert!(item.is_fixed());
    }

    #[test]
    fn test_keys() {
        assert_eq!(&*DimensionItem::new(leaf("East/NY")).key(), "East/NY");
        assert_eq!(&*DimensionItem::new(ItemRole::Header { level: 1 }).key(), "#level1");
        assert_eq!(&*DimensionItem::new(ItemRole::Footer).key(), FOOTER_KEY);
    }

    #[test]
    fn test_reset_clears_sizes() {
        let mut item = DimensionItem::new(leaf("a"));
        item.fixed_size = Some(40.0);
        item.measured = true;
        item.reset(ItemRole::Footer);
        assert!(!item.is_fixed());
        assert!(!item.measured);
        assert_eq!(item.leaf_index(), None);
    }
}
