//! The hierarchy navigation contract.
//!
//! The grid never owns data. Everything it knows about logical rows, columns
//! and intersections comes through [`HierarchyNavigator`], which must be
//! cheap and side-effect free: it is called many times per rendering
//! iteration.

use std::ops::Range;
use std::sync::Arc;

use crate::events::Dimension;
use crate::model::hierarchy::Hierarchy;

/// Handle to one logical row or column group.
///
/// Members are snapshots. A navigator rejects a member whose key no longer
/// matches its slot, which makes stale handles from a previous model harmless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyMember {
    pub dimension: Dimension,
    /// Navigator-internal position.
    pub slot: usize,
    /// Stable key (full key path).
    pub key: Arc<str>,
    pub label: Arc<str>,
    /// Depth from the axis root.
    pub level: usize,
    pub is_leaf: bool,
}

/// The value at a row × column intersection (or a footer total).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BodyItem {
    pub row_key: Arc<str>,
    pub column_key: Arc<str>,
    pub value: Arc<str>,
}

/// A cell of the corner block, where header rows meet header columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CornerItem {
    /// Level in the row hierarchy (header column index).
    pub row_level: usize,
    /// Level in the column hierarchy (header row index).
    pub column_level: usize,
    pub text: Option<Arc<str>>,
}

/// Read-only access to the row and column hierarchies.
///
/// Implementations exist for flat tables ([`TableNavigator`]) and nested
/// matrices ([`MatrixNavigator`]).
///
/// [`TableNavigator`]: crate::model::TableNavigator
/// [`MatrixNavigator`]: crate::model::MatrixNavigator
pub trait HierarchyNavigator: Send + Sync {
    /// Replace one or both hierarchies. `None` keeps the current one.
    fn update(&mut self, rows: Option<Hierarchy>, columns: Option<Hierarchy>);

    /// Number of header levels on an axis.
    fn depth(&self, dimension: Dimension) -> usize;

    /// Number of leaves on an axis.
    fn leaf_count(&self, dimension: Dimension) -> usize;

    /// Leaf at `index`, or `None` past the end.
    fn leaf_at(&self, dimension: Dimension, index: usize) -> Option<HierarchyMember>;

    /// Position of a leaf among all leaves of its axis.
    fn leaf_index(&self, member: &HierarchyMember) -> Option<usize>;

    /// Parent, or `None` for roots.
    fn parent(&self, member: &HierarchyMember) -> Option<HierarchyMember>;

    /// Position among siblings.
    fn index_in_parent(&self, member: &HierarchyMember) -> usize;

    /// Whether the member has no children.
    fn is_leaf(&self, member: &HierarchyMember) -> bool {
        member.is_leaf
    }

    /// Whether the member is the last among its siblings.
    fn is_last_item(&self, member: &HierarchyMember) -> bool;

    /// Children in order.
    fn children(&self, member: &HierarchyMember) -> Vec<HierarchyMember>;

    /// Depth of the member from its axis root.
    fn level(&self, member: &HierarchyMember) -> usize {
        member.level
    }

    /// The body item at a row leaf × column leaf, if any.
    fn intersection(&self, row: &HierarchyMember, column: &HierarchyMember) -> Option<BodyItem>;

    /// Text of the corner cell at the given levels.
    fn corner(&self, row_level: usize, column_level: usize) -> Option<Arc<str>>;

    /// Whether a footer row exists.
    fn has_footer(&self) -> bool {
        false
    }

    /// Footer item below a column leaf.
    fn footer(&self, _column: &HierarchyMember) -> Option<BodyItem> {
        None
    }

    /// Range of leaf indices covered by a member.
    fn leaf_range(&self, member: &HierarchyMember) -> Range<usize> {
        if self.is_leaf(member) {
            return self
                .leaf_index(member)
                .map(|i| i..i + 1)
                .unwrap_or(0..0);
        }
        let children = self.children(member);
        match (children.first(), children.last()) {
            (Some(first), Some(last)) => self.leaf_range(first).start..self.leaf_range(last).end,
            _ => 0..0,
        }
    }

    /// The ancestor (or the member itself) at `level`.
    fn ancestor_at_level(&self, member: &HierarchyMember, level: usize) -> Option<HierarchyMember> {
        let mut current = member.clone();
        if self.level(&current) < level {
            return None;
        }
        while self.level(&current) > level {
            current = self.parent(&current)?;
        }
        Some(current)
    }

    /// Whether two header members denote the same logical, identically
    /// rendered header.
    fn header_items_equal(&self, a: &HierarchyMember, b: &HierarchyMember) -> bool {
        a.dimension == b.dimension && a.key == b.key && a.label == b.label
    }

    /// Whether two body items are the same logical cell with the same value.
    fn body_items_equal(&self, a: &BodyItem, b: &BodyItem) -> bool {
        a == b
    }

    /// Whether two corner items are the same.
    fn corner_items_equal(&self, a: &CornerItem, b: &CornerItem) -> bool {
        a == b
    }
}
