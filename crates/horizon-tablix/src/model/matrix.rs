//! Nested-matrix navigator.
//!
//! Both axes are trees. A header at level `L` spans every leaf under it, and
//! a leaf shallower than the axis depth (a ragged tree) spans the remaining
//! header levels. Row leaves hold the body values indexed by column leaf.

use std::ops::Range;
use std::sync::Arc;

use crate::events::Dimension;
use crate::model::hierarchy::{AxisTree, Hierarchy, footer_item, intersect};
use crate::model::navigator::{BodyItem, HierarchyMember, HierarchyNavigator};

/// Navigator over a row tree × column tree.
#[derive(Debug, Clone)]
pub struct MatrixNavigator {
    rows: AxisTree,
    columns: AxisTree,
}

impl MatrixNavigator {
    /// Create a navigator from the two hierarchies.
    pub fn new(rows: Hierarchy, columns: Hierarchy) -> Self {
        Self {
            rows: AxisTree::build(Dimension::Row, &rows, false),
            columns: AxisTree::build(Dimension::Column, &columns, false),
        }
    }

    fn tree(&self, dimension: Dimension) -> &AxisTree {
        match dimension {
            Dimension::Row => &self.rows,
            Dimension::Column => &self.columns,
        }
    }
}

impl Default for MatrixNavigator {
    fn default() -> Self {
        Self::new(Hierarchy::default(), Hierarchy::default())
    }
}

impl HierarchyNavigator for MatrixNavigator {
    fn update(&mut self, rows: Option<Hierarchy>, columns: Option<Hierarchy>) {
        if let Some(rows) = rows {
            self.rows = AxisTree::build(Dimension::Row, &rows, false);
        }
        if let Some(columns) = columns {
            self.columns = AxisTree::build(Dimension::Column, &columns, false);
        }
    }

    fn depth(&self, dimension: Dimension) -> usize {
        self.tree(dimension).depth()
    }

    fn leaf_count(&self, dimension: Dimension) -> usize {
        self.tree(dimension).leaf_count()
    }

    fn leaf_at(&self, dimension: Dimension, index: usize) -> Option<HierarchyMember> {
        self.tree(dimension).leaf_at(index)
    }

    fn leaf_index(&self, member: &HierarchyMember) -> Option<usize> {
        self.tree(member.dimension).leaf_index(member)
    }

    fn parent(&self, member: &HierarchyMember) -> Option<HierarchyMember> {
        self.tree(member.dimension).parent(member)
    }

    fn index_in_parent(&self, member: &HierarchyMember) -> usize {
        self.tree(member.dimension).index_in_parent(member)
    }

    fn is_last_item(&self, member: &HierarchyMember) -> bool {
        self.tree(member.dimension).is_last_item(member)
    }

    fn children(&self, member: &HierarchyMember) -> Vec<HierarchyMember> {
        self.tree(member.dimension).children(member)
    }

    fn intersection(&self, row: &HierarchyMember, column: &HierarchyMember) -> Option<BodyItem> {
        intersect(&self.rows, &self.columns, row, column)
    }

    /// The bottom header row names the row levels; the last header column
    /// names the column levels.
    fn corner(&self, row_level: usize, column_level: usize) -> Option<Arc<str>> {
        let column_depth = self.columns.depth();
        let row_depth = self.rows.depth();
        if column_level + 1 == column_depth {
            self.rows.level_name(row_level)
        } else if row_level + 1 == row_depth {
            self.columns.level_name(column_level)
        } else {
            None
        }
    }

    fn has_footer(&self) -> bool {
        self.rows.has_totals()
    }

    fn footer(&self, column: &HierarchyMember) -> Option<BodyItem> {
        footer_item(&self.rows, &self.columns, column)
    }

    fn leaf_range(&self, member: &HierarchyMember) -> Range<usize> {
        self.tree(member.dimension).leaf_range(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::hierarchy::HierarchyNode;

    fn sales() -> MatrixNavigator {
        let rows = Hierarchy::new(vec![
            HierarchyNode::new("East", "East").with_children(vec![
                HierarchyNode::leaf("NY").with_values(["1", "2", "3"]),
                HierarchyNode::leaf("MA").with_values(["4", "5", "6"]),
            ]),
            HierarchyNode::leaf("Other").with_values(["7", "8", "9"]),
        ])
        .with_level_names(["Region", "State"]);
        let columns = Hierarchy::new(vec![
            HierarchyNode::new("2024", "2024").with_children(vec![
                HierarchyNode::leaf("H1"),
                HierarchyNode::leaf("H2"),
            ]),
            HierarchyNode::leaf("Total"),
        ])
        .with_level_names(["Year", "Half"]);
        MatrixNavigator::new(rows, columns)
    }

    #[test]
    fn test_matrix_depths_and_counts() {
        let nav = sales();
        assert_eq!(nav.depth(Dimension::Row), 2);
        assert_eq!(nav.depth(Dimension::Column), 2);
        assert_eq!(nav.leaf_count(Dimension::Row), 3);
        assert_eq!(nav.leaf_count(Dimension::Column), 3);
    }

    #[test]
    fn test_ragged_leaf_is_shallow() {
        let nav = sales();
        let other = nav.leaf_at(Dimension::Row, 2).unwrap();
        assert_eq!(nav.level(&other), 0);
        assert!(nav.parent(&other).is_none());
        assert!(nav.is_last_item(&other));
    }

    #[test]
    fn test_leaf_range_of_group() {
        let nav = sales();
        let ny = nav.leaf_at(Dimension::Row, 0).unwrap();
        let east = nav.parent(&ny).unwrap();
        assert_eq!(nav.leaf_range(&east), 0..2);
        assert_eq!(nav.children(&east).len(), 2);
        assert_eq!(nav.index_in_parent(&ny), 0);
        assert!(!nav.is_last_item(&ny));
    }

    #[test]
    fn test_intersection() {
        let nav = sales();
        let ma = nav.leaf_at(Dimension::Row, 1).unwrap();
        let total = nav.leaf_at(Dimension::Column, 2).unwrap();
        assert_eq!(&*nav.intersection(&ma, &total).unwrap().value, "6");
        let east = nav.parent(&ma).unwrap();
        assert!(nav.intersection(&east, &total).is_none());
    }

    #[test]
    fn test_corner_labels() {
        let nav = sales();
        assert_eq!(nav.corner(0, 1).as_deref(), Some("Region"));
        assert_eq!(nav.corner(1, 1).as_deref(), Some("State"));
        assert_eq!(nav.corner(1, 0).as_deref(), Some("Year"));
        assert_eq!(nav.corner(0, 0), None);
    }
}
