//! Flat-table navigator.
//!
//! A table has one level of column headers and no row headers: each row is a
//! data record and the intersection is simply "the record's value at this
//! column". Nested input is flattened to its leaves.

use std::sync::Arc;

use crate::events::Dimension;
use crate::model::hierarchy::{AxisTree, Hierarchy, HierarchyNode, footer_item, intersect};
use crate::model::navigator::{BodyItem, HierarchyMember, HierarchyNavigator};

/// Navigator over a flat table.
#[derive(Debug, Clone)]
pub struct TableNavigator {
    rows: AxisTree,
    columns: AxisTree,
}

impl TableNavigator {
    /// Create a navigator from row records and column headers.
    pub fn new(rows: Hierarchy, columns: Hierarchy) -> Self {
        Self {
            rows: AxisTree::build(Dimension::Row, &rows, true),
            columns: AxisTree::build(Dimension::Column, &columns, true),
        }
    }

    /// Build a table from column names and string records.
    ///
    /// Rows are keyed by their position, so a persisted row size stays with
    /// the position when records are inserted or removed. Use
    /// [`from_keyed_records`](Self::from_keyed_records) when records carry
    /// an identity.
    ///
    /// ```
    /// use horizon_tablix::model::{HierarchyNavigator, TableNavigator};
    /// use horizon_tablix::events::Dimension;
    ///
    /// let nav = TableNavigator::from_records(
    ///     ["Name", "Qty"],
    ///     vec![vec!["Bolt", "12"], vec!["Nut", "40"]],
    /// );
    /// assert_eq!(nav.leaf_count(Dimension::Row), 2);
    /// assert_eq!(nav.depth(Dimension::Row), 0);
    /// ```
    pub fn from_records<C, S, R, V>(columns: C, records: R) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = Vec<V>>,
        V: Into<String>,
    {
        let rows = records
            .into_iter()
            .enumerate()
            .map(|(index, values)| HierarchyNode::leaf(index.to_string()).with_values(values))
            .collect();
        Self::new(Hierarchy::new(rows), Hierarchy::flat(columns))
    }

    /// Build a table from column names and `(key, values)` records.
    ///
    /// Row keys must be unique; they are what row sizes are persisted under.
    ///
    /// ```
    /// use horizon_tablix::model::{HierarchyNavigator, TableNavigator};
    /// use horizon_tablix::events::Dimension;
    ///
    /// let nav = TableNavigator::from_keyed_records(
    ///     ["Name", "Qty"],
    ///     vec![("p-7", vec!["Bolt", "12"]), ("p-9", vec!["Nut", "40"])],
    /// );
    /// assert_eq!(&*nav.leaf_at(Dimension::Row, 1).unwrap().key, "p-9");
    /// ```
    pub fn from_keyed_records<C, S, R, K, V>(columns: C, records: R) -> Self
    where
        C: IntoIterator<Item = S>,
        S: Into<String>,
        R: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let rows = records
            .into_iter()
            .map(|(key, values)| HierarchyNode::leaf(key).with_values(values))
            .collect();
        Self::new(Hierarchy::new(rows), Hierarchy::flat(columns))
    }

    fn tree(&self, dimension: Dimension) -> &AxisTree {
        match dimension {
            Dimension::Row => &self.rows,
            Dimension::Column => &self.columns,
        }
    }
}

impl Default for TableNavigator {
    fn default() -> Self {
        Self::new(Hierarchy::default(), Hierarchy::default())
    }
}

impl HierarchyNavigator for TableNavigator {
    fn update(&mut self, rows: Option<Hierarchy>, columns: Option<Hierarchy>) {
        if let Some(rows) = rows {
            self.rows = AxisTree::build(Dimension::Row, &rows, true);
        }
        if let Some(columns) = columns {
            self.columns = AxisTree::build(Dimension::Column, &columns, true);
        }
    }

    fn depth(&self, dimension: Dimension) -> usize {
        match dimension {
            // Records carry no row headers.
            Dimension::Row => 0,
            Dimension::Column => self.columns.depth().min(1),
        }
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

    fn parent(&self, _member: &HierarchyMember) -> Option<HierarchyMember> {
        None
    }

    fn index_in_parent(&self, member: &HierarchyMember) -> usize {
        self.tree(member.dimension).index_in_parent(member)
    }

    fn is_leaf(&self, _member: &HierarchyMember) -> bool {
        true
    }

    fn is_last_item(&self, member: &HierarchyMember) -> bool {
        self.tree(member.dimension).is_last_item(member)
    }

    fn children(&self, _member: &HierarchyMember) -> Vec<HierarchyMember> {
        Vec::new()
    }

    fn level(&self, _member: &HierarchyMember) -> usize {
        0
    }

    fn intersection(&self, row: &HierarchyMember, column: &HierarchyMember) -> Option<BodyItem> {
        intersect(&self.rows, &self.columns, row, column)
    }

    fn corner(&self, _row_level: usize, _column_level: usize) -> Option<Arc<str>> {
        None
    }

    fn has_footer(&self) -> bool {
        self.rows.has_totals()
    }

    fn footer(&self, column: &HierarchyMember) -> Option<BodyItem> {
        footer_item(&self.rows, &self.columns, column)
    }

    fn leaf_range(&self, member: &HierarchyMember) -> std::ops::Range<usize> {
        self.tree(member.dimension).leaf_range(member)
    }
}
