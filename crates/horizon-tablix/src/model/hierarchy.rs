//! Hierarchy input data and the arena each navigator walks.
//!
//! A [`Hierarchy`] is the serializable description of one axis: a forest of
//! [`HierarchyNode`]s. Row leaves carry their body values, indexed by column
//! leaf position. Navigators compile a hierarchy into an [`AxisTree`], a flat
//! arena with parent links, levels and precomputed leaf ranges, so every
//! navigator query is O(1) or O(children).

use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::events::Dimension;
use crate::model::navigator::{BodyItem, HierarchyMember};

/// Separator used to build stable keys from key paths.
pub const KEY_PATH_SEPARATOR: char = '/';

/// One node of a hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Key unique among siblings.
    pub key: String,
    /// Display label. Falls back to the key when empty.
    #[serde(default)]
    pub label: String,
    /// Body values (row leaves only), indexed by column leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Create a node with a key and label.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            values: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a node whose label is its key.
    pub fn leaf(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key)
    }

    /// Attach body values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(|v| Some(v.into())).collect();
        self
    }

    /// Attach body values where some intersections are missing.
    pub fn with_optional_values(mut self, values: Vec<Option<String>>) -> Self {
        self.values = values;
        self
    }

    /// Attach children.
    pub fn with_children(mut self, children: Vec<HierarchyNode>) -> Self {
        self.children = children;
        self
    }

    fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }
}

/// A complete axis description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    /// Names of each level, shown in the corner block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub level_names: Vec<String>,
    pub roots: Vec<HierarchyNode>,
    /// Footer values indexed by column leaf (row hierarchies only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub totals: Option<Vec<Option<String>>>,
}

impl Hierarchy {
    /// Create a hierarchy from root nodes.
    pub fn new(roots: Vec<HierarchyNode>) -> Self {
        Self {
            level_names: Vec::new(),
            roots,
            totals: None,
        }
    }

    /// A single-level hierarchy of labelled leaves.
    pub fn flat<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(labels.into_iter().map(HierarchyNode::leaf).collect())
    }

    /// Set level names.
    pub fn with_level_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.level_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the footer (totals) row.
    pub fn with_totals<I, S>(mut self, totals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.totals = Some(totals.into_iter().map(|v| Some(v.into())).collect());
        self
    }

    /// Whether the hierarchy has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        fn count(node: &HierarchyNode) -> usize {
            if node.children.is_empty() {
                1
            } else {
                node.children.iter().map(count).sum()
            }
        }
        self.roots.iter().map(count).sum()
    }
}

#[derive(Debug, Clone)]
struct AxisNode {
    key: Arc<str>,
    label: Arc<str>,
    parent: Option<usize>,
    children: Vec<usize>,
    level: usize,
    index_in_parent: usize,
    leaves: Range<usize>,
    values: Vec<Option<Arc<str>>>,
}

/// Compiled arena for one axis.
#[derive(Debug, Clone)]
pub struct AxisTree {
    dimension: Dimension,
    nodes: Vec<AxisNode>,
    roots: Vec<usize>,
    leaves: Vec<usize>,
    depth: usize,
    level_names: Vec<Arc<str>>,
    totals: Option<Vec<Option<Arc<str>>>>,
}

impl AxisTree {
    /// An empty axis.
    pub fn empty(dimension: Dimension) -> Self {
        Self {
            dimension,
            nodes: Vec::new(),
            roots: Vec::new(),
            leaves: Vec::new(),
            depth: 0,
            level_names: Vec::new(),
            totals: None,
        }
    }

    /// Compile a hierarchy.
    ///
    /// With `flatten`, only the leaves are kept and they all sit at level 0;
    /// their stable keys still encode the full path.
    pub fn build(dimension: Dimension, hierarchy: &Hierarchy, flatten: bool) -> Self {
        let mut tree = Self::empty(dimension);
        tree.level_names = hierarchy
            .level_names
            .iter()
            .map(|n| Arc::from(n.as_str()))
            .collect();
        tree.totals = hierarchy
            .totals
            .as_ref()
            .map(|t| t.iter().map(|v| v.as_deref().map(Arc::from)).collect());

        if flatten {
            let mut flat = Vec::new();
            for root in &hierarchy.roots {
                collect_leaves(root, "", &mut flat);
            }
            for (index, (key, node)) in flat.into_iter().enumerate() {
                let slot = tree.push_node(key, node, None, 0, index);
                tree.nodes[slot].leaves = index..index + 1;
                tree.leaves.push(slot);
                tree.roots.push(slot);
            }
        } else {
            for (index, root) in hierarchy.roots.iter().enumerate() {
                let slot = tree.insert(root, "", None, 0, index);
                tree.roots.push(slot);
            }
        }

        tree.depth = tree.nodes.iter().map(|n| n.level + 1).max().unwrap_or(0);
        tree
    }

    fn insert(
        &mut self,
        node: &HierarchyNode,
        prefix: &str,
        parent: Option<usize>,
        level: usize,
        index_in_parent: usize,
    ) -> usize {
        let key = join_key(prefix, &node.key);
        let slot = self.push_node(key.clone(), node, parent, level, index_in_parent);
        let start = self.leaves.len();
        if node.children.is_empty() {
            self.leaves.push(slot);
        } else {
            for (index, child) in node.children.iter().enumerate() {
                let child_slot = self.insert(child, &key, Some(slot), level + 1, index);
                self.nodes[slot].children.push(child_slot);
            }
        }
        self.nodes[slot].leaves = start..self.leaves.len();
        slot
    }

    fn push_node(
        &mut self,
        key: String,
        node: &HierarchyNode,
        parent: Option<usize>,
        level: usize,
        index_in_parent: usize,
    ) -> usize {
        let slot = self.nodes.len();
        self.nodes.push(AxisNode {
            key: Arc::from(key.as_str()),
            label: Arc::from(node.display_label()),
            parent,
            children: Vec::new(),
            level,
            index_in_parent,
            leaves: 0..0,
            values: node
                .values
                .iter()
                .map(|v| v.as_deref().map(Arc::from))
                .collect(),
        });
        slot
    }

    /// Which axis this tree describes.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Number of levels (0 when empty).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Handle for the node in `slot`.
    pub fn member(&self, slot: usize) -> Option<HierarchyMember> {
        let node = self.nodes.get(slot)?;
        Some(HierarchyMember {
            dimension: self.dimension,
            slot,
            key: node.key.clone(),
            label: node.label.clone(),
            level: node.level,
            is_leaf: node.children.is_empty(),
        })
    }

    /// Leaf at `index`.
    pub fn leaf_at(&self, index: usize) -> Option<HierarchyMember> {
        self.leaves.get(index).and_then(|&slot| self.member(slot))
    }

    fn node_for(&self, member: &HierarchyMember) -> Option<&AxisNode> {
        if member.dimension != self.dimension {
            return None;
        }
        self.nodes
            .get(member.slot)
            .filter(|node| node.key == member.key)
    }

    /// Leaf index of a leaf member.
    pub fn leaf_index(&self, member: &HierarchyMember) -> Option<usize> {
        let node = self.node_for(member)?;
        node.children.is_empty().then_some(node.leaves.start)
    }

    /// Leaf range covered by a member.
    pub fn leaf_range(&self, member: &HierarchyMember) -> Range<usize> {
        self.node_for(member)
            .map(|node| node.leaves.clone())
            .unwrap_or(0..0)
    }

    /// Parent member.
    pub fn parent(&self, member: &HierarchyMember) -> Option<HierarchyMember> {
        self.node_for(member)?.parent.and_then(|p| self.member(p))
    }

    /// Position among siblings.
    pub fn index_in_parent(&self, member: &HierarchyMember) -> usize {
        self.node_for(member)
            .map(|node| node.index_in_parent)
            .unwrap_or(0)
    }

    /// Whether the member is the last of its siblings.
    pub fn is_last_item(&self, member: &HierarchyMember) -> bool {
        let Some(node) = self.node_for(member) else {
            return false;
        };
        let sibling_count = match node.parent {
            Some(parent) => self.nodes[parent].children.len(),
            None => self.roots.len(),
        };
        node.index_in_parent + 1 == sibling_count
    }

    /// Children in order.
    pub fn children(&self, member: &HierarchyMember) -> Vec<HierarchyMember> {
        self.node_for(member)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&c| self.member(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Body value of this (row) leaf at a column leaf index.
    pub fn value_at(&self, member: &HierarchyMember, column_index: usize) -> Option<Arc<str>> {
        self.node_for(member)?.values.get(column_index)?.clone()
    }

    /// Name of a level.
    pub fn level_name(&self, level: usize) -> Option<Arc<str>> {
        self.level_names.get(level).cloned()
    }

    /// Whether the axis carries a totals row.
    pub fn has_totals(&self) -> bool {
        self.totals.is_some()
    }

    /// Total at a column leaf index.
    pub fn total_at(&self, column_index: usize) -> Option<Arc<str>> {
        self.totals.as_ref()?.get(column_index)?.clone()
    }
}

/// Intersection of a row leaf and a column leaf across two trees.
pub(crate) fn intersect(rows: &AxisTree, columns: &AxisTree, row: &HierarchyMember, column: &HierarchyMember) -> Option<BodyItem> {
    let column_index = columns.leaf_index(column)?;
    rows.leaf_index(row)?;
    let value = rows.value_at(row, column_index)?;
    Some(BodyItem {
        row_key: row.key.clone(),
        column_key: column.key.clone(),
        value,
    })
}

/// Footer item for a column leaf, read from the row tree's totals.
pub(crate) fn footer_item(rows: &AxisTree, columns: &AxisTree, column: &HierarchyMember) -> Option<BodyItem> {
    let column_index = columns.leaf_index(column)?;
    let value = rows.total_at(column_index)?;
    Some(BodyItem {
        row_key: Arc::from("#footer"),
        column_key: column.key.clone(),
        value,
    })
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{KEY_PATH_SEPARATOR}{key}")
    }
}

fn collect_leaves<'a>(node: &'a HierarchyNode, prefix: &str, out: &mut Vec<(String, &'a HierarchyNode)>) {
    let key = join_key(prefix, &node.key);
    if node.children.is_empty() {
        out.push((key, node));
    } else {
        for child in &node.children {
            collect_leaves(child, &key, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> Hierarchy {
        Hierarchy::new(vec![
            HierarchyNode::leaf("East").with_children(vec![
                HierarchyNode::leaf("NY"),
                HierarchyNode::leaf("MA"),
            ]),
            HierarchyNode::leaf("West").with_children(vec![HierarchyNode::leaf("CA")]),
        ])
        .with_level_names(["Region", "State"])
    }

    #[test]
    fn test_build_tree_ranges() {
        let tree = AxisTree::build(Dimension::Row, &regions(), false);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.leaf_count(), 3);

        let east = tree.member(0).unwrap();
        assert_eq!(&*east.key, "East");
        assert!(!east.is_leaf);
        assert_eq!(tree.leaf_range(&east), 0..2);

        let ma = tree.leaf_at(1).unwrap();
        assert_eq!(&*ma.key, "East/MA");
        assert_eq!(ma.level, 1);
        assert!(tree.is_last_item(&ma));
        assert_eq!(tree.parent(&ma).unwrap().key, east.key);

        let west = tree.parent(&tree.leaf_at(2).unwrap()).unwrap();
        assert_eq!(tree.leaf_range(&west), 2..3);
        assert_eq!(tree.index_in_parent(&west), 1);
    }

    #[test]
    fn test_flatten_keeps_path_keys() {
        let tree = AxisTree::build(Dimension::Column, &regions(), true);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(&*tree.leaf_at(2).unwrap().key, "West/CA");
        assert!(tree.leaf_at(2).unwrap().is_leaf);
    }

    #[test]
    fn test_empty_hierarchy() {
        let tree = AxisTree::build(Dimension::Row, &Hierarchy::default(), false);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 0);
        assert!(tree.leaf_at(0).is_none());
    }

    #[test]
    fn test_stale_member_is_rejected() {
        let tree = AxisTree::build(Dimension::Row, &regions(), false);
        let mut member = tree.leaf_at(0).unwrap();
        member.key = Arc::from("Gone");
        assert_eq!(tree.leaf_index(&member), None);
        assert_eq!(tree.leaf_range(&member), 0..0);
    }

    #[test]
    fn test_hierarchy_serde() {
        let json = r#"{
            "roots": [
                { "key": "r1", "values": ["1", null, "3"] },
                { "key": "r2", "label": "Second" }
            ],
            "totals": ["10", "20", "30"]
        }"#;
        let hierarchy: Hierarchy = serde_json::from_str(json).unwrap();
        assert_eq!(hierarchy.leaf_count(), 2);
        assert_eq!(hierarchy.roots[0].values[1], None);
        assert_eq!(hierarchy.roots[1].label, "Second");

        let tree = AxisTree::build(Dimension::Row, &hierarchy, true);
        assert_eq!(&*tree.leaf_at(0).unwrap().label, "r1");
        assert_eq!(tree.total_at(2).as_deref(), Some("30"));
    }
}
