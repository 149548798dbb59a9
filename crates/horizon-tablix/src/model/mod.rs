//! External data contracts: hierarchy navigation and cell binding.
//!
//! The grid consumes exactly two abstractions from the outside world:
//!
//! - [`HierarchyNavigator`] - logical rows, columns and intersections
//! - [`CellBinder`] - content for a realized cell
//!
//! Two navigators are provided: [`TableNavigator`] for flat record sets and
//! [`MatrixNavigator`] for nested row × column trees.

pub mod binder;
pub mod hierarchy;
pub mod matrix;
pub mod navigator;
pub mod table;

pub use binder::{CellBinder, TextCellBinder};
pub use hierarchy::{AxisTree, Hierarchy, HierarchyNode};
pub use matrix::MatrixNavigator;
pub use navigator::{BodyItem, CornerItem, HierarchyMember, HierarchyNavigator};
pub use table::TableNavigator;
