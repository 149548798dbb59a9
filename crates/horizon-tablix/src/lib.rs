//! Horizon Tablix - a virtualized hierarchical grid engine.
//!
//! Tablix renders tables and matrices (pivot-style row × column
//! hierarchies with spanning headers) over models far larger than the
//! viewport. Only the rows and columns that can be seen are realized; they
//! are pooled and rebound as the view scrolls.
//!
//! The crate is headless: measurement goes through a
//! [`MetricsProvider`](metrics::MetricsProvider) and all output is the
//! realized [`Grid`](grid::Grid) with positioned cells.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_tablix::prelude::*;
//!
//! let rows = Hierarchy::new(vec![
//!     HierarchyNode::new("east", "East").with_children(vec![
//!         HierarchyNode::leaf("NY").with_values(["10", "12"]),
//!         HierarchyNode::leaf("MA").with_values(["7", "9"]),
//!     ]),
//! ]);
//! let columns = Hierarchy::flat(["2023", "2024"]);
//!
//! let mut control = TablixControl::new(
//!     Box::new(MatrixNavigator::new(rows, columns)),
//!     Arc::new(TextCellBinder),
//!     LayoutHost::canvas(FixedMetrics::default()),
//! );
//! control.update_viewport(Size::new(640.0, 480.0));
//! assert_eq!(control.realized_row_count(), 2);
//! ```
//!
//! # Modules
//!
//! - [`control`]: the [`TablixControl`] façade and rendering sessions
//! - [`grid`]: realized rows, columns and cells
//! - [`layout`]: per-axis layout managers and span reconciliation
//! - [`model`]: hierarchy navigation and cell binding contracts
//! - [`gesture`], [`scrollbar`], [`resizer`]: interaction
//! - [`persistence`]: user sizes by stable key

pub mod config;
pub mod control;
pub mod debug;
pub mod error;
pub mod events;
pub mod geometry;
pub mod gesture;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod persistence;
pub mod prelude;
pub mod realization;
pub mod resizer;
pub mod scrollbar;

pub use config::{GestureConfig, TablixConfig};
pub use control::TablixControl;
pub use error::{BindError, Result, TablixError};
pub use horizon_tablix_core::{ConnectionId, Property, Signal};
