//! Prelude module for Horizon Tablix.
//!
//! ```ignore
//! use horizon_tablix::prelude::*;
//! ```

// ============================================================================
// Control
// ============================================================================

pub use crate::config::{GestureConfig, TablixConfig};
pub use crate::control::TablixControl;
pub use crate::error::{BindError, TablixError};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    BodyItem, CellBinder, CornerItem, Hierarchy, HierarchyMember, HierarchyNavigator, HierarchyNode, MatrixNavigator,
    TableNavigator, TextCellBinder,
};

// ============================================================================
// Grid and Layout
// ============================================================================

pub use crate::grid::{CellKind, Grid, ItemId, TablixCell, TextAlignment};
pub use crate::layout::{LayoutHost, LayoutState, ScrollState};
pub use crate::metrics::{FixedMetrics, MetricsProvider};
pub use crate::persistence::SizePersistence;

// ============================================================================
// Events and Geometry
// ============================================================================

pub use crate::events::{Dimension, PointerEvent, ResizeCommit, ScrollEvent, TablixRegion};
pub use crate::geometry::{Point, Rect, Size, Vector};
pub use horizon_tablix_core::Signal;
