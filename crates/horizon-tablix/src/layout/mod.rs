//! Dimension layout: measurement hosts, per-axis session state and span
//! reconciliation.

pub mod dimension;
pub mod host;
pub mod span;

pub use dimension::{DimensionLayoutManager, LayoutState, ScrollChange, ScrollState};
pub use host::LayoutHost;
pub use span::{align_spanned_sizes, alignment_excess};
