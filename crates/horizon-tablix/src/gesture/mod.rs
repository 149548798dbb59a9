//! Gesture routing.
//!
//! The [`TouchManager`] finds the region a drag starts in and hands each
//! movement sample to that region's [`RegionDelegate`], which converts pixels
//! into fractional rows and columns using the running average item sizes.
//! An [`AxisLockClassifier`] decides whether the drag is locked to one axis.

mod axis_lock;
mod touch;

pub use axis_lock::{AxisLock, AxisLockClassifier};
pub use touch::{DomainDelta, GestureOutput, RegionDelegate, RegionUp, TouchManager};
