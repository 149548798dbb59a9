//! Core systems for Horizon Tablix.
//!
//! This crate provides the foundational pieces the grid engine builds on:
//!
//! - **Signal/Slot System**: Type-safe outward notifications
//! - **Property System**: Values with change detection
//! - **Logging**: Tracing targets, span names and a performance span guard
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_tablix_core::Signal;
//!
//! let resized = Signal::<(usize, f32)>::new();
//!
//! let conn_id = resized.connect(|(index, size)| {
//!     println!("Column {} is now {}px", index, size);
//! });
//!
//! resized.emit((2, 120.0));
//! resized.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod property;
pub mod signal;

pub use error::{Result, SignalError, TablixCoreError};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
