//! Logging and tracing facilities for Horizon Tablix.
//!
//! Horizon Tablix uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_tablix::layout=debug")
//!     .init();
//! ```
//!
//! The constants in [`targets`] and [`span_names`] name every subsystem so
//! filters can be written without guessing module paths.

/// Span names used throughout Horizon Tablix for tracing.
pub mod span_names {
    /// A complete rendering session (start, iterations, end).
    pub const SESSION: &str = "horizon_tablix::session";
    /// One realization iteration inside a session.
    pub const ITERATION: &str = "horizon_tablix::iteration";
    /// A scroll session.
    pub const SCROLL: &str = "horizon_tablix::scroll";
    /// Span reconciliation pass.
    pub const RECONCILE: &str = "horizon_tablix::reconcile";
    /// Signal emission.
    pub const SIGNAL: &str = "horizon_tablix::signal";
}

/// Target names for log filtering.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "horizon_tablix_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_tablix_core::signal";
    /// Grid object graph (cells, rows, columns, binding).
    pub const GRID: &str = "horizon_tablix::grid";
    /// Dimension layout managers and span reconciliation.
    pub const LAYOUT: &str = "horizon_tablix::layout";
    /// Realization estimates.
    pub const REALIZATION: &str = "horizon_tablix::realization";
    /// Gesture routing and axis lock.
    pub const GESTURE: &str = "horizon_tablix::gesture";
    /// Interactive resizing.
    pub const RESIZE: &str = "horizon_tablix::resize";
    /// Control façade and sessions.
    pub const CONTROL: &str = "horizon_tablix::control";
    /// Persisted user sizes.
    pub const PERSISTENCE: &str = "horizon_tablix::persistence";
    /// Performance spans.
    pub const PERF: &str = "horizon_tablix::perf";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time sessions and reconciliation passes.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let _span = PerfSpan::new("test_operation");
        tracing::debug!(target: targets::PERF, value = 1, "inside perf span");
    }

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::GRID, targets::LAYOUT, targets::CONTROL] {
            assert!(target.starts_with("horizon_tablix::"));
        }
        assert!(span_names::SESSION.starts_with("horizon_tablix"));
    }
}
