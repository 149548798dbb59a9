//! A grid-independent scrollbar model.
//!
//! A [`Scrollbar`] tracks a range `[min, max]`, the size of the visible view
//! and the position of its leading edge (`view_min`), all in domain units.
//! Drag, wheel and page gestures are converted into a new `view_min`;
//! listeners on [`Scrollbar::position_changed`] are notified only when it
//! actually changes.
//!
//! ```
//! use horizon_tablix::scrollbar::Scrollbar;
//!
//! let mut bar = Scrollbar::new();
//! bar.set_params(0.0, 100.0, 10.0);
//! bar.set_view_min(500.0);
//! assert_eq!(bar.view_min(), 90.0);
//! ```

use horizon_tablix_core::{Property, Signal};

/// Notches per wheel unit: one notch is 120 units.
pub const WHEEL_UNITS_PER_NOTCH: f64 = 120.0;

/// Steps scrolled per wheel notch.
pub const STEPS_PER_NOTCH: f64 = 3.0;

/// Default minimum thumb length in pixels.
pub const DEFAULT_MIN_THUMB: f32 = 20.0;

/// Scroll position model for one dimension.
pub struct Scrollbar {
    min: f64,
    max: f64,
    view_size: f64,
    view_min: Property<f64>,
    single_step: f64,
    /// Emitted with the new `view_min` when it changes.
    pub position_changed: Signal<f64>,
}

impl Default for Scrollbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollbar {
    pub fn new() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            view_size: 0.0,
            view_min: Property::new(0.0),
            single_step: 1.0,
            position_changed: Signal::new(),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn view_size(&self) -> f64 {
        self.view_size
    }

    pub fn view_min(&self) -> f64 {
        self.view_min.get()
    }

    /// Largest valid `view_min`.
    pub fn max_view_min(&self) -> f64 {
        (self.max - self.view_size).max(self.min)
    }

    pub fn single_step(&self) -> f64 {
        self.single_step
    }

    pub fn set_single_step(&mut self, step: f64) {
        self.single_step = step.abs();
    }

    /// Set the range and view size. A reversed range is swapped; the
    /// current position is clamped into the new range.
    pub fn set_params(&mut self, min: f64, max: f64, view_size: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = min;
        self.max = max;
        self.view_size = view_size.clamp(0.0, max - min);
        let current = self.view_min();
        self.set_view_min(current);
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max_view_min())
    }

    /// Move the view. Returns whether the position changed.
    pub fn set_view_min(&self, value: f64) -> bool {
        let clamped = self.clamp(value);
        if self.view_min.set(clamped) {
            self.position_changed.emit(clamped);
            true
        } else {
            false
        }
    }

    /// Move the view without notifying listeners.
    pub fn set_view_min_silent(&self, value: f64) {
        self.view_min.set_silent(self.clamp(value));
    }

    /// Thumb offset and length within a track of `track_length` pixels.
    pub fn thumb_geometry(&self, track_length: f32, min_thumb: f32) -> (f32, f32) {
        let track_length = track_length.max(0.0);
        let range = self.max_view_min() - self.min;
        if range <= 0.0 {
            return (0.0, track_length);
        }
        let ratio = (self.view_size / (range + self.view_size)).min(1.0) as f32;
        let thumb = (track_length * ratio).max(min_thumb).min(track_length);
        let travel = track_length - thumb;
        let offset = ((self.view_min() - self.min) / range) as f32 * travel;
        (offset, thumb)
    }

    /// Position after dragging the thumb `track_delta` pixels from where it
    /// was when `start_value` was current.
    pub fn drag_to(&self, track_delta: f32, track_length: f32, start_value: f64) -> bool {
        let (_, thumb) = self.thumb_geometry(track_length, DEFAULT_MIN_THUMB);
        let travel = f64::from(track_length - thumb);
        if travel <= 0.0 {
            return false;
        }
        let range = self.max_view_min() - self.min;
        self.set_view_min(start_value + f64::from(track_delta) / travel * range)
    }

    /// Apply a wheel rotation of `delta` units; positive rotates away from
    /// the user and scrolls back.
    pub fn wheel(&self, delta: f64) -> bool {
        let steps = (delta / WHEEL_UNITS_PER_NOTCH * STEPS_PER_NOTCH).round();
        if steps == 0.0 {
            return false;
        }
        self.set_view_min(self.view_min() - steps * self.single_step)
    }

    /// Move by one view size.
    pub fn page(&self, forward: bool) -> bool {
        let step = if forward { self.view_size } else { -self.view_size };
        self.set_view_min(self.view_min() + step)
    }
}

impl std::fmt::Debug for Scrollbar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scrollbar")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("view_size", &self.view_size)
            .field("view_min", &self.view_min())
            .finish()
    }
}

static_assertions::assert_impl_all!(Scrollbar: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn bar() -> Scrollbar {
        let mut bar = Scrollbar::new();
        bar.set_params(0.0, 100.0, 10.0);
        bar
    }

    #[test]
    fn test_reversed_range_is_swapped() {
        let mut bar = Scrollbar::new();
        bar.set_params(100.0, 0.0, 10.0);
        assert_eq!(bar.min(), 0.0);
        assert_eq!(bar.max(), 100.0);
    }

    #[test]
    fn test_set_view_min_emits_on_change_only() {
        let bar = bar();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        bar.position_changed.connect(move |v| sink.lock().push(*v));

        assert!(bar.set_view_min(30.0));
        assert!(!bar.set_view_min(30.0));
        assert!(bar.set_view_min(-5.0));
        assert!(!bar.set_view_min(-1.0));
        assert_eq!(*seen.lock(), vec![30.0, 0.0]);
    }

    #[test]
    fn test_set_params_reclamps() {
        let mut bar = bar();
        bar.set_view_min(80.0);
        bar.set_params(0.0, 50.0, 10.0);
        assert_eq!(bar.view_min(), 40.0);
    }

    #[test]
    fn test_silent_set() {
        let bar = bar();
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        bar.position_changed.connect(move |_| *sink.lock() += 1);
        bar.set_view_min_silent(12.0);
        assert_eq!(bar.view_min(), 12.0);
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_wheel_and_page() {
        let bar = bar();
        assert!(bar.wheel(-120.0));
        assert_eq!(bar.view_min(), 3.0);
        assert!(!bar.wheel(10.0));
        assert!(bar.page(true));
        assert_eq!(bar.view_min(), 13.0);
        assert!(bar.page(false));
        assert!(bar.page(false));
        assert_eq!(bar.view_min(), 0.0);
    }

    #[test]
    fn test_thumb_geometry() {
        let bar = bar();
        let (offset, length) = bar.thumb_geometry(200.0, 20.0);
        assert_eq!(offset, 0.0);
        assert_eq!(length, 20.0);

        bar.set_view_min(90.0);
        let (offset, length) = bar.thumb_geometry(200.0, 20.0);
        assert_eq!(offset + length, 200.0);

        let mut empty = Scrollbar::new();
        empty.set_params(0.0, 5.0, 10.0);
        assert_eq!(empty.thumb_geometry(200.0, 20.0), (0.0, 200.0));
    }

    #[test]
    fn test_drag() {
        let bar = bar();
        // 180px of travel covers 90 units.
        assert!(bar.drag_to(90.0, 200.0, 0.0));
        assert_eq!(bar.view_min(), 45.0);
        bar.drag_to(1000.0, 200.0, 0.0);
        assert_eq!(bar.view_min(), 90.0);
    }
}
