//! Change-detecting properties.
//!
//! A [`Property<T>`] wraps a value and reports whether a `set` actually
//! changed it. The owner pairs it with a [`Signal`](crate::Signal) and emits
//! only when `set` returns `true`:
//!
//! ```
//! use horizon_tablix_core::{Property, Signal};
//!
//! struct Position {
//!     value: Property<f64>,
//!     changed: Signal<f64>,
//! }
//!
//! impl Position {
//!     fn set(&self, v: f64) {
//!         if self.value.set(v) {
//!             self.changed.emit(v);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell with change detection.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Set the value without reporting a change.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it differs from the current one.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(Property<f64>: Send, Sync);
