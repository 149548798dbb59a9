//! Axis-lock classification of drags.

use crate::config::GestureConfig;
use crate::geometry::Vector;

/// Axis a drag is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisLock {
    Horizontal,
    Vertical,
    /// Neither axis; both components pass through.
    FreeForm,
}

impl AxisLock {
    /// Zero the cross-axis component of `delta`.
    pub fn filter(self, delta: Vector) -> Vector {
        match self {
            AxisLock::Horizontal => Vector::new(delta.dx, 0.0),
            AxisLock::Vertical => Vector::new(0.0, delta.dy),
            AxisLock::FreeForm => delta,
        }
    }
}

/// Classifies an in-progress drag as horizontal, vertical or free-form.
///
/// Nothing is decided until the cumulative movement exceeds the lock
/// threshold. After that, each sample whose cumulative direction is within
/// the angle tolerance of an axis counts toward that axis; the lock is taken
/// after enough consecutive agreeing samples. A direction outside the
/// tolerance locks free-form immediately. The lock holds until
/// [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct AxisLockClassifier {
    config: GestureConfig,
    cumulative: Vector,
    candidate: Option<AxisLock>,
    agreeing: usize,
    lock: Option<AxisLock>,
}

impl AxisLockClassifier {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            cumulative: Vector::ZERO,
            candidate: None,
            agreeing: 0,
            lock: None,
        }
    }

    /// The lock, once taken.
    pub fn lock(&self) -> Option<AxisLock> {
        self.lock
    }

    /// Movement accumulated since the last reset.
    pub fn cumulative(&self) -> Vector {
        self.cumulative
    }

    /// Feed one movement sample; returns the lock if one is held.
    pub fn sample(&mut self, delta: Vector) -> Option<AxisLock> {
        if self.lock.is_some() {
            return self.lock;
        }
        self.cumulative += delta;
        if self.cumulative.length() < self.config.lock_threshold {
            return None;
        }

        let angle = self.cumulative.axis_angle_degrees();
        let tolerance = self.config.angle_tolerance_degrees;
        let direction = if angle <= tolerance {
            AxisLock::Horizontal
        } else if angle >= 90.0 - tolerance {
            AxisLock::Vertical
        } else {
            self.lock = Some(AxisLock::FreeForm);
            return self.lock;
        };

        if self.candidate == Some(direction) {
            self.agreeing += 1;
        } else {
            self.candidate = Some(direction);
            self.agreeing = 1;
        }
        if self.agreeing >= self.config.lock_samples.max(1) {
            self.lock = Some(direction);
        }
        self.lock
    }

    /// Apply the held lock to `delta`; unlocked deltas pass through.
    pub fn filter(&self, delta: Vector) -> Vector {
        self.lock.map_or(delta, |lock| lock.filter(delta))
    }

    /// Forget the gesture.
    pub fn reset(&mut self) {
        self.cumulative = Vector::ZERO;
        self.candidate = None;
        self.agreeing = 0;
        self.lock = None;
    }
}

impl Default for AxisLockClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}
