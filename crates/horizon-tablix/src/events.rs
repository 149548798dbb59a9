//! Event records flowing into and out of the control.
//!
//! Inbound: [`PointerEvent`], a normalized touch/mouse record.
//! Outbound: [`ScrollEvent`] and [`ResizeCommit`], carried by the control's
//! signals.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Vector};

/// One of the two coupled grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    /// Vertical axis: rows, driven by the row hierarchy.
    Row,
    /// Horizontal axis: columns, driven by the column hierarchy.
    Column,
}

impl Dimension {
    /// Both dimensions, columns first (the order iterations realize them in).
    pub const ALL: [Dimension; 2] = [Dimension::Column, Dimension::Row];

    /// The opposite dimension.
    pub fn other(self) -> Dimension {
        match self {
            Dimension::Row => Dimension::Column,
            Dimension::Column => Dimension::Row,
        }
    }
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Button pressed or finger down.
    Down,
    /// Pointer moved.
    Move,
    /// Button released or finger lifted.
    Up,
    /// Wheel rotation; the delta field carries the wheel delta.
    Wheel,
}

/// Pressed-button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerButtons {
    pub primary: bool,
    pub secondary: bool,
    pub shift: bool,
}

impl PointerButtons {
    /// Only the primary button held.
    pub const PRIMARY: Self = Self {
        primary: true,
        secondary: false,
        shift: false,
    };
}

/// A normalized touch or mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    /// Movement since the previous event (or the wheel delta).
    pub delta: Vector,
    pub buttons: PointerButtons,
    /// 1 for a single click, 2 for a double-click.
    pub click_count: u8,
}

impl PointerEvent {
    /// A primary-button press.
    pub fn down(position: Point) -> Self {
        Self {
            phase: PointerPhase::Down,
            position,
            delta: Vector::ZERO,
            buttons: PointerButtons::PRIMARY,
            click_count: 1,
        }
    }

    /// A double-click press.
    pub fn double_click(position: Point) -> Self {
        Self {
            click_count: 2,
            ..Self::down(position)
        }
    }

    /// A drag move to `position`.
    pub fn moved(position: Point, delta: Vector) -> Self {
        Self {
            phase: PointerPhase::Move,
            position,
            delta,
            buttons: PointerButtons::PRIMARY,
            click_count: 0,
        }
    }

    /// A release at `position`.
    pub fn up(position: Point) -> Self {
        Self {
            phase: PointerPhase::Up,
            position,
            delta: Vector::ZERO,
            buttons: PointerButtons::default(),
            click_count: 0,
        }
    }

    /// A wheel rotation of `delta` units (120 per notch).
    pub fn wheel(position: Point, delta: Vector) -> Self {
        Self {
            phase: PointerPhase::Wheel,
            position,
            delta,
            buttons: PointerButtons::default(),
            click_count: 0,
        }
    }
}

/// Named screen regions of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TablixRegion {
    Corner,
    ColumnHeader,
    RowHeader,
    Body,
    Footer,
}

/// Payload of the control's `scrolled` signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub dimension: Dimension,
    /// Index of the first visible leaf.
    pub integer_offset: usize,
    /// Sub-item remainder in `[0, 1)`.
    pub fractional_offset: f32,
}

/// Payload of the control's `resize_committed` signal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCommit {
    pub dimension: Dimension,
    /// Position of the item along its axis, header items first.
    pub index: usize,
    /// Stable key under which the size is persisted.
    pub key: Arc<str>,
    pub size: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_other() {
        assert_eq!(Dimension::Row.other(), Dimension::Column);
        assert_eq!(Dimension::Column.other(), Dimension::Row);
    }

    #[test]
    fn test_double_click_constructor() {
        let event = PointerEvent::double_click(Point::new(1.0, 2.0));
        assert_eq!(event.phase, PointerPhase::Down);
        assert_eq!(event.click_count, 2);
        assert!(event.buttons.primary);
    }
}
