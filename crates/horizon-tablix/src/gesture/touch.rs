//! Region delegates and the touch manager.

use horizon_tablix_core::logging::targets;

use crate::config::GestureConfig;
use crate::events::TablixRegion;
use crate::geometry::{Point, Rect, Vector};
use crate::gesture::axis_lock::{AxisLock, AxisLockClassifier};

/// A movement in fractional leaves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DomainDelta {
    pub rows: f64,
    pub columns: f64,
}

impl DomainDelta {
    pub fn is_zero(&self) -> bool {
        self.rows == 0.0 && self.columns == 0.0
    }
}

/// Converts pixel movement inside one region into domain units.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDelegate {
    region: TablixRegion,
    bounds: Rect,
    row_size: f32,
    column_size: f32,
    down: bool,
}

impl RegionDelegate {
    pub fn new(region: TablixRegion, bounds: Rect) -> Self {
        Self {
            region,
            bounds,
            row_size: 0.0,
            column_size: 0.0,
            down: false,
        }
    }

    pub fn region(&self) -> TablixRegion {
        self.region
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Set the average item sizes used for conversion.
    pub fn seed(&mut self, row_size: f32, column_size: f32) {
        self.row_size = row_size;
        self.column_size = column_size;
    }

    /// Convert a pixel delta to fractional rows and columns.
    ///
    /// Header regions move along their own axis only: the column header
    /// ignores vertical motion, the row header horizontal motion. The
    /// footer scrolls with the columns; the corner does not scroll.
    pub fn to_domain_delta(&self, delta: Vector) -> DomainDelta {
        let (dx, dy) = match self.region {
            TablixRegion::Corner => (0.0, 0.0),
            TablixRegion::ColumnHeader | TablixRegion::Footer => (delta.dx, 0.0),
            TablixRegion::RowHeader => (0.0, delta.dy),
            TablixRegion::Body => (delta.dx, delta.dy),
        };
        DomainDelta {
            rows: per_item(dy, self.row_size),
            columns: per_item(dx, self.column_size),
        }
    }
}

fn per_item(pixels: f32, item_size: f32) -> f64 {
    if item_size > 0.0 && item_size.is_finite() {
        f64::from(pixels) / f64::from(item_size)
    } else {
        0.0
    }
}

/// A converted drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureOutput {
    pub region: TablixRegion,
    pub delta: DomainDelta,
    /// Lock in force for this sample, if decided.
    pub lock: Option<AxisLock>,
}

/// An up event delivered to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionUp {
    pub region: TablixRegion,
    /// The pointer was released outside the region.
    pub synthetic: bool,
}

/// Routes pointer input to region delegates.
#[derive(Debug, Clone)]
pub struct TouchManager {
    delegates: Vec<RegionDelegate>,
    classifier: AxisLockClassifier,
    active: Option<TablixRegion>,
    row_size: f32,
    column_size: f32,
}

impl TouchManager {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            delegates: Vec::new(),
            classifier: AxisLockClassifier::new(config),
            active: None,
            row_size: 0.0,
            column_size: 0.0,
        }
    }

    /// Register or move the delegate for `region`.
    pub fn register_region(&mut self, region: TablixRegion, bounds: Rect) {
        match self.delegates.iter_mut().find(|d| d.region == region) {
            Some(delegate) => delegate.bounds = bounds,
            None => {
                let mut delegate = RegionDelegate::new(region, bounds);
                delegate.seed(self.row_size, self.column_size);
                self.delegates.push(delegate);
            }
        }
    }

    pub fn delegate(&self, region: TablixRegion) -> Option<&RegionDelegate> {
        self.delegates.iter().find(|d| d.region == region)
    }

    /// Region containing `point`; empty regions never match.
    pub fn region_at(&self, point: Point) -> Option<TablixRegion> {
        self.delegates
            .iter()
            .find(|d| !d.bounds.is_empty() && d.bounds.contains(point))
            .map(|d| d.region)
    }

    /// Re-seed every delegate with the current average item sizes.
    pub fn seed_average_sizes(&mut self, row_size: f32, column_size: f32) {
        self.row_size = row_size;
        self.column_size = column_size;
        for delegate in &mut self.delegates {
            delegate.seed(row_size, column_size);
        }
    }

    /// Region being dragged, if any.
    pub fn active_region(&self) -> Option<TablixRegion> {
        self.active
    }

    pub fn pointer_down(&mut self, position: Point) -> Option<TablixRegion> {
        let region = self.region_at(position)?;
        if let Some(delegate) = self.delegates.iter_mut().find(|d| d.region == region) {
            delegate.down = true;
        }
        self.classifier.reset();
        self.active = Some(region);
        Some(region)
    }

    pub fn pointer_move(&mut self, delta: Vector) -> Option<GestureOutput> {
        let region = self.active?;
        let lock = self.classifier.sample(delta);
        let filtered = self.classifier.filter(delta);
        let delegate = self.delegate(region)?;
        Some(GestureOutput {
            region,
            delta: delegate.to_domain_delta(filtered),
            lock,
        })
    }

    /// Release every region recorded as down. Regions that do not contain
    /// the release point get a synthetic up.
    pub fn pointer_up(&mut self, position: Point) -> Vec<RegionUp> {
        let mut ups = Vec::new();
        for delegate in &mut self.delegates {
            if delegate.down {
                delegate.down = false;
                let synthetic = !delegate.bounds.contains(position);
                if synthetic {
                    tracing::trace!(target: targets::GESTURE, region = ?delegate.region, "synthetic up");
                }
                ups.push(RegionUp {
                    region: delegate.region,
                    synthetic,
                });
            }
        }
        self.active = None;
        self.classifier.reset();
        ups
    }
}

impl Default for TouchManager {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TouchManager {
        let mut touch = TouchManager::default();
        touch.register_region(TablixRegion::ColumnHeader, Rect::new(40.0, 0.0, 200.0, 20.0));
        touch.register_region(TablixRegion::RowHeader, Rect::new(0.0, 20.0, 40.0, 200.0));
        touch.register_region(TablixRegion::Body, Rect::new(40.0, 20.0, 200.0, 200.0));
        touch.seed_average_sizes(20.0, 50.0);
        touch
    }

    #[test]
    fn test_region_conversion() {
        let body = RegionDelegate {
            region: TablixRegion::Body,
            bounds: Rect::ZERO,
            row_size: 20.0,
            column_size: 50.0,
            down: false,
        };
        let delta = body.to_domain_delta(Vector::new(25.0, -30.0));
        assert_eq!(delta, DomainDelta { rows: -1.5, columns: 0.5 });

        let header = RegionDelegate {
            region: TablixRegion::ColumnHeader,
            ..body.clone()
        };
        assert_eq!(header.to_domain_delta(Vector::new(25.0, -30.0)).rows, 0.0);

        let rows = RegionDelegate {
            region: TablixRegion::RowHeader,
            ..body
        };
        assert_eq!(rows.to_domain_delta(Vector::new(25.0, -30.0)).columns, 0.0);
    }

    #[test]
    fn test_unseeded_delegate_is_inert() {
        let delegate = RegionDelegate::new(TablixRegion::Body, Rect::ZERO);
        assert!(delegate.to_domain_delta(Vector::new(10.0, 10.0)).is_zero());
    }

    #[test]
    fn test_drag_in_body_locks_vertical() {
        let mut touch = manager();
        assert_eq!(touch.pointer_down(Point::new(100.0, 100.0)), Some(TablixRegion::Body));
        let mut last = None;
        for _ in 0..3 {
            last = touch.pointer_move(Vector::new(1.0, 20.0));
        }
        let out = last.unwrap();
        assert_eq!(out.lock, Some(AxisLock::Vertical));
        assert_eq!(out.delta.columns, 0.0);
        assert_eq!(out.delta.rows, 1.0);
    }

    #[test]
    fn test_synthetic_up_outside_region() {
        let mut touch = manager();
        touch.pointer_down(Point::new(100.0, 10.0));
        let ups = touch.pointer_up(Point::new(500.0, 500.0));
        assert_eq!(
            ups,
            vec![RegionUp {
                region: TablixRegion::ColumnHeader,
                synthetic: true
            }]
        );
        assert!(!touch.delegate(TablixRegion::ColumnHeader).unwrap().is_down());
        assert!(touch.pointer_move(Vector::new(5.0, 0.0)).is_none());
    }

    #[test]
    fn test_up_inside_region_is_real() {
        let mut touch = manager();
        touch.pointer_down(Point::new(10.0, 100.0));
        let ups = touch.pointer_up(Point::new(12.0, 110.0));
        assert_eq!(ups.len(), 1);
        assert!(!ups[0].synthetic);
    }

    #[test]
    fn test_down_outside_regions() {
        let mut touch = manager();
        assert_eq!(touch.pointer_down(Point::new(10.0, 5.0)), None);
        assert!(touch.pointer_up(Point::new(10.0, 5.0)).is_empty());
    }
}
