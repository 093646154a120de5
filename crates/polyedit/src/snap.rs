//! Grid snapping and axis locking.

use crate::geom::Point;

/// Nearest multiple of `grid` per coordinate; ties round away from zero.
///
/// Non-positive or non-finite grids leave `p` untouched. Idempotent:
/// `snap(snap(p, g), g) == snap(p, g)`.
pub fn snap(p: Point, grid: f64) -> Point {
    if !(grid.is_finite() && grid > 0.0) {
        return p;
    }
    Point::new(snap_coord(p.x, grid), snap_coord(p.y, grid))
}

#[inline]
fn snap_coord(v: f64, grid: f64) -> f64 {
    (v / grid).round() * grid
}

/// Keep only the dominant offset of `p` from `anchor` (horizontal or vertical line).
pub fn constrain_axis(anchor: Point, p: Point) -> Point {
    let d = p - anchor;
    if d.x.abs() >= d.y.abs() {
        Point::new(p.x, anchor.y)
    } else {
        Point::new(anchor.x, p.y)
    }
}
