use super::Point;

/// Twice the signed area of triangle `(a, b, c)`; positive for a left turn.
#[inline]
pub fn orient(a: Point, b: Point, c: Point) -> f64 {
    cross(b - a, c - a)
}

/// 2D cross product (z-component).
#[inline]
pub fn cross(u: Point, v: Point) -> f64 {
    u.x * v.y - u.y * v.x
}

#[inline]
pub fn same_point(p: Point, q: Point, eps: f64) -> bool {
    (p - q).norm() <= eps
}

/// Turn angle at `b` when walking `a → b → c`, in `[0, π]`.
///
/// Zero means `c` continues straight on; π means a full fold-back.
/// Degenerate (zero-length) legs give zero.
pub fn turn_angle(a: Point, b: Point, c: Point) -> f64 {
    let u = b - a;
    let v = c - b;
    if u.norm_squared() == 0.0 || v.norm_squared() == 0.0 {
        return 0.0;
    }
    cross(u, v).abs().atan2(u.dot(&v))
}
