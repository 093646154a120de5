//! Basic 2D types: `Point`, derived `Segment`, axis-aligned `Rect`.

use nalgebra::Vector2;

use super::util::{orient, same_point};

/// Coordinate tolerance for orientation and coincidence tests.
pub const EPS: f64 = 1e-9;

/// World-space point.
pub type Point = Vector2<f64>;

/// Derived segment `a → b`; built on demand, never stored by the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// Euclidean distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let d = self.b - self.a;
        let len2 = d.norm_squared();
        if len2 <= EPS * EPS {
            return (p - self.a).norm();
        }
        let t = ((p - self.a).dot(&d) / len2).clamp(0.0, 1.0);
        (self.a + d * t - p).norm()
    }

    /// Closed-segment intersection (touching and collinear overlap count).
    pub fn intersects(&self, o: &Segment) -> bool {
        let d1 = orient(o.a, o.b, self.a);
        let d2 = orient(o.a, o.b, self.b);
        let d3 = orient(self.a, self.b, o.a);
        let d4 = orient(self.a, self.b, o.b);
        let straddles = |x: f64, y: f64| (x > EPS && y < -EPS) || (x < -EPS && y > EPS);
        if straddles(d1, d2) && straddles(d3, d4) {
            return true;
        }
        (d1.abs() <= EPS && within_box(o.a, o.b, self.a))
            || (d2.abs() <= EPS && within_box(o.a, o.b, self.b))
            || (d3.abs() <= EPS && within_box(self.a, self.b, o.a))
            || (d4.abs() <= EPS && within_box(self.a, self.b, o.b))
    }

    /// Intersection other than one shared endpoint.
    ///
    /// Two segments that share an endpoint conflict only when they also overlap
    /// collinearly beyond it (fold-back). Everything else that intersects conflicts.
    pub fn conflicts(&self, o: &Segment) -> bool {
        if !self.intersects(o) {
            return false;
        }
        let pairs = [
            (self.a, self.b, o.a, o.b),
            (self.a, self.b, o.b, o.a),
            (self.b, self.a, o.a, o.b),
            (self.b, self.a, o.b, o.a),
        ];
        match pairs.iter().find(|(p, _, q, _)| same_point(*p, *q, EPS)) {
            None => true,
            Some(&(p, p_far, _, q_far)) => {
                let u = p_far - p;
                let v = q_far - p;
                (u.x * v.y - u.y * v.x).abs() <= EPS && u.dot(&v) > EPS
            }
        }
    }
}

#[inline]
fn within_box(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) - EPS
        && p.x <= a.x.max(b.x) + EPS
        && p.y >= a.y.min(b.y) - EPS
        && p.y <= a.y.max(b.y) + EPS
}

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Smallest rectangle containing all `pts`; `None` for an empty slice.
    pub fn from_points(pts: &[Point]) -> Option<Rect> {
        let first = *pts.first()?;
        let mut r = Rect {
            min: first,
            max: first,
        };
        for p in &pts[1..] {
            r.min.x = r.min.x.min(p.x);
            r.min.y = r.min.y.min(p.y);
            r.max.x = r.max.x.max(p.x);
            r.max.y = r.max.y.max(p.y);
        }
        Some(r)
    }
    #[inline]
    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        within_box(self.min, self.max, p)
    }
    pub fn union(&self, o: &Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(o.min.x), self.min.y.min(o.min.y)),
            max: Point::new(self.max.x.max(o.max.x), self.max.y.max(o.max.y)),
        }
    }
    /// Closed rectangles share at least one point.
    #[inline]
    pub fn overlaps(&self, o: &Rect) -> bool {
        self.min.x <= o.max.x + EPS
            && o.min.x <= self.max.x + EPS
            && self.min.y <= o.max.y + EPS
            && o.min.y <= self.max.y + EPS
    }
    /// Grow by `d` on every side.
    pub fn inflate(&self, d: f64) -> Rect {
        Rect {
            min: self.min - Point::new(d, d),
            max: self.max + Point::new(d, d),
        }
    }
}
