//! Open/closed polygon with the simplicity and containment predicates.

use super::types::{Point, Rect, Segment, EPS};

/// Ordered point sequence, open (polyline) or closed (ring).
///
/// Invariants (checked by `is_simple`, enforced by the scene before commit):
/// - closed: at least 3 points, non-zero area, no two non-adjacent edges touch,
///   adjacent edges never fold back onto each other;
/// - open: at least 1 point, same edge rules without the wrap-around edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub pts: Vec<Point>,
    pub closed: bool,
}

impl Polygon {
    #[inline]
    pub fn open(pts: Vec<Point>) -> Self {
        Self { pts, closed: false }
    }
    #[inline]
    pub fn closed(pts: Vec<Point>) -> Self {
        Self { pts, closed: true }
    }
    /// One-point open polygon (the seed of a new drawing).
    #[inline]
    pub fn point(p: Point) -> Self {
        Self::open(vec![p])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }
    /// Every coordinate is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.pts.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
    #[inline]
    pub fn first(&self) -> Option<Point> {
        self.pts.first().copied()
    }
    #[inline]
    pub fn last(&self) -> Option<Point> {
        self.pts.last().copied()
    }

    pub fn edge_count(&self) -> usize {
        match self.pts.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Edge `i` runs from point `i` to point `i + 1` (wrapping for closed polygons).
    #[inline]
    pub fn edge(&self, i: usize) -> Segment {
        let n = self.pts.len();
        Segment::new(self.pts[i], self.pts[(i + 1) % n])
    }

    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.edge_count()).map(move |i| self.edge(i))
    }

    /// Perimeter for closed polygons, path length for open ones.
    pub fn length(&self) -> f64 {
        self.edges().map(|e| e.length()).sum()
    }

    #[inline]
    pub fn bbox(&self) -> Option<Rect> {
        Rect::from_points(&self.pts)
    }

    /// Shoelace area; positive for counter-clockwise order.
    pub fn signed_area(&self) -> f64 {
        let n = self.pts.len();
        if n < 3 {
            return 0.0;
        }
        let mut a = 0.0;
        for i in 0..n {
            let p = self.pts[i];
            let q = self.pts[(i + 1) % n];
            a += p.x * q.y - q.x * p.y;
        }
        0.5 * a
    }

    /// Index is a free end of an open polygon.
    #[inline]
    pub fn is_endpoint(&self, i: usize) -> bool {
        !self.closed && !self.pts.is_empty() && (i == 0 || i + 1 == self.pts.len())
    }

    /// Edges `i < j` share a vertex.
    #[inline]
    fn edges_adjacent(&self, i: usize, j: usize) -> bool {
        j == i + 1 || (self.closed && i == 0 && j + 1 == self.edge_count())
    }

    pub fn is_simple(&self) -> bool {
        let n = self.pts.len();
        if n == 0 || (self.closed && n < 3) {
            return false;
        }
        if self.closed && self.signed_area().abs() <= EPS {
            return false;
        }
        let m = self.edge_count();
        for i in 0..m {
            let ei = self.edge(i);
            for j in (i + 1)..m {
                let ej = self.edge(j);
                let bad = if self.edges_adjacent(i, j) {
                    ei.conflicts(&ej)
                } else {
                    ei.intersects(&ej)
                };
                if bad {
                    return false;
                }
            }
        }
        true
    }

    /// Strictly inside a closed polygon (boundary excluded). Open polygons contain nothing.
    pub fn contains(&self, p: Point) -> bool {
        if !self.closed || self.pts.len() < 3 {
            return false;
        }
        if self.edges().any(|e| e.distance_to(p) <= EPS) {
            return false;
        }
        self.crossing_parity(p)
    }

    /// Inside or within `eps` of the boundary of a closed polygon.
    pub fn contains_or_on(&self, p: Point, eps: f64) -> bool {
        if !self.closed || self.pts.len() < 3 {
            return false;
        }
        self.edges().any(|e| e.distance_to(p) <= eps) || self.crossing_parity(p)
    }

    fn crossing_parity(&self, p: Point) -> bool {
        let n = self.pts.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.pts[i];
            let b = self.pts[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Would appending `p` to this open polygon keep it non-self-intersecting?
    #[inline]
    pub fn accepts_extension(&self, p: Point) -> bool {
        self.accepts_extension_after(self.pts.len(), p)
    }

    /// Same test against the prefix `pts[..keep]` (the tail beyond `keep` is about to go).
    pub fn accepts_extension_after(&self, keep: usize, p: Point) -> bool {
        let keep = keep.min(self.pts.len());
        if keep == 0 {
            return true;
        }
        let s = Segment::new(self.pts[keep - 1], p);
        let m = keep - 1;
        (0..m).all(|i| {
            let e = Segment::new(self.pts[i], self.pts[i + 1]);
            if i + 1 == m {
                !e.conflicts(&s)
            } else {
                !e.intersects(&s)
            }
        })
    }

    pub fn reversed(&self) -> Polygon {
        let mut pts = self.pts.clone();
        pts.reverse();
        Polygon {
            pts,
            closed: self.closed,
        }
    }

    pub fn translated(&self, d: Point) -> Polygon {
        Polygon {
            pts: self.pts.iter().map(|p| p + d).collect(),
            closed: self.closed,
        }
    }
}
