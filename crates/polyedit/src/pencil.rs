//! Freehand stroke simplification ("pencil").
//!
//! Purpose
//! - Turn a continuous pointer drag into a short polyline whose vertices keep a
//!   minimum spacing and a minimum turn angle, without ever committing a
//!   segment the caller's guard rejects.
//!
//! Model
//! - `pending` holds the raw samples since the last committed vertex.
//! - For a new sample `s`, scan `pending` backwards for the candidate `c` with
//!   the largest turn angle at `c` (walking `last → c → s`) among those whose
//!   turn exceeds `min_angle` or whose chord `|c − last|` exceeds `min_length`,
//!   and whose segment `last → c` the guard allows.
//! - Committing `c` first tries online elimination: if the turn at `last`
//!   (walking `prev → last → c`) is below `min_angle` and `prev → c` is allowed,
//!   `last` is replaced by `c`; otherwise `c` is appended.
//!
//! The guard is `Fn(a, b, drop_tail) -> bool`: may the segment `a → b` follow the
//! committed polyline, where `drop_tail` means the current last vertex is
//! removed first (elimination). The simplifier never looks at the scene itself.

use crate::geom::{turn_angle, Point, Polygon, EPS};

/// Effect of a commit on the caller's vertex list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeStep {
    Appended(Point),
    /// The last vertex moved to this point.
    Replaced(Point),
}

impl StrokeStep {
    pub fn apply_to(self, poly: &mut Polygon) {
        match self {
            StrokeStep::Appended(p) => poly.pts.push(p),
            StrokeStep::Replaced(p) => match poly.pts.last_mut() {
                Some(last) => *last = p,
                None => poly.pts.push(p),
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Stroke {
    pending: Vec<Point>,
    last: Point,
    prev: Option<Point>,
    min_angle: f64,
    min_length: f64,
}

impl Stroke {
    /// Start from the committed tail `prev → last` (`prev` absent for a fresh polyline).
    pub fn new(last: Point, prev: Option<Point>, min_angle: f64, min_length: f64) -> Self {
        Self {
            pending: Vec::new(),
            last,
            prev,
            min_angle,
            min_length,
        }
    }

    /// Continue the tail of an open polygon.
    pub fn from_tail(poly: &Polygon, min_angle: f64, min_length: f64) -> Option<Self> {
        let n = poly.len();
        let last = poly.last()?;
        let prev = n.checked_sub(2).map(|i| poly.pts[i]);
        Some(Self::new(last, prev, min_angle, min_length))
    }

    #[inline]
    pub fn last(&self) -> Point {
        self.last
    }
    #[inline]
    pub fn prev(&self) -> Option<Point> {
        self.prev
    }
    #[inline]
    pub fn pending(&self) -> &[Point] {
        &self.pending
    }

    /// Process one raw sample; at most one vertex is committed.
    pub fn feed<F>(&mut self, s: Point, guard: &F) -> Option<StrokeStep>
    where
        F: Fn(Point, Point, bool) -> bool,
    {
        if self.pending.last().is_some_and(|p| (p - s).norm() <= EPS) {
            return None;
        }
        let step = self.advance(s, guard);
        self.pending.push(s);
        step
    }

    /// Commit the best pending corner on the way to `s`, then drop the buffer.
    /// Used before the stroke ends on an endpoint that is handled elsewhere.
    pub fn flush<F>(&mut self, s: Point, guard: &F) -> Option<StrokeStep>
    where
        F: Fn(Point, Point, bool) -> bool,
    {
        let step = self.advance(s, guard);
        self.pending.clear();
        step
    }

    /// End the stroke at `s`: flush, then commit `s` itself.
    pub fn finish<F>(&mut self, s: Point, guard: &F) -> Vec<StrokeStep>
    where
        F: Fn(Point, Point, bool) -> bool,
    {
        let mut steps: Vec<StrokeStep> = self.flush(s, guard).into_iter().collect();
        if (s - self.last).norm() > EPS {
            steps.extend(self.commit(s, guard));
        }
        steps
    }

    fn advance<F>(&mut self, s: Point, guard: &F) -> Option<StrokeStep>
    where
        F: Fn(Point, Point, bool) -> bool,
    {
        let mut best: Option<(usize, f64)> = None;
        for k in (0..self.pending.len()).rev() {
            let c = self.pending[k];
            let angle = turn_angle(self.last, c, s);
            let chord = (c - self.last).norm();
            if !(angle > self.min_angle || chord > self.min_length) {
                continue;
            }
            if best.is_some_and(|(_, a)| a >= angle) {
                continue;
            }
            if guard(self.last, c, false) {
                best = Some((k, angle));
            }
        }
        let (k, _) = best?;
        let c = self.pending[k];
        let step = self.commit(c, guard);
        self.pending.drain(..=k);
        step
    }

    fn commit<F>(&mut self, c: Point, guard: &F) -> Option<StrokeStep>
    where
        F: Fn(Point, Point, bool) -> bool,
    {
        if let Some(prev) = self.prev {
            if turn_angle(prev, self.last, c) < self.min_angle && guard(prev, c, true) {
                self.last = c;
                return Some(StrokeStep::Replaced(c));
            }
        }
        if !guard(self.last, c, false) {
            return None;
        }
        self.prev = Some(self.last);
        self.last = c;
        Some(StrokeStep::Appended(c))
    }
}
