//! Live linear transforms about a fixed pivot.
//!
//! Each drag frame recomputes a 2×2 matrix `M` from the pivot `P`, the initial
//! pointer `I` and the current pointer `C`; working points map as
//! `p ↦ P + M·(p₀ − P)` from the untouched snapshot `p₀`, so nothing accumulates
//! across frames. Offsets below `min_dist` re-anchor `I` to `C` (on the affected
//! axis) instead of dividing by a near-zero number.

use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

use crate::geom::{cross, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    Scale,
    ScaleProportional,
    ScaleHorizontal,
    ScaleVertical,
    Rotate,
    ShearHorizontal,
    ShearVertical,
}

impl TransformMode {
    pub const ALL: [TransformMode; 7] = [
        TransformMode::Scale,
        TransformMode::ScaleProportional,
        TransformMode::ScaleHorizontal,
        TransformMode::ScaleVertical,
        TransformMode::Rotate,
        TransformMode::ShearHorizontal,
        TransformMode::ShearVertical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransformMode::Scale => "Scale",
            TransformMode::ScaleProportional => "Scale proportionally",
            TransformMode::ScaleHorizontal => "Scale horizontally",
            TransformMode::ScaleVertical => "Scale vertically",
            TransformMode::Rotate => "Rotate",
            TransformMode::ShearHorizontal => "Shear horizontally",
            TransformMode::ShearVertical => "Shear vertically",
        }
    }
}

/// `P + M·(p₀ − P)`.
#[inline]
pub fn apply(m: &Matrix2<f64>, pivot: Point, p0: Point) -> Point {
    pivot + m * (p0 - pivot)
}

/// Per-transaction transform state.
#[derive(Clone, Copy, Debug)]
pub struct TransformDrag {
    pub mode: TransformMode,
    pub pivot: Point,
    /// Initial pointer; moves only when re-anchored.
    pub initial: Point,
    pub min_dist: f64,
    last: Matrix2<f64>,
}

impl TransformDrag {
    pub fn new(mode: TransformMode, pivot: Point, initial: Point, min_dist: f64) -> Self {
        Self {
            mode,
            pivot,
            initial,
            min_dist,
            last: Matrix2::identity(),
        }
    }

    /// Matrix of the most recent `update`.
    #[inline]
    pub fn matrix(&self) -> Matrix2<f64> {
        self.last
    }

    /// Matrix for the pointer at `current`.
    pub fn update(&mut self, current: Point) -> Matrix2<f64> {
        let m = match self.mode {
            TransformMode::Scale => {
                let sx = self.axis_ratio(current, 0);
                let sy = self.axis_ratio(current, 1);
                Matrix2::new(sx, 0.0, 0.0, sy)
            }
            TransformMode::ScaleHorizontal => Matrix2::new(self.axis_ratio(current, 0), 0.0, 0.0, 1.0),
            TransformMode::ScaleVertical => Matrix2::new(1.0, 0.0, 0.0, self.axis_ratio(current, 1)),
            TransformMode::ScaleProportional => self.proportional(current),
            TransformMode::Rotate => self.rotation(current),
            TransformMode::ShearHorizontal => {
                let k = self.shear(current, 0);
                Matrix2::new(1.0, k, 0.0, 1.0)
            }
            TransformMode::ShearVertical => {
                let k = self.shear(current, 1);
                Matrix2::new(1.0, 0.0, k, 1.0)
            }
        };
        self.last = m;
        m
    }

    /// `(C − P)/(I − P)` on one axis, re-anchoring that axis when `|I − P|` is tiny.
    fn axis_ratio(&mut self, current: Point, axis: usize) -> f64 {
        let d0 = self.initial[axis] - self.pivot[axis];
        if d0.abs() < self.min_dist {
            self.initial[axis] = current[axis];
            return 1.0;
        }
        (current[axis] - self.pivot[axis]) / d0
    }

    /// One ratio from the axis with the larger initial offset; each axis keeps its own sign.
    fn proportional(&mut self, current: Point) -> Matrix2<f64> {
        let d0 = self.initial - self.pivot;
        if d0.x.abs() < self.min_dist && d0.y.abs() < self.min_dist {
            self.initial = current;
            return Matrix2::identity();
        }
        let d = current - self.pivot;
        let lead = if d0.x.abs() >= d0.y.abs() { 0 } else { 1 };
        let s = (d[lead] / d0[lead]).abs();
        let sign = |axis: usize| {
            if d0[axis].abs() < self.min_dist || d[axis] * d0[axis] >= 0.0 {
                1.0
            } else {
                -1.0
            }
        };
        Matrix2::new(s * sign(0), 0.0, 0.0, s * sign(1))
    }

    /// Rotation taking `I − P` onto the direction of `C − P`.
    ///
    /// Half-angle form: with unit vectors `u`, `v` and bisector `h`,
    /// `cos(θ/2) = u·h`, `sin(θ/2) = u×h`, `cos θ = c² − s²`, `sin θ = 2sc`.
    fn rotation(&mut self, current: Point) -> Matrix2<f64> {
        let a = self.initial - self.pivot;
        if a.norm() < self.min_dist {
            self.initial = current;
            return Matrix2::identity();
        }
        let b = current - self.pivot;
        if b.norm() < self.min_dist {
            return self.last;
        }
        let u = a / a.norm();
        let v = b / b.norm();
        let sum = u + v;
        let h = if sum.norm() < 1e-12 {
            // Opposite directions: the bisector is perpendicular to u.
            Point::new(-u.y, u.x)
        } else {
            sum / sum.norm()
        };
        let c = u.dot(&h);
        let s = cross(u, h);
        let cos = c * c - s * s;
        let sin = 2.0 * s * c;
        Matrix2::new(cos, -sin, sin, cos)
    }

    /// Shear factor: displacement along `axis` over the initial offset on the other axis.
    fn shear(&mut self, current: Point, axis: usize) -> f64 {
        let other = 1 - axis;
        let d0 = self.initial[other] - self.pivot[other];
        if d0.abs() < self.min_dist {
            self.initial = current;
            return 0.0;
        }
        (current[axis] - self.initial[axis]) / d0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;
    use proptest::prelude::*;

    fn drag(mode: TransformMode) -> TransformDrag {
        TransformDrag::new(mode, vector![10.0, 10.0], vector![20.0, 30.0], 1.0)
    }

    #[test]
    fn scale_axes() {
        let mut t = drag(TransformMode::Scale);
        let m = t.update(vector![30.0, 20.0]);
        assert!((m[(0, 0)] - 2.0).abs() < 1e-12);
        assert!((m[(1, 1)] - 0.5).abs() < 1e-12);
        let mut h = drag(TransformMode::ScaleHorizontal);
        let m = h.update(vector![30.0, 90.0]);
        assert_eq!(m, Matrix2::new(2.0, 0.0, 0.0, 1.0));
        let mut v = drag(TransformMode::ScaleVertical);
        let m = v.update(vector![90.0, 50.0]);
        assert_eq!(m, Matrix2::new(1.0, 0.0, 0.0, 2.0));
    }

    #[test]
    fn proportional_uses_leading_axis_and_keeps_signs() {
        let mut t = drag(TransformMode::ScaleProportional);
        // Leading axis is y (initial offset 20): ratio 40/20 = 2.
        let m = t.update(vector![0.0, 50.0]);
        assert!((m[(0, 0)] + 2.0).abs() < 1e-12);
        assert!((m[(1, 1)] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rotate_quarter_turn() {
        let mut t = TransformDrag::new(TransformMode::Rotate, vector![0.0, 0.0], vector![5.0, 0.0], 1.0);
        let m = t.update(vector![0.0, 3.0]);
        let p = apply(&m, vector![0.0, 0.0], vector![2.0, 0.0]);
        assert!((p - vector![0.0, 2.0]).norm() < 1e-12);
        let m = t.update(vector![-7.0, 0.0]);
        let p = apply(&m, vector![0.0, 0.0], vector![2.0, 0.0]);
        assert!((p - vector![-2.0, 0.0]).norm() < 1e-12);
        // Pointer on the pivot: hold the previous rotation.
        assert_eq!(t.update(vector![0.1, 0.0]), m);
    }

    #[test]
    fn shear_factors() {
        let mut h = drag(TransformMode::ShearHorizontal);
        let m = h.update(vector![40.0, 30.0]);
        assert_eq!(m, Matrix2::new(1.0, 1.0, 0.0, 1.0));
        let mut v = drag(TransformMode::ShearVertical);
        let m = v.update(vector![20.0, 35.0]);
        assert_eq!(m, Matrix2::new(1.0, 0.0, 0.5, 1.0));
    }

    #[test]
    fn degenerate_start_reanchors() {
        let mut t = TransformDrag::new(TransformMode::ScaleHorizontal, vector![0.0, 0.0], vector![0.2, 5.0], 1.0);
        assert_eq!(t.update(vector![6.0, 5.0]), Matrix2::identity());
        assert_eq!(t.initial.x, 6.0);
        let m = t.update(vector![12.0, 5.0]);
        assert!((m[(0, 0)] - 2.0).abs() < 1e-12);

        let mut r = TransformDrag::new(TransformMode::Rotate, vector![0.0, 0.0], vector![0.1, 0.1], 1.0);
        assert_eq!(r.update(vector![5.0, 0.0]), Matrix2::identity());
        assert_eq!(r.initial, vector![5.0, 0.0]);
    }

    fn mode_strategy() -> impl Strategy<Value = TransformMode> {
        (0usize..7).prop_map(|i| TransformMode::ALL[i])
    }

    proptest! {
        #[test]
        fn pivot_is_a_fixpoint(
            mode in mode_strategy(),
            px in -100.0f64..100.0, py in -100.0f64..100.0,
            ix in -100.0f64..100.0, iy in -100.0f64..100.0,
            cx in -100.0f64..100.0, cy in -100.0f64..100.0,
        ) {
            let pivot = vector![px, py];
            let mut t = TransformDrag::new(mode, pivot, vector![ix, iy], 0.5);
            let m = t.update(vector![cx, cy]);
            prop_assert!(m.iter().all(|x| x.is_finite()));
            prop_assert!((apply(&m, pivot, pivot) - pivot).norm() < 1e-9);
        }
    }
}
