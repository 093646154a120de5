//! Commit, rollback and endpoint concatenation.
//!
//! Every scene write in the editor goes through `swap_in`: validate the
//! candidate against the scene minus the polygons it replaces, then remove,
//! replace or insert. A failed validation leaves the scene untouched, which is
//! the whole rollback.
//!
//! Concatenation order on release of a translating drag (first success wins):
//! 1. same-polygon closing (the moved end lands on the other end),
//! 2. single-endpoint splice, last end before first end,
//! 3. double-endpoint splice (both ends land on free ends),
//! 4. plain commit.
//! Merged endpoints take the stationary polygon's coordinate.

use tracing::{debug, info};

use super::types::{Edit, Effect};
use super::{Editor, Tol};
use crate::geom::{same_point, Point, Polygon, Segment, EPS};
use crate::scene::{End, PolyId, Role, Violation};

/// Where a drawing gesture ends on an existing free end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Landing {
    /// Its own first point: close the ring.
    Close,
    /// Another open polygon's end: join the two.
    Join(PolyId, End),
}

/// Join `a` at `a_end` to `b` at `b_end`.
///
/// The two ends are taken to coincide; `a`'s end point is dropped so the
/// shared point keeps `b`'s coordinate. The result is open and runs from
/// `a`'s other end to `b`'s other end.
pub fn splice(a: &Polygon, a_end: End, b: &Polygon, b_end: End) -> Polygon {
    let mut pts = match a_end {
        End::Last => a.pts.clone(),
        End::First => a.reversed().pts,
    };
    pts.pop();
    match b_end {
        End::First => pts.extend_from_slice(&b.pts),
        End::Last => pts.extend(b.pts.iter().rev().copied()),
    }
    Polygon::open(pts)
}

impl Editor {
    fn admissible(&self, cand: &Polygon, role: Role, replacing: &[PolyId]) -> Result<(), Violation> {
        if cand.is_empty() || (cand.closed && cand.len() < 3) {
            return Err(Violation::TooFewPoints);
        }
        if !cand.is_finite() {
            return Err(Violation::NonFinite);
        }
        if !self.cfg.check_validity {
            return Ok(());
        }
        self.scene.admits(cand, role, replacing)
    }

    /// Validate `cand`, then remove `drop` and store `cand` in `keep` (or a new slot).
    pub(super) fn swap_in(
        &mut self,
        cand: Polygon,
        role: Role,
        keep: Option<PolyId>,
        drop: &[PolyId],
        fx: &mut Vec<Effect>,
    ) -> Result<PolyId, Violation> {
        let mut replacing = drop.to_vec();
        replacing.extend(keep);
        self.admissible(&cand, role, &replacing)?;
        for &id in drop {
            if Some(id) != keep {
                self.scene.remove(id);
            }
        }
        let (points, closed) = (cand.len(), cand.closed);
        let id = match keep.filter(|id| self.scene.get(*id).is_some()) {
            Some(id) => {
                self.scene.replace(id, cand);
                id
            }
            None => self.scene.insert(cand),
        };
        if self.scene.role(id) != role {
            self.scene.set_role(id, role);
        }
        info!(poly = %id, points, closed, absorbed = drop.len(), "committed");
        fx.push(Effect::Committed(id));
        Ok(id)
    }

    pub(super) fn reject(&self, v: Violation, fx: &mut Vec<Effect>) {
        debug!(violation = %v, "rolled back");
        fx.push(Effect::Rejected(v));
    }

    /// Generic validate-and-replace of the transaction's polygon.
    pub(super) fn commit_edit(&mut self, edit: Edit, fx: &mut Vec<Effect>) -> Option<PolyId> {
        match self.swap_in(edit.poly, edit.role, edit.target, &[], fx) {
            Ok(id) => Some(id),
            Err(v) => {
                self.reject(v, fx);
                None
            }
        }
    }

    /// Release of a translating drag: concatenation first, then plain commit.
    pub(super) fn commit_drag(&mut self, edit: Edit, tol: Tol, fx: &mut Vec<Effect>) {
        if !self.concatenate(&edit, tol, fx) {
            self.commit_edit(edit, fx);
        }
        fx.push(Effect::Redraw);
    }

    fn concatenate(&mut self, edit: &Edit, tol: Tol, fx: &mut Vec<Effect>) -> bool {
        let poly = &edit.poly;
        let n = poly.len();
        if poly.closed || n == 0 || edit.role == Role::Bounding {
            return false;
        }
        let last_moved = edit.moved.contains(&(n - 1));
        let first_moved = edit.moved.contains(&0);
        if !first_moved && !last_moved {
            return false;
        }
        let drop = edit.ignore();

        if n >= 4 && same_point(poly.pts[0], poly.pts[n - 1], tol.vertex) {
            let mut ring = poly.clone();
            if last_moved {
                ring.pts.pop();
            } else {
                ring.pts.remove(0);
            }
            ring.closed = true;
            match self.swap_in(ring, edit.role, edit.target, &[], fx) {
                Ok(_) => return true,
                Err(v) => debug!(violation = %v, "closing rejected"),
            }
        }

        for (end, moved) in [(End::Last, last_moved), (End::First, first_moved)] {
            if !moved {
                continue;
            }
            let p = poly.pts[end.index(n)];
            let Some((other, other_end)) = self.scene.open_endpoint_near(p, tol.vertex, drop) else {
                continue;
            };
            let Some(b) = self.scene.get(other) else {
                continue;
            };
            let joined = splice(poly, end, b, other_end);
            match self.swap_in(joined, Role::Interior, Some(other), drop, fx) {
                Ok(_) => return true,
                Err(v) => debug!(violation = %v, with = %other, "splice rejected"),
            }
        }

        if n >= 2 && first_moved && last_moved {
            let tail = self.scene.open_endpoint_near(poly.pts[n - 1], tol.vertex, drop);
            let head = self.scene.open_endpoint_near(poly.pts[0], tol.vertex, drop);
            if let (Some((b_id, b_end)), Some((c_id, c_end))) = (tail, head) {
                if let Some((cand, absorbed)) = self.double_splice(poly, (b_id, b_end), (c_id, c_end)) {
                    let mut gone = drop.to_vec();
                    gone.extend(absorbed);
                    match self.swap_in(cand, Role::Interior, Some(b_id), &gone, fx) {
                        Ok(_) => return true,
                        Err(v) => debug!(violation = %v, "double splice rejected"),
                    }
                }
            }
        }
        false
    }

    /// Both ends of `poly` on free ends: `tail` is joined at `poly`'s last end,
    /// `head` at its first. Landing on both ends of one polygon closes a ring.
    fn double_splice(
        &self,
        poly: &Polygon,
        tail: (PolyId, End),
        head: (PolyId, End),
    ) -> Option<(Polygon, Option<PolyId>)> {
        let b = self.scene.get(tail.0)?;
        let chain = splice(poly, End::Last, b, tail.1);
        if tail.0 == head.0 {
            if tail.1 == head.1 {
                return None;
            }
            let mut ring = chain;
            ring.pts.pop();
            ring.closed = true;
            return Some((ring, None));
        }
        let c = self.scene.get(head.0)?;
        Some((splice(&chain, End::First, c, head.1), Some(head.0)))
    }

    /// Free end under `s` that would end a drawing gesture.
    pub(super) fn landing(&self, edit: &Edit, s: Point, tol: Tol) -> Option<(Landing, Point)> {
        let poly = &edit.poly;
        if poly.len() >= 2 {
            if let Some(first) = poly.first().filter(|f| same_point(s, *f, tol.vertex)) {
                return Some((Landing::Close, first));
            }
        }
        let (id, end) = self.scene.open_endpoint_near(s, tol.vertex, edit.ignore())?;
        let other = self.scene.get(id)?;
        Some((Landing::Join(id, end), other.pts[end.index(other.len())]))
    }

    /// Close `poly` or join it to another polygon's end; the drawing is over on success.
    pub(super) fn land(
        &mut self,
        mut poly: Polygon,
        goal: Landing,
        edit: &Edit,
        fx: &mut Vec<Effect>,
    ) -> Result<PolyId, Violation> {
        match goal {
            Landing::Close => {
                if poly.len() < 3 {
                    return Err(Violation::TooFewPoints);
                }
                poly.closed = true;
                self.swap_in(poly, edit.role, edit.target, &[], fx)
            }
            Landing::Join(other, end) => {
                let joined = {
                    let Some(b) = self.scene.get(other) else {
                        return Err(Violation::TooFewPoints);
                    };
                    poly.pts.push(b.pts[end.index(b.len())]);
                    splice(&poly, End::Last, b, end)
                };
                self.swap_in(joined, Role::Interior, Some(other), edit.ignore(), fx)
            }
        }
    }

    /// `poly` plus one click at `p`, or why the new segment is refused.
    pub(super) fn extended(&self, edit: &Edit, p: Point) -> Result<Polygon, Violation> {
        let mut poly = edit.poly.clone();
        if let Some(last) = poly.last() {
            if self.cfg.check_validity {
                if !poly.accepts_extension(p) {
                    return Err(Violation::SelfIntersection);
                }
                self.scene.check_segment(Segment::new(last, p), edit.ignore())?;
            }
        }
        poly.pts.push(p);
        Ok(poly)
    }

    /// Close an open polygon (dropping a duplicated end) and make it the bounding polygon.
    pub(super) fn promote(&mut self, id: PolyId, mut ring: Polygon, fx: &mut Vec<Effect>) {
        if !ring.closed {
            let n = ring.len();
            if n >= 2 && same_point(ring.pts[0], ring.pts[n - 1], EPS) {
                ring.pts.pop();
            }
            ring.closed = true;
        }
        if let Err(v) = self.swap_in(ring, Role::Bounding, Some(id), &[], fx) {
            self.reject(v, fx);
        }
        fx.push(Effect::Redraw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn splice_orients_and_merges() {
        let a = Polygon::open(vec![vector![0.0, 0.0], vector![10.0, 0.0]]);
        let b = Polygon::open(vec![vector![10.5, 0.0], vector![20.0, 5.0]]);
        let j = splice(&a, End::Last, &b, End::First);
        assert_eq!(j.pts, vec![vector![0.0, 0.0], vector![10.5, 0.0], vector![20.0, 5.0]]);
        let j = splice(&a, End::First, &b, End::Last);
        assert_eq!(j.pts, vec![vector![10.0, 0.0], vector![20.0, 5.0], vector![10.5, 0.0]]);
        assert!(!j.closed);
    }
}
