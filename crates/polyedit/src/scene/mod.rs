//! Scene model: polygon arena, optional bounding polygon, validity predicates.
//!
//! Purpose
//! - Own every committed polygon. Callers refer to polygons by `PolyId` and to
//!   points by `(PolyId, index)`; no references escape across a commit.
//! - Answer "would this candidate keep the scene valid?" without mutating, so
//!   the editor can build candidates in a working buffer and swap them in only
//!   on success.
//!
//! Invariants (checked by `admits` / `validate`)
//! - every closed polygon is simple, every open polygon is non-self-intersecting;
//! - no edge of one polygon conflicts with an edge of another (a single shared
//!   endpoint is allowed);
//! - the bounding polygon, if any, is closed and every other point lies in or on it.
//!
//! Slots are never reused, so a stale `PolyId` resolves to `None` rather than to
//! an unrelated polygon. `revision` increases on every mutation.

mod doc;

pub use doc::{PolygonDoc, SceneDoc};

use std::fmt;

use crate::geom::{Point, Polygon, Segment, EPS};

/// Handle of a polygon slot in a `Scene`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolyId(pub(crate) usize);

impl PolyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PolyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Free end of an open polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum End {
    First,
    Last,
}

impl End {
    /// Point index of this end in a polygon with `n` points.
    #[inline]
    pub fn index(self, n: usize) -> usize {
        match self {
            End::First => 0,
            End::Last => n.saturating_sub(1),
        }
    }
    #[inline]
    pub fn of_index(i: usize, n: usize) -> Option<End> {
        if i == 0 {
            Some(End::First)
        } else if i + 1 == n {
            Some(End::Last)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Interior,
    Bounding,
}

/// Why a candidate polygon cannot enter the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    TooFewPoints,
    /// A coordinate is NaN or infinite.
    NonFinite,
    SelfIntersection,
    /// An edge conflicts with an edge of this polygon.
    Crossing(PolyId),
    /// A point lies outside the bounding polygon.
    OutsideBounding,
    /// A bounding candidate does not contain this polygon.
    Uncontained(PolyId),
    OpenBounding,
    DuplicateBounding,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooFewPoints => write!(f, "too few points"),
            Violation::NonFinite => write!(f, "non-finite coordinate"),
            Violation::SelfIntersection => write!(f, "self-intersection"),
            Violation::Crossing(id) => write!(f, "crosses polygon {id}"),
            Violation::OutsideBounding => write!(f, "point outside the bounding polygon"),
            Violation::Uncontained(id) => write!(f, "polygon {id} is not inside the bounding candidate"),
            Violation::OpenBounding => write!(f, "bounding polygon must be closed"),
            Violation::DuplicateBounding => write!(f, "scene already has a bounding polygon"),
        }
    }
}

impl std::error::Error for Violation {}

/// A scene-wide validation failure, attributed to one polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Invalid {
    pub poly: PolyId,
    pub violation: Violation,
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "polygon {}: {}", self.poly, self.violation)
    }
}

impl std::error::Error for Invalid {}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    slots: Vec<Option<Polygon>>,
    bounding: Option<PolyId>,
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live polygons, bounding polygon included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
    #[inline]
    pub fn get(&self, id: PolyId) -> Option<&Polygon> {
        self.slots.get(id.0).and_then(|s| s.as_ref())
    }
    #[inline]
    pub fn point(&self, id: PolyId, index: usize) -> Option<Point> {
        self.get(id).and_then(|p| p.pts.get(index).copied())
    }

    /// Live polygons in slot order (the scene's iteration order).
    pub fn iter(&self) -> impl Iterator<Item = (PolyId, &Polygon)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (PolyId(i), p)))
    }

    #[inline]
    pub fn bounding(&self) -> Option<PolyId> {
        self.bounding
    }
    pub fn bounding_polygon(&self) -> Option<&Polygon> {
        self.bounding.and_then(|id| self.get(id))
    }
    pub fn role(&self, id: PolyId) -> Role {
        if self.bounding == Some(id) {
            Role::Bounding
        } else {
            Role::Interior
        }
    }

    pub fn insert(&mut self, poly: Polygon) -> PolyId {
        self.slots.push(Some(poly));
        self.revision += 1;
        PolyId(self.slots.len() - 1)
    }

    /// Insert `poly` as the bounding polygon, dropping any previous one.
    pub fn set_bounding_polygon(&mut self, poly: Polygon) -> PolyId {
        if let Some(old) = self.bounding.take() {
            self.remove(old);
        }
        let id = self.insert(poly);
        self.bounding = Some(id);
        id
    }

    pub fn set_role(&mut self, id: PolyId, role: Role) {
        match role {
            Role::Bounding => self.bounding = Some(id),
            Role::Interior if self.bounding == Some(id) => self.bounding = None,
            Role::Interior => {}
        }
        self.revision += 1;
    }

    pub fn remove(&mut self, id: PolyId) -> Option<Polygon> {
        let out = self.slots.get_mut(id.0)?.take()?;
        if self.bounding == Some(id) {
            self.bounding = None;
        }
        self.revision += 1;
        Some(out)
    }

    /// Swap new geometry into an existing slot; returns the previous geometry.
    pub fn replace(&mut self, id: PolyId, poly: Polygon) -> Option<Polygon> {
        let slot = self.slots.get_mut(id.0)?.as_mut()?;
        let old = std::mem::replace(slot, poly);
        self.revision += 1;
        Some(old)
    }

    /// Drop all polygons; handles issued so far stay dead.
    pub fn clear(&mut self) {
        for s in &mut self.slots {
            *s = None;
        }
        self.bounding = None;
        self.revision += 1;
    }

    fn others<'a>(
        &'a self,
        skip: &'a [PolyId],
    ) -> impl Iterator<Item = (PolyId, &'a Polygon)> + 'a {
        self.iter().filter(move |(id, _)| !skip.contains(id))
    }

    /// Would `cand`, in `role`, fit the scene once the polygons in `replacing` are gone?
    pub fn admits(&self, cand: &Polygon, role: Role, replacing: &[PolyId]) -> Result<(), Violation> {
        if cand.is_empty() || (cand.closed && cand.len() < 3) {
            return Err(Violation::TooFewPoints);
        }
        if !cand.is_finite() {
            return Err(Violation::NonFinite);
        }
        if !cand.is_simple() {
            return Err(Violation::SelfIntersection);
        }
        let bounding = self.bounding.filter(|id| !replacing.contains(id));
        match role {
            Role::Bounding => {
                if !cand.closed {
                    return Err(Violation::OpenBounding);
                }
                if bounding.is_some() {
                    return Err(Violation::DuplicateBounding);
                }
                for (id, other) in self.others(replacing) {
                    if !other.pts.iter().all(|p| cand.contains_or_on(*p, EPS)) {
                        return Err(Violation::Uncontained(id));
                    }
                }
            }
            Role::Interior => {
                if let Some(b) = bounding.and_then(|id| self.get(id)) {
                    if !cand.pts.iter().all(|p| b.contains_or_on(*p, EPS)) {
                        return Err(Violation::OutsideBounding);
                    }
                }
            }
        }
        let Some(cand_box) = cand.bbox() else {
            return Ok(());
        };
        for (id, other) in self.others(replacing) {
            if !other.bbox().is_some_and(|b| b.overlaps(&cand_box)) {
                continue;
            }
            let crossing = cand
                .edges()
                .any(|e| other.edges().any(|f| e.conflicts(&f)));
            if crossing {
                return Err(Violation::Crossing(id));
            }
        }
        Ok(())
    }

    /// Check every scene invariant; the first failing polygon is reported.
    pub fn validate(&self) -> Result<(), Invalid> {
        for (id, poly) in self.iter() {
            let role = self.role(id);
            // A bounding polygon is checked against the rest as a fresh candidate.
            self.admits(poly, role, &[id])
                .map_err(|violation| Invalid { poly: id, violation })?;
        }
        Ok(())
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Inside or on the bounding polygon (always true without one).
    pub fn point_is_allowed(&self, p: Point) -> bool {
        self.bounding_polygon()
            .map_or(true, |b| b.contains_or_on(p, EPS))
    }

    /// May `s` be added: in bounds and conflicting with no edge outside `ignore`?
    pub fn check_segment(&self, s: Segment, ignore: &[PolyId]) -> Result<(), Violation> {
        if let Some(b) = self.bounding.filter(|id| !ignore.contains(id)).and_then(|id| self.get(id)) {
            if !b.contains_or_on(s.a, EPS) || !b.contains_or_on(s.b, EPS) {
                return Err(Violation::OutsideBounding);
            }
        }
        match self
            .others(ignore)
            .find(|(_, poly)| poly.edges().any(|e| e.conflicts(&s)))
        {
            Some((id, _)) => Err(Violation::Crossing(id)),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn segment_is_free(&self, s: Segment, ignore: &[PolyId]) -> bool {
        self.check_segment(s, ignore).is_ok()
    }

    /// Nearest free end of an open polygon within `tol` of `p`, skipping `exclude`.
    /// Ties go to the first found in iteration order.
    pub fn open_endpoint_near(&self, p: Point, tol: f64, exclude: &[PolyId]) -> Option<(PolyId, End)> {
        let mut best: Option<(PolyId, End, f64)> = None;
        for (id, poly) in self.others(exclude) {
            if poly.closed || poly.is_empty() {
                continue;
            }
            for end in [End::First, End::Last] {
                let d = (poly.pts[end.index(poly.len())] - p).norm();
                if d <= tol && best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((id, end, d));
                }
            }
        }
        best.map(|(id, end, _)| (id, end))
    }
}

#[cfg(test)]
mod tests;
