//! Hit-testing: classify a world point against the scene.
//!
//! Precedence: vertex (nearest within `vertex_tol`, first found wins ties),
//! then edge (nearest within the smaller `edge_tol`), then the interior of a
//! closed interior polygon (smallest area when nested), then free/forbidden
//! space depending on the bounding polygon.

use crate::geom::{Point, EPS};
use crate::scene::{PolyId, Scene};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Hit {
    #[default]
    Free,
    /// Outside the bounding polygon.
    Forbidden,
    Vertex {
        poly: PolyId,
        index: usize,
    },
    /// Edge `index` runs from point `index` to point `index + 1`.
    Edge {
        poly: PolyId,
        index: usize,
    },
    Polygon(PolyId),
}

impl Hit {
    pub fn poly(&self) -> Option<PolyId> {
        match *self {
            Hit::Vertex { poly, .. } | Hit::Edge { poly, .. } | Hit::Polygon(poly) => Some(poly),
            Hit::Free | Hit::Forbidden => None,
        }
    }
}

/// Pure classification.
pub fn pick(scene: &Scene, q: Point, vertex_tol: f64, edge_tol: f64) -> Hit {
    let mut vertex: Option<(PolyId, usize, f64)> = None;
    for (id, poly) in scene.iter() {
        for (i, p) in poly.pts.iter().enumerate() {
            let d = (p - q).norm();
            if d <= vertex_tol && vertex.map_or(true, |(_, _, bd)| d < bd) {
                vertex = Some((id, i, d));
            }
        }
    }
    if let Some((poly, index, _)) = vertex {
        return Hit::Vertex { poly, index };
    }

    let mut edge: Option<(PolyId, usize, f64)> = None;
    for (id, poly) in scene.iter() {
        for (i, e) in poly.edges().enumerate() {
            let d = e.distance_to(q);
            if d <= edge_tol && edge.map_or(true, |(_, _, bd)| d < bd) {
                edge = Some((id, i, d));
            }
        }
    }
    if let Some((poly, index, _)) = edge {
        return Hit::Edge { poly, index };
    }

    let inside = scene
        .iter()
        .filter(|(id, p)| scene.bounding() != Some(*id) && p.contains(q))
        .map(|(id, p)| (id, p.signed_area().abs()))
        .fold(None::<(PolyId, f64)>, |best, (id, a)| match best {
            Some((_, ba)) if ba <= a => best,
            _ => Some((id, a)),
        });
    if let Some((id, _)) = inside {
        return Hit::Polygon(id);
    }

    match scene.bounding_polygon() {
        Some(b) if !b.contains_or_on(q, EPS) => Hit::Forbidden,
        _ => Hit::Free,
    }
}

/// Hit-tester that remembers the last classification as the current selection.
#[derive(Clone, Copy, Debug, Default)]
pub struct Selector {
    pub current: Hit,
}

impl Selector {
    pub fn pick(&mut self, scene: &Scene, q: Point, vertex_tol: f64, edge_tol: f64) -> Hit {
        self.current = pick(scene, q, vertex_tol, edge_tol);
        self.current
    }

    pub fn clear(&mut self) {
        self.current = Hit::Free;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Polygon;
    use nalgebra::vector;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::closed(vec![
            vector![x0, y0],
            vector![x1, y0],
            vector![x1, y1],
            vector![x0, y1],
        ])
    }

    fn scene() -> (Scene, PolyId, PolyId, PolyId) {
        let mut s = Scene::new();
        let b = s.set_bounding_polygon(rect(0.0, 0.0, 200.0, 200.0));
        let outer = s.insert(rect(10.0, 10.0, 100.0, 100.0));
        let inner = s.insert(rect(40.0, 40.0, 60.0, 60.0));
        (s, b, outer, inner)
    }

    #[test]
    fn classification_precedence() {
        let (s, b, outer, inner) = scene();
        assert_eq!(
            pick(&s, vector![11.0, 12.0], 5.0, 2.0),
            Hit::Vertex { poly: outer, index: 0 }
        );
        assert_eq!(
            pick(&s, vector![50.0, 11.0], 5.0, 2.0),
            Hit::Edge { poly: outer, index: 0 }
        );
        // Within the vertex radius of nothing, outside the edge radius.
        assert_eq!(pick(&s, vector![50.0, 14.0], 5.0, 2.0), Hit::Polygon(outer));
        assert_eq!(pick(&s, vector![50.0, 50.0], 5.0, 2.0), Hit::Polygon(inner));
        assert_eq!(pick(&s, vector![150.0, 150.0], 5.0, 2.0), Hit::Free);
        assert_eq!(pick(&s, vector![250.0, 150.0], 5.0, 2.0), Hit::Forbidden);
        assert_eq!(
            pick(&s, vector![199.0, 100.0], 5.0, 2.0),
            Hit::Edge { poly: b, index: 1 }
        );
    }

    #[test]
    fn nearest_vertex_wins_and_ties_keep_first() {
        let mut s = Scene::new();
        let a = s.insert(Polygon::point(vector![0.0, 0.0]));
        let c = s.insert(Polygon::point(vector![4.0, 0.0]));
        assert_eq!(pick(&s, vector![2.0, 0.0], 5.0, 2.0), Hit::Vertex { poly: a, index: 0 });
        assert_eq!(pick(&s, vector![3.0, 0.0], 5.0, 2.0), Hit::Vertex { poly: c, index: 0 });
    }

    #[test]
    fn selector_records_current() {
        let (s, _, outer, _) = scene();
        let mut sel = Selector::default();
        sel.pick(&s, vector![20.0, 20.0], 5.0, 2.0);
        assert_eq!(sel.current, Hit::Polygon(outer));
        assert_eq!(sel.current.poly(), Some(outer));
        sel.clear();
        assert_eq!(sel.current, Hit::Free);
    }
}
