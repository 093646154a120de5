//! Random simple polygons and scenes (radial jitter + replay tokens).
//!
//! Purpose
//! - Deterministic fixtures for property tests and benches: star-shaped
//!   polygons that are simple by construction, laid out on a lattice so a
//!   generated scene satisfies every scene invariant.
//!
//! Model
//! - Start from `n` equally spaced angles on [0, 2π), add bounded angular and
//!   radial jitter, and emit the points in angle order around a centre.
//!   Strictly increasing angles around the centre keep the ring simple.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Point, Polygon};
use crate::scene::Scene;

/// Shape of the polygons `draw_polygon_radial` produces.
///
/// Out-of-range fields are pulled back by `sanitized` before drawing, so any
/// value yields a simple polygon.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    /// Vertex count is drawn uniformly from `min_vertices..=max_vertices`.
    pub min_vertices: usize,
    pub max_vertices: usize,
    /// Angular wobble per vertex, in units of the even spacing `2π/n`.
    pub angle_jitter: f64,
    /// Relative radius wobble per vertex.
    pub radius_jitter: f64,
    /// Mean distance of the vertices from the centre, in world units.
    pub radius: f64,
    /// Rotate each polygon by a random angle.
    pub spin: bool,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            min_vertices: 12,
            max_vertices: 12,
            angle_jitter: 0.3,
            radius_jitter: 0.25,
            radius: 40.0,
            spin: true,
        }
    }
}

impl RadialCfg {
    /// At least a triangle; angle wobble below half a spacing keeps the
    /// angles increasing, radius wobble below 1 keeps every radius positive.
    pub fn sanitized(self) -> Self {
        let min_vertices = self.min_vertices.max(3);
        Self {
            min_vertices,
            max_vertices: self.max_vertices.max(min_vertices),
            angle_jitter: self.angle_jitter.clamp(0.0, 0.49),
            radius_jitter: self.radius_jitter.clamp(0.0, 0.9),
            radius: self.radius.max(1e-6),
            spin: self.spin,
        }
    }

    /// Largest distance a vertex can reach from its centre.
    fn reach(&self) -> f64 {
        let c = self.sanitized();
        c.radius * (1.0 + c.radius_jitter)
    }
}

/// `(seed, index)` names one reproducible draw; neighbouring indices give
/// unrelated streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn rng(self) -> StdRng {
        StdRng::seed_from_u64(self.seed.rotate_left(32) ^ self.index.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }
}

/// Draw a closed star-shaped polygon around `center`.
pub fn draw_polygon_radial<R: Rng>(cfg: RadialCfg, center: Point, rng: &mut R) -> Polygon {
    let cfg = cfg.sanitized();
    let n = rng.gen_range(cfg.min_vertices..=cfg.max_vertices);
    let step = std::f64::consts::TAU / n as f64;
    let phase = if cfg.spin { rng.gen_range(0.0..std::f64::consts::TAU) } else { 0.0 };
    let pts = (0..n)
        .map(|k| {
            let th = phase + (k as f64 + rng.gen_range(-1.0..=1.0) * cfg.angle_jitter) * step;
            let r = cfg.radius * (1.0 + rng.gen_range(-1.0..=1.0) * cfg.radius_jitter);
            center + Vector2::new(th.cos(), th.sin()) * r
        })
        .collect();
    Polygon::closed(pts)
}

/// Scene of `count` radial polygons on a square lattice, optionally framed by a
/// rectangular bounding polygon with one cell of margin.
pub fn draw_scene(cfg: RadialCfg, count: usize, bounded: bool, tok: ReplayToken) -> Scene {
    let mut rng = tok.rng();
    let cell = 2.5 * cfg.reach();
    let cols = (count as f64).sqrt().ceil().max(1.0) as usize;
    let mut scene = Scene::new();
    if bounded {
        let rows = count.div_ceil(cols).max(1);
        let w = (cols + 1) as f64 * cell;
        let h = (rows + 1) as f64 * cell;
        scene.set_bounding_polygon(Polygon::closed(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(w, 0.0),
            Vector2::new(w, h),
            Vector2::new(0.0, h),
        ]));
    }
    for k in 0..count {
        let center = Vector2::new(
            (k % cols + 1) as f64 * cell,
            (k / cols + 1) as f64 * cell,
        );
        scene.insert(draw_polygon_radial(cfg, center, &mut rng));
    }
    scene
}
