//! Planar geometry primitives for the editor (points, segments, polygons).
//!
//! Purpose
//! - Provide the small, explicit predicate set the scene and the editor need:
//!   closed-segment intersection, "conflict" (intersection other than a single
//!   shared endpoint), polygon simplicity, containment, and bounding rectangles.
//! - Points are plain `nalgebra::Vector2<f64>` values; identity across
//!   structures is expressed by `(PolyId, index)` handles in `crate::scene`.
//!
//! Why this design
//! - Quadratic pair checks are fine at interactive scene sizes and are easy to
//!   audit; a sweep line can replace them if benches ever demand it.
//! - Tolerances are absolute (`EPS`) because all editor coordinates are world
//!   units of roughly pixel magnitude.
//!
//! Code cross-refs: `types::{Point, Segment, Rect}`, `polygon::Polygon`, `rand`.

mod polygon;
pub mod rand;
mod types;
mod util;

pub use polygon::Polygon;
pub use types::{Point, Rect, Segment, EPS};
pub use util::{cross, orient, same_point, turn_angle};

#[cfg(test)]
mod tests;
