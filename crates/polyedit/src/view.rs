//! Viewport seam: the editor consumes pixel↔world transforms, it never owns them.

use crate::geom::Point;

/// Coordinate collaborator supplied by the shell.
pub trait Viewport {
    fn to_world(&self, screen: Point) -> Point;
    fn to_screen(&self, world: Point) -> Point;
    /// World length of one screen pixel (sizes tolerances and thresholds).
    fn pixel(&self) -> f64;
}

/// Uniform scale + offset with a y-up world, for headless drivers and tests.
///
/// `screen = (world - origin) * scale`, with the screen y axis flipped when `flip_y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledView {
    pub origin: Point,
    pub scale: f64,
    pub flip_y: bool,
}

impl ScaledView {
    /// Screen coordinates equal world coordinates.
    pub fn identity() -> Self {
        Self {
            origin: Point::zeros(),
            scale: 1.0,
            flip_y: false,
        }
    }
}

impl Default for ScaledView {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport for ScaledView {
    fn to_world(&self, s: Point) -> Point {
        let y = if self.flip_y { -s.y } else { s.y };
        Point::new(s.x, y) / self.scale + self.origin
    }
    fn to_screen(&self, w: Point) -> Point {
        let d = (w - self.origin) * self.scale;
        if self.flip_y {
            Point::new(d.x, -d.y)
        } else {
            d
        }
    }
    fn pixel(&self) -> f64 {
        1.0 / self.scale
    }
}
