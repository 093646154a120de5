//! Curated internal API (UNSTABLE).
//!
//! One flat surface over the modules for the CLI and benches. Not a
//! compatibility promise; names follow the modules they come from.

// Geometry
pub use crate::geom::rand::{draw_polygon_radial, draw_scene, RadialCfg, ReplayToken};
pub use crate::geom::{orient, same_point, turn_angle, Point, Polygon, Rect, Segment, EPS};
// Scene model
pub use crate::scene::{End, Invalid, PolyId, PolygonDoc, Role, Scene, SceneDoc, Violation};
// Operations
pub use crate::pencil::{Stroke, StrokeStep};
pub use crate::select::{pick, Hit, Selector};
pub use crate::snap::{constrain_axis, snap};
pub use crate::transform::{TransformDrag, TransformMode};
// Editor and seams
pub use crate::cfg::{EditCfg, SegmentDrag};
pub use crate::edit::{splice, Button, Edit, Editor, Effect, Event, MenuItem, Mods, StateKind};
pub use crate::paint::{Style, Surface};
pub use crate::view::{ScaledView, Viewport};
pub use crate::worker::{Animator, Job, JobCtl, INDETERMINATE};
