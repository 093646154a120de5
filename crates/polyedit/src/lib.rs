//! Planar polygon scene editor core.
//!
//! A scene of open and closed polygons (optionally inside one bounding
//! polygon) edited through a pointer-driven state machine: hit-testing, grid
//! snapping, drag and linear transforms, freehand strokes, endpoint
//! concatenation, and validity-gated commit with rollback.
//!
//! Layout
//! - `geom`: points, segments, polygons and their predicates.
//! - `scene`: polygon arena, bounding role, invariants, document form.
//! - `select`, `snap`, `transform`, `pencil`: the geometric operations.
//! - `edit`: the state machine; `paint`/`view`: seams to the shell.
//! - `worker`: background job cancellation/progress contract.
//!
//! API Policy
//! - The editor core is consumed by the shell in this workspace; breaking
//!   changes are fine when they make the model clearer.

pub mod api;
pub mod cfg;
pub mod edit;
pub mod geom;
pub mod paint;
pub mod pencil;
pub mod scene;
pub mod select;
pub mod snap;
pub mod transform;
pub mod view;
pub mod worker;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::EditCfg;
pub use edit::{Editor, Effect, Event};
pub use scene::{PolyId, Scene};

/// Common exports for drivers and tests.
pub mod prelude {
    pub use crate::cfg::{EditCfg, SegmentDrag};
    pub use crate::edit::{Button, Editor, Effect, Event, MenuItem, Mods, StateKind};
    pub use crate::geom::{Point, Polygon, Segment};
    pub use crate::paint::{Style, Surface};
    pub use crate::scene::{PolyId, Role, Scene, SceneDoc, Violation};
    pub use crate::transform::TransformMode;
    pub use crate::view::{ScaledView, Viewport};
    pub use nalgebra::Vector2 as Vec2;
}
