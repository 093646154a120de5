//! Events in, effects out, and the transaction/state values in between.

use nalgebra::Matrix2;

use crate::cfg::EditCfg;
use crate::geom::{Point, Polygon};
use crate::pencil::Stroke;
use crate::scene::{PolyId, Role, Scene, Violation};
use crate::transform::{self, TransformDrag, TransformMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
}

/// Modifier flags forwarded by the shell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mods {
    /// Constrain placement to the horizontal/vertical through the previous vertex.
    pub axis_lock: bool,
}

/// Pointer and command input, in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Down { pos: Point, button: Button, mods: Mods },
    Drag { pos: Point, mods: Mods },
    Up { pos: Point, mods: Mods },
    Hover { pos: Point },
    Menu(MenuItem),
    Cancel,
    Finish,
}

impl Event {
    pub fn down(pos: Point) -> Self {
        Event::Down {
            pos,
            button: Button::Primary,
            mods: Mods::default(),
        }
    }
    pub fn secondary(pos: Point) -> Self {
        Event::Down {
            pos,
            button: Button::Secondary,
            mods: Mods::default(),
        }
    }
    pub fn drag(pos: Point) -> Self {
        Event::Drag {
            pos,
            mods: Mods::default(),
        }
    }
    pub fn up(pos: Point) -> Self {
        Event::Up {
            pos,
            mods: Mods::default(),
        }
    }
}

/// Context menu entries; selecting one re-enters the machine as `Event::Menu`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Erase,
    Move,
    Copy,
    Transform(TransformMode),
    CloseAsBounding,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Erase => "Erase",
            MenuItem::Move => "Move",
            MenuItem::Copy => "Copy",
            MenuItem::Transform(mode) => mode.label(),
            MenuItem::CloseAsBounding => "Close as bounding polygon",
        }
    }
}

/// Side effects of one transition, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Redraw,
    /// The polygon in this slot was inserted or replaced.
    Committed(PolyId),
    Erased(PolyId),
    /// A candidate failed validation; the scene is unchanged.
    Rejected(Violation),
    /// The user abandoned the transaction; the scene is unchanged.
    Cancelled,
    OpenMenu(Vec<MenuItem>),
}

/// The open transaction: copy-on-write working buffer over an immutable snapshot.
///
/// The scene is never touched while an `Edit` is live; `base` is the geometry
/// every frame is recomputed from, `poly` is what would be committed.
#[derive(Clone, Debug)]
pub struct Edit {
    /// Slot being replaced; `None` for a polygon that is not in the scene yet.
    pub target: Option<PolyId>,
    pub role: Role,
    pub base: Polygon,
    pub poly: Polygon,
    /// Working point set (indices into `poly`).
    pub moved: Vec<usize>,
    /// World position of the press that started the drag.
    pub anchor: Point,
}

impl Edit {
    /// New one-point open polygon.
    pub fn fresh(p: Point) -> Self {
        let poly = Polygon::point(p);
        Self {
            target: None,
            role: Role::Interior,
            base: poly.clone(),
            poly,
            moved: vec![0],
            anchor: p,
        }
    }

    /// Edit of a scene polygon with every point in the working set.
    pub fn of(scene: &Scene, id: PolyId, anchor: Point) -> Option<Self> {
        let poly = scene.get(id)?.clone();
        Some(Self::detached(Some(id), scene.role(id), poly, anchor))
    }

    pub fn detached(target: Option<PolyId>, role: Role, poly: Polygon, anchor: Point) -> Self {
        Self {
            target,
            role,
            moved: (0..poly.len()).collect(),
            base: poly.clone(),
            poly,
            anchor,
        }
    }

    pub fn with_moved(mut self, moved: Vec<usize>) -> Self {
        self.moved = moved;
        self
    }

    /// Replace both buffers (the snapshot is re-taken, e.g. after inserting vertices).
    pub fn rebase(&mut self, poly: Polygon) {
        self.base = poly.clone();
        self.poly = poly;
    }

    #[inline]
    pub fn ignore(&self) -> &[PolyId] {
        self.target.as_slice()
    }

    /// Translate the working set by the pointer offset from `anchor`.
    ///
    /// With the grid active the first working point lands on the grid and the
    /// rest keep their offsets to it.
    pub fn translate_to(&mut self, w: Point, cfg: &EditCfg) {
        let Some(&lead) = self.moved.first() else {
            return;
        };
        let from = self.base.pts[lead];
        let d = cfg.snap(from + (w - self.anchor)) - from;
        for &i in &self.moved {
            self.poly.pts[i] = self.base.pts[i] + d;
        }
    }

    /// Apply `m` about `pivot` to the working set, from the snapshot.
    pub fn transform(&mut self, m: &Matrix2<f64>, pivot: Point) {
        for &i in &self.moved {
            self.poly.pts[i] = transform::apply(m, pivot, self.base.pts[i]);
        }
    }
}

/// What a press turns into once the pointer moves (or is released).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primed {
    /// Draw: pencil on drag; on release either keep the seed point
    /// (`extend == false`) or place one more vertex (`extend == true`).
    Sketch { extend: bool },
    PointDrag,
    SegmentDrag,
    PolygonDrag,
}

/// Names of the machine's states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    Idle,
    Pressed,
    PointDrag,
    SegmentDrag,
    PolygonDrag,
    PointAdd,
    Pencil,
    TransformInit,
    Transform,
    MoveInit,
    Move,
    AddPolyInit,
    AddPoly,
}

/// Machine state; every non-idle state owns its transaction.
#[derive(Clone, Debug, Default)]
pub enum State {
    #[default]
    Idle,
    Pressed {
        /// Screen position of the press (drag threshold is in pixels).
        at: Point,
        primed: Primed,
        edit: Edit,
    },
    PointDrag(Edit),
    SegmentDrag(Edit),
    PolygonDrag(Edit),
    /// Click-by-click drawing; `edit.poly` mirrors the committed polygon.
    PointAdd(Edit),
    Pencil {
        edit: Edit,
        stroke: Stroke,
    },
    TransformInit {
        edit: Edit,
        mode: TransformMode,
        pressed: bool,
    },
    Transform {
        edit: Edit,
        drag: TransformDrag,
    },
    MoveInit {
        edit: Edit,
        pressed: bool,
    },
    Move(Edit),
    AddPolyInit {
        edit: Edit,
        pressed: bool,
    },
    AddPoly(Edit),
}

impl State {
    pub fn kind(&self) -> StateKind {
        match self {
            State::Idle => StateKind::Idle,
            State::Pressed { .. } => StateKind::Pressed,
            State::PointDrag(_) => StateKind::PointDrag,
            State::SegmentDrag(_) => StateKind::SegmentDrag,
            State::PolygonDrag(_) => StateKind::PolygonDrag,
            State::PointAdd(_) => StateKind::PointAdd,
            State::Pencil { .. } => StateKind::Pencil,
            State::TransformInit { .. } => StateKind::TransformInit,
            State::Transform { .. } => StateKind::Transform,
            State::MoveInit { .. } => StateKind::MoveInit,
            State::Move(_) => StateKind::Move,
            State::AddPolyInit { .. } => StateKind::AddPolyInit,
            State::AddPoly(_) => StateKind::AddPoly,
        }
    }

    /// Transaction owned by this state, if any.
    pub fn edit(&self) -> Option<&Edit> {
        match self {
            State::Idle => None,
            State::Pressed { edit, .. }
            | State::Pencil { edit, .. }
            | State::TransformInit { edit, .. }
            | State::Transform { edit, .. }
            | State::MoveInit { edit, .. }
            | State::AddPolyInit { edit, .. } => Some(edit),
            State::PointDrag(edit)
            | State::SegmentDrag(edit)
            | State::PolygonDrag(edit)
            | State::PointAdd(edit)
            | State::Move(edit)
            | State::AddPoly(edit) => Some(edit),
        }
    }
}
