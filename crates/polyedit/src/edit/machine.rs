//! Transitions. Each `on_*` dispatches one event kind over the current state;
//! the helpers below are the individual `(state, event)` handlers.

use tracing::{debug, trace};

use super::types::{Button, Edit, Effect, Mods, Primed, State};
use super::{Editor, Tol};
use crate::cfg::SegmentDrag;
use crate::geom::{Point, Polygon, Segment, EPS};
use crate::pencil::Stroke;
use crate::scene::{PolyId, Role};
use crate::select::Hit;
use crate::snap;
use crate::transform::TransformDrag;

impl Editor {
    /// Grid-snapped world point, locked to the axes through `anchor` when asked.
    fn place(&self, w: Point, anchor: Option<Point>, mods: Mods) -> Point {
        let p = match anchor {
            Some(a) if mods.axis_lock => snap::constrain_axis(a, w),
            _ => w,
        };
        self.cfg.snap(p)
    }

    /// Segment-validity predicate for the stroke simplifier, bound to `poly`.
    fn guard<'a>(&'a self, poly: &'a Polygon, ignore: &'a [PolyId]) -> impl Fn(Point, Point, bool) -> bool + 'a {
        let check = self.cfg.check_validity;
        move |a, b, drop_tail| {
            if !check {
                return true;
            }
            let keep = if drop_tail { poly.len().saturating_sub(1) } else { poly.len() };
            poly.accepts_extension_after(keep, b) && self.scene.segment_is_free(Segment::new(a, b), ignore)
        }
    }

    // ---- pointer down ----

    #[allow(clippy::too_many_arguments)]
    pub(super) fn on_down(
        &mut self,
        state: State,
        at: Point,
        w: Point,
        button: Button,
        mods: Mods,
        tol: Tol,
        fx: &mut Vec<Effect>,
    ) -> State {
        match (state, button) {
            (State::Idle, Button::Primary) => self.press_idle(at, w, mods, tol, fx),
            (State::Idle, Button::Secondary) => self.open_menu(w, tol, fx),
            (State::PointAdd(mut edit), Button::Primary) => {
                edit.anchor = w;
                State::Pressed {
                    at,
                    primed: Primed::Sketch { extend: true },
                    edit,
                }
            }
            (State::PointAdd(_), Button::Secondary) => {
                fx.push(Effect::Redraw);
                State::Idle
            }
            (State::TransformInit { mut edit, mode, .. }, Button::Primary) => {
                edit.anchor = w;
                State::TransformInit {
                    edit,
                    mode,
                    pressed: true,
                }
            }
            (State::MoveInit { mut edit, .. }, Button::Primary) => {
                edit.anchor = w;
                State::MoveInit { edit, pressed: true }
            }
            (State::AddPolyInit { mut edit, .. }, Button::Primary) => {
                edit.anchor = w;
                State::AddPolyInit { edit, pressed: true }
            }
            (State::TransformInit { .. } | State::MoveInit { .. } | State::AddPolyInit { .. }, Button::Secondary) => {
                fx.push(Effect::Cancelled);
                self.open_menu(w, tol, fx)
            }
            // Pointer is already down.
            (state, _) => state,
        }
    }

    fn press_idle(&mut self, at: Point, w: Point, mods: Mods, tol: Tol, fx: &mut Vec<Effect>) -> State {
        let hit = self.selector.pick(&self.scene, w, tol.vertex, tol.edge);
        fx.push(Effect::Redraw);
        let primed = match hit {
            Hit::Forbidden if self.cfg.check_validity => {
                debug!(x = w.x, y = w.y, "press outside the bounding polygon");
                None
            }
            Hit::Free | Hit::Forbidden => Some((
                Primed::Sketch { extend: false },
                Edit::fresh(self.place(w, None, mods)),
            )),
            Hit::Vertex { poly, index } => self.press_vertex(poly, index, w),
            Hit::Edge { poly, index } => self.press_edge(poly, index, w),
            Hit::Polygon(poly) => Edit::of(&self.scene, poly, w).map(|e| (Primed::PolygonDrag, e)),
        };
        match primed {
            Some((primed, edit)) => State::Pressed { at, primed, edit },
            None => State::Idle,
        }
    }

    fn press_vertex(&self, id: PolyId, index: usize, w: Point) -> Option<(Primed, Edit)> {
        let mut edit = Edit::of(&self.scene, id, w)?;
        if self.cfg.pencil && edit.poly.is_endpoint(index) {
            // Continue drawing from this end; keep it last.
            if index == 0 && edit.poly.len() > 1 {
                let rev = edit.poly.reversed();
                edit.rebase(rev);
            }
            let last = edit.poly.len() - 1;
            return Some((Primed::Sketch { extend: false }, edit.with_moved(vec![last])));
        }
        Some((Primed::PointDrag, edit.with_moved(vec![index])))
    }

    fn press_edge(&self, id: PolyId, index: usize, w: Point) -> Option<(Primed, Edit)> {
        let mut edit = Edit::of(&self.scene, id, w)?;
        let j = (index + 1) % edit.poly.len();
        let moved = match self.cfg.segment_drag {
            SegmentDrag::MoveVertices => vec![index, j],
            SegmentDrag::InsertVertices => {
                let mut poly = edit.poly.clone();
                let (a, b) = (poly.pts[index], poly.pts[j]);
                poly.pts.splice(index + 1..index + 1, [a, b]);
                edit.rebase(poly);
                vec![index + 1, index + 2]
            }
        };
        Some((Primed::SegmentDrag, edit.with_moved(moved)))
    }

    // ---- drag ----

    pub(super) fn on_drag(
        &mut self,
        state: State,
        at: Point,
        w: Point,
        mods: Mods,
        tol: Tol,
        fx: &mut Vec<Effect>,
    ) -> State {
        match state {
            State::Pressed { at: start, primed, edit } => {
                if (at - start).norm() < self.cfg.drag_threshold_px {
                    return State::Pressed { at: start, primed, edit };
                }
                self.start_drag(start, primed, edit, w, mods, tol, fx)
            }
            State::PointDrag(edit) => self.drag_to(edit, w, fx, State::PointDrag),
            State::SegmentDrag(edit) => self.drag_to(edit, w, fx, State::SegmentDrag),
            State::PolygonDrag(edit) => self.drag_to(edit, w, fx, State::PolygonDrag),
            State::Move(edit) => self.drag_to(edit, w, fx, State::Move),
            State::AddPoly(edit) => self.drag_to(edit, w, fx, State::AddPoly),
            State::Pencil { edit, stroke } => self.pencil_sample(edit, stroke, w, mods, tol, fx),
            State::TransformInit {
                edit,
                mode,
                pressed: true,
            } => {
                let pivot = edit.base.bbox().map_or(edit.anchor, |r| r.center());
                let drag = TransformDrag::new(mode, pivot, edit.anchor, self.cfg.min_transform_px * tol.px);
                self.transform_to(edit, drag, w, fx)
            }
            State::Transform { edit, drag } => self.transform_to(edit, drag, w, fx),
            State::MoveInit { edit, pressed: true } => self.drag_to(edit, w, fx, State::Move),
            State::AddPolyInit { edit, pressed: true } => self.drag_to(edit, w, fx, State::AddPoly),
            State::PointAdd(edit) => {
                fx.push(Effect::Redraw);
                State::PointAdd(edit)
            }
            other => other,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn start_drag(
        &mut self,
        at: Point,
        primed: Primed,
        edit: Edit,
        w: Point,
        mods: Mods,
        tol: Tol,
        fx: &mut Vec<Effect>,
    ) -> State {
        match primed {
            Primed::Sketch { .. } if self.cfg.pencil => {
                let Some(stroke) =
                    Stroke::from_tail(&edit.poly, self.cfg.pencil_min_angle(), self.cfg.pencil_min_length)
                else {
                    return State::Idle;
                };
                trace!(points = edit.poly.len(), "pencil stroke");
                self.pencil_sample(edit, stroke, w, mods, tol, fx)
            }
            // Without the pencil a drag only moves the rubber band.
            Primed::Sketch { .. } => {
                fx.push(Effect::Redraw);
                State::Pressed { at, primed, edit }
            }
            Primed::PointDrag => self.drag_to(edit, w, fx, State::PointDrag),
            Primed::SegmentDrag => self.drag_to(edit, w, fx, State::SegmentDrag),
            Primed::PolygonDrag => self.drag_to(edit, w, fx, State::PolygonDrag),
        }
    }

    fn drag_to(&self, mut edit: Edit, w: Point, fx: &mut Vec<Effect>, next: fn(Edit) -> State) -> State {
        edit.translate_to(w, &self.cfg);
        fx.push(Effect::Redraw);
        next(edit)
    }

    fn transform_to(&self, mut edit: Edit, mut drag: TransformDrag, w: Point, fx: &mut Vec<Effect>) -> State {
        let m = drag.update(w);
        edit.transform(&m, drag.pivot);
        fx.push(Effect::Redraw);
        State::Transform { edit, drag }
    }

    fn pencil_sample(
        &mut self,
        mut edit: Edit,
        mut stroke: Stroke,
        w: Point,
        mods: Mods,
        tol: Tol,
        fx: &mut Vec<Effect>,
    ) -> State {
        let s = self.place(w, Some(stroke.last()), mods);
        trace!(x = s.x, y = s.y, pending = stroke.pending().len(), "pencil sample");
        fx.push(Effect::Redraw);
        if self.land_stroke(&edit, &stroke, s, tol, fx) {
            return State::Idle;
        }
        let step = {
            let guard = self.guard(&edit.poly, edit.ignore());
            stroke.feed(s, &guard)
        };
        if let Some(step) = step {
            step.apply_to(&mut edit.poly);
        }
        State::Pencil { edit, stroke }
    }

    /// Try to end the stroke on a free end near `s`: flush toward it on a copy,
    /// then close or join. Nothing changes unless that commit succeeds.
    fn land_stroke(&mut self, edit: &Edit, stroke: &Stroke, s: Point, tol: Tol, fx: &mut Vec<Effect>) -> bool {
        let Some((goal, target)) = self.landing(edit, s, tol) else {
            return false;
        };
        let mut trial = edit.poly.clone();
        let mut st = stroke.clone();
        let step = {
            let guard = self.guard(&edit.poly, edit.ignore());
            st.flush(target, &guard)
        };
        if let Some(step) = step {
            step.apply_to(&mut trial);
        }
        match self.land(trial, goal, edit, fx) {
            Ok(_) => true,
            Err(v) => {
                trace!(violation = %v, ?goal, "stroke landing refused");
                false
            }
        }
    }

    /// Finish the stroke at `s` and commit it; drawing continues click by click.
    fn commit_stroke(&mut self, mut edit: Edit, mut stroke: Stroke, s: Point, fx: &mut Vec<Effect>) -> State {
        let steps = {
            let guard = self.guard(&edit.poly, edit.ignore());
            stroke.finish(s, &guard)
        };
        for step in steps {
            step.apply_to(&mut edit.poly);
        }
        fx.push(Effect::Redraw);
        match self.swap_in(edit.poly.clone(), edit.role, edit.target, &[], fx) {
            Ok(id) => {
                edit.target = Some(id);
                let poly = edit.poly.clone();
                edit.rebase(poly);
                State::PointAdd(edit)
            }
            Err(v) => {
                self.reject(v, fx);
                State::Idle
            }
        }
    }

    // ---- pointer up ----

    pub(super) fn on_up(&mut self, state: State, w: Point, mods: Mods, tol: Tol, fx: &mut Vec<Effect>) -> State {
        match state {
            State::Pressed {
                primed: Primed::Sketch { extend: false },
                edit,
                ..
            } => self.release_seed(edit, fx),
            State::Pressed {
                primed: Primed::Sketch { extend: true },
                edit,
                ..
            } => self.click_point_add(edit, w, mods, tol, fx),
            // A click without a drag only selects.
            State::Pressed { .. } => {
                fx.push(Effect::Redraw);
                State::Idle
            }
            State::PointDrag(mut edit)
            | State::SegmentDrag(mut edit)
            | State::PolygonDrag(mut edit)
            | State::Move(mut edit)
            | State::AddPoly(mut edit) => {
                edit.translate_to(w, &self.cfg);
                self.commit_drag(edit, tol, fx);
                State::Idle
            }
            State::Transform { mut edit, mut drag } => {
                let m = drag.update(w);
                edit.transform(&m, drag.pivot);
                self.commit_edit(edit, fx);
                fx.push(Effect::Redraw);
                State::Idle
            }
            State::Pencil { edit, stroke } => {
                let s = self.place(w, Some(stroke.last()), mods);
                if self.land_stroke(&edit, &stroke, s, tol, fx) {
                    fx.push(Effect::Redraw);
                    return State::Idle;
                }
                self.commit_stroke(edit, stroke, s, fx)
            }
            State::TransformInit { edit, mode, .. } => State::TransformInit {
                edit,
                mode,
                pressed: false,
            },
            State::MoveInit { edit, .. } => State::MoveInit { edit, pressed: false },
            State::AddPolyInit { edit, .. } => State::AddPolyInit { edit, pressed: false },
            other => other,
        }
    }

    /// Release on a fresh press: the seed point becomes a one-point polygon.
    fn release_seed(&mut self, mut edit: Edit, fx: &mut Vec<Effect>) -> State {
        fx.push(Effect::Redraw);
        if edit.target.is_some() {
            return State::PointAdd(edit);
        }
        match self.swap_in(edit.poly.clone(), Role::Interior, None, &[], fx) {
            Ok(id) => {
                edit.target = Some(id);
                State::PointAdd(edit)
            }
            Err(v) => {
                self.reject(v, fx);
                State::Idle
            }
        }
    }

    /// One PointAdd click: close, join, or extend by one vertex.
    fn click_point_add(&mut self, mut edit: Edit, w: Point, mods: Mods, tol: Tol, fx: &mut Vec<Effect>) -> State {
        let p = self.place(w, edit.poly.last(), mods);
        fx.push(Effect::Redraw);
        if let Some((goal, _)) = self.landing(&edit, p, tol) {
            return match self.land(edit.poly.clone(), goal, &edit, fx) {
                Ok(_) => State::Idle,
                Err(v) => {
                    self.reject(v, fx);
                    State::PointAdd(edit)
                }
            };
        }
        if edit.poly.last().is_some_and(|l| (p - l).norm() <= EPS) {
            return State::PointAdd(edit);
        }
        let grown = self
            .extended(&edit, p)
            .and_then(|poly| self.swap_in(poly.clone(), edit.role, edit.target, &[], fx).map(|id| (id, poly)));
        match grown {
            Ok((id, poly)) => {
                edit.target = Some(id);
                edit.rebase(poly);
            }
            Err(v) => self.reject(v, fx),
        }
        State::PointAdd(edit)
    }

    // ---- hover / commands ----

    pub(super) fn on_hover(&mut self, state: State, w: Point, tol: Tol, fx: &mut Vec<Effect>) -> State {
        match state {
            State::Idle => {
                let before = self.selector.current;
                if self.selector.pick(&self.scene, w, tol.vertex, tol.edge) != before {
                    fx.push(Effect::Redraw);
                }
                State::Idle
            }
            State::PointAdd(edit) => {
                fx.push(Effect::Redraw);
                State::PointAdd(edit)
            }
            other => other,
        }
    }

    pub(super) fn on_cancel(&mut self, state: State, fx: &mut Vec<Effect>) -> State {
        self.menu_target = None;
        match state {
            State::Idle => State::Idle,
            // Committed vertices stay; only the drawing mode ends.
            State::PointAdd(_) => {
                fx.push(Effect::Redraw);
                State::Idle
            }
            other => {
                debug!(state = ?other.kind(), "transaction cancelled");
                fx.push(Effect::Cancelled);
                fx.push(Effect::Redraw);
                State::Idle
            }
        }
    }

    pub(super) fn on_finish(&mut self, state: State, fx: &mut Vec<Effect>) -> State {
        match state {
            State::PointAdd(_) => {
                fx.push(Effect::Redraw);
                State::Idle
            }
            State::Pencil { edit, stroke } => {
                let s = stroke.pending().last().copied().unwrap_or_else(|| stroke.last());
                match self.commit_stroke(edit, stroke, s, fx) {
                    State::PointAdd(_) => State::Idle,
                    other => other,
                }
            }
            other => other,
        }
    }
}
