//! Context menu: built for the polygon under a secondary press, dispatched back
//! into the machine as `Event::Menu`.

use tracing::info;

use super::types::{Edit, Effect, MenuItem, State, StateKind};
use super::{Editor, Tol};
use crate::geom::Point;
use crate::scene::{PolyId, Role};
use crate::transform::TransformMode;

impl Editor {
    /// Entries offered for polygon `id`.
    pub fn menu_items(&self, id: PolyId) -> Vec<MenuItem> {
        let Some(poly) = self.scene.get(id) else {
            return Vec::new();
        };
        let mut items = vec![MenuItem::Erase, MenuItem::Move, MenuItem::Copy];
        items.extend(TransformMode::ALL.iter().map(|&m| MenuItem::Transform(m)));
        if self.scene.bounding().is_none() && (poly.closed || poly.len() >= 3) {
            items.push(MenuItem::CloseAsBounding);
        }
        items
    }

    /// Polygon the open menu applies to.
    #[inline]
    pub fn menu_target(&self) -> Option<PolyId> {
        self.menu_target
    }

    pub(super) fn open_menu(&mut self, w: Point, tol: Tol, fx: &mut Vec<Effect>) -> State {
        let hit = self.selector.pick(&self.scene, w, tol.vertex, tol.edge);
        self.menu_target = hit.poly();
        if let Some(id) = self.menu_target {
            let items = self.menu_items(id);
            if !items.is_empty() {
                fx.push(Effect::OpenMenu(items));
            }
        }
        fx.push(Effect::Redraw);
        State::Idle
    }

    pub(super) fn on_menu(&mut self, state: State, item: MenuItem, tol: Tol, fx: &mut Vec<Effect>) -> State {
        if state.kind() != StateKind::Idle {
            return state;
        }
        let Some(id) = self.menu_target.take() else {
            return State::Idle;
        };
        let Some(poly) = self.scene.get(id).cloned() else {
            return State::Idle;
        };
        let anchor = self
            .pointer
            .or_else(|| poly.bbox().map(|r| r.center()))
            .unwrap_or_else(Point::zeros);
        match item {
            MenuItem::Erase => {
                self.scene.remove(id);
                self.selector.clear();
                info!(poly = %id, "erased");
                fx.push(Effect::Erased(id));
                fx.push(Effect::Redraw);
                State::Idle
            }
            MenuItem::Move => State::MoveInit {
                edit: Edit::detached(Some(id), self.scene.role(id), poly, anchor),
                pressed: false,
            },
            MenuItem::Copy => {
                let d = self.cfg.copy_offset_px * tol.px;
                let copy = poly.translated(Point::new(d, d));
                fx.push(Effect::Redraw);
                State::AddPolyInit {
                    edit: Edit::detached(None, Role::Interior, copy, anchor),
                    pressed: false,
                }
            }
            MenuItem::Transform(mode) => State::TransformInit {
                edit: Edit::detached(Some(id), self.scene.role(id), poly, anchor),
                mode,
                pressed: false,
            },
            MenuItem::CloseAsBounding => {
                self.promote(id, poly, fx);
                State::Idle
            }
        }
    }
}
