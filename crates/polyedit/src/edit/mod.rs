//! Edit-cycle state machine.
//!
//! Purpose
//! - Turn pointer/command events into geometric transactions on a `Scene`:
//!   draw (click or freehand), drag a vertex/edge/polygon, move, copy,
//!   transform, erase, promote to bounding polygon.
//!
//! Why this design
//! - One enum state owning its transaction; `handle` moves the state out, runs
//!   the transition for `(state, event)` and stores the returned state. Side
//!   effects are returned as a list, so headless drivers and tests observe
//!   exactly what a shell would.
//! - Copy-on-write: a live transaction edits `Edit::poly` only. The scene is
//!   written once per successful commit; rollback drops the buffer.
//!
//! Model
//! - Events carry screen positions; the `Viewport` maps them to world space and
//!   sizes pixel tolerances (`EditCfg::*_px` × `Viewport::pixel`).
//! - Commit = validate candidate against the scene minus the polygons it
//!   replaces, then swap it in. With `check_validity` off every candidate passes.
//! - Any running background `Job` is cancelled when a transaction starts or the
//!   scene mutates.
//!
//! Code cross-refs: `commit.rs` (validation, concatenation), `machine.rs`
//! (transitions), `menu.rs` (context menu), `crate::paint` (drawing).

mod commit;
mod machine;
mod menu;
mod types;

pub use commit::splice;
pub use types::{Button, Edit, Effect, Event, MenuItem, Mods, Primed, State, StateKind};

use tracing::{debug, info};

use crate::cfg::EditCfg;
use crate::geom::{Point, Polygon};
use crate::scene::{PolyId, Scene};
use crate::select::{Hit, Selector};
use crate::view::Viewport;
use crate::worker::Job;

/// World-space tolerances for one event, derived from the viewport scale.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Tol {
    /// Screen pixels → world units.
    pub px: f64,
    pub vertex: f64,
    pub edge: f64,
}

impl Tol {
    fn new(cfg: &EditCfg, px: f64) -> Self {
        Self {
            px,
            vertex: cfg.hit_tolerance_px * px,
            edge: cfg.edge_tolerance_px * px,
        }
    }
}

/// Interactive editor over one scene.
pub struct Editor {
    cfg: EditCfg,
    scene: Scene,
    state: State,
    selector: Selector,
    /// Polygon the open context menu was built for.
    menu_target: Option<PolyId>,
    /// Last pointer position in world space (rubber band).
    pointer: Option<Point>,
    job: Option<Job<Vec<Polygon>>>,
}

impl Editor {
    pub fn new(cfg: EditCfg) -> Self {
        Self::with_scene(cfg, Scene::new())
    }

    pub fn with_scene(cfg: EditCfg, scene: Scene) -> Self {
        Self {
            cfg,
            scene,
            state: State::Idle,
            selector: Selector::default(),
            menu_target: None,
            pointer: None,
            job: None,
        }
    }

    #[inline]
    pub fn cfg(&self) -> &EditCfg {
        &self.cfg
    }

    /// New options apply from the next event; a live transaction is abandoned.
    pub fn set_cfg(&mut self, cfg: EditCfg) {
        if self.state.kind() != StateKind::Idle {
            debug!(state = ?self.state.kind(), "config change abandons transaction");
            self.state = State::Idle;
        }
        self.cfg = cfg;
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Replace the whole scene (file load). Handles from the old scene are dead.
    pub fn load(&mut self, scene: Scene) {
        self.cancel_job();
        self.state = State::Idle;
        self.selector.clear();
        self.menu_target = None;
        info!(polygons = scene.len(), "scene loaded");
        self.scene = scene;
    }

    pub fn into_scene(mut self) -> Scene {
        self.cancel_job();
        std::mem::take(&mut self.scene)
    }

    #[inline]
    pub fn state(&self) -> &State {
        &self.state
    }
    #[inline]
    pub fn state_kind(&self) -> StateKind {
        self.state.kind()
    }
    #[inline]
    pub fn selection(&self) -> Hit {
        self.selector.current
    }
    #[inline]
    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    /// Feed one event; returns the side effects in order.
    pub fn handle<V: Viewport>(&mut self, view: &V, ev: Event) -> Vec<Effect> {
        let tol = Tol::new(&self.cfg, view.pixel());
        let rev = self.scene.revision();
        let mut fx = Vec::new();
        let state = std::mem::take(&mut self.state);
        let from = state.kind();
        // A primary press or menu command may start a transaction; the job is
        // stopped before the scene can change under it.
        if from == StateKind::Idle
            && matches!(ev, Event::Down { button: Button::Primary, .. } | Event::Menu(_))
        {
            self.cancel_job();
        }
        let next = match ev {
            Event::Down { pos, button, mods } => {
                let w = view.to_world(pos);
                self.pointer = Some(w);
                self.on_down(state, pos, w, button, mods, tol, &mut fx)
            }
            Event::Drag { pos, mods } => {
                let w = view.to_world(pos);
                self.pointer = Some(w);
                self.on_drag(state, pos, w, mods, tol, &mut fx)
            }
            Event::Up { pos, mods } => {
                let w = view.to_world(pos);
                self.pointer = Some(w);
                self.on_up(state, w, mods, tol, &mut fx)
            }
            Event::Hover { pos } => {
                let w = view.to_world(pos);
                self.pointer = Some(w);
                self.on_hover(state, w, tol, &mut fx)
            }
            Event::Menu(item) => self.on_menu(state, item, tol, &mut fx),
            Event::Cancel => self.on_cancel(state, &mut fx),
            Event::Finish => self.on_finish(state, &mut fx),
        };
        let to = next.kind();
        if to != from {
            debug!(?from, ?to, "transition");
        }
        if (from == StateKind::Idle && to != StateKind::Idle) || self.scene.revision() != rev {
            self.cancel_job();
        }
        self.state = next;
        fx
    }

    /// Run `work` on a snapshot of the current scene; replaces any running job.
    pub fn start_job<F>(&mut self, name: &str, work: F) -> std::io::Result<()>
    where
        F: FnOnce(&Scene, &crate::worker::JobCtl) -> Option<Vec<Polygon>> + Send + 'static,
    {
        self.cancel_job();
        self.job = Some(Job::spawn(name, &self.scene, work)?);
        Ok(())
    }

    /// Blocks until the worker has exited.
    pub fn cancel_job(&mut self) {
        if let Some(job) = self.job.take() {
            job.cancel();
        }
    }

    /// Progress of the running job, if any.
    pub fn job_progress(&self) -> Option<i32> {
        self.job.as_ref().map(|j| j.progress())
    }

    /// Finished job output, valid for the current scene.
    pub fn job_result(&mut self) -> Option<&[Polygon]> {
        let rev = self.scene.revision();
        let job = self.job.as_mut()?;
        job.poll();
        job.result(rev).map(Vec::as_slice)
    }

    pub(crate) fn overlay(&self) -> Option<&[Polygon]> {
        let job = self.job.as_ref()?;
        job.result(self.scene.revision()).map(Vec::as_slice)
    }
}
