//! Event scripts for headless replay.
//!
//! ```json
//! { "view": { "origin": [0, 0], "scale": 1.0 },
//!   "events": [ { "down": { "pos": [0, 0] } }, { "drag": { "pos": [10, 0] } },
//!               { "up": { "pos": [10, 0] } }, { "menu": { "transform": "rotate" } },
//!               "cancel", "finish" ] }
//! ```

use polyedit::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub view: ViewDoc,
    pub events: Vec<Step>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewDoc {
    pub origin: [f64; 2],
    pub scale: f64,
    pub flip_y: bool,
}

impl Default for ViewDoc {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0],
            scale: 1.0,
            flip_y: false,
        }
    }
}

impl From<ViewDoc> for ScaledView {
    fn from(v: ViewDoc) -> Self {
        ScaledView {
            origin: Vec2::new(v.origin[0], v.origin[1]),
            scale: v.scale,
            flip_y: v.flip_y,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Down {
        pos: [f64; 2],
        #[serde(default)]
        secondary: bool,
        #[serde(default)]
        axis_lock: bool,
    },
    Drag {
        pos: [f64; 2],
        #[serde(default)]
        axis_lock: bool,
    },
    Up {
        pos: [f64; 2],
        #[serde(default)]
        axis_lock: bool,
    },
    Hover {
        pos: [f64; 2],
    },
    Menu(MenuChoice),
    Cancel,
    Finish,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuChoice {
    Erase,
    Move,
    Copy,
    Transform(TransformMode),
    CloseAsBounding,
}

impl From<MenuChoice> for MenuItem {
    fn from(m: MenuChoice) -> Self {
        match m {
            MenuChoice::Erase => MenuItem::Erase,
            MenuChoice::Move => MenuItem::Move,
            MenuChoice::Copy => MenuItem::Copy,
            MenuChoice::Transform(mode) => MenuItem::Transform(mode),
            MenuChoice::CloseAsBounding => MenuItem::CloseAsBounding,
        }
    }
}

fn pt(p: [f64; 2]) -> Point {
    Vec2::new(p[0], p[1])
}

impl Step {
    pub fn to_event(self) -> Event {
        match self {
            Step::Down {
                pos,
                secondary,
                axis_lock,
            } => Event::Down {
                pos: pt(pos),
                button: if secondary { Button::Secondary } else { Button::Primary },
                mods: Mods { axis_lock },
            },
            Step::Drag { pos, axis_lock } => Event::Drag {
                pos: pt(pos),
                mods: Mods { axis_lock },
            },
            Step::Up { pos, axis_lock } => Event::Up {
                pos: pt(pos),
                mods: Mods { axis_lock },
            },
            Step::Hover { pos } => Event::Hover { pos: pt(pos) },
            Step::Menu(m) => Event::Menu(m.into()),
            Step::Cancel => Event::Cancel,
            Step::Finish => Event::Finish,
        }
    }
}

/// Effect counts of a replay, recorded in the provenance sidecar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub events: usize,
    pub committed: usize,
    pub rejected: usize,
    pub cancelled: usize,
    pub erased: usize,
}

impl Tally {
    pub fn add(&mut self, fx: &[Effect]) {
        self.events += 1;
        for e in fx {
            match e {
                Effect::Committed(_) => self.committed += 1,
                Effect::Rejected(v) => {
                    tracing::debug!(violation = %v, "rejected");
                    self.rejected += 1;
                }
                Effect::Cancelled => self.cancelled += 1,
                Effect::Erased(_) => self.erased += 1,
                Effect::Redraw | Effect::OpenMenu(_) => {}
            }
        }
    }
}

/// Feed every step through `ed`.
pub fn run(ed: &mut Editor, script: &Script) -> Tally {
    let view = ScaledView::from(script.view);
    let mut tally = Tally::default();
    for step in &script.events {
        let fx = ed.handle(&view, step.to_event());
        tally.add(&fx);
    }
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"{
        "events": [
            { "down": { "pos": [0, 0] } }, { "up": { "pos": [0, 0] } },
            { "down": { "pos": [40, 0] } }, { "up": { "pos": [40, 0] } },
            { "down": { "pos": [20, 30] } }, { "up": { "pos": [20, 30] } },
            { "down": { "pos": [1, 1] } }, { "up": { "pos": [1, 1] } }
        ]
    }"#;

    #[test]
    fn parses_every_step_shape() {
        let json = r#"{ "view": { "scale": 2.0 }, "events": [
            { "down": { "pos": [1, 2], "secondary": true } },
            { "drag": { "pos": [3, 4], "axis_lock": true } },
            { "hover": { "pos": [0, 0] } },
            { "menu": "erase" },
            { "menu": { "transform": "shear_vertical" } },
            "cancel", "finish"
        ] }"#;
        let s: Script = serde_json::from_str(json).unwrap();
        assert_eq!(s.view.scale, 2.0);
        assert_eq!(s.events.len(), 7);
        assert!(matches!(
            s.events[0].to_event(),
            Event::Down { button: Button::Secondary, .. }
        ));
        assert!(matches!(
            s.events[4].to_event(),
            Event::Menu(MenuItem::Transform(TransformMode::ShearVertical))
        ));
    }

    #[test]
    fn clicked_triangle_replays_to_one_closed_polygon() {
        let script: Script = serde_json::from_str(TRIANGLE).unwrap();
        let mut ed = Editor::new(EditCfg {
            pencil: false,
            ..EditCfg::default()
        });
        let tally = run(&mut ed, &script);
        assert_eq!(tally.events, 8);
        assert_eq!(tally.rejected, 0);
        assert_eq!(tally.committed, 4);
        let doc = SceneDoc::from(ed.scene());
        assert_eq!(doc.polygons.len(), 1);
        assert!(doc.polygons[0].closed);
    }
}
