//! Drawing seam: the editor describes what to draw, the shell's `Surface` draws it.
//!
//! Everything handed to a surface is in screen coordinates.

use crate::edit::{Editor, State};
use crate::geom::Point;
use crate::view::Viewport;

/// Semantic style tag; colours and widths belong to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Style {
    Bounding,
    Interior,
    Selected,
    /// Working geometry of the live transaction.
    Preview,
    /// Segment from the last vertex to the pointer while drawing.
    RubberBand,
    /// Result of a finished background job.
    Overlay,
}

pub trait Surface {
    fn polyline(&mut self, pts: &[Point], closed: bool, style: Style);
    fn vertex(&mut self, p: Point, style: Style);
    fn line(&mut self, a: Point, b: Point, style: Style) {
        self.polyline(&[a, b], false, style);
    }
}

impl Editor {
    /// Draw one frame: scene, selection, live preview, rubber band, job overlay.
    pub fn paint<V: Viewport, S: Surface>(&self, view: &V, surface: &mut S) {
        let edit = self.state().edit();
        let hidden = edit.and_then(|e| e.target);
        let selected = self.selection().poly();
        let scene = self.scene();

        for (id, poly) in scene.iter() {
            if Some(id) == hidden {
                continue;
            }
            let style = if Some(id) == selected {
                Style::Selected
            } else if scene.bounding() == Some(id) {
                Style::Bounding
            } else {
                Style::Interior
            };
            draw(view, surface, &poly.pts, poly.closed, style);
        }

        if let Some(edit) = edit {
            draw(view, surface, &edit.poly.pts, edit.poly.closed, Style::Preview);
        }

        match self.state() {
            State::Pencil { edit, stroke } => {
                let mut band: Vec<Point> = edit.poly.last().into_iter().collect();
                band.extend_from_slice(stroke.pending());
                band.extend(self.pointer());
                let band: Vec<Point> = band.iter().map(|p| view.to_screen(*p)).collect();
                if band.len() >= 2 {
                    surface.polyline(&band, false, Style::RubberBand);
                }
            }
            State::PointAdd(edit) | State::Pressed { edit, .. } if !edit.poly.closed => {
                if let (Some(last), Some(ptr)) = (edit.poly.last(), self.pointer()) {
                    surface.line(view.to_screen(last), view.to_screen(ptr), Style::RubberBand);
                }
            }
            _ => {}
        }

        if let Some(polys) = self.overlay() {
            for poly in polys {
                draw(view, surface, &poly.pts, poly.closed, Style::Overlay);
            }
        }
    }
}

fn draw<V: Viewport, S: Surface>(view: &V, surface: &mut S, pts: &[Point], closed: bool, style: Style) {
    let screen: Vec<Point> = pts.iter().map(|p| view.to_screen(*p)).collect();
    if screen.len() >= 2 {
        surface.polyline(&screen, closed, style);
    }
    for p in &screen {
        surface.vertex(*p, style);
    }
}
