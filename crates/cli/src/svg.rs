//! Minimal SVG paint surface.

use std::fmt::Write;

use polyedit::prelude::*;

pub struct SvgSurface {
    body: String,
    vertex_radius: f64,
}

impl SvgSurface {
    pub fn new(vertex_radius: f64) -> Self {
        Self {
            body: String::new(),
            vertex_radius,
        }
    }

    /// Wrap the drawn elements in an `<svg>` document of the given pixel size.
    pub fn finish(self, width: f64, height: f64) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" viewBox=\"0 0 {width:.3} {height:.3}\">\n{}</svg>\n",
            self.body
        )
    }
}

fn stroke(style: Style) -> (&'static str, f64) {
    match style {
        Style::Bounding => ("#444444", 2.0),
        Style::Interior => ("#1f77b4", 1.5),
        Style::Selected => ("#d62728", 2.0),
        Style::Preview => ("#ff7f0e", 1.5),
        Style::RubberBand => ("#7f7f7f", 1.0),
        Style::Overlay => ("#2ca02c", 1.0),
    }
}

impl Surface for SvgSurface {
    fn polyline(&mut self, pts: &[Point], closed: bool, style: Style) {
        let tag = if closed { "polygon" } else { "polyline" };
        let points: Vec<String> = pts.iter().map(|p| format!("{:.3},{:.3}", p.x, p.y)).collect();
        let (color, width) = stroke(style);
        let _ = writeln!(
            self.body,
            "  <{tag} points=\"{}\" fill=\"none\" stroke=\"{color}\" stroke-width=\"{width}\"/>",
            points.join(" ")
        );
    }

    fn vertex(&mut self, p: Point, style: Style) {
        let (color, _) = stroke(style);
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{}\" fill=\"{color}\"/>",
            p.x, p.y, self.vertex_radius
        );
    }
}

/// Screen-space view framing the whole scene with a margin, y axis up.
pub fn fit_view(scene: &Scene, scale: f64, margin_px: f64) -> (ScaledView, f64, f64) {
    let bbox = scene
        .iter()
        .filter_map(|(_, p)| p.bbox())
        .reduce(|a, b| a.union(&b));
    let Some(bbox) = bbox else {
        return (ScaledView::identity(), 2.0 * margin_px, 2.0 * margin_px);
    };
    let m = margin_px / scale;
    let view = ScaledView {
        origin: Vec2::new(bbox.min.x - m, bbox.max.y + m),
        scale,
        flip_y: true,
    };
    let width = (bbox.width() + 2.0 * m) * scale;
    let height = (bbox.height() + 2.0 * m) * scale;
    (view, width, height)
}

/// Paint the editor's current frame as an SVG document.
pub fn render(ed: &Editor, scale: f64) -> String {
    let (view, width, height) = fit_view(ed.scene(), scale, 10.0);
    let mut surface = SvgSurface::new(2.0);
    ed.paint(&view, &mut surface);
    surface.finish(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_closed_and_open_polygons() {
        let mut scene = Scene::new();
        scene.insert(Polygon::closed(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ]));
        scene.insert(Polygon::open(vec![Vec2::new(20.0, 0.0), Vec2::new(30.0, 5.0)]));
        let ed = Editor::with_scene(EditCfg::default(), scene);
        let svg = render(&ed, 2.0);
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<polygon").count(), 1);
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 5);
    }

    #[test]
    fn fitted_view_keeps_points_on_canvas() {
        let mut scene = Scene::new();
        scene.insert(Polygon::open(vec![Vec2::new(-5.0, 3.0), Vec2::new(15.0, 8.0)]));
        let (view, w, h) = fit_view(&scene, 4.0, 10.0);
        for (_, poly) in scene.iter() {
            for p in &poly.pts {
                let s = view.to_screen(*p);
                assert!(s.x >= 0.0 && s.x <= w && s.y >= 0.0 && s.y <= h, "{s:?}");
            }
        }
    }
}
