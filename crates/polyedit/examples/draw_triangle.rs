//! Draw and close a triangle headlessly, then print the scene as JSON.
//!
//! Usage:
//!   cargo run -p polyedit --example draw_triangle
//!   cargo run -p polyedit --example draw_triangle -- clicks

use polyedit::prelude::*;

fn main() {
    let pencil = std::env::args().nth(1).as_deref() != Some("clicks");
    let cfg = EditCfg {
        pencil,
        ..EditCfg::default()
    };
    let view = ScaledView::identity();
    let mut ed = Editor::new(cfg);
    let corners = [Vec2::new(0.0, 0.0), Vec2::new(80.0, 0.0), Vec2::new(40.0, 60.0)];

    if pencil {
        // One stroke through the corners and back to the start.
        ed.handle(&view, Event::down(corners[0]));
        for w in corners.iter().chain([&corners[0]]).collect::<Vec<_>>().windows(2) {
            for k in 1..=20 {
                let t = k as f64 / 20.0;
                ed.handle(&view, Event::drag(w[0] + (w[1] - w[0]) * t));
            }
        }
        ed.handle(&view, Event::up(corners[0]));
    } else {
        for p in corners.iter().chain([&corners[0]]) {
            ed.handle(&view, Event::down(*p));
            ed.handle(&view, Event::up(*p));
        }
    }

    println!("state: {:?}", ed.state_kind());
    for (id, poly) in ed.scene().iter() {
        println!("{id}: {} points, closed = {}", poly.len(), poly.closed);
    }
    match serde_json::to_string_pretty(&SceneDoc::from(ed.scene())) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("serialize: {e}"),
    }
}
