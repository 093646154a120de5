use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polyedit::prelude::*;
use polyedit::scene::Invalid;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;
mod script;
mod svg;

use provenance::{write_sidecar, Payload};
use script::Script;

#[derive(Parser)]
#[command(name = "polyedit")]
#[command(about = "Headless driver for the polygon scene editor")]
struct Cmd {
    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log: tracing::Level,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Feed a scripted event list through an editor and save the resulting scene
    Replay {
        /// Starting scene; empty when omitted
        #[arg(long)]
        scene: Option<PathBuf>,
        #[arg(long)]
        events: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Also paint the final frame
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Editor configuration; defaults when omitted
        #[arg(long)]
        cfg: Option<PathBuf>,
    },
    /// Validate a scene file; exits non-zero when any invariant fails
    Check {
        #[arg(long)]
        scene: PathBuf,
    },
    /// Paint a scene as SVG
    Render {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Screen pixels per world unit
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(cmd.log)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Replay {
            scene,
            events,
            out,
            svg,
            cfg,
        } => replay(scene.as_deref(), &events, &out, svg.as_deref(), cfg.as_deref()),
        Action::Check { scene } => check(&scene),
        Action::Render { scene, out, scale } => render(&scene, &out, scale),
        Action::Report => report(),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn write_out(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn check_scale(scale: f64) -> Result<()> {
    if !(scale.is_finite() && scale > 0.0) {
        bail!("scale must be positive, got {scale}");
    }
    Ok(())
}

fn load_scene(path: &Path) -> Result<Scene> {
    let doc: SceneDoc = read_json(path)?;
    doc.to_scene().with_context(|| format!("scene {} is invalid", path.display()))
}

fn replay(scene: Option<&Path>, events: &Path, out: &Path, svg: Option<&Path>, cfg: Option<&Path>) -> Result<()> {
    let cfg: EditCfg = match cfg {
        Some(p) => read_json(p)?,
        None => EditCfg::default(),
    };
    let start = match scene {
        Some(p) => load_scene(p)?,
        None => Scene::new(),
    };
    let script: Script = read_json(events)?;
    check_scale(script.view.scale).with_context(|| format!("view in {}", events.display()))?;
    if !script.view.origin.iter().all(|c| c.is_finite()) {
        bail!("view origin in {} must be finite", events.display());
    }
    tracing::info!(events = script.events.len(), polygons = start.len(), "replay");

    let mut ed = Editor::with_scene(cfg, start);
    let tally = script::run(&mut ed, &script);
    tracing::info!(
        committed = tally.committed,
        rejected = tally.rejected,
        cancelled = tally.cancelled,
        erased = tally.erased,
        state = ?ed.state_kind(),
        "replayed"
    );

    let doc = SceneDoc::from(ed.scene());
    write_out(out, &serde_json::to_vec_pretty(&doc)?)?;
    if let Some(svg_path) = svg {
        write_out(svg_path, svg::render(&ed, 1.0).as_bytes())?;
    }

    let mut payload = Payload::new(json!({ "cfg": cfg, "tally": tally })).input(events);
    if let Some(p) = scene {
        payload = payload.input(p);
    }
    let sidecar = write_sidecar(out, payload)?;
    tracing::info!(out = %out.display(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

/// Every polygon that breaks an invariant, in id order.
fn violations(scene: &Scene) -> Vec<Invalid> {
    let mut found: Vec<Invalid> = scene
        .iter()
        .filter_map(|(id, p)| {
            scene
                .admits(p, scene.role(id), &[id])
                .err()
                .map(|violation| Invalid { poly: id, violation })
        })
        .collect();
    if found.is_empty() {
        if let Err(e) = scene.validate() {
            found.push(e);
        }
    }
    found
}

fn check(path: &Path) -> Result<()> {
    let doc: SceneDoc = read_json(path)?;
    let scene = doc.to_scene_unchecked();
    let found = violations(&scene);
    if found.is_empty() {
        println!("{}: ok ({} polygons)", path.display(), scene.len());
        return Ok(());
    }
    for v in &found {
        println!("{}: {v}", path.display());
    }
    bail!("{} violation(s) in {}", found.len(), path.display())
}

fn render(scene: &Path, out: &Path, scale: f64) -> Result<()> {
    check_scale(scale)?;
    let ed = Editor::with_scene(EditCfg::default(), load_scene(scene)?);
    write_out(out, svg::render(&ed, scale).as_bytes())?;
    tracing::info!(scene = %scene.display(), out = %out.display(), "render");
    Ok(())
}

fn report() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&provenance::report_block())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CLICKS: &str = r#"{ "events": [
        { "down": { "pos": [0, 0] } }, { "up": { "pos": [0, 0] } },
        { "down": { "pos": [40, 0] } }, { "up": { "pos": [40, 0] } },
        { "down": { "pos": [20, 30] } }, { "up": { "pos": [20, 30] } },
        { "down": { "pos": [1, 1] } }, { "up": { "pos": [1, 1] } }
    ] }"#;

    const CROSSING: &str = r#"{ "polygons": [
        { "points": [[0, 0], [10, 10]] },
        { "points": [[0, 10], [10, 0]] }
    ] }"#;

    #[test]
    fn replay_writes_scene_svg_and_sidecar() {
        let dir = tempdir().unwrap();
        let events = dir.path().join("clicks.json");
        let cfg = dir.path().join("cfg.json");
        let out = dir.path().join("out").join("scene.json");
        let svg = dir.path().join("out").join("scene.svg");
        fs::write(&events, CLICKS).unwrap();
        fs::write(&cfg, r#"{ "pencil": false }"#).unwrap();

        replay(None, &events, &out, Some(&svg), Some(&cfg)).unwrap();

        let doc: SceneDoc = read_json(&out).unwrap();
        assert_eq!(doc.polygons.len(), 1);
        assert!(doc.polygons[0].closed);
        assert_eq!(doc.polygons[0].points.len(), 3);
        assert!(fs::read_to_string(&svg).unwrap().contains("<polygon"));

        let sidecar: serde_json::Value = read_json(&dir.path().join("out").join("scene.provenance.json")).unwrap();
        assert_eq!(sidecar["params"]["tally"]["committed"], 4);
        assert_eq!(sidecar["params"]["cfg"]["pencil"], false);
    }

    #[test]
    fn replay_refuses_an_invalid_starting_scene() {
        let dir = tempdir().unwrap();
        let scene = dir.path().join("bad.json");
        let events = dir.path().join("none.json");
        fs::write(&scene, CROSSING).unwrap();
        fs::write(&events, r#"{ "events": [] }"#).unwrap();
        let err = replay(Some(&scene), &events, &dir.path().join("o.json"), None, None).unwrap_err();
        assert!(format!("{err:#}").contains("is invalid"));
    }

    #[test]
    fn replay_refuses_a_degenerate_view() {
        let dir = tempdir().unwrap();
        let events = dir.path().join("flat.json");
        let out = dir.path().join("o.json");
        fs::write(
            &events,
            r#"{ "view": { "scale": 0 }, "events": [
                { "down": { "pos": [0, 0] } }, { "up": { "pos": [0, 0] } }
            ] }"#,
        )
        .unwrap();
        let err = replay(None, &events, &out, None, None).unwrap_err();
        assert!(format!("{err:#}").contains("scale must be positive"));
        assert!(!out.exists());
    }

    #[test]
    fn replayed_scene_reloads() {
        let dir = tempdir().unwrap();
        let events = dir.path().join("clicks.json");
        let out = dir.path().join("scene.json");
        fs::write(&events, CLICKS).unwrap();
        replay(None, &events, &out, None, None).unwrap();
        let again = load_scene(&out).unwrap();
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn check_lists_every_offending_polygon() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, CROSSING).unwrap();
        let scene = read_json::<SceneDoc>(&bad).unwrap().to_scene_unchecked();
        let found = violations(&scene);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|v| matches!(v.violation, Violation::Crossing(_))));
        assert!(check(&bad).is_err());

        let good = dir.path().join("good.json");
        fs::write(&good, r#"{ "polygons": [ { "points": [[0, 0], [10, 10]] } ] }"#).unwrap();
        check(&good).unwrap();
    }

    #[test]
    fn render_writes_an_svg_document() {
        let dir = tempdir().unwrap();
        let scene = dir.path().join("s.json");
        let out = dir.path().join("s.svg");
        fs::write(
            &scene,
            r#"{ "bounding": { "closed": true, "points": [[0, 0], [100, 0], [100, 100], [0, 100]] },
                 "polygons": [ { "points": [[10, 10], [20, 30]] } ] }"#,
        )
        .unwrap();
        render(&scene, &out, 2.0).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("<svg"));
        assert_eq!(text.matches("<polygon").count(), 1);
        assert_eq!(text.matches("<polyline").count(), 1);
        assert!(render(&scene, &out, 0.0).is_err());
    }
}
