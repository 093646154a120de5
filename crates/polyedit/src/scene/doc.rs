//! Serde value object handed across load/save.
//!
//! The layout is a convenience for the headless CLI, not a persistence
//! contract: `{ "bounding": {..}?, "polygons": [{ "closed": bool, "points": [[x, y], ..] }] }`.

use serde::{Deserialize, Serialize};

use super::{Invalid, Scene};
use crate::geom::{Point, Polygon};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PolygonDoc {
    #[serde(default)]
    pub closed: bool,
    pub points: Vec<[f64; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding: Option<PolygonDoc>,
    #[serde(default)]
    pub polygons: Vec<PolygonDoc>,
}

impl From<&Polygon> for PolygonDoc {
    fn from(p: &Polygon) -> Self {
        Self {
            closed: p.closed,
            points: p.pts.iter().map(|q| [q.x, q.y]).collect(),
        }
    }
}

impl From<&PolygonDoc> for Polygon {
    fn from(d: &PolygonDoc) -> Self {
        Polygon {
            pts: d.points.iter().map(|[x, y]| Point::new(*x, *y)).collect(),
            closed: d.closed,
        }
    }
}

impl From<&Scene> for SceneDoc {
    fn from(scene: &Scene) -> Self {
        Self {
            bounding: scene.bounding_polygon().map(PolygonDoc::from),
            polygons: scene
                .iter()
                .filter(|(id, _)| scene.bounding() != Some(*id))
                .map(|(_, p)| PolygonDoc::from(p))
                .collect(),
        }
    }
}

impl SceneDoc {
    /// Build the scene without checking invariants (for repair workflows).
    pub fn to_scene_unchecked(&self) -> Scene {
        let mut scene = Scene::new();
        if let Some(b) = &self.bounding {
            scene.set_bounding_polygon(b.into());
        }
        for p in &self.polygons {
            scene.insert(p.into());
        }
        scene
    }

    /// Build the scene and reject it if any invariant fails.
    pub fn to_scene(&self) -> Result<Scene, Invalid> {
        let scene = self.to_scene_unchecked();
        scene.validate()?;
        Ok(scene)
    }
}
