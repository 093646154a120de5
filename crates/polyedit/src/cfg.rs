//! Editor configuration (passed in, never global).
//!
//! Defaults follow the interactive feel of the original tool: a 5–6 px pick
//! radius, 15° / 20 unit pencil thresholds, validity checking on.

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::snap;

/// What dragging an edge does to its endpoints.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentDrag {
    /// Move the edge's own two vertices.
    #[default]
    MoveVertices,
    /// Duplicate the endpoints and move the copies (extrude the edge).
    InsertVertices,
}

/// Recognized editor options. Pixel quantities are converted through the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditCfg {
    pub grid_size: f64,
    pub grid_active: bool,
    /// Gate commits on scene invariants. Off = accept any geometry.
    pub check_validity: bool,
    pub segment_drag: SegmentDrag,
    /// Dragging from free space or an open endpoint draws freehand.
    pub pencil: bool,
    pub pencil_min_angle_deg: f64,
    /// World units.
    pub pencil_min_length: f64,
    pub hit_tolerance_px: f64,
    pub edge_tolerance_px: f64,
    pub drag_threshold_px: f64,
    /// Minimum pivot offset before scale/rotate/shear react.
    pub min_transform_px: f64,
    pub copy_offset_px: f64,
}

impl Default for EditCfg {
    fn default() -> Self {
        Self {
            grid_size: 10.0,
            grid_active: false,
            check_validity: true,
            segment_drag: SegmentDrag::MoveVertices,
            pencil: true,
            pencil_min_angle_deg: 15.0,
            pencil_min_length: 20.0,
            hit_tolerance_px: 6.0,
            edge_tolerance_px: 3.0,
            drag_threshold_px: 2.0,
            min_transform_px: 4.0,
            copy_offset_px: 10.0,
        }
    }
}

impl EditCfg {
    #[inline]
    pub fn pencil_min_angle(&self) -> f64 {
        self.pencil_min_angle_deg.to_radians()
    }

    /// Grid-snap `p` when the grid is active.
    #[inline]
    pub fn snap(&self, p: Point) -> Point {
        if self.grid_active {
            snap::snap(p, self.grid_size)
        } else {
            p
        }
    }
}
