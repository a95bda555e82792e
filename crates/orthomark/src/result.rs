//! Final per-marker record.

use serde::{Deserialize, Serialize};

/// A detected marker with georeferenced position and quality metrics.
///
/// `corner_pixels` holds `[x, y]` pixel points clockwise from the
/// detector's top-left corner; `corner_coords` holds the matching
/// `[latitude, longitude]` pairs in the same order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoMarker {
    pub marker_id: u32,
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Center pixel column.
    pub pixel_x: i64,
    /// Center pixel row.
    pub pixel_y: i64,
    pub corner_pixels: [[f32; 2]; 4],
    pub corner_coords: [[f64; 2]; 4],
    /// Shape-quality score in `[0, 1]`, rounded to 4 decimals.
    pub confidence: f64,
    /// Top-edge rotation in degrees in `(-180, 180]`, rounded to 2 decimals.
    pub rotation_deg: f64,
}
