//! Shape metrics for detected marker quads.
//!
//! Corners are expected in detector order: clockwise starting at the
//! marker's top-left corner.

use nalgebra::Point2;

/// Consecutive side lengths of a quad, wrapping from the last corner back
/// to the first.
pub fn side_lengths(corners: &[Point2<f32>; 4]) -> [f64; 4] {
    let mut sides = [0.0f64; 4];
    for (i, side) in sides.iter_mut().enumerate() {
        let p1 = corners[i];
        let p2 = corners[(i + 1) % 4];
        let dx = (p2.x - p1.x) as f64;
        let dy = (p2.y - p1.y) as f64;
        *side = (dx * dx + dy * dy).sqrt();
    }
    sides
}

/// Arithmetic mean of the four corners.
pub fn quad_center(corners: &[Point2<f32>; 4]) -> Point2<f64> {
    let mut x = 0.0f64;
    let mut y = 0.0f64;
    for p in corners {
        x += p.x as f64;
        y += p.y as f64;
    }
    Point2::new(x / 4.0, y / 4.0)
}

/// Shape-quality score in `[0, 1]`.
///
/// An equilateral quad scores 1.0; distortion decays the score
/// exponentially via the normalized population variance of the side
/// lengths. Four coincident corners (zero mean side) score 0.0.
pub fn shape_confidence(corners: &[Point2<f32>; 4]) -> f64 {
    let sides = side_lengths(corners);
    let mean = sides.iter().sum::<f64>() / 4.0;
    if mean == 0.0 {
        return 0.0;
    }

    let variance = sides.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / 4.0;
    let normalized = variance / (mean * mean);

    (-5.0 * normalized).exp().clamp(0.0, 1.0)
}

/// Rotation of the marker's top edge (first to second corner) in degrees.
///
/// Zero means the top edge is horizontal; the sign follows the `atan2`
/// convention in image coordinates. The result lies in `(-180, 180]`.
/// A zero-length top edge reports 0.0 (`atan2(0, 0)` is zero in IEEE
/// arithmetic).
pub fn rotation_deg(corners: &[Point2<f32>; 4]) -> f64 {
    let dx = (corners[1].x - corners[0].x) as f64;
    let dy = (corners[1].y - corners[0].y) as f64;
    dy.atan2(dx).to_degrees()
}
