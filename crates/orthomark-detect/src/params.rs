//! Detector tuning profile.

use serde::{Deserialize, Serialize};

/// Parameters handed to the detection capability.
///
/// Field meanings follow the common adaptive-threshold quad detector
/// layout: threshold window bounds in pixels, marker perimeter bounds
/// relative to the image size, polygon approximation tolerance relative
/// to the candidate perimeter, and pixel distances for corner/border
/// rejection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionParameters {
    pub adaptive_thresh_constant: f64,
    pub adaptive_thresh_win_size_min: u32,
    pub adaptive_thresh_win_size_max: u32,
    pub adaptive_thresh_win_size_step: u32,
    pub min_marker_perimeter_rate: f64,
    pub max_marker_perimeter_rate: f64,
    pub polygonal_approx_accuracy_rate: f64,
    pub min_corner_distance_rate: f64,
    pub min_distance_to_border: u32,
}

impl DetectionParameters {
    /// Profile tuned for orthomosaics from high-altitude capture: a wide
    /// threshold window range, a low minimum perimeter rate to catch small
    /// distant markers, a relaxed polygon tolerance for lens/stitching
    /// distortion, and a small border margin.
    pub fn aerial() -> Self {
        Self {
            adaptive_thresh_constant: 7.0,
            adaptive_thresh_win_size_min: 3,
            adaptive_thresh_win_size_max: 23,
            adaptive_thresh_win_size_step: 10,
            min_marker_perimeter_rate: 0.01,
            max_marker_perimeter_rate: 4.0,
            polygonal_approx_accuracy_rate: 0.05,
            min_corner_distance_rate: 0.05,
            min_distance_to_border: 3,
        }
    }
}

impl Default for DetectionParameters {
    fn default() -> Self {
        Self::aerial()
    }
}
