//! Pixel-to-geographic affine mapping.

use serde::{Deserialize, Serialize};

/// Six-coefficient affine transform from pixel `(column, row)` to
/// geographic `(x, y)`.
///
/// Coefficients follow the GDAL/rasterio layout:
/// `x = a*col + b*row + c` and `y = d*col + e*row + f`. For a north-up
/// raster `b` and `d` are zero and `e` is negative (rows grow southward).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    /// Pixel width in geographic units.
    pub a: f64,
    /// Row rotation.
    pub b: f64,
    /// X coordinate of the top-left raster origin.
    pub c: f64,
    /// Column rotation.
    pub d: f64,
    /// Pixel height in geographic units.
    pub e: f64,
    /// Y coordinate of the top-left raster origin.
    pub f: f64,
}

impl AffineTransform {
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Unit pixel size, no rotation, origin at `(0, 0)`.
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    #[inline]
    pub fn determinant(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }

    /// A valid raster transform always has a non-zero determinant.
    #[inline]
    pub fn is_invertible(&self) -> bool {
        self.determinant() != 0.0
    }

    /// Apply the raw affine mapping to a (possibly fractional) pixel index.
    #[inline]
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Map a pixel position to geographic `(x, y)`, i.e. `(longitude,
    /// latitude)` for geographic rasters.
    ///
    /// Both coordinates are rounded to the nearest integer pixel index
    /// first; sub-pixel precision is discarded.
    #[inline]
    pub fn pixel_to_geo(&self, pixel_x: f64, pixel_y: f64) -> (f64, f64) {
        self.apply(pixel_x.round(), pixel_y.round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_maps_pixels_to_themselves() {
        let t = AffineTransform::identity();
        assert_eq!(t.pixel_to_geo(100.0, 100.0), (100.0, 100.0));
        assert_eq!(t.pixel_to_geo(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn subpixel_positions_snap_to_nearest_index() {
        let t = AffineTransform::identity();
        assert_eq!(t.pixel_to_geo(100.4, 99.6), (100.0, 100.0));
        assert_eq!(t.pixel_to_geo(100.5, 100.5), (101.0, 101.0));
    }

    #[test]
    fn north_up_raster_mapping() {
        // 0.5 units/pixel, origin at (100, 50), rows grow southward.
        let t = AffineTransform::new(0.5, 0.0, 100.0, 0.0, -0.5, 50.0);
        let (x, y) = t.pixel_to_geo(10.0, 20.0);
        assert_relative_eq!(x, 105.0);
        assert_relative_eq!(y, 40.0);
    }

    #[test]
    fn rotation_terms_contribute() {
        let t = AffineTransform::new(1.0, 0.25, 0.0, -0.25, 1.0, 0.0);
        let (x, y) = t.apply(4.0, 8.0);
        assert_relative_eq!(x, 6.0);
        assert_relative_eq!(y, 7.0);
    }

    #[test]
    fn determinant_and_invertibility() {
        assert_eq!(AffineTransform::identity().determinant(), 1.0);
        let degenerate = AffineTransform::new(1.0, 2.0, 0.0, 2.0, 4.0, 0.0);
        assert!(!degenerate.is_invertible());
        let north_up = AffineTransform::new(0.1, 0.0, 0.0, 0.0, -0.1, 0.0);
        assert!(north_up.is_invertible());
    }

    #[test]
    fn serde_round_trip() {
        let t = AffineTransform::new(0.5, 0.0, 100.0, 0.0, -0.5, 50.0);
        let json = serde_json::to_string(&t).unwrap();
        let back: AffineTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
