//! GeoTIFF loading for marker detection.
//!
//! Reads a georeferenced TIFF into a normalized 8-bit three-channel image
//! together with its pixel→geographic affine transform and CRS identifier.
//! Band and bit-depth handling follows the needs of the detection pipeline,
//! not general raster processing: whatever the source looks like, the
//! output is always `(H, W, 3)` of `u8`.

mod geotiff;
mod normalize;

pub use geotiff::{load_georaster, GeoRaster, RasterError};
pub use normalize::rescale_to_u8;
