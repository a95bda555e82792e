//! GeoTIFF decoding into a normalized detection-ready raster.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;

use orthomark_core::{AffineTransform, RgbImage};

use crate::normalize::rescale_to_u8;

/// Errors raised while loading a georeferenced raster.
#[derive(thiserror::Error, Debug)]
pub enum RasterError {
    #[error("failed to open raster: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Tiff(#[from] tiff::TiffError),

    #[error("unsupported band count: {bands}")]
    UnsupportedBandCount { bands: usize },

    #[error("raster sample layout mismatch (expected {expected} samples, got {got})")]
    SampleLayout { expected: usize, got: usize },

    #[error("raster carries no usable georeferencing tags")]
    MissingGeoreference,
}

/// A decoded raster ready for marker detection: normalized 8-bit RGB
/// pixels, the pixel→geographic transform, and the CRS identifier.
#[derive(Clone, Debug)]
pub struct GeoRaster {
    pub image: RgbImage,
    pub transform: AffineTransform,
    pub crs: String,
}

/// Load a georeferenced TIFF and prepare it for detection.
///
/// Band handling: three or more bands keep the first three as RGB, a
/// single band is replicated into three channels, and anything else is
/// rejected. Non-8-bit samples are rescaled so the maximum observed value
/// maps to 255 (truncating). The file handle is released before returning.
pub fn load_georaster(path: impl AsRef<Path>) -> Result<GeoRaster, RasterError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let bands = match decoder.find_tag(Tag::SamplesPerPixel)? {
        Some(value) => value.into_u32()? as usize,
        None => 1,
    };
    if bands == 0 || bands == 2 {
        return Err(RasterError::UnsupportedBandCount { bands });
    }

    let transform = read_geotransform(&mut decoder)?;
    let crs = read_crs(&mut decoder);

    let data = match decoder.read_image()? {
        DecodingResult::U8(v) => select_bands(v, width, height, bands)?,
        DecodingResult::U16(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::U32(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::U64(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::I8(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::I16(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::I32(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::I64(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::F32(v) => rescale(select_bands(v, width, height, bands)?, |s| s as f64),
        DecodingResult::F64(v) => rescale(select_bands(v, width, height, bands)?, |s| s),
    };

    log::debug!(
        "loaded raster {}x{} ({} band{}), crs {}",
        width,
        height,
        bands,
        if bands == 1 { "" } else { "s" },
        crs
    );

    Ok(GeoRaster {
        image: RgbImage::new(width, height, data),
        transform,
        crs,
    })
}

fn rescale<T: Copy>(samples: Vec<T>, to_f64: impl Fn(T) -> f64) -> Vec<u8> {
    rescale_to_u8(&samples, to_f64)
}

/// Reduce an interleaved sample buffer to three channels per pixel:
/// replicate a single band, keep the first three of many.
fn select_bands<T: Copy>(
    samples: Vec<T>,
    width: usize,
    height: usize,
    bands: usize,
) -> Result<Vec<T>, RasterError> {
    let pixels = width * height;
    let expected = pixels * bands;
    if samples.len() != expected {
        return Err(RasterError::SampleLayout {
            expected,
            got: samples.len(),
        });
    }

    if bands == 3 {
        return Ok(samples);
    }

    let mut out = Vec::with_capacity(pixels * 3);
    if bands == 1 {
        for &s in &samples {
            out.push(s);
            out.push(s);
            out.push(s);
        }
    } else {
        for chunk in samples.chunks_exact(bands) {
            out.extend_from_slice(&chunk[..3]);
        }
    }
    Ok(out)
}

/// Build the affine transform from `ModelTransformationTag` or the
/// `ModelPixelScaleTag`/`ModelTiepointTag` pair.
fn read_geotransform<R: Read + Seek>(
    decoder: &mut Decoder<R>,
) -> Result<AffineTransform, RasterError> {
    if let Some(value) = decoder.find_tag(Tag::ModelTransformationTag)? {
        let m = value.into_f64_vec()?;
        if m.len() >= 8 {
            // Row-major 4x4; rows 0 and 1 carry the 2D mapping.
            return Ok(AffineTransform::new(m[0], m[1], m[3], m[4], m[5], m[7]));
        }
    }

    let scale = decoder.find_tag(Tag::ModelPixelScaleTag)?;
    let tiepoint = decoder.find_tag(Tag::ModelTiepointTag)?;
    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        let s = scale.into_f64_vec()?;
        let t = tiepoint.into_f64_vec()?;
        if s.len() >= 2 && t.len() >= 6 {
            let (sx, sy) = (s[0], s[1]);
            let (col, row, x, y) = (t[0], t[1], t[3], t[4]);
            return Ok(AffineTransform::new(
                sx,
                0.0,
                x - col * sx,
                0.0,
                -sy,
                y + row * sy,
            ));
        }
    }

    Err(RasterError::MissingGeoreference)
}

/// Read the CRS identifier from the GeoKey directory.
///
/// The directory is a flat `u16` array: a 4-entry header followed by
/// `(key, tag_location, count, value)` quads. Only the projected (3072)
/// and geographic (2048) CRS keys matter here; the projected key wins
/// when both are present.
fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> String {
    let keys = decoder
        .find_tag(Tag::GeoKeyDirectoryTag)
        .ok()
        .flatten()
        .and_then(|v| v.into_u32_vec().ok());
    let Some(keys) = keys else {
        return "unspecified".to_string();
    };
    if keys.len() < 4 {
        return "unspecified".to_string();
    }

    let mut geographic = None;
    let mut projected = None;
    for quad in keys[4..].chunks_exact(4) {
        let (key, location, value) = (quad[0], quad[1], quad[3]);
        if location != 0 {
            continue; // value stored in another tag; not an epsg code
        }
        match key {
            2048 => geographic = Some(value),
            3072 => projected = Some(value),
            _ => {}
        }
    }

    match projected.or(geographic) {
        Some(32767) => "user-defined".to_string(),
        Some(code) => format!("EPSG:{code}"),
        None => "unspecified".to_string(),
    }
}
