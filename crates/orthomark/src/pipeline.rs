//! End-to-end pipeline: raster → detections → georeferenced markers.

use std::path::Path;

use orthomark_core::{quad_center, rotation_deg, shape_confidence, AffineTransform};
use orthomark_detect::{
    CapabilityError, DetectionCapability, MarkerDetectionAdapter, RawDetection, UnknownDictionary,
};
use orthomark_raster::{load_georaster, RasterError};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{GeoMarker, RasterSource, SourceError};

/// Errors that abort a pipeline run. No partial marker lists escape.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Dictionary(#[from] UnknownDictionary),

    #[error("raster retrieval failed: {0}")]
    Retrieval(#[from] SourceError),

    #[error(transparent)]
    Detection(#[from] CapabilityError),
}

/// Orchestrates one detection run: load, detect, georeference, sort.
///
/// The pipeline holds no mutable state, so one instance may serve
/// concurrent runs from separate threads.
pub struct MarkerPipeline<C> {
    capability: C,
}

impl<C: DetectionCapability> MarkerPipeline<C> {
    pub fn new(capability: C) -> Self {
        Self { capability }
    }

    /// Run detection against a raster already on local disk.
    ///
    /// Markers come back sorted ascending by id; the sort is stable, so
    /// duplicate ids keep detector order.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, raster_path), fields(dictionary = dictionary))
    )]
    pub fn run(
        &self,
        raster_path: impl AsRef<Path>,
        dictionary: &str,
    ) -> Result<Vec<GeoMarker>, PipelineError> {
        let raster_path = raster_path.as_ref();

        log::info!("loading raster {}", raster_path.display());
        let raster = load_georaster(raster_path)?;
        log::info!(
            "raster {}x{}, crs {}",
            raster.image.width,
            raster.image.height,
            raster.crs
        );

        let adapter = MarkerDetectionAdapter::new(dictionary, &self.capability)?;
        log::info!("detecting with dictionary {}", adapter.dictionary().name);
        let detections = adapter.detect(&raster.image.view())?;
        log::info!("capability reported {} markers", detections.len());

        let mut markers: Vec<GeoMarker> = detections
            .iter()
            .map(|det| georeference(det, &raster.transform))
            .collect();
        markers.sort_by_key(|m| m.marker_id);

        Ok(markers)
    }

    /// Stage a raster from `source`, run detection, release the staged
    /// copy on every exit path.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, source), fields(dictionary = dictionary))
    )]
    pub fn run_source(
        &self,
        source: &dyn RasterSource,
        dictionary: &str,
    ) -> Result<Vec<GeoMarker>, PipelineError> {
        let staged = source.stage()?;
        // `staged` drops at the end of this scope whatever `run` returns,
        // deleting any run-owned temp file.
        self.run(staged.path(), dictionary)
    }
}

/// Assemble the final record for one raw detection.
fn georeference(det: &RawDetection, transform: &AffineTransform) -> GeoMarker {
    let center = quad_center(&det.corners);
    let (longitude, latitude) = transform.pixel_to_geo(center.x, center.y);

    let mut corner_pixels = [[0.0f32; 2]; 4];
    let mut corner_coords = [[0.0f64; 2]; 4];
    for (i, p) in det.corners.iter().enumerate() {
        corner_pixels[i] = [p.x, p.y];
        let (lng, lat) = transform.pixel_to_geo(p.x as f64, p.y as f64);
        corner_coords[i] = [lat, lng];
    }

    GeoMarker {
        marker_id: det.id,
        latitude,
        longitude,
        pixel_x: center.x.round() as i64,
        pixel_y: center.y.round() as i64,
        corner_pixels,
        corner_coords,
        confidence: round_to(shape_confidence(&det.corners), 4),
        rotation_deg: round_to(rotation_deg(&det.corners), 2),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
