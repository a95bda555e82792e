//! End-to-end pipeline tests against real GeoTIFF fixtures and a
//! scripted detection capability.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nalgebra::Point2;

use orthomark::core::GrayImageView;
use orthomark::detect::{
    CapabilityError, DetectionCapability, DetectionParameters, DictionarySpec, RawDetection,
};
use orthomark::raster::RasterError;
use orthomark::{BytesSource, MarkerPipeline, PathSource, PipelineError, RasterSource, SourceError, StagedRaster};

/// Minimal little-endian TIFF: one uncompressed strip of 8-bit samples
/// plus a `ModelTransformationTag`. Enough for the real decoder.
fn write_geotiff(path: &Path, width: u32, height: u32, bands: u16, transform: [f64; 16]) {
    let strip = vec![128u8; (width * height * bands as u32) as usize];
    let strip_len = strip.len() as u32;
    let data_offset = 8u32;
    let padded_strip = strip_len + (strip_len & 1);

    // (tag, type, count, payload)
    let mut entries: Vec<(u16, u16, u32, Vec<u8>)> = vec![
        (256, 4, 1, width.to_le_bytes().to_vec()),
        (257, 4, 1, height.to_le_bytes().to_vec()),
        (
            258,
            3,
            bands as u32,
            (0..bands).flat_map(|_| 8u16.to_le_bytes()).collect(),
        ),
        (259, 3, 1, 1u16.to_le_bytes().to_vec()),
        (
            262,
            3,
            1,
            (if bands >= 3 { 2u16 } else { 1u16 }).to_le_bytes().to_vec(),
        ),
        (273, 4, 1, data_offset.to_le_bytes().to_vec()),
        (277, 3, 1, bands.to_le_bytes().to_vec()),
        (278, 4, 1, height.to_le_bytes().to_vec()),
        (279, 4, 1, strip_len.to_le_bytes().to_vec()),
        (
            34264,
            12,
            16,
            transform.iter().flat_map(|v| v.to_le_bytes()).collect(),
        ),
    ];
    entries.sort_by_key(|e| e.0);

    let aux_base = data_offset + padded_strip;
    let mut aux: Vec<u8> = Vec::new();
    let mut fields: Vec<[u8; 4]> = Vec::new();
    for (_, _, _, payload) in &entries {
        let mut field = [0u8; 4];
        if payload.len() <= 4 {
            field[..payload.len()].copy_from_slice(payload);
        } else {
            let offset = aux_base + aux.len() as u32;
            field.copy_from_slice(&offset.to_le_bytes());
            aux.extend_from_slice(payload);
            if aux.len() & 1 == 1 {
                aux.push(0);
            }
        }
        fields.push(field);
    }
    let ifd_offset = aux_base + aux.len() as u32;

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&ifd_offset.to_le_bytes());
    out.extend_from_slice(&strip);
    if strip_len & 1 == 1 {
        out.push(0);
    }
    out.extend_from_slice(&aux);
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for ((tag, type_, count, _), field) in entries.iter().zip(&fields) {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&type_.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(field);
    }
    out.extend_from_slice(&0u32.to_le_bytes());

    File::create(path).unwrap().write_all(&out).unwrap();
}

fn identity() -> [f64; 16] {
    let mut m = [0.0; 16];
    m[0] = 1.0;
    m[5] = 1.0;
    m[10] = 1.0;
    m[15] = 1.0;
    m
}

fn square(x0: f32, y0: f32, side: f32) -> [Point2<f32>; 4] {
    [
        Point2::new(x0, y0),
        Point2::new(x0 + side, y0),
        Point2::new(x0 + side, y0 + side),
        Point2::new(x0, y0 + side),
    ]
}

struct ScriptedCapability {
    detections: Vec<RawDetection>,
}

impl DetectionCapability for ScriptedCapability {
    fn detect_markers(
        &self,
        _image: &GrayImageView<'_>,
        _dictionary: &DictionarySpec,
        _params: &DetectionParameters,
    ) -> Result<Vec<RawDetection>, CapabilityError> {
        Ok(self.detections.clone())
    }
}

struct FailingCapability;

impl DetectionCapability for FailingCapability {
    fn detect_markers(
        &self,
        _image: &GrayImageView<'_>,
        _dictionary: &DictionarySpec,
        _params: &DetectionParameters,
    ) -> Result<Vec<RawDetection>, CapabilityError> {
        Err(CapabilityError::new("synthetic failure"))
    }
}

#[test]
fn end_to_end_identity_marker() {
    let dir = tempfile::tempdir().unwrap();
    let raster = dir.path().join("ortho.tif");
    write_geotiff(&raster, 160, 160, 3, identity());

    let pipeline = MarkerPipeline::new(ScriptedCapability {
        detections: vec![RawDetection::new(7, square(100.0, 100.0, 20.0))],
    });
    let markers = pipeline.run(&raster, "DICT_7X7_1000").unwrap();

    assert_eq!(markers.len(), 1);
    let m = &markers[0];
    assert_eq!(m.marker_id, 7);
    assert_eq!(m.pixel_x, 110);
    assert_eq!(m.pixel_y, 110);
    assert_eq!(m.longitude, 110.0);
    assert_eq!(m.latitude, 110.0);
    assert_eq!(m.confidence, 1.0);
    assert_eq!(m.rotation_deg, 0.0);
    assert_eq!(
        m.corner_pixels,
        [[100.0, 100.0], [120.0, 100.0], [120.0, 120.0], [100.0, 120.0]]
    );
    // Geographic corners are [lat, lng]: pixel (x, y) swaps to (y, x)
    // under the identity transform.
    assert_eq!(
        m.corner_coords,
        [[100.0, 100.0], [100.0, 120.0], [120.0, 120.0], [120.0, 100.0]]
    );
}

#[test]
fn single_band_raster_detects_too() {
    let dir = tempfile::tempdir().unwrap();
    let raster = dir.path().join("gray.tif");
    write_geotiff(&raster, 64, 64, 1, identity());

    let pipeline = MarkerPipeline::new(ScriptedCapability {
        detections: vec![RawDetection::new(1, square(10.0, 10.0, 8.0))],
    });
    let markers = pipeline.run(&raster, "DICT_4X4_50").unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].marker_id, 1);
}

#[test]
fn markers_come_back_sorted_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let raster = dir.path().join("ortho.tif");
    write_geotiff(&raster, 160, 160, 3, identity());

    let pipeline = MarkerPipeline::new(ScriptedCapability {
        detections: vec![
            RawDetection::new(9, square(50.0, 50.0, 10.0)),
            RawDetection::new(2, square(10.0, 10.0, 10.0)),
            RawDetection::new(9, square(120.0, 30.0, 10.0)),
            RawDetection::new(0, square(80.0, 80.0, 10.0)),
        ],
    });
    let markers = pipeline.run(&raster, "DICT_6X6_250").unwrap();

    let ids: Vec<u32> = markers.iter().map(|m| m.marker_id).collect();
    assert_eq!(ids, vec![0, 2, 9, 9]);
    // Stable sort: the duplicate 9s keep detector order.
    assert_eq!(markers[2].pixel_x, 55);
    assert_eq!(markers[3].pixel_x, 125);
}

#[test]
fn unknown_dictionary_aborts_and_names_every_valid_choice() {
    let dir = tempfile::tempdir().unwrap();
    let raster = dir.path().join("ortho.tif");
    write_geotiff(&raster, 32, 32, 3, identity());

    let pipeline = MarkerPipeline::new(ScriptedCapability { detections: vec![] });
    let err = pipeline.run(&raster, "DICT_2X2_10").unwrap_err();

    let msg = err.to_string();
    assert!(matches!(err, PipelineError::Dictionary(_)));
    assert!(msg.contains("DICT_2X2_10"));
    for name in orthomark::detect::builtins::dictionary_names() {
        assert!(msg.contains(name), "missing {name}");
    }
}

#[test]
fn two_band_raster_aborts_with_unsupported_band_count() {
    let dir = tempfile::tempdir().unwrap();
    let raster = dir.path().join("twoband.tif");
    write_geotiff(&raster, 16, 16, 2, identity());

    let pipeline = MarkerPipeline::new(ScriptedCapability {
        detections: vec![RawDetection::new(0, square(1.0, 1.0, 4.0))],
    });
    match pipeline.run(&raster, "DICT_4X4_50") {
        Err(PipelineError::Raster(RasterError::UnsupportedBandCount { bands })) => {
            assert_eq!(bands, 2)
        }
        other => panic!("expected UnsupportedBandCount, got {other:?}"),
    }
}

#[test]
fn detection_failure_yields_no_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let raster = dir.path().join("ortho.tif");
    write_geotiff(&raster, 32, 32, 3, identity());

    let pipeline = MarkerPipeline::new(FailingCapability);
    let err = pipeline.run(&raster, "DICT_4X4_50").unwrap_err();
    assert!(matches!(err, PipelineError::Detection(_)));
    assert!(err.to_string().contains("synthetic failure"));
}

/// Wraps a source and remembers where the staged copy landed, so tests
/// can check it was released.
struct RecordingSource<S> {
    inner: S,
    staged_path: Mutex<Option<PathBuf>>,
}

impl<S> RecordingSource<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            staged_path: Mutex::new(None),
        }
    }

    fn staged_path(&self) -> PathBuf {
        self.staged_path.lock().unwrap().clone().expect("staged")
    }
}

impl<S: RasterSource> RasterSource for RecordingSource<S> {
    fn stage(&self) -> Result<StagedRaster, SourceError> {
        let staged = self.inner.stage()?;
        *self.staged_path.lock().unwrap() = Some(staged.path().to_path_buf());
        Ok(staged)
    }
}

fn geotiff_bytes(width: u32, height: u32, bands: u16) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gen.tif");
    write_geotiff(&path, width, height, bands, identity());
    std::fs::read(&path).unwrap()
}

#[test]
fn staged_raster_is_released_after_success() {
    let source = RecordingSource::new(BytesSource::new(geotiff_bytes(64, 64, 3)));
    let pipeline = MarkerPipeline::new(ScriptedCapability {
        detections: vec![RawDetection::new(3, square(5.0, 5.0, 10.0))],
    });

    let markers = pipeline.run_source(&source, "DICT_5X5_50").unwrap();
    assert_eq!(markers.len(), 1);
    assert!(
        !source.staged_path().exists(),
        "staged file must be deleted after the run"
    );
}

#[test]
fn staged_raster_is_released_after_failure() {
    let source = RecordingSource::new(BytesSource::new(geotiff_bytes(64, 64, 2)));
    let pipeline = MarkerPipeline::new(ScriptedCapability { detections: vec![] });

    let err = pipeline.run_source(&source, "DICT_5X5_50").unwrap_err();
    assert!(matches!(err, PipelineError::Raster(_)));
    assert!(
        !source.staged_path().exists(),
        "staged file must be deleted after a failed run"
    );
}

#[test]
fn missing_source_file_surfaces_as_retrieval_failure() {
    let pipeline = MarkerPipeline::new(ScriptedCapability { detections: vec![] });
    let source = PathSource::new("/no/such/raster.tif");
    let err = pipeline.run_source(&source, "DICT_4X4_50").unwrap_err();
    assert!(matches!(err, PipelineError::Retrieval(_)));
}
