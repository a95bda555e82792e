//! High-level facade for the `orthomark-*` workspace.
//!
//! Locates fiducial square markers in a georeferenced orthomosaic raster
//! and reports their positions in geographic coordinates.
//!
//! ## Quickstart
//!
//! ```no_run
//! use orthomark::detect::{
//!     CapabilityError, DetectionCapability, DetectionParameters, DictionarySpec, RawDetection,
//! };
//! use orthomark::core::GrayImageView;
//! use orthomark::MarkerPipeline;
//!
//! struct MyDetector;
//!
//! impl DetectionCapability for MyDetector {
//!     fn detect_markers(
//!         &self,
//!         image: &GrayImageView<'_>,
//!         dictionary: &DictionarySpec,
//!         params: &DetectionParameters,
//!     ) -> Result<Vec<RawDetection>, CapabilityError> {
//!         // bridge to OpenCV, a pure-Rust decoder, ...
//!         Ok(Vec::new())
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = MarkerPipeline::new(MyDetector);
//! let markers = pipeline.run("field.tif", "DICT_7X7_1000")?;
//! println!("found {} markers", markers.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `orthomark::core`: affine transform, quad metrics, image buffers.
//! - `orthomark::raster`: GeoTIFF loading and normalization.
//! - `orthomark::detect`: dictionary registry, tuning profile, capability seam.
//! - [`MarkerPipeline`]: the end-to-end orchestrator.
//! - [`DetectionReport`]: JSON response envelope for transport layers.

pub use orthomark_core as core;
pub use orthomark_detect as detect;
pub use orthomark_raster as raster;

mod pipeline;
mod report;
mod result;
mod source;

pub use pipeline::{MarkerPipeline, PipelineError};
pub use report::{DetectionReport, ReportError};
pub use result::GeoMarker;
pub use source::{BytesSource, PathSource, RasterSource, SourceError, StagedRaster};
