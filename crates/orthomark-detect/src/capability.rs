//! Interface boundary to the external marker detection capability.

use nalgebra::Point2;
use orthomark_core::GrayImageView;

use crate::{DetectionParameters, DictionarySpec};

/// One marker reported by the detection capability.
///
/// No uniqueness guarantee: a capability may report the same id more than
/// once and both detections pass through.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetection {
    /// Marker id within the dictionary catalog.
    pub id: u32,
    /// Pixel corners, clockwise starting at the marker's top-left corner
    /// as determined by the capability.
    pub corners: [Point2<f32>; 4],
}

impl RawDetection {
    pub fn new(id: u32, corners: [Point2<f32>; 4]) -> Self {
        Self { id, corners }
    }
}

/// Error raised by a detection capability while processing an image.
#[derive(thiserror::Error, Debug)]
#[error("marker detection failed: {message}")]
pub struct CapabilityError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CapabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// The external marker detection capability.
///
/// Implementations receive a single-channel image, the dictionary to
/// decode against, and the tuning profile, and return raw detections in
/// whatever order the underlying algorithm produces them.
pub trait DetectionCapability {
    fn detect_markers(
        &self,
        image: &GrayImageView<'_>,
        dictionary: &DictionarySpec,
        params: &DetectionParameters,
    ) -> Result<Vec<RawDetection>, CapabilityError>;
}

impl<C: DetectionCapability + ?Sized> DetectionCapability for &C {
    fn detect_markers(
        &self,
        image: &GrayImageView<'_>,
        dictionary: &DictionarySpec,
        params: &DetectionParameters,
    ) -> Result<Vec<RawDetection>, CapabilityError> {
        (**self).detect_markers(image, dictionary, params)
    }
}
