//! Adapter wrapping the detection capability with the aerial profile.

use orthomark_core::RgbImageView;

use crate::builtins::builtin_dictionary;
use crate::{
    rgb_to_gray, CapabilityError, DetectionCapability, DetectionParameters, DictionarySpec,
    RawDetection, UnknownDictionary,
};

/// Runs a [`DetectionCapability`] against RGB rasters with a fixed
/// dictionary and tuning profile.
///
/// One adapter serves one pipeline run; construction resolves the
/// dictionary name against the closed registry and freezes the parameter
/// profile.
pub struct MarkerDetectionAdapter<C> {
    dictionary: &'static DictionarySpec,
    params: DetectionParameters,
    capability: C,
}

impl<C: DetectionCapability> MarkerDetectionAdapter<C> {
    /// Create an adapter for the named dictionary with the aerial profile.
    pub fn new(dictionary_name: &str, capability: C) -> Result<Self, UnknownDictionary> {
        let dictionary =
            builtin_dictionary(dictionary_name).ok_or_else(|| UnknownDictionary::new(dictionary_name))?;
        Ok(Self {
            dictionary,
            params: DetectionParameters::aerial(),
            capability,
        })
    }

    /// Replace the tuning profile.
    pub fn with_params(mut self, params: DetectionParameters) -> Self {
        self.params = params;
        self
    }

    #[inline]
    pub fn dictionary(&self) -> &'static DictionarySpec {
        self.dictionary
    }

    #[inline]
    pub fn params(&self) -> &DetectionParameters {
        &self.params
    }

    /// Convert the raster to intensity and run the capability.
    ///
    /// Detections come back in capability order; callers needing a stable
    /// order sort downstream.
    pub fn detect(&self, image: &RgbImageView<'_>) -> Result<Vec<RawDetection>, CapabilityError> {
        let gray = rgb_to_gray(image);
        self.capability
            .detect_markers(&gray.view(), self.dictionary, &self.params)
    }
}
