//! JSON response envelope for transport layers.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{GeoMarker, PipelineError};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Detection result envelope, one per pipeline run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionReport {
    pub success: bool,
    pub marker_count: usize,
    pub markers: Vec<GeoMarker>,
    pub dictionary: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionReport {
    pub fn from_markers(markers: Vec<GeoMarker>, dictionary: &str, source: &str) -> Self {
        Self {
            success: true,
            marker_count: markers.len(),
            markers,
            dictionary: dictionary.to_string(),
            source: source.to_string(),
            error: None,
        }
    }

    pub fn from_error(err: &PipelineError, dictionary: &str, source: &str) -> Self {
        Self {
            success: false,
            marker_count: 0,
            markers: Vec::new(),
            dictionary: dictionary.to_string(),
            source: source.to_string(),
            error: Some(err.to_string()),
        }
    }

    /// Load a JSON report from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ReportError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
