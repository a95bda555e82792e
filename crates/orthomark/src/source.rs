//! Staging raster bytes into a run-scoped local file.
//!
//! Retrieval itself (HTTP, object storage, ...) lives outside the core:
//! callers implement [`RasterSource`] for their transport. The staged
//! file's lifetime is the pipeline's contract: a run-owned temp file is
//! deleted when the run ends, on success, error, and panic exits alike.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Error raised while materializing raster bytes on local disk.
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct SourceError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
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

/// A raster staged on local disk for exactly one pipeline run.
#[derive(Debug)]
pub enum StagedRaster {
    /// Caller-owned file; never deleted by the pipeline.
    Local(PathBuf),
    /// Run-owned temp file; removed on drop.
    Scoped(NamedTempFile),
}

impl StagedRaster {
    pub fn path(&self) -> &Path {
        match self {
            StagedRaster::Local(path) => path,
            StagedRaster::Scoped(file) => file.path(),
        }
    }
}

/// Supplies raster bytes as a staged local file.
pub trait RasterSource {
    fn stage(&self) -> Result<StagedRaster, SourceError>;
}

/// Source backed by an existing local file.
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RasterSource for PathSource {
    fn stage(&self) -> Result<StagedRaster, SourceError> {
        if !self.path.is_file() {
            return Err(SourceError::new(format!(
                "raster file not found: {}",
                self.path.display()
            )));
        }
        Ok(StagedRaster::Local(self.path.clone()))
    }
}

/// Source backed by in-memory raster bytes, staged to a scoped temp file.
///
/// This is the seam a network retriever plugs into: fetch the bytes
/// however it likes, then let the pipeline own the staged copy.
pub struct BytesSource {
    bytes: Vec<u8>,
}

impl BytesSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl RasterSource for BytesSource {
    fn stage(&self) -> Result<StagedRaster, SourceError> {
        let mut file = tempfile::Builder::new()
            .prefix("orthomark-")
            .suffix(".tif")
            .tempfile()
            .map_err(|e| SourceError::with_source("failed to create staging file", e))?;
        file.write_all(&self.bytes)
            .map_err(|e| SourceError::with_source("failed to write staging file", e))?;
        Ok(StagedRaster::Scoped(file))
    }
}
