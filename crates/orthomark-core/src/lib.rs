//! Core types and utilities for georeferenced fiducial marker detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete raster format or marker decoder: it owns the
//! pixel↔geographic affine mapping, the quad shape metrics, and the
//! lightweight image buffer types the other crates exchange.

mod affine;
mod image;
mod logger;
mod quad;

pub use affine::AffineTransform;
pub use image::{GrayImage, GrayImageView, RgbImage, RgbImageView};
pub use logger::init_with_level;
pub use quad::{quad_center, rotation_deg, shape_confidence, side_lengths};
