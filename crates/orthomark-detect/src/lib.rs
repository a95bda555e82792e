//! Marker detection adapter for aerial imagery.
//!
//! This crate focuses on:
//! - the closed registry of supported fiducial dictionaries,
//! - the imagery-tuned detector parameter profile,
//! - the seam to the external marker detection capability.
//!
//! It does **not** implement quad finding or dictionary decoding itself.
//! A [`DetectionCapability`] implementation (OpenCV bindings, a pure-Rust
//! detector, a remote service) plugs in behind the adapter.

pub mod builtins;
mod adapter;
mod capability;
mod dictionary;
mod gray;
mod params;

pub use adapter::MarkerDetectionAdapter;
pub use capability::{CapabilityError, DetectionCapability, RawDetection};
pub use dictionary::{DictionarySpec, UnknownDictionary};
pub use gray::rgb_to_gray;
pub use params::DetectionParameters;
