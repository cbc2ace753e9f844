#![deny(missing_docs)]
//! Recovery of unknown camera conventions.
//!
//! A dataset stores its extrinsics in some convention: camera-to-world or
//! world-to-camera, with the camera look, up and right vectors mapped onto arbitrary
//! signed axes. The convention cannot be read off the matrices, so the
//! [`ConventionResolver`] renders a known vertex set under each of the 96 candidate
//! conventions and keeps the one whose renders match the reference images.

/// Axis and storage labels describing a camera convention.
pub mod axis;

/// Reference datasets and their conversion.
pub mod dataset;

/// Error types for the resolver.
pub mod error;

/// Enumeration of candidate conventions.
pub mod hypothesis;

/// The render-and-compare search.
pub mod resolver;

/// Scores comparing rendered canvases against reference images.
pub mod scoring;

pub use crate::axis::{AxisLabel, CameraConvention, StorageDirection};
pub use crate::dataset::{synthesize_dataset, PuzzleDataset};
pub use crate::error::ResolverError;
pub use crate::hypothesis::{AxisPermutation, AxisSigns, ConventionHypothesis};
pub use crate::resolver::{
    candidate_extrinsics, ConventionResolver, MatchPolicy, Resolution, ResolverConfig,
};
pub use crate::scoring::{CanvasScorer, ForegroundMismatch, MeanAbsoluteError, MeanSquaredError};
