#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Batch broadcasting helpers.
pub mod batch;

/// Pinhole camera projection.
pub mod camera;

/// Error types for the geometry module.
pub mod error;

/// Conversion between world and camera frames.
pub mod frames;

/// Homogeneous coordinates.
pub mod homogeneous;

/// Small fixed-size linear algebra utilities.
pub mod linalg;

/// Scalar types accepted by the geometry operations.
pub mod scalar;

/// Rigid transforms on homogeneous coordinates.
pub mod transforms;

pub use crate::error::GeometryError;
pub use crate::scalar::Real;

/// A row-major 3x3 matrix.
pub type Mat33<T> = [[T; 3]; 3];

/// A row-major 4x4 matrix.
pub type Mat44<T> = [[T; 4]; 4];
