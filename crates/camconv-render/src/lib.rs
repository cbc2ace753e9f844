#![deny(missing_docs)]
//! Point cloud splatting onto single channel canvases.

/// Single channel canvas representation.
pub mod canvas;

/// Error types for the render module.
pub mod error;

/// Canvas similarity metrics.
pub mod metrics;

/// Execution strategies for batched work.
pub mod parallel;

/// Point cloud rasterization.
pub mod rasterize;

pub use crate::canvas::{Canvas, ImageSize};
pub use crate::error::RenderError;
pub use crate::parallel::ExecutionStrategy;
pub use crate::rasterize::{render_point_cloud, BoundsPolicy, PointCloudRasterizer, RenderConfig};
