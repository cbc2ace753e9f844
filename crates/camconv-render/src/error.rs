use camconv_3d::GeometryError;

/// An error type for the render module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A geometry operation failed while rendering.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The extrinsics and intrinsics batches cannot be broadcast together.
    #[error("Batch mismatch: {extrinsics} extrinsics and {intrinsics} intrinsics")]
    BatchMismatch {
        /// Number of extrinsics.
        extrinsics: usize,
        /// Number of intrinsics.
        intrinsics: usize,
    },

    /// Two canvases, or two batches of canvases, do not have the same size.
    #[error("Canvas size mismatch: ({0}, {1}) vs ({2}, {3})")]
    CanvasSizeMismatch(usize, usize, usize, usize),

    /// The canvas data length does not match the canvas size.
    #[error("Data length ({0}) does not match the canvas size ({1})")]
    InvalidCanvasData(usize, usize),

    /// A projected vertex falls outside of the canvas under the strict bounds policy.
    #[error("Pixel index ({x:?}, {y:?}) out of bounds for view {view} of size {width}x{height}")]
    OutOfBoundsIndex {
        /// Index of the view in the batch.
        view: usize,
        /// Truncated column index, `None` if the coordinate was not finite.
        x: Option<i64>,
        /// Truncated row index, `None` if the coordinate was not finite.
        y: Option<i64>,
        /// Canvas width.
        width: usize,
        /// Canvas height.
        height: usize,
    },
}
