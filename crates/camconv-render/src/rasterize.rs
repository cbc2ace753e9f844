use camconv_3d::{
    batch::{broadcast_batch, broadcast_get},
    camera, frames, homogeneous, linalg, Mat33, Mat44, Real,
};

use crate::{
    canvas::{Canvas, ImageSize},
    error::RenderError,
    parallel::{self, ExecutionStrategy},
};

/// What to do with vertices that project outside of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum BoundsPolicy {
    /// Skip the splat.
    #[default]
    Discard,
    /// Move the splat to the nearest border pixel.
    ///
    /// Non-finite coordinates have no nearest pixel and are skipped.
    Clamp,
    /// Fail with [`RenderError::OutOfBoundsIndex`].
    Strict,
}

impl BoundsPolicy {
    // map a truncated pixel coordinate onto [0, size)
    fn resolve(&self, coord: f64, size: usize) -> Option<usize> {
        if !coord.is_finite() || size == 0 {
            return None;
        }
        match self {
            BoundsPolicy::Clamp => Some(coord.clamp(0.0, (size - 1) as f64) as usize),
            BoundsPolicy::Discard | BoundsPolicy::Strict => {
                (coord >= 0.0 && coord < size as f64).then_some(coord as usize)
            }
        }
    }
}

/// Options for the point cloud rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// The output canvas size.
    pub resolution: ImageSize,
    /// Intensity of pixels without any vertex.
    pub background: f32,
    /// Intensity written at every splatted vertex.
    pub foreground: f32,
    /// Handling of vertices projecting outside of the canvas.
    pub bounds: BoundsPolicy,
    /// How views are distributed over threads.
    pub strategy: ExecutionStrategy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            resolution: ImageSize {
                width: 256,
                height: 256,
            },
            background: 1.0,
            foreground: 0.0,
            bounds: BoundsPolicy::default(),
            strategy: ExecutionStrategy::default(),
        }
    }
}

/// Renders a shared vertex set from a batch of cameras by point splatting.
///
/// Each vertex colors a single pixel with the foreground value. There is no depth test:
/// when several vertices land on the same pixel the last one wins.
#[derive(Debug, Clone, Default)]
pub struct PointCloudRasterizer {
    config: RenderConfig,
}

impl PointCloudRasterizer {
    /// Creates a new rasterizer with the given options.
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Returns the rasterizer options.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the vertices once per camera.
    ///
    /// # Arguments
    ///
    /// * `vertices` - The world space vertices with shape (N, 3), shared by every view.
    /// * `extrinsics` - The camera-to-world transforms with shape (B, 4, 4) or (1, 4, 4).
    /// * `intrinsics` - The intrinsics with shape (B, 3, 3) or (1, 3, 3), mapping the
    ///   visible image onto `[0, 1]^2`.
    ///
    /// # Returns
    ///
    /// One canvas per view with shape (H, W), where `u` indexes columns and `v` rows.
    ///
    /// # Errors
    ///
    /// * [`RenderError::BatchMismatch`] if the two matrix batches are not broadcastable.
    /// * [`RenderError::Geometry`] if an extrinsics matrix is singular.
    /// * [`RenderError::OutOfBoundsIndex`] if a vertex lands outside of the canvas under
    ///   [`BoundsPolicy::Strict`].
    pub fn render<T: Real>(
        &self,
        vertices: &[[T; 3]],
        extrinsics: &[Mat44<T>],
        intrinsics: &[Mat33<T>],
    ) -> Result<Vec<Canvas>, RenderError> {
        let batch = broadcast_batch("render", extrinsics.len(), intrinsics.len()).map_err(|_| {
            RenderError::BatchMismatch {
                extrinsics: extrinsics.len(),
                intrinsics: intrinsics.len(),
            }
        })?;

        log::debug!(
            "rendering {} vertices into {} views of {}",
            vertices.len(),
            batch,
            self.config.resolution
        );

        let xyz = homogeneous::homogenize_points(vertices);

        parallel::map_indices(self.config.strategy, batch, |view| {
            self.render_view(
                view,
                &xyz,
                broadcast_get(extrinsics, view),
                broadcast_get(intrinsics, view),
            )
        })
        .into_iter()
        .collect()
    }

    fn render_view<T: Real>(
        &self,
        view: usize,
        xyz: &[[T; 4]],
        cam2world: &Mat44<T>,
        intrinsics: &Mat33<T>,
    ) -> Result<Canvas, RenderError> {
        let ImageSize { width, height } = self.config.resolution;

        let xyz_cam = frames::transform_world2cam(xyz, std::slice::from_ref(cam2world))?;
        let uv = camera::project(&xyz_cam, &[linalg::widen_mat33(intrinsics)])?;

        // the grid is indexed [x][y] and transposed at the end
        let mut grid = Canvas::from_size_val(
            ImageSize {
                width: height,
                height: width,
            },
            self.config.background,
        );

        let mut discarded = 0usize;
        for [u, v] in uv {
            let x = (u * width as f64).trunc();
            let y = (v * height as f64).trunc();

            match (
                self.config.bounds.resolve(x, width),
                self.config.bounds.resolve(y, height),
            ) {
                (Some(ix), Some(iy)) => {
                    grid.set_pixel(iy, ix, self.config.foreground);
                }
                _ if self.config.bounds == BoundsPolicy::Strict => {
                    return Err(RenderError::OutOfBoundsIndex {
                        view,
                        x: x.is_finite().then_some(x as i64),
                        y: y.is_finite().then_some(y as i64),
                        width,
                        height,
                    });
                }
                _ => discarded += 1,
            }
        }

        if discarded > 0 {
            log::trace!("view {view}: discarded {discarded} splats outside of the canvas");
        }

        Ok(grid.transpose())
    }
}

/// Render a point cloud with the default options: a 256x256 white canvas with the
/// vertices splatted in black.
///
/// See [`PointCloudRasterizer::render`].
///
/// Example:
///
/// ```
/// use camconv_render::render_point_cloud;
///
/// let vertices = vec![[0.0, 0.0, 2.0]];
/// let extrinsics = [[
///     [1.0, 0.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0, 0.0],
///     [0.0, 0.0, 1.0, 0.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ]];
/// let intrinsics = [[[1.0, 0.0, 0.5], [0.0, 1.0, 0.5], [0.0, 0.0, 1.0]]];
///
/// let canvases = render_point_cloud(&vertices, &extrinsics, &intrinsics).unwrap();
/// assert_eq!(canvases[0].get_pixel(128, 128), Some(0.0));
/// ```
pub fn render_point_cloud<T: Real>(
    vertices: &[[T; 3]],
    extrinsics: &[Mat44<T>],
    intrinsics: &[Mat33<T>],
) -> Result<Vec<Canvas>, RenderError> {
    PointCloudRasterizer::default().render(vertices, extrinsics, intrinsics)
}
