use crate::{
    batch::{broadcast_batch, broadcast_get},
    error::GeometryError,
    linalg, Mat33, Real,
};

/// The intrinsic parameters of a pinhole camera.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PinholeIntrinsics {
    /// Focal length along x.
    pub fx: f64,
    /// Focal length along y.
    pub fy: f64,
    /// Principal point along x.
    pub cx: f64,
    /// Principal point along y.
    pub cy: f64,
}

impl PinholeIntrinsics {
    /// Creates new intrinsics with the same focal length on both axes.
    pub fn new(focal: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx: focal,
            fy: focal,
            cx,
            cy,
        }
    }

    /// Returns the 3x3 camera matrix in the requested scalar type.
    pub fn camera_matrix<T: Real>(&self) -> Mat33<T> {
        [
            [T::narrow(self.fx), T::zero(), T::narrow(self.cx)],
            [T::zero(), T::narrow(self.fy), T::narrow(self.cy)],
            [T::zero(), T::zero(), T::one()],
        ]
    }
}

/// Project homogeneous 3D points in camera coordinates to pixel coordinates.
///
/// The trailing homogeneous coordinate is dropped, the remaining vector is multiplied by
/// the intrinsics and the first two components are divided by the third.
///
/// The division is not guarded: a point on the camera plane (zero third component)
/// yields non-finite coordinates, and points behind the camera are projected through
/// the center as well. Callers that can see such points must tolerate this.
///
/// # Arguments
///
/// * `xyz` - The homogeneous camera coordinates with shape (B, 4) or (1, 4).
/// * `intrinsics` - The 3x3 intrinsics with shape (B, 3, 3) or (1, 3, 3).
///
/// # Returns
///
/// The pixel coordinates with shape (B, 2).
///
/// Example:
///
/// ```
/// use camconv_3d::camera::project;
///
/// let intrinsics = [[[500.0, 0.0, 320.0], [0.0, 500.0, 240.0], [0.0, 0.0, 1.0]]];
/// let uv = project(&[[0.0, 0.0, 1.0, 1.0], [1.0, 2.0, 10.0, 1.0]], &intrinsics).unwrap();
/// assert_eq!(uv[0], [320.0, 240.0]);
/// assert_eq!(uv[1], [370.0, 340.0]);
/// ```
pub fn project<T: Real>(
    xyz: &[[T; 4]],
    intrinsics: &[Mat33<T>],
) -> Result<Vec<[T; 2]>, GeometryError> {
    let batch = broadcast_batch("project", xyz.len(), intrinsics.len())?;
    Ok((0..batch)
        .map(|i| {
            let [x, y, z, _] = *broadcast_get(xyz, i);
            let [u, v, w] = linalg::matvec33(broadcast_get(intrinsics, i), &[x, y, z]);
            [u / w, v / w]
        })
        .collect())
}
