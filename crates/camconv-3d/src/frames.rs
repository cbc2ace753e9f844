//! Conversion between world and camera frames.
//!
//! Extrinsics are given in camera-to-world form. Going from world to camera requires an
//! inversion, which is always carried out in `f64` whatever the input scalar is.

use crate::{
    batch::{broadcast_batch, broadcast_get},
    error::GeometryError,
    linalg, transforms, Mat44, Real,
};

/// Invert a batch of transforms in double precision.
///
/// # Arguments
///
/// * `transforms` - The transforms to invert with shape (B, 4, 4).
///
/// # Returns
///
/// The inverted transforms in `f64`, or [`GeometryError::SingularMatrix`] for the first
/// transform that cannot be inverted.
pub fn invert_transforms_f64<T: Real>(
    transforms: &[Mat44<T>],
) -> Result<Vec<Mat44<f64>>, GeometryError> {
    transforms
        .iter()
        .enumerate()
        .map(|(i, m)| {
            linalg::inverse_mat44(&linalg::widen_mat44(m)).inspect_err(|e| {
                log::debug!("transform {i} cannot be inverted: {e}");
            })
        })
        .collect()
}

/// Invert a batch of transforms, returning them in the input scalar type.
///
/// This switches a batch of extrinsics between camera-to-world and world-to-camera
/// storage. The inversion itself runs in `f64`.
pub fn invert_transforms<T: Real>(transforms: &[Mat44<T>]) -> Result<Vec<Mat44<T>>, GeometryError> {
    Ok(invert_transforms_f64(transforms)?
        .iter()
        .map(linalg::narrow_mat44)
        .collect())
}

/// Transform homogeneous points or vectors from world coordinates to camera coordinates.
///
/// The camera-to-world transforms are inverted and applied in `f64`, so the result is
/// returned in double precision.
///
/// # Arguments
///
/// * `xyz` - The homogeneous world coordinates with shape (B, 4) or (1, 4).
/// * `cam2world` - The camera-to-world transforms with shape (B, 4, 4) or (1, 4, 4).
///
/// # Returns
///
/// The homogeneous camera coordinates with shape (B, 4).
///
/// # Errors
///
/// * [`GeometryError::ShapeMismatch`] if the batch sizes are not broadcastable.
/// * [`GeometryError::SingularMatrix`] if a transform cannot be inverted.
///
/// Example:
///
/// ```
/// use camconv_3d::frames::transform_world2cam;
///
/// let cam2world = [[
///     [1.0f32, 0.0, 0.0, 0.0],
///     [0.0, 1.0, 0.0, 0.0],
///     [0.0, 0.0, 1.0, -2.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ]];
/// let out = transform_world2cam(&[[0.0f32, 0.0, 0.0, 1.0]], &cam2world).unwrap();
/// assert!((out[0][2] - 2.0).abs() < 1e-12);
/// assert!((out[0][3] - 1.0).abs() < 1e-12);
/// ```
pub fn transform_world2cam<T: Real>(
    xyz: &[[T; 4]],
    cam2world: &[Mat44<T>],
) -> Result<Vec<[f64; 4]>, GeometryError> {
    let batch = broadcast_batch("transform_world2cam", xyz.len(), cam2world.len())?;
    let world2cam = invert_transforms_f64(cam2world)?;

    Ok((0..batch)
        .map(|i| {
            let x = broadcast_get(xyz, i).map(T::widen);
            linalg::matvec44(broadcast_get(&world2cam, i), &x)
        })
        .collect())
}

/// Transform homogeneous points or vectors from camera coordinates to world coordinates.
///
/// No inversion is involved; the transforms are applied as given.
///
/// # Arguments
///
/// * `xyz` - The homogeneous camera coordinates with shape (B, 4) or (1, 4).
/// * `cam2world` - The camera-to-world transforms with shape (B, 4, 4) or (1, 4, 4).
///
/// # Returns
///
/// The homogeneous world coordinates with shape (B, 4).
pub fn transform_cam2world<T: Real>(
    xyz: &[[T; 4]],
    cam2world: &[Mat44<T>],
) -> Result<Vec<[T; 4]>, GeometryError> {
    transforms::transform_rigid(xyz, cam2world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rigid_transform() -> Mat44<f64> {
        // rotation of 120 degrees around the (1, 1, 1) axis, which cycles x -> y -> z
        [
            [0.0, 0.0, 1.0, 0.3],
            [1.0, 0.0, 0.0, -1.2],
            [0.0, 1.0, 0.0, 4.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    #[test]
    fn test_world2cam_cam2world_roundtrip() -> Result<(), GeometryError> {
        let cam2world = [rigid_transform()];
        let xyz = vec![
            [2.0, 2.0, 2.0, 1.0],
            [3.0, -4.0, 5.0, 1.0],
            [0.0, 1.0, 0.0, 0.0],
        ];
        let world = transform_cam2world(&xyz, &cam2world)?;
        let camera = transform_world2cam(&world, &cam2world)?;
        for (c, x) in camera.iter().zip(xyz.iter()) {
            for k in 0..4 {
                assert_relative_eq!(c[k], x[k], epsilon = 1e-12);
            }
        }
        Ok(())
    }

    #[test]
    fn test_world2cam_roundtrip_f32() -> Result<(), GeometryError> {
        let cam2world = [linalg::narrow_mat44::<f32>(&rigid_transform())];
        let xyz = vec![[0.25f32, -1.5, 3.0, 1.0]];
        let world = transform_cam2world(&xyz, &cam2world)?;
        let camera = transform_world2cam(&world, &cam2world)?;
        for k in 0..4 {
            assert_relative_eq!(camera[0][k], xyz[0][k] as f64, epsilon = 1e-5);
        }
        Ok(())
    }

    #[test]
    fn test_world2cam_singular() {
        let cam2world = [[[0.0f64; 4]; 4]];
        let res = transform_world2cam(&[[0.0, 0.0, 0.0, 1.0]], &cam2world);
        assert!(matches!(res, Err(GeometryError::SingularMatrix { .. })));
    }

    #[test]
    fn test_world2cam_shape_mismatch() {
        let cam2world = vec![rigid_transform(); 2];
        let xyz = vec![[0.0, 0.0, 0.0, 1.0]; 3];
        let res = transform_world2cam(&xyz, &cam2world);
        assert!(matches!(res, Err(GeometryError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_invert_transforms_roundtrip() -> Result<(), GeometryError> {
        let m = [rigid_transform()];
        let inv = invert_transforms(&m)?;
        let back = invert_transforms(&inv)?;
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(back[0][i][j], m[0][i][j], epsilon = 1e-12);
            }
        }
        Ok(())
    }
}
