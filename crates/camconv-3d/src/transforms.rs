use crate::{
    batch::{broadcast_batch, broadcast_get},
    error::GeometryError,
    linalg, Mat33, Mat44, Real,
};

/// Apply a rigid-body transform to homogeneous points or vectors.
///
/// Either argument may hold a single element, which is then shared across the batch of
/// the other argument.
///
/// # Arguments
///
/// * `xyz` - The homogeneous points or vectors with shape (B, 4) or (1, 4).
/// * `transforms` - The 4x4 transforms with shape (B, 4, 4) or (1, 4, 4).
///
/// # Returns
///
/// The transformed homogeneous coordinates with shape (B, 4).
///
/// Example:
///
/// ```
/// use camconv_3d::transforms::transform_rigid;
///
/// let translate = [[
///     [1.0, 0.0, 0.0, 1.0],
///     [0.0, 1.0, 0.0, 0.0],
///     [0.0, 0.0, 1.0, 0.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ]];
/// let xyz = vec![[0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 0.0]];
/// let out = transform_rigid(&xyz, &translate).unwrap();
/// assert_eq!(out, vec![[1.0, 0.0, 0.0, 1.0], [0.0, 0.0, 1.0, 0.0]]);
/// ```
pub fn transform_rigid<T: Real>(
    xyz: &[[T; 4]],
    transforms: &[Mat44<T>],
) -> Result<Vec<[T; 4]>, GeometryError> {
    let batch = broadcast_batch("transform_rigid", xyz.len(), transforms.len())?;
    Ok((0..batch)
        .map(|i| linalg::matvec44(broadcast_get(transforms, i), broadcast_get(xyz, i)))
        .collect())
}

/// Extract the upper-left 3x3 rotation block of a transform in double precision.
pub fn rotation_block<T: Real>(transform: &Mat44<T>) -> Mat33<f64> {
    let mut rot = [[0.0; 3]; 3];
    for (dst, src) in rot.iter_mut().zip(transform.iter()) {
        for (d, s) in dst.iter_mut().zip(src.iter()) {
            *d = s.widen();
        }
    }
    rot
}

/// Right-multiply a basis change into the rotation block of a transform.
///
/// The translation column and the last row are kept untouched and the input is not
/// modified; a new matrix is returned.
///
/// # Arguments
///
/// * `transform` - A 4x4 transform whose rotation block is `R`.
/// * `basis` - The 3x3 basis change `M`.
///
/// # Returns
///
/// A copy of `transform` with the rotation block replaced by `R @ M`.
///
/// Example:
///
/// ```
/// use camconv_3d::transforms::apply_basis_change;
///
/// let transform = [
///     [1.0, 0.0, 0.0, 4.0],
///     [0.0, 1.0, 0.0, 5.0],
///     [0.0, 0.0, 1.0, 6.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ];
/// let flip_x = [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// let out = apply_basis_change(&transform, &flip_x);
/// assert_eq!(out[0], [-1.0, 0.0, 0.0, 4.0]);
/// assert_eq!(transform[0][0], 1.0);
/// ```
pub fn apply_basis_change<T: Real>(transform: &Mat44<T>, basis: &Mat33<f64>) -> Mat44<T> {
    let rot = linalg::matmul33(&rotation_block(transform), basis);

    let mut out = *transform;
    for (dst, src) in out.iter_mut().zip(rot.iter()) {
        for (d, s) in dst.iter_mut().zip(src.iter()) {
            *d = T::narrow(*s);
        }
    }
    out
}
