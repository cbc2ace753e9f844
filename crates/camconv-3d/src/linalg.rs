use faer::prelude::SpSolver;

use crate::{error::GeometryError, Mat33, Mat44, Real};

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Multiply a 4x4 matrix by a 4-vector.
#[inline]
pub fn matvec44<T: Real>(m: &Mat44<T>, x: &[T; 4]) -> [T; 4] {
    let mut out = [T::zero(); 4];
    for (o, row) in out.iter_mut().zip(m.iter()) {
        *o = row
            .iter()
            .zip(x.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
    }
    out
}

/// Multiply a 3x3 matrix by a 3-vector.
#[inline]
pub fn matvec33<T: Real>(m: &Mat33<T>, x: &[T; 3]) -> [T; 3] {
    let mut out = [T::zero(); 3];
    for (o, row) in out.iter_mut().zip(m.iter()) {
        *o = row
            .iter()
            .zip(x.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b);
    }
    out
}

/// Multiply two 3x3 matrices.
///
/// Example:
///
/// ```
/// use camconv_3d::linalg::matmul33;
///
/// let a = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
/// let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// assert_eq!(matmul33(&a, &identity), a);
/// ```
pub fn matmul33(a: &Mat33<f64>, b: &Mat33<f64>) -> Mat33<f64> {
    let mut m = [[0.0; 3]; 3];
    for (i, row) in m.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    m
}

/// Transpose a 3x3 matrix.
pub fn transpose33(m: &Mat33<f64>) -> Mat33<f64> {
    [
        [m[0][0], m[1][0], m[2][0]],
        [m[0][1], m[1][1], m[2][1]],
        [m[0][2], m[1][2], m[2][2]],
    ]
}

/// Compute the determinant of a 3x3 matrix.
pub fn det_mat33(m: &Mat33<f64>) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Widen every entry of a 4x4 matrix to `f64`.
#[inline]
pub fn widen_mat44<T: Real>(m: &Mat44<T>) -> Mat44<f64> {
    m.map(|row| row.map(T::widen))
}

/// Narrow every entry of a `f64` 4x4 matrix to `T`.
#[inline]
pub fn narrow_mat44<T: Real>(m: &Mat44<f64>) -> Mat44<T> {
    m.map(|row| row.map(T::narrow))
}

/// Widen every entry of a 3x3 matrix to `f64`.
#[inline]
pub fn widen_mat33<T: Real>(m: &Mat33<T>) -> Mat33<f64> {
    m.map(|row| row.map(T::widen))
}

/// Invert a 4x4 matrix in double precision.
///
/// The inverse is computed with a partially pivoted LU decomposition.
///
/// # Arguments
///
/// * `m` - The matrix to invert.
///
/// # Returns
///
/// The inverse matrix, or [`GeometryError::SingularMatrix`] if the determinant is not
/// finite or its magnitude is below [`SINGULAR_EPSILON`].
///
/// Example:
///
/// ```
/// use camconv_3d::linalg::inverse_mat44;
///
/// let m = [
///     [1.0, 0.0, 0.0, 1.0],
///     [0.0, 1.0, 0.0, 2.0],
///     [0.0, 0.0, 1.0, 3.0],
///     [0.0, 0.0, 0.0, 1.0],
/// ];
/// let inv = inverse_mat44(&m).unwrap();
/// assert!((inv[0][3] + 1.0).abs() < 1e-12);
/// assert!((inv[2][3] + 3.0).abs() < 1e-12);
/// ```
pub fn inverse_mat44(m: &Mat44<f64>) -> Result<Mat44<f64>, GeometryError> {
    let mat = faer::Mat::<f64>::from_fn(4, 4, |i, j| m[i][j]);

    let determinant = mat.as_ref().determinant();
    if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
        return Err(GeometryError::SingularMatrix { determinant });
    }

    // solve against the identity to get the inverse
    let inv = mat
        .as_ref()
        .partial_piv_lu()
        .solve(faer::Mat::<f64>::identity(4, 4));

    let mut out = [[0.0; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = inv.read(i, j);
        }
    }

    Ok(out)
}
