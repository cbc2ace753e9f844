use num_traits::{One, Zero};

/// A fixed-size coordinate that can be lifted into homogeneous coordinates.
///
/// Points get a trailing 1 and vectors a trailing 0, so that translations act on
/// points but leave directions untouched.
pub trait Homogeneous: Copy {
    /// The homogeneous representation, one coordinate longer than `Self`.
    type Output: Copy;

    /// Embed `self` as a homogeneous point.
    fn to_point(&self) -> Self::Output;

    /// Embed `self` as a homogeneous vector.
    fn to_vector(&self) -> Self::Output;

    /// Drop the trailing homogeneous coordinate without dividing by it.
    fn from_homogeneous(h: &Self::Output) -> Self;
}

macro_rules! impl_homogeneous {
    ($($n:literal => $m:literal),* $(,)?) => {
        $(
            impl<T: Copy + Zero + One> Homogeneous for [T; $n] {
                type Output = [T; $m];

                #[inline]
                fn to_point(&self) -> [T; $m] {
                    let mut out = [T::one(); $m];
                    out[..$n].copy_from_slice(self);
                    out
                }

                #[inline]
                fn to_vector(&self) -> [T; $m] {
                    let mut out = [T::zero(); $m];
                    out[..$n].copy_from_slice(self);
                    out
                }

                #[inline]
                fn from_homogeneous(h: &[T; $m]) -> Self {
                    let mut out = [T::zero(); $n];
                    out.copy_from_slice(&h[..$n]);
                    out
                }
            }
        )*
    };
}

impl_homogeneous!(1 => 2, 2 => 3, 3 => 4);

/// Turn a batch of n-dimensional points into (n+1)-dimensional homogeneous points.
///
/// # Arguments
///
/// * `points` - The points to embed.
///
/// # Returns
///
/// A new vector with the same batch size where each point has a trailing 1.
///
/// Example:
///
/// ```
/// use camconv_3d::homogeneous::homogenize_points;
///
/// let points = vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
/// let homogeneous = homogenize_points(&points);
/// assert_eq!(homogeneous, vec![[1.0, 2.0, 3.0, 1.0], [4.0, 5.0, 6.0, 1.0]]);
/// ```
pub fn homogenize_points<P: Homogeneous>(points: &[P]) -> Vec<P::Output> {
    points.iter().map(Homogeneous::to_point).collect()
}

/// Turn a batch of n-dimensional vectors into (n+1)-dimensional homogeneous vectors.
///
/// # Arguments
///
/// * `vectors` - The vectors to embed.
///
/// # Returns
///
/// A new vector with the same batch size where each vector has a trailing 0.
pub fn homogenize_vectors<P: Homogeneous>(vectors: &[P]) -> Vec<P::Output> {
    vectors.iter().map(Homogeneous::to_vector).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_homogenize_points() {
        let points = vec![[0.5f32, -1.0, 2.0], [0.0, 0.0, 0.0]];
        let homogeneous = homogenize_points(&points);
        assert_eq!(homogeneous.len(), points.len());
        for (h, p) in homogeneous.iter().zip(points.iter()) {
            assert_eq!(&h[..3], &p[..]);
            assert_eq!(h[3], 1.0);
        }
    }

    #[test]
    fn test_homogenize_vectors() {
        let vectors = vec![[3.0f64, 4.0], [-1.0, 7.5]];
        let homogeneous = homogenize_vectors(&vectors);
        assert_eq!(homogeneous, vec![[3.0, 4.0, 0.0], [-1.0, 7.5, 0.0]]);
    }

    #[test]
    fn test_homogenize_empty() {
        let points: Vec<[f64; 3]> = Vec::new();
        assert!(homogenize_points(&points).is_empty());
        assert!(homogenize_vectors(&points).is_empty());
    }

    #[test]
    fn test_from_homogeneous() {
        let h = [1.0, 2.0, 3.0, 0.5];
        assert_eq!(<[f64; 3]>::from_homogeneous(&h), [1.0, 2.0, 3.0]);
        assert_eq!([9i32].to_point(), [9, 1]);
    }
}
