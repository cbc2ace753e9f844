/// Floating point type usable as a coordinate.
///
/// Values can always be widened to `f64`, which is the precision used internally for
/// matrix inversion.
pub trait Real: num_traits::Float + Default + Send + Sync + std::fmt::Debug + 'static {
    /// Convert the value to `f64` without loss.
    fn widen(self) -> f64;

    /// Convert a `f64` value to this type, rounding if needed.
    fn narrow(x: f64) -> Self;
}

impl Real for f32 {
    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn narrow(x: f64) -> Self {
        x as f32
    }
}

impl Real for f64 {
    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(x: f64) -> Self {
        x
    }
}
