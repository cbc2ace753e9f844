/// An error type for the geometry operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The batch dimensions of two arguments cannot be broadcast together.
    #[error("Shape mismatch in {operation}: batch sizes {lhs} and {rhs} are not broadcastable")]
    ShapeMismatch {
        /// Name of the operation that received the arguments.
        operation: &'static str,
        /// Batch size of the first argument.
        lhs: usize,
        /// Batch size of the second argument.
        rhs: usize,
    },

    /// A transform could not be inverted.
    #[error("Singular matrix: determinant {determinant} is too small to invert")]
    SingularMatrix {
        /// Determinant of the offending matrix.
        determinant: f64,
    },
}
