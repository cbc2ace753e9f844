use crate::error::GeometryError;

/// Compute the batch size obtained by broadcasting two batch dimensions.
///
/// Two sizes are compatible when they are equal or when one of them is 1, in which
/// case the singleton expands to match the other.
///
/// # Arguments
///
/// * `operation` - The name of the calling operation, used in the error message.
/// * `lhs` - The batch size of the first argument.
/// * `rhs` - The batch size of the second argument.
///
/// # Returns
///
/// The broadcast batch size.
///
/// Example:
///
/// ```
/// use camconv_3d::batch::broadcast_batch;
///
/// assert_eq!(broadcast_batch("example", 1, 5).unwrap(), 5);
/// assert_eq!(broadcast_batch("example", 4, 4).unwrap(), 4);
/// assert!(broadcast_batch("example", 2, 3).is_err());
/// ```
pub fn broadcast_batch(
    operation: &'static str,
    lhs: usize,
    rhs: usize,
) -> Result<usize, GeometryError> {
    match (lhs, rhs) {
        (a, b) if a == b => Ok(a),
        (1, b) => Ok(b),
        (a, 1) => Ok(a),
        (lhs, rhs) => Err(GeometryError::ShapeMismatch {
            operation,
            lhs,
            rhs,
        }),
    }
}

/// Fetch the element of a batch at `index`, repeating singleton batches.
///
/// PRECONDITION: `items.len()` is 1 or greater than `index`.
#[inline]
pub fn broadcast_get<T>(items: &[T], index: usize) -> &T {
    match items.len() {
        1 => &items[0],
        _ => &items[index],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broadcast_batch() {
        assert_eq!(broadcast_batch("test", 3, 3), Ok(3));
        assert_eq!(broadcast_batch("test", 1, 7), Ok(7));
        assert_eq!(broadcast_batch("test", 7, 1), Ok(7));
        assert_eq!(broadcast_batch("test", 1, 0), Ok(0));
        assert_eq!(
            broadcast_batch("test", 2, 3),
            Err(GeometryError::ShapeMismatch {
                operation: "test",
                lhs: 2,
                rhs: 3
            })
        );
    }

    #[test]
    fn test_broadcast_get() {
        let single = [10];
        let many = [1, 2, 3];
        assert_eq!(*broadcast_get(&single, 2), 10);
        assert_eq!(*broadcast_get(&many, 2), 3);
    }
}
