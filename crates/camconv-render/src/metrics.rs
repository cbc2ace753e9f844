//! Canvas similarity metrics.
//!
//! All metrics return a distance: 0 for identical canvases, larger values for
//! canvases that differ more.

use crate::{canvas::Canvas, error::RenderError};

fn check_same_size(canvas1: &Canvas, canvas2: &Canvas) -> Result<(), RenderError> {
    if canvas1.size() != canvas2.size() {
        return Err(RenderError::CanvasSizeMismatch(
            canvas1.height(),
            canvas1.width(),
            canvas2.height(),
            canvas2.width(),
        ));
    }
    Ok(())
}

/// Compute the mean absolute difference between two canvases.
///
/// $ L1(a, b) = \frac{1}{N} \sum_{i=1}^{N} |a_i - b_i| $
///
/// # Arguments
///
/// * `canvas1` - The first canvas.
/// * `canvas2` - The second canvas.
///
/// # Returns
///
/// The L1 loss, or an error if the canvases have different sizes.
///
/// # Example
///
/// ```
/// use camconv_render::{Canvas, ImageSize};
/// use camconv_render::metrics::l1_loss;
///
/// let size = ImageSize { width: 2, height: 3 };
/// let canvas1 = Canvas::new(size, vec![0f32, 1f32, 2f32, 3f32, 4f32, 5f32]).unwrap();
/// let canvas2 = Canvas::new(size, vec![5f32, 4f32, 3f32, 2f32, 1f32, 0f32]).unwrap();
///
/// assert_eq!(l1_loss(&canvas1, &canvas2).unwrap(), 3.0);
/// ```
pub fn l1_loss(canvas1: &Canvas, canvas2: &Canvas) -> Result<f32, RenderError> {
    check_same_size(canvas1, canvas2)?;

    if canvas1.numel() == 0 {
        return Ok(0.0);
    }

    let l1 = canvas1
        .as_slice()
        .iter()
        .zip(canvas2.as_slice().iter())
        .fold(0f32, |acc, (&a, &b)| acc + (a - b).abs());

    Ok(l1 / (canvas1.numel() as f32))
}

/// Compute the mean squared difference between two canvases.
///
/// $ MSE(a, b) = \frac{1}{N} \sum_{i=1}^{N} (a_i - b_i)^2 $
pub fn mse(canvas1: &Canvas, canvas2: &Canvas) -> Result<f32, RenderError> {
    check_same_size(canvas1, canvas2)?;

    if canvas1.numel() == 0 {
        return Ok(0.0);
    }

    let sum_sq = canvas1
        .as_slice()
        .iter()
        .zip(canvas2.as_slice().iter())
        .fold(0f32, |acc, (&a, &b)| acc + (a - b) * (a - b));

    Ok(sum_sq / (canvas1.numel() as f32))
}

/// Count the pixels darker than `threshold` in each canvas and in both.
///
/// # Returns
///
/// A tuple `(only_first, only_second, both)`.
pub fn foreground_overlap(
    canvas1: &Canvas,
    canvas2: &Canvas,
    threshold: f32,
) -> Result<(usize, usize, usize), RenderError> {
    check_same_size(canvas1, canvas2)?;

    Ok(canvas1
        .as_slice()
        .iter()
        .zip(canvas2.as_slice().iter())
        .fold((0, 0, 0), |(a, b, ab), (&p, &q)| {
            match (p < threshold, q < threshold) {
                (true, true) => (a, b, ab + 1),
                (true, false) => (a + 1, b, ab),
                (false, true) => (a, b + 1, ab),
                (false, false) => (a, b, ab),
            }
        }))
}

/// Compute `1 - IoU` of the foreground pixels, the pixels darker than `threshold`.
///
/// Two canvases without any foreground pixel are considered identical.
pub fn foreground_mismatch(
    canvas1: &Canvas,
    canvas2: &Canvas,
    threshold: f32,
) -> Result<f32, RenderError> {
    let (a, b, ab) = foreground_overlap(canvas1, canvas2, threshold)?;
    let union = a + b + ab;
    if union == 0 {
        return Ok(0.0);
    }
    Ok(1.0 - ab as f32 / union as f32)
}
