use camconv_render::{metrics, Canvas, RenderError};

use crate::error::ResolverError;

/// Compares a batch of rendered canvases against reference images.
///
/// Lower scores are better and 0 means a perfect match.
pub trait CanvasScorer: Send + Sync {
    /// Score `rendered` against `reference`, view by view.
    fn score(&self, rendered: &[Canvas], reference: &[Canvas]) -> Result<f64, ResolverError>;
}

impl<F> CanvasScorer for F
where
    F: Fn(&[Canvas], &[Canvas]) -> Result<f64, ResolverError> + Send + Sync,
{
    fn score(&self, rendered: &[Canvas], reference: &[Canvas]) -> Result<f64, ResolverError> {
        self(rendered, reference)
    }
}

// average a per view metric over the batch
fn mean_over_views(
    rendered: &[Canvas],
    reference: &[Canvas],
    metric: impl Fn(&Canvas, &Canvas) -> Result<f32, RenderError>,
) -> Result<f64, ResolverError> {
    if rendered.len() != reference.len() {
        return Err(ResolverError::DatasetMismatch {
            what: "rendered views",
            expected: reference.len(),
            actual: rendered.len(),
        });
    }
    if rendered.is_empty() {
        return Ok(0.0);
    }

    let total = rendered
        .iter()
        .zip(reference.iter())
        .map(|(a, b)| metric(a, b).map(f64::from))
        .sum::<Result<f64, RenderError>>()?;

    Ok(total / rendered.len() as f64)
}

/// Mean over views of `1 - IoU` between the pixels darker than `threshold`.
///
/// Suited to sparse splat renders: the score does not depend on how many background
/// pixels surround the splats.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ForegroundMismatch {
    /// Intensity below which a pixel counts as foreground.
    pub threshold: f32,
}

impl Default for ForegroundMismatch {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl CanvasScorer for ForegroundMismatch {
    fn score(&self, rendered: &[Canvas], reference: &[Canvas]) -> Result<f64, ResolverError> {
        mean_over_views(rendered, reference, |a, b| {
            metrics::foreground_mismatch(a, b, self.threshold)
        })
    }
}

/// Mean over views of the per pixel absolute difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanAbsoluteError;

impl CanvasScorer for MeanAbsoluteError {
    fn score(&self, rendered: &[Canvas], reference: &[Canvas]) -> Result<f64, ResolverError> {
        mean_over_views(rendered, reference, metrics::l1_loss)
    }
}

/// Mean over views of the per pixel squared difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanSquaredError;

impl CanvasScorer for MeanSquaredError {
    fn score(&self, rendered: &[Canvas], reference: &[Canvas]) -> Result<f64, ResolverError> {
        mean_over_views(rendered, reference, metrics::mse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camconv_render::ImageSize;

    fn canvas(data: Vec<f32>) -> Result<Canvas, RenderError> {
        Canvas::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            data,
        )
    }

    #[test]
    fn test_foreground_mismatch_scorer() -> Result<(), ResolverError> {
        let reference = vec![
            canvas(vec![0.0, 1.0, 1.0, 1.0])?,
            canvas(vec![1.0, 1.0, 0.0, 0.0])?,
        ];
        let scorer = ForegroundMismatch::default();
        assert_eq!(scorer.score(&reference, &reference)?, 0.0);

        let rendered = vec![
            canvas(vec![0.0, 1.0, 1.0, 1.0])?,
            canvas(vec![1.0, 1.0, 1.0, 0.0])?,
        ];
        // second view: one of two foreground pixels matched
        assert!((scorer.score(&rendered, &reference)? - 0.25).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_pixel_scorers() -> Result<(), ResolverError> {
        let reference = vec![canvas(vec![0.0, 1.0, 1.0, 1.0])?];
        let rendered = vec![canvas(vec![1.0, 1.0, 1.0, 1.0])?];
        assert_eq!(MeanAbsoluteError.score(&rendered, &reference)?, 0.25);
        assert_eq!(MeanSquaredError.score(&rendered, &reference)?, 0.25);
        Ok(())
    }

    #[test]
    fn test_scorer_view_count_mismatch() -> Result<(), ResolverError> {
        let reference = vec![canvas(vec![1.0; 4])?; 2];
        let rendered = vec![canvas(vec![1.0; 4])?];
        assert!(matches!(
            MeanAbsoluteError.score(&rendered, &reference),
            Err(ResolverError::DatasetMismatch {
                expected: 2,
                actual: 1,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_closure_scorer() -> Result<(), ResolverError> {
        let scorer = |rendered: &[Canvas], _: &[Canvas]| -> Result<f64, ResolverError> {
            Ok(rendered.len() as f64)
        };
        let reference = vec![canvas(vec![1.0; 4])?; 3];
        assert_eq!(scorer.score(&reference, &reference)?, 3.0);
        Ok(())
    }
}
