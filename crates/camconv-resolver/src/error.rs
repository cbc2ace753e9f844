use camconv_3d::GeometryError;
use camconv_render::RenderError;

use crate::hypothesis::ConventionHypothesis;

/// An error type for the convention resolver.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResolverError {
    /// A geometry operation failed.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Rendering a candidate failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Two parts of a dataset, or a batch of renders and references, disagree in length.
    #[error("Dataset mismatch: expected {expected} {what}, got {actual}")]
    DatasetMismatch {
        /// What is being counted.
        what: &'static str,
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        actual: usize,
    },

    /// A convention does not assign the look, up and right vectors to distinct axes.
    #[error("Invalid convention: {0}")]
    InvalidConvention(String),

    /// The search was given nothing to compare.
    #[error("Cannot resolve a convention without {0}")]
    EmptyInput(&'static str),

    /// Every candidate was rejected before scoring.
    #[error("No candidate convention could be evaluated")]
    NoCandidateEvaluated,

    /// No candidate matched the reference images within tolerance.
    #[error("No candidate matched within tolerance {tolerance}: best was {hypothesis} with score {score}")]
    NoMatchFound {
        /// The best scoring candidate.
        hypothesis: ConventionHypothesis,
        /// Its score.
        score: f64,
        /// The tolerance it failed to meet.
        tolerance: f64,
    },
}
