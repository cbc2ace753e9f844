use camconv_3d::{frames, linalg, transforms, Mat44, Real};
use camconv_render::{
    parallel, Canvas, ExecutionStrategy, PointCloudRasterizer, RenderConfig, RenderError,
};

use crate::{
    axis::CameraConvention,
    dataset::PuzzleDataset,
    error::ResolverError,
    hypothesis::ConventionHypothesis,
    scoring::{CanvasScorer, ForegroundMismatch},
};

/// How the resolver picks a candidate among the scored ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum MatchPolicy {
    /// The lowest score, the earliest candidate on ties.
    #[default]
    BestScore,
    /// The earliest candidate within tolerance.
    FirstWithinTolerance,
}

/// Options for the convention resolver.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Largest score still accepted as a match.
    pub tolerance: f64,
    /// Candidate selection rule.
    pub policy: MatchPolicy,
    /// Skip candidates whose corrected rotation is a reflection.
    ///
    /// A basis change and its negation render the same images, because the perspective
    /// division cancels a global sign, so only one of the two can be told apart.
    pub require_proper_rotation: bool,
    /// How candidates are distributed over threads.
    pub strategy: ExecutionStrategy,
    /// Rasterizer options. The resolution is replaced by the reference image size.
    pub render: RenderConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            policy: MatchPolicy::default(),
            require_proper_rotation: true,
            strategy: ExecutionStrategy::default(),
            render: RenderConfig {
                strategy: ExecutionStrategy::Serial,
                ..Default::default()
            },
        }
    }
}

/// The outcome of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T: Real> {
    /// The selected candidate.
    pub hypothesis: ConventionHypothesis,
    /// The convention the dataset was stored in.
    pub convention: CameraConvention,
    /// The score of the selected candidate.
    pub score: f64,
    /// The extrinsics rewritten in the canonical convention.
    pub extrinsics: Vec<Mat44<T>>,
}

/// Rewrite stored extrinsics in the canonical convention assuming `hypothesis`.
///
/// The input is not modified. Inverted candidates are inverted in `f64`.
///
/// # Errors
///
/// [`ResolverError::Geometry`] if the hypothesis is inverted and a matrix is singular.
pub fn candidate_extrinsics<T: Real>(
    hypothesis: &ConventionHypothesis,
    extrinsics: &[Mat44<T>],
) -> Result<Vec<Mat44<T>>, ResolverError> {
    let base = match hypothesis.inverted {
        true => frames::invert_transforms(extrinsics)?,
        false => extrinsics.to_vec(),
    };
    Ok(apply_hypothesis(hypothesis, &base))
}

fn apply_hypothesis<T: Real>(
    hypothesis: &ConventionHypothesis,
    base: &[Mat44<T>],
) -> Vec<Mat44<T>> {
    let basis = hypothesis.basis();
    base.iter()
        .map(|m| transforms::apply_basis_change(m, &basis))
        .collect()
}

/// Recovers the convention of a dataset by rendering every candidate and comparing the
/// renders against the reference images.
#[derive(Debug, Clone, Default)]
pub struct ConventionResolver<S = ForegroundMismatch> {
    config: ResolverConfig,
    scorer: S,
}

impl ConventionResolver<ForegroundMismatch> {
    /// Creates a resolver with the default scorer.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            scorer: ForegroundMismatch::default(),
        }
    }
}

impl<S: CanvasScorer> ConventionResolver<S> {
    /// Creates a resolver with a custom scorer.
    pub fn with_scorer(config: ResolverConfig, scorer: S) -> Self {
        Self { config, scorer }
    }

    /// Returns the resolver options.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the scorer.
    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    fn rasterizer<T: Real>(&self, dataset: &PuzzleDataset<T>) -> PointCloudRasterizer {
        let mut config = self.config.render;
        if let Some(size) = dataset.image_size() {
            config.resolution = size;
        }
        PointCloudRasterizer::new(config)
    }

    /// Render the vertices through the candidate extrinsics and score them.
    ///
    /// # Returns
    ///
    /// The score, lower is better.
    pub fn score_hypothesis<T: Real>(
        &self,
        hypothesis: &ConventionHypothesis,
        dataset: &PuzzleDataset<T>,
        vertices: &[[T; 3]],
    ) -> Result<f64, ResolverError> {
        let candidate = candidate_extrinsics(hypothesis, dataset.extrinsics())?;
        let rendered = self
            .rasterizer(dataset)
            .render(vertices, &candidate, dataset.intrinsics())?;
        self.scorer.score(&rendered, dataset.images())
    }

    // None when the candidate is rejected without a score
    fn evaluate<T: Real>(
        &self,
        hypothesis: &ConventionHypothesis,
        base: &[Mat44<T>],
        rasterizer: &PointCloudRasterizer,
        dataset: &PuzzleDataset<T>,
        vertices: &[[T; 3]],
    ) -> Result<Option<f64>, ResolverError> {
        let candidate = apply_hypothesis(hypothesis, base);

        if self.config.require_proper_rotation
            && candidate
                .iter()
                .any(|m| linalg::det_mat33(&transforms::rotation_block(m)) <= 0.0)
        {
            log::trace!("skipping improper candidate {hypothesis}");
            return Ok(None);
        }

        let rendered = match rasterizer.render(vertices, &candidate, dataset.intrinsics()) {
            Ok(rendered) => rendered,
            Err(e @ RenderError::OutOfBoundsIndex { .. }) => {
                log::debug!("rejecting candidate {hypothesis}: {e}");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let score = self.scorer.score(&rendered, dataset.images())?;
        if !score.is_finite() {
            log::warn!("rejecting candidate {hypothesis}: non-finite score {score}");
            return Ok(None);
        }
        log::debug!("candidate {hypothesis}: score {score:.6}");
        Ok(Some(score))
    }

    /// Search all 96 candidates for the convention of `dataset`.
    ///
    /// # Arguments
    ///
    /// * `dataset` - The extrinsics of unknown convention with their reference images.
    /// * `vertices` - The vertex set the reference images were rendered from.
    ///
    /// # Returns
    ///
    /// The selected candidate with its convention labels and the extrinsics rewritten in
    /// the canonical convention. The result only depends on the inputs and the
    /// enumeration order, not on the execution strategy.
    ///
    /// # Errors
    ///
    /// * [`ResolverError::NoMatchFound`] with the best candidate if no candidate scores
    ///   within tolerance.
    /// * [`ResolverError::NoCandidateEvaluated`] if every candidate was rejected, including
    ///   candidates whose score is not finite.
    /// * [`ResolverError::EmptyInput`] if the dataset has no view or there are no vertices.
    /// * [`ResolverError::Geometry`] if the stored extrinsics are singular.
    pub fn resolve<T: Real>(
        &self,
        dataset: &PuzzleDataset<T>,
        vertices: &[[T; 3]],
    ) -> Result<Resolution<T>, ResolverError> {
        if dataset.is_empty() {
            return Err(ResolverError::EmptyInput("views"));
        }
        if vertices.is_empty() {
            return Err(ResolverError::EmptyInput("vertices"));
        }

        let hypotheses = ConventionHypothesis::all().collect::<Vec<_>>();
        let rasterizer = self.rasterizer(dataset);

        let stored = dataset.extrinsics().to_vec();
        let inverted = frames::invert_transforms(dataset.extrinsics())?;

        log::debug!(
            "resolving {} views against {} candidates",
            dataset.len(),
            hypotheses.len()
        );

        let scores = parallel::map_indices(self.config.strategy, hypotheses.len(), |i| {
            let hypothesis = &hypotheses[i];
            let base = if hypothesis.inverted { &inverted } else { &stored };
            self.evaluate(hypothesis, base, &rasterizer, dataset, vertices)
        })
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;

        let mut best: Option<(usize, f64)> = None;
        for (i, score) in scores.iter().enumerate() {
            let Some(score) = *score else {
                continue;
            };
            if self.config.policy == MatchPolicy::FirstWithinTolerance
                && score <= self.config.tolerance
            {
                best = Some((i, score));
                break;
            }
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((i, score));
            }
        }

        let (index, score) = best.ok_or(ResolverError::NoCandidateEvaluated)?;
        let hypothesis = hypotheses[index];

        if score > self.config.tolerance {
            log::warn!(
                "no candidate within tolerance {}: best {hypothesis} scored {score:.6}",
                self.config.tolerance
            );
            return Err(ResolverError::NoMatchFound {
                hypothesis,
                score,
                tolerance: self.config.tolerance,
            });
        }

        let base = if hypothesis.inverted { &inverted } else { &stored };
        let convention = hypothesis.convention();
        log::info!("resolved convention {convention} with score {score:.6}");

        Ok(Resolution {
            hypothesis,
            convention,
            score,
            extrinsics: apply_hypothesis(&hypothesis, base),
        })
    }

    /// Resolve the convention of `dataset` and rewrite it canonically.
    ///
    /// The returned dataset holds the canonical extrinsics, the same intrinsics and
    /// images re-rendered from the canonical extrinsics.
    pub fn convert_dataset<T: Real>(
        &self,
        dataset: &PuzzleDataset<T>,
        vertices: &[[T; 3]],
    ) -> Result<(PuzzleDataset<T>, Resolution<T>), ResolverError> {
        let resolution = self.resolve(dataset, vertices)?;
        let images: Vec<Canvas> =
            self.rasterizer(dataset)
                .render(vertices, &resolution.extrinsics, dataset.intrinsics())?;
        let converted = PuzzleDataset::new(
            resolution.extrinsics.clone(),
            dataset.intrinsics().to_vec(),
            images,
        )?;
        Ok((converted, resolution))
    }
}
