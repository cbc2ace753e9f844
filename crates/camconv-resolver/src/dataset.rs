use camconv_3d::{frames, linalg, transforms, Mat33, Mat44, Real};
use camconv_render::{Canvas, ImageSize, PointCloudRasterizer, RenderConfig, RenderError};

use crate::{axis::CameraConvention, error::ResolverError, hypothesis::ConventionHypothesis};

/// A set of cameras with one reference image per camera.
///
/// The extrinsics are stored in an unknown convention.
#[derive(Debug, Clone, PartialEq)]
pub struct PuzzleDataset<T: Real> {
    extrinsics: Vec<Mat44<T>>,
    intrinsics: Vec<Mat33<T>>,
    images: Vec<Canvas>,
}

impl<T: Real> PuzzleDataset<T> {
    /// Create a new dataset.
    ///
    /// # Errors
    ///
    /// * [`ResolverError::DatasetMismatch`] if the three batches differ in length.
    /// * [`ResolverError::Render`] if the images do not all have the same size.
    pub fn new(
        extrinsics: Vec<Mat44<T>>,
        intrinsics: Vec<Mat33<T>>,
        images: Vec<Canvas>,
    ) -> Result<Self, ResolverError> {
        if intrinsics.len() != extrinsics.len() {
            return Err(ResolverError::DatasetMismatch {
                what: "intrinsics",
                expected: extrinsics.len(),
                actual: intrinsics.len(),
            });
        }
        if images.len() != extrinsics.len() {
            return Err(ResolverError::DatasetMismatch {
                what: "images",
                expected: extrinsics.len(),
                actual: images.len(),
            });
        }
        if let Some(first) = images.first() {
            if let Some(other) = images.iter().find(|img| img.size() != first.size()) {
                return Err(RenderError::CanvasSizeMismatch(
                    first.height(),
                    first.width(),
                    other.height(),
                    other.width(),
                )
                .into());
            }
        }

        Ok(Self {
            extrinsics,
            intrinsics,
            images,
        })
    }

    /// The number of views.
    pub fn len(&self) -> usize {
        self.extrinsics.len()
    }

    /// Whether the dataset has no view.
    pub fn is_empty(&self) -> bool {
        self.extrinsics.is_empty()
    }

    /// The stored extrinsics.
    pub fn extrinsics(&self) -> &[Mat44<T>] {
        &self.extrinsics
    }

    /// The intrinsics, mapping the image onto `[0, 1]^2`.
    pub fn intrinsics(&self) -> &[Mat33<T>] {
        &self.intrinsics
    }

    /// The reference images.
    pub fn images(&self) -> &[Canvas] {
        &self.images
    }

    /// The size shared by all reference images, `None` for an empty dataset.
    pub fn image_size(&self) -> Option<ImageSize> {
        self.images.first().map(Canvas::size)
    }

    /// Split the dataset into extrinsics, intrinsics and images.
    pub fn into_parts(self) -> (Vec<Mat44<T>>, Vec<Mat33<T>>, Vec<Canvas>) {
        (self.extrinsics, self.intrinsics, self.images)
    }
}

/// Build a dataset stored under a known convention.
///
/// The reference images are rendered from the canonical extrinsics, which are then
/// rewritten into `convention`. Resolving the returned dataset should recover
/// `convention` and `canonical_extrinsics`.
///
/// # Arguments
///
/// * `vertices` - The vertex set to render.
/// * `canonical_extrinsics` - Camera-to-world extrinsics in the canonical convention.
/// * `intrinsics` - One intrinsics matrix per view.
/// * `convention` - The convention to store the extrinsics in.
/// * `config` - The rasterizer options used for the reference images.
pub fn synthesize_dataset<T: Real>(
    vertices: &[[T; 3]],
    canonical_extrinsics: &[Mat44<T>],
    intrinsics: &[Mat33<T>],
    convention: &CameraConvention,
    config: &RenderConfig,
) -> Result<PuzzleDataset<T>, ResolverError> {
    let hypothesis = ConventionHypothesis::from_convention(convention)?;

    let images =
        PointCloudRasterizer::new(*config).render(vertices, canonical_extrinsics, intrinsics)?;

    // the basis is a signed permutation, so its transpose undoes it
    let undo = linalg::transpose33(&hypothesis.basis());
    let stored = canonical_extrinsics
        .iter()
        .map(|m| transforms::apply_basis_change(m, &undo))
        .collect::<Vec<_>>();
    let stored = match hypothesis.inverted {
        true => frames::invert_transforms(&stored)?,
        false => stored,
    };

    log::debug!(
        "synthesized {} views stored as {}",
        stored.len(),
        convention
    );

    PuzzleDataset::new(stored, intrinsics.to_vec(), images)
}
