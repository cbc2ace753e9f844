use std::fmt;

use camconv_3d::{linalg, Mat33};

use crate::{
    axis::{AxisLabel, CameraConvention, StorageDirection},
    error::ResolverError,
};

/// A permutation of the three camera axes.
///
/// Entry `j` is the axis of the stored camera frame that becomes canonical axis `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[usize; 3]")]
pub struct AxisPermutation([usize; 3]);

impl AxisPermutation {
    /// All six permutations in lexicographic order, starting with the identity.
    pub const ALL: [AxisPermutation; 6] = [
        AxisPermutation([0, 1, 2]),
        AxisPermutation([0, 2, 1]),
        AxisPermutation([1, 0, 2]),
        AxisPermutation([1, 2, 0]),
        AxisPermutation([2, 0, 1]),
        AxisPermutation([2, 1, 0]),
    ];

    /// Creates a permutation, returning `None` unless `axes` holds 0, 1 and 2 once each.
    pub fn new(axes: [usize; 3]) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.0 == axes)
    }

    /// The permuted axes.
    pub fn axes(&self) -> [usize; 3] {
        self.0
    }
}

impl TryFrom<[usize; 3]> for AxisPermutation {
    type Error = ResolverError;

    fn try_from(axes: [usize; 3]) -> Result<Self, Self::Error> {
        Self::new(axes).ok_or_else(|| {
            ResolverError::InvalidConvention(format!("{axes:?} is not a permutation of 0, 1, 2"))
        })
    }
}

/// Independent signs of the three camera axes, stored as a 3-bit mask.
///
/// Bit `j` set means canonical axis `j` is the negated stored axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8")]
pub struct AxisSigns(u8);

impl AxisSigns {
    /// Creates signs from a mask, returning `None` if bits above the third are set.
    pub fn from_mask(mask: u8) -> Option<Self> {
        (mask < 8).then_some(Self(mask))
    }

    /// Creates signs from three flags, `true` meaning negative.
    pub fn from_negative(negative: [bool; 3]) -> Self {
        Self(
            negative
                .iter()
                .enumerate()
                .fold(0, |mask, (j, &neg)| mask | ((neg as u8) << j)),
        )
    }

    /// All eight sign combinations in mask order, starting with all positive.
    pub fn all() -> impl Iterator<Item = AxisSigns> {
        (0..8).map(AxisSigns)
    }

    /// The raw mask.
    pub fn mask(&self) -> u8 {
        self.0
    }

    /// Whether canonical axis `j` is negated.
    pub fn is_negative(&self, j: usize) -> bool {
        (self.0 >> j) & 1 == 1
    }

    /// The sign of canonical axis `j`, 1 or -1.
    pub fn sign(&self, j: usize) -> f64 {
        if self.is_negative(j) {
            -1.0
        } else {
            1.0
        }
    }
}

impl TryFrom<u8> for AxisSigns {
    type Error = ResolverError;

    fn try_from(mask: u8) -> Result<Self, Self::Error> {
        Self::from_mask(mask).ok_or_else(|| {
            ResolverError::InvalidConvention(format!("sign mask {mask} has more than 3 bits"))
        })
    }
}

/// A candidate convention: whether to invert the stored extrinsics, and the signed
/// permutation turning the stored camera axes into canonical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ConventionHypothesis {
    /// The extrinsics are stored world-to-camera and must be inverted.
    pub inverted: bool,
    /// Which stored axis becomes each canonical axis.
    pub permutation: AxisPermutation,
    /// The sign applied to each canonical axis.
    pub signs: AxisSigns,
}

impl ConventionHypothesis {
    /// The number of candidate conventions.
    pub const COUNT: usize = 2 * 6 * 8;

    /// The hypothesis leaving canonical extrinsics untouched.
    pub const IDENTITY: ConventionHypothesis = ConventionHypothesis {
        inverted: false,
        permutation: AxisPermutation([0, 1, 2]),
        signs: AxisSigns(0),
    };

    /// Enumerate all candidates in a fixed order: storage first, then permutation, then
    /// signs.
    pub fn all() -> impl Iterator<Item = ConventionHypothesis> {
        [false, true].into_iter().flat_map(|inverted| {
            AxisPermutation::ALL.into_iter().flat_map(move |permutation| {
                AxisSigns::all().map(move |signs| ConventionHypothesis {
                    inverted,
                    permutation,
                    signs,
                })
            })
        })
    }

    /// The 3x3 basis change `M` with `M[perm[j]][j] = sign[j]`.
    ///
    /// Right-multiplying a stored rotation by `M` yields the canonical rotation.
    pub fn basis(&self) -> Mat33<f64> {
        let mut m = [[0.0; 3]; 3];
        for (j, &axis) in self.permutation.axes().iter().enumerate() {
            m[axis][j] = self.signs.sign(j);
        }
        m
    }

    /// Whether the basis change preserves orientation.
    pub fn is_proper(&self) -> bool {
        linalg::det_mat33(&self.basis()) > 0.0
    }

    /// The convention the dataset was stored in, if this hypothesis is the right one.
    ///
    /// Canonical axis 0 is right, axis 1 is down and axis 2 is look.
    pub fn convention(&self) -> CameraConvention {
        let [p0, p1, p2] = self.permutation.axes();
        // permutation axes are validated on construction, so every axis is in 0..3
        let label = |axis: usize, negative: bool| {
            AxisLabel::from_axis(axis, negative).unwrap_or(AxisLabel::PosZ)
        };
        CameraConvention {
            storage: if self.inverted {
                StorageDirection::WorldToCamera
            } else {
                StorageDirection::CameraToWorld
            },
            right: label(p0, self.signs.is_negative(0)),
            up: label(p1, !self.signs.is_negative(1)),
            look: label(p2, self.signs.is_negative(2)),
        }
    }

    /// The hypothesis that undoes a given convention.
    ///
    /// # Errors
    ///
    /// [`ResolverError::InvalidConvention`] if look, up and right do not lie on three
    /// distinct axes.
    pub fn from_convention(convention: &CameraConvention) -> Result<Self, ResolverError> {
        let axes = [
            convention.right.axis(),
            convention.up.axis(),
            convention.look.axis(),
        ];
        let permutation = AxisPermutation::new(axes).ok_or_else(|| {
            ResolverError::InvalidConvention(format!(
                "look, up and right must be on distinct axes: {convention}"
            ))
        })?;
        Ok(Self {
            inverted: convention.storage == StorageDirection::WorldToCamera,
            permutation,
            signs: AxisSigns::from_negative([
                convention.right.is_negative(),
                !convention.up.is_negative(),
                convention.look.is_negative(),
            ]),
        })
    }
}

impl fmt::Display for ConventionHypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (invert={}, permutation={:?}, signs={:03b})",
            self.convention(),
            self.inverted,
            self.permutation.axes(),
            self.signs.mask()
        )
    }
}
