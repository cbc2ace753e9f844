use std::{fmt, str::FromStr};

use crate::error::ResolverError;

/// A signed coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AxisLabel {
    /// `+x`
    #[serde(rename = "+x")]
    PosX,
    /// `-x`
    #[serde(rename = "-x")]
    NegX,
    /// `+y`
    #[serde(rename = "+y")]
    PosY,
    /// `-y`
    #[serde(rename = "-y")]
    NegY,
    /// `+z`
    #[serde(rename = "+z")]
    PosZ,
    /// `-z`
    #[serde(rename = "-z")]
    NegZ,
}

impl AxisLabel {
    /// Build a label from an axis index (0 for x, 1 for y, 2 for z) and a sign.
    ///
    /// Returns `None` if the axis index is larger than 2.
    pub fn from_axis(axis: usize, negative: bool) -> Option<Self> {
        match (axis, negative) {
            (0, false) => Some(Self::PosX),
            (0, true) => Some(Self::NegX),
            (1, false) => Some(Self::PosY),
            (1, true) => Some(Self::NegY),
            (2, false) => Some(Self::PosZ),
            (2, true) => Some(Self::NegZ),
            _ => None,
        }
    }

    /// The axis index: 0 for x, 1 for y, 2 for z.
    pub fn axis(&self) -> usize {
        match self {
            Self::PosX | Self::NegX => 0,
            Self::PosY | Self::NegY => 1,
            Self::PosZ | Self::NegZ => 2,
        }
    }

    /// Whether the label points along the negative axis.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::NegX | Self::NegY | Self::NegZ)
    }

    /// The sign of the label as a scalar, 1 or -1.
    pub fn sign(&self) -> f64 {
        if self.is_negative() {
            -1.0
        } else {
            1.0
        }
    }

    /// The opposite direction along the same axis.
    pub fn negate(&self) -> Self {
        match self {
            Self::PosX => Self::NegX,
            Self::NegX => Self::PosX,
            Self::PosY => Self::NegY,
            Self::NegY => Self::PosY,
            Self::PosZ => Self::NegZ,
            Self::NegZ => Self::PosZ,
        }
    }

    /// The label as a unit vector.
    pub fn to_vector(&self) -> [f64; 3] {
        let mut v = [0.0; 3];
        v[self.axis()] = self.sign();
        v
    }
}

impl fmt::Display for AxisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PosX => "+x",
            Self::NegX => "-x",
            Self::PosY => "+y",
            Self::NegY => "-y",
            Self::PosZ => "+z",
            Self::NegZ => "-z",
        };
        f.write_str(s)
    }
}

impl FromStr for AxisLabel {
    type Err = ResolverError;

    /// Parses `+x`, `-y`, ... An unsigned axis such as `z` is read as positive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (negative, axis) = match s.as_bytes() {
            [b'+', axis] => (false, *axis),
            [b'-', axis] => (true, *axis),
            [axis] => (false, *axis),
            _ => return Err(ResolverError::InvalidConvention(format!("unknown axis {s:?}"))),
        };
        let index = match axis {
            b'x' => 0,
            b'y' => 1,
            b'z' => 2,
            _ => return Err(ResolverError::InvalidConvention(format!("unknown axis {s:?}"))),
        };
        // index is always in 0..3 here
        Self::from_axis(index, negative)
            .ok_or_else(|| ResolverError::InvalidConvention(format!("unknown axis {s:?}")))
    }
}

/// Which way a stored extrinsics matrix maps points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StorageDirection {
    /// The matrix maps camera coordinates to world coordinates.
    #[serde(rename = "c2w")]
    CameraToWorld,
    /// The matrix maps world coordinates to camera coordinates.
    #[serde(rename = "w2c")]
    WorldToCamera,
}

impl fmt::Display for StorageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CameraToWorld => f.write_str("c2w"),
            Self::WorldToCamera => f.write_str("w2c"),
        }
    }
}

impl FromStr for StorageDirection {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c2w" => Ok(Self::CameraToWorld),
            "w2c" => Ok(Self::WorldToCamera),
            other => Err(ResolverError::InvalidConvention(format!(
                "unknown storage direction {other:?}"
            ))),
        }
    }
}

/// A camera convention: how extrinsics are stored and which camera space axes the
/// look, up and right vectors point along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CameraConvention {
    /// Storage direction of the extrinsics.
    pub storage: StorageDirection,
    /// Axis the camera looks along.
    pub look: AxisLabel,
    /// Axis pointing up in the image.
    pub up: AxisLabel,
    /// Axis pointing right in the image.
    pub right: AxisLabel,
}

impl CameraConvention {
    /// The canonical convention: camera-to-world, look `+z`, up `-y`, right `+x`.
    pub const CANONICAL: CameraConvention = CameraConvention {
        storage: StorageDirection::CameraToWorld,
        look: AxisLabel::PosZ,
        up: AxisLabel::NegY,
        right: AxisLabel::PosX,
    };

    /// Whether look, up and right lie on three distinct axes.
    pub fn is_valid(&self) -> bool {
        let (a, b, c) = (self.right.axis(), self.up.axis(), self.look.axis());
        a != b && b != c && a != c
    }

    /// Whether the camera frame is right-handed, i.e. right x down = look.
    pub fn is_right_handed(&self) -> bool {
        let r = self.right.to_vector();
        let d = self.up.negate().to_vector();
        let cross = [
            r[1] * d[2] - r[2] * d[1],
            r[2] * d[0] - r[0] * d[2],
            r[0] * d[1] - r[1] * d[0],
        ];
        cross == self.look.to_vector()
    }
}

impl Default for CameraConvention {
    fn default() -> Self {
        Self::CANONICAL
    }
}

impl fmt::Display for CameraConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} look={} up={} right={}",
            self.storage, self.look, self.up, self.right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_label_roundtrip_str() -> Result<(), ResolverError> {
        for axis in 0..3 {
            for negative in [false, true] {
                let label = AxisLabel::from_axis(axis, negative)
                    .ok_or(ResolverError::InvalidConvention("axis".into()))?;
                assert_eq!(label.to_string().parse::<AxisLabel>()?, label);
                assert_eq!(label.axis(), axis);
                assert_eq!(label.is_negative(), negative);
                assert_eq!(label.negate().negate(), label);
            }
        }
        Ok(())
    }

    #[test]
    fn test_axis_label_parse() -> Result<(), ResolverError> {
        assert_eq!("z".parse::<AxisLabel>()?, AxisLabel::PosZ);
        assert_eq!(" -X ".parse::<AxisLabel>()?, AxisLabel::NegX);
        assert!("+w".parse::<AxisLabel>().is_err());
        assert!("++x".parse::<AxisLabel>().is_err());
        assert!("".parse::<AxisLabel>().is_err());
        Ok(())
    }

    #[test]
    fn test_storage_direction_parse() -> Result<(), ResolverError> {
        assert_eq!("w2c".parse::<StorageDirection>()?, StorageDirection::WorldToCamera);
        assert_eq!("C2W".parse::<StorageDirection>()?, StorageDirection::CameraToWorld);
        assert!("cam".parse::<StorageDirection>().is_err());
        Ok(())
    }

    #[test]
    fn test_canonical_convention() {
        let canonical = CameraConvention::CANONICAL;
        assert!(canonical.is_valid());
        assert!(canonical.is_right_handed());
        assert_eq!(canonical.to_string(), "c2w look=+z up=-y right=+x");
    }

    #[test]
    fn test_convention_handedness() {
        let convention = CameraConvention {
            storage: StorageDirection::WorldToCamera,
            look: AxisLabel::PosX,
            up: AxisLabel::PosZ,
            right: AxisLabel::NegY,
        };
        assert!(convention.is_valid());
        assert!(convention.is_right_handed());

        let mirrored = CameraConvention {
            right: AxisLabel::PosY,
            ..convention
        };
        assert!(!mirrored.is_right_handed());

        let degenerate = CameraConvention {
            up: AxisLabel::NegX,
            ..convention
        };
        assert!(!degenerate.is_valid());
    }

    #[test]
    fn test_convention_serde() -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(&CameraConvention::CANONICAL)?;
        assert_eq!(
            json,
            r#"{"storage":"c2w","look":"+z","up":"-y","right":"+x"}"#
        );
        let back: CameraConvention = serde_json::from_str(&json)?;
        assert_eq!(back, CameraConvention::CANONICAL);
        Ok(())
    }
}
