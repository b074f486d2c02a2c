//! Euler rotation orders.

use crate::util::{DMat4, DVec3};

/// Euler rotation order of a node (`RotationOrder` property).
///
/// The name lists the factors left to right: `EulerXYZ` is `Rx · Ry · Rz`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RotationOrder {
    EulerXYZ = 0,
    EulerXZY = 1,
    EulerYZX = 2,
    EulerYXZ = 3,
    EulerZXY = 4,
    EulerZYX = 5,
    /// Evaluated as `EulerXYZ`.
    SphericXYZ = 6,
}

impl Default for RotationOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl RotationOrder {
    pub const DEFAULT: Self = Self::EulerZYX;

    /// Unknown values fall back to `EulerXYZ`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::EulerXYZ,
            1 => Self::EulerXZY,
            2 => Self::EulerYZX,
            3 => Self::EulerYXZ,
            4 => Self::EulerZXY,
            5 => Self::EulerZYX,
            6 => Self::SphericXYZ,
            _ => Self::EulerXYZ,
        }
    }

    /// Rotation matrix for Euler angles in degrees.
    pub fn rotation_matrix(self, euler_degrees: DVec3) -> DMat4 {
        let r = euler_degrees * (std::f64::consts::PI / 180.0);
        let (b, a) = r.x.sin_cos();
        let (d, c) = r.y.sin_cos();
        let (f, e) = r.z.sin_cos();

        // rows of the upper 3x3
        let [r0, r1, r2] = match self {
            Self::EulerXYZ | Self::SphericXYZ => [
                [c * e, -c * f, d],
                [a * f + b * e * d, a * e - b * f * d, -b * c],
                [b * f - a * e * d, b * e + a * f * d, a * c],
            ],
            Self::EulerYXZ => [
                [c * e + d * f * b, d * e * b - c * f, a * d],
                [a * f, a * e, -b],
                [c * f * b - d * e, d * f + c * e * b, a * c],
            ],
            Self::EulerZXY => [
                [c * e - d * f * b, -a * f, d * e + c * f * b],
                [c * f + d * e * b, a * e, d * f - c * e * b],
                [-a * d, b, a * c],
            ],
            Self::EulerZYX => [
                [c * e, b * e * d - a * f, a * e * d + b * f],
                [c * f, b * f * d + a * e, a * f * d - b * e],
                [-d, b * c, a * c],
            ],
            Self::EulerYZX => [
                [c * e, b * d - a * c * f, b * c * f + a * d],
                [f, a * e, -b * e],
                [-d * e, a * d * f + b * c, a * c - b * d * f],
            ],
            Self::EulerXZY => [
                [c * e, -f, d * e],
                [a * c * f + b * d, a * e, a * d * f - b * c],
                [b * c * f - a * d, b * e, b * d * f + a * c],
            ],
        };

        DMat4::from_cols_array(&[
            r0[0], r1[0], r2[0], 0.0,
            r0[1], r1[1], r2[1], 0.0,
            r0[2], r1[2], r2[2], 0.0,
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}
