//! Math type re-exports and FBX-specific math utilities.
//!
//! Scene transforms are evaluated in double precision, matching the
//! `D`-typed values FBX stores for every TRS property.

pub use glam::{
    DVec2, DVec3, DVec4,
    DMat3, DMat4,
    DQuat,
    Vec2, Vec3, Vec4,
};

use bytemuck::{Pod, Zeroable};

/// FBX time ticks per second.
pub const FBX_TICKS_PER_SECOND: i64 = 46_186_158_000;

/// Convert an FBX tick count to seconds.
#[inline]
pub fn fbx_time_to_seconds(ticks: i64) -> f64 {
    ticks as f64 / FBX_TICKS_PER_SECOND as f64
}

/// RGB color as stored in material properties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a double-precision vector (x, y, z → r, g, b).
    #[inline]
    pub fn from_dvec3(v: DVec3) -> Self {
        Self::new(v.x as f32, v.y as f32, v.z as f32)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Check whether two matrices agree element-wise within `eps`.
pub fn matrices_close(a: &DMat4, b: &DMat4, eps: f64) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fbx_time_conversion() {
        assert_eq!(fbx_time_to_seconds(FBX_TICKS_PER_SECOND), 1.0);
        assert_eq!(fbx_time_to_seconds(0), 0.0);
        assert!((fbx_time_to_seconds(FBX_TICKS_PER_SECOND / 2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color() {
        let c = Color::from_dvec3(DVec3::new(0.5, 0.25, 1.0));
        assert_eq!(c.to_array(), [0.5, 0.25, 1.0]);
        let bytes: &[u8] = bytemuck::bytes_of(&Color::WHITE);
        assert_eq!(bytes.len(), 12);
    }

    #[test]
    fn test_matrices_close() {
        let a = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let b = a * DMat4::from_scale(DVec3::ONE);
        assert!(matrices_close(&a, &b, 1e-12));
        assert!(!matrices_close(&a, &DMat4::IDENTITY, 1e-12));
    }
}
