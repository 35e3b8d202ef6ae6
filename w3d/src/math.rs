//! Plain value types shared by every chunk.
//!
//! These stay independent of any math library; enable the `glam` feature for conversions.

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Rotation quaternion stored scalar-first.
///
/// The wire order is `(x, y, z, w)`; the reader and writer swap at the boundary.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Component by scalar-first index: 0 = w, 1 = x, 2 = y, 3 = z.
    pub fn component(&self, index: usize) -> f32 {
        match index & 3 {
            0 => self.w,
            1 => self.x,
            2 => self.y,
            _ => self.z,
        }
    }

    pub fn component_mut(&mut self, index: usize) -> &mut f32 {
        match index & 3 {
            0 => &mut self.w,
            1 => &mut self.x,
            2 => &mut self.y,
            _ => &mut self.z,
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.w, self.x, self.y, self.z]
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[cfg(feature = "glam")]
mod glam_impls {
    use super::{Quaternion, Vector2, Vector3};

    impl From<Vector2> for glam::Vec2 {
        fn from(v: Vector2) -> Self {
            glam::Vec2::new(v.x, v.y)
        }
    }

    impl From<glam::Vec2> for Vector2 {
        fn from(v: glam::Vec2) -> Self {
            Vector2::new(v.x, v.y)
        }
    }

    impl From<Vector3> for glam::Vec3 {
        fn from(v: Vector3) -> Self {
            glam::Vec3::new(v.x, v.y, v.z)
        }
    }

    impl From<glam::Vec3> for Vector3 {
        fn from(v: glam::Vec3) -> Self {
            Vector3::new(v.x, v.y, v.z)
        }
    }

    // glam stores quaternions x-first.
    impl From<Quaternion> for glam::Quat {
        fn from(q: Quaternion) -> Self {
            glam::Quat::from_xyzw(q.x, q.y, q.z, q.w)
        }
    }

    impl From<glam::Quat> for Quaternion {
        fn from(q: glam::Quat) -> Self {
            Quaternion::new(q.w, q.x, q.y, q.z)
        }
    }
}
