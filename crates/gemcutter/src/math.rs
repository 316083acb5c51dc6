//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The [`Transform`] type is the local pose every
//! entity carries: position, rotation, and scale.

use serde::{Deserialize, Serialize};

pub use glam::{Mat4, Quat, Vec3, Vec4};

/// A pose in space: position, rotation, and scale.
///
/// Every entity owns one. It is always relative to the entity's parent (or
/// to world space for roots); see
/// [`World::world_transform`](crate::ecs::World::world_transform) for the
/// accumulated version.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Return a copy positioned at its current translation and facing `target`.
    ///
    /// `Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y)`
    /// places a camera at (0,5,10) looking toward the origin.
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        self.look_at(self.translation, target, up);
        self
    }

    /// Move to `position` and orient so that -Z points at `target`.
    ///
    /// Does nothing to the rotation if `position == target`, since there is no
    /// direction to face.
    pub fn look_at(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.translation = position;
        if (target - position).length_squared() <= f32::EPSILON {
            return;
        }

        let look = Mat4::look_at_rh(position, target, up);
        let (_, rotation, _) = look.inverse().to_scale_rotation_translation();
        self.rotation = rotation;
    }

    /// Rotate about a local axis by `degrees`.
    pub fn rotate(&mut self, axis: Vec3, degrees: f32) {
        let delta = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        self.rotation = (self.rotation * delta).normalize();
    }

    pub fn rotate_x(&mut self, degrees: f32) {
        self.rotate(Vec3::X, degrees);
    }

    pub fn rotate_y(&mut self, degrees: f32) {
        self.rotate(Vec3::Y, degrees);
    }

    pub fn rotate_z(&mut self, degrees: f32) {
        self.rotate(Vec3::Z, degrees);
    }

    /// Compute the 4x4 model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Vec3> for Transform {
    fn from(translation: Vec3) -> Self {
        Self::from_translation(translation)
    }
}
