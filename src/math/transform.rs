//! Local transforms and explicit parent/child composition.
//!
//! Entities that sit inside other entities (the character body inside its
//! rotation point, a camera attached to the body) get their world matrix by
//! composing their local matrix with the parent's world matrix. Nothing here
//! depends on a renderer's scene graph.

use crate::math::mat::Mat4;
use crate::math::vec::Vec3;

/// Translation, rotation about Y, and per-axis scale.
///
/// Applied in scale → rotate → translate order, matching how a typical scene
/// graph composes an object's local matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Rotation about the Y axis in radians.
    pub rotation_y: f32,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_y: 0.0,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::new(scale, scale, scale))
    }

    pub fn with_rotation_y(mut self, radians: f32) -> Self {
        self.rotation_y = radians;
        self
    }

    /// Local matrix of this transform.
    pub fn matrix(&self) -> Mat4 {
        let scale = Mat4::scaling(self.scale.x(), self.scale.y(), self.scale.z());
        let translation = Mat4::translation(
            self.translation.x(),
            self.translation.y(),
            self.translation.z(),
        );
        if self.rotation_y == 0.0 {
            scale.multiply(&translation)
        } else {
            scale
                .multiply(&Mat4::rotation_y(self.rotation_y))
                .multiply(&translation)
        }
    }

    /// World matrix of an entity with this local transform under `parent`.
    pub fn compose(&self, parent: &Mat4) -> Mat4 {
        self.matrix().multiply(parent)
    }
}
