//! Player state.
//!
//! This module defines the [`PlayerState`] struct, which tracks the player's
//! position, current movement [`Intent`], speed and collision size.
//!
//! # Coordinate System
//!
//! Right-handed, Y up. The player's position is the point on the ground under
//! the character (its rotation point); the body box sits on top of it.
//!
//! - X-axis: left/right (right is -X when looking down +Z)
//! - Y-axis: height
//! - Z-axis: forward/backward
//!
//! # Ownership
//!
//! Exactly one `PlayerState` exists per session and only the motion controller
//! mutates it during a tick.

use crate::game::collision::{Aabb, Placed, compute_bounds};
use crate::math::{Mat4, Transform, Vec3};

/// Default edge length of the character's box, in world units.
pub const DEFAULT_CHARACTER_SIZE: f32 = 50.0;

/// Default travel per tick, in world units.
pub const DEFAULT_SPEED: f32 = 10.0;

/// The player's desired movement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Intent {
    /// Standing still.
    #[default]
    Idle,
    /// Walking toward a destination picked with the pointer.
    MoveTo(Vec3),
    /// Walking along a direction held on the keyboard. Not normalized.
    Directional(Vec3),
}

/// Represents the player character's state in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Ground position of the character `[x, y, z]`.
    pub position: Vec3,
    /// Current movement intent.
    pub intent: Intent,
    /// Maximum travel per tick.
    pub speed: f32,
    /// Edge length of the character's collision cube.
    pub size: f32,
    /// Facing angle about Y in radians, updated when the player moves
    /// horizontally. Only used by renderers; collision ignores it.
    pub heading: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl PlayerState {
    /// Creates an idle player at `spawn` with the default speed and size.
    pub fn new(spawn: Vec3) -> Self {
        Self {
            position: spawn,
            intent: Intent::Idle,
            speed: DEFAULT_SPEED,
            size: DEFAULT_CHARACTER_SIZE,
            heading: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Clears any pending destination. Directional intent is left alone since it
    /// follows held keys rather than a one-shot request.
    pub fn stop_movement(&mut self) {
        if matches!(self.intent, Intent::MoveTo(_)) {
            self.intent = Intent::Idle;
        }
    }

    /// The pending destination, if any.
    pub fn destination(&self) -> Option<Vec3> {
        match self.intent {
            Intent::MoveTo(target) => Some(target),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.intent == Intent::Idle
    }

    /// World matrix of the rotation point the body hangs from.
    pub fn root_matrix(&self) -> Mat4 {
        Transform::from_translation(self.position).matrix()
    }

    /// Local transform of the body inside the rotation point: lifted by half its
    /// size so it rests on the ground.
    fn body_transform(&self) -> Transform {
        Transform::from_translation(Vec3::new(0.0, self.size / 2.0, 0.0))
    }

    /// Current collision box of the character.
    pub fn bounds(&self) -> Aabb {
        compute_bounds(self)
    }
}

impl Placed for PlayerState {
    fn local_extent(&self) -> Aabb {
        Aabb::from_center_size(Vec3::ZERO, Vec3::new(self.size, self.size, self.size))
    }

    fn world_matrix(&self) -> Mat4 {
        self.body_transform().compose(&self.root_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_sit_on_ground() {
        let player = PlayerState::new(Vec3::new(100.0, 0.0, -40.0));
        let bounds = player.bounds();
        assert_eq!(bounds.min, Vec3::new(75.0, 0.0, -65.0));
        assert_eq!(bounds.max, Vec3::new(125.0, 50.0, -15.0));
    }

    #[test]
    fn test_bounds_follow_size() {
        let player = PlayerState::new(Vec3::ZERO).with_size(10.0);
        let bounds = player.bounds();
        assert_eq!(bounds.size(), Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(bounds.min.y(), 0.0);
    }

    #[test]
    fn test_stop_movement_clears_destination_only() {
        let mut player = PlayerState::default();
        player.intent = Intent::MoveTo(Vec3::new(1.0, 0.0, 0.0));
        player.stop_movement();
        assert!(player.is_idle());

        player.intent = Intent::Directional(Vec3::new(0.0, 0.0, 1.0));
        player.stop_movement();
        assert_eq!(player.intent, Intent::Directional(Vec3::new(0.0, 0.0, 1.0)));
    }
}
