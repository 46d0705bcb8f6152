//! Per-tick movement and collision response.
//!
//! [`MotionController::tick`] is the only code that moves the player. Each tick:
//!
//! 1. Drains the [`IntentMailbox`] into the player's [`Intent`].
//! 2. Advances toward the destination (snapping when within one step) or along
//!    the held direction.
//! 3. Recomputes the player's bounds.
//! 4. Scans the obstacle set and applies one pushback per overlapping obstacle.
//!
//! # Pushback
//!
//! The push axis is the horizontal axis with the larger center-to-center offset
//! between the player and the obstacle; ties go to X. The magnitude is a fixed
//! constant, independent of penetration depth, so a deep overlap can take several
//! ticks to clear and neighboring obstacles can push back and forth (jitter).
//! Offsets are measured from the player's box as it was before any pushback of
//! the current tick, which makes the total displacement the plain sum of the
//! individual pushes.

use crate::game::collision::{CollisionSet, ObstacleId};
use crate::game::input::{IntentEvent, IntentMailbox};
use crate::game::player::{Intent, PlayerState};
use crate::math::Vec3;
use tracing::{debug, trace};

/// Default displacement applied per overlapping obstacle, in world units.
pub const DEFAULT_PUSHBACK: f32 = 5.0;

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Whether intent resolution changed the player's position.
    pub moved: bool,
    /// Whether the player reached its destination this tick.
    pub arrived: bool,
    /// Obstacles the player overlapped, in set order.
    pub collisions: Vec<ObstacleId>,
}

/// Advances the player one tick at a time.
#[derive(Debug, Clone, Copy)]
pub struct MotionController {
    pub pushback: f32,
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(DEFAULT_PUSHBACK)
    }
}

impl MotionController {
    pub fn new(pushback: f32) -> Self {
        Self { pushback }
    }

    /// Runs one full tick.
    pub fn tick(
        &self,
        player: &mut PlayerState,
        mailbox: &mut IntentMailbox,
        obstacles: &CollisionSet,
    ) -> TickReport {
        Self::apply_events(player, mailbox);

        let (moved, arrived) = Self::advance(player);
        let collisions = self.resolve_collisions(player, obstacles);

        TickReport {
            moved,
            arrived,
            collisions,
        }
    }

    /// Folds every queued event into the player's intent, oldest first.
    ///
    /// A zero direction only ends keyboard movement; a pending destination
    /// survives it.
    pub fn apply_events(player: &mut PlayerState, mailbox: &mut IntentMailbox) {
        for event in mailbox.drain() {
            player.intent = match event {
                IntentEvent::Stop => Intent::Idle,
                IntentEvent::MoveTo(target) => Intent::MoveTo(target),
                IntentEvent::Direction(direction) if direction.is_zero() => match player.intent {
                    Intent::Directional(_) => Intent::Idle,
                    other => other,
                },
                IntentEvent::Direction(direction) => Intent::Directional(direction),
            };
        }
    }

    /// Moves the player according to its intent. Returns `(moved, arrived)`.
    pub fn advance(player: &mut PlayerState) -> (bool, bool) {
        let start = player.position;
        let mut arrived = false;

        match player.intent {
            Intent::Idle => {}
            Intent::MoveTo(target) => {
                let offset = target - player.position;
                if offset.length() <= player.speed {
                    player.position = target;
                    player.intent = Intent::Idle;
                    arrived = true;
                } else {
                    player.position += offset.normalize() * player.speed;
                }
            }
            Intent::Directional(direction) => {
                player.position += direction.normalize() * player.speed;
            }
        }

        let step = player.position - start;
        if step.x() != 0.0 || step.z() != 0.0 {
            player.heading = step.x().atan2(step.z());
        }
        (step != Vec3::ZERO, arrived)
    }

    /// Pushes the player out of every obstacle it overlaps.
    ///
    /// Any collision cancels a pending destination. Returns the obstacles hit.
    pub fn resolve_collisions(
        &self,
        player: &mut PlayerState,
        obstacles: &CollisionSet,
    ) -> Vec<ObstacleId> {
        let bounds = player.bounds();
        let center = bounds.center();

        let mut hits = Vec::new();
        let mut displacement = Vec3::ZERO;
        obstacles.detect(&bounds, |obstacle| {
            let push = pushback(center, obstacle.bounds.center(), self.pushback);
            trace!(obstacle = %obstacle.id, kind = ?obstacle.kind, ?push, "pushback");
            displacement += push;
            hits.push(obstacle.id);
        });

        if !hits.is_empty() {
            player.stop_movement();
            player.position += displacement;
            debug!(
                collisions = hits.len(),
                position = ?player.position,
                "player pushed back"
            );
        }
        hits
    }
}

/// Displacement that pushes a box centered at `player` away from one centered at
/// `obstacle`, along the horizontal axis with the larger offset.
///
/// Equal offsets resolve along X. A zero offset pushes toward the positive axis.
pub fn pushback(player: Vec3, obstacle: Vec3, magnitude: f32) -> Vec3 {
    let dx = player.x() - obstacle.x();
    let dz = player.z() - obstacle.z();

    let signed = |offset: f32| if offset >= 0.0 { magnitude } else { -magnitude };

    if dx.abs() >= dz.abs() {
        Vec3::new(signed(dx), 0.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, signed(dz))
    }
}
