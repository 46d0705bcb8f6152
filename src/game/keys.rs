//! Keyboard input handling for directional movement.
//!
//! This module defines the [`GameKey`] enum for abstracting movement from physical keys,
//! and provides [`KeyState`] for tracking held keys and turning them into a direction.
//! It also includes utilities for mapping from winit key events to game actions.
//!
//! Key handlers only write to the [`IntentMailbox`]; the motion controller picks the
//! direction up at the start of the next tick.

use crate::game::input::{IntentEvent, IntentMailbox};
use crate::math::Vec3;
use std::collections::HashSet;
use winit::event::ElementState;
use winit::keyboard;

/// Movement actions that can be held on the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move forward, +Z (W or Up Arrow).
    MoveForward,
    /// Move backward, -Z (S or Down Arrow).
    MoveBackward,
    /// Move left, +X (A or Left Arrow).
    MoveLeft,
    /// Move right, -X (D or Right Arrow).
    MoveRight,
}

/// Tracks the set of currently held movement keys.
///
/// Use [`KeyState::press_key`] and [`KeyState::release_key`] to update the state,
/// and [`KeyState::direction`] to read the combined direction.
#[derive(Debug, Default)]
pub struct KeyState {
    /// Set of currently pressed keys.
    pub pressed_keys: HashSet<GameKey>,
    /// Direction last sent to the mailbox, to avoid repeating it on key repeat.
    last_sent: Option<Vec3>,
}

impl KeyState {
    /// Creates a new, empty [`KeyState`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Combined unit direction on the ground plane.
    ///
    /// Opposing keys cancel; with nothing held (or everything cancelled) the
    /// result is the zero vector.
    pub fn direction(&self) -> Vec3 {
        let axis = |positive: GameKey, negative: GameKey| -> f32 {
            match (self.is_pressed(positive), self.is_pressed(negative)) {
                (true, false) => 1.0,
                (false, true) => -1.0,
                _ => 0.0,
            }
        };

        let z = axis(GameKey::MoveForward, GameKey::MoveBackward);
        let x = axis(GameKey::MoveLeft, GameKey::MoveRight);
        Vec3::new(x, 0.0, z).normalize()
    }

    /// Applies a winit key event and queues the new direction if it changed.
    ///
    /// Returns `true` if the key was a movement key.
    pub fn handle_key(
        &mut self,
        key: &keyboard::Key,
        state: ElementState,
        mailbox: &mut IntentMailbox,
    ) -> bool {
        let Some(game_key) = winit_key_to_game_key(key) else {
            return false;
        };

        match state {
            ElementState::Pressed => self.press_key(game_key),
            ElementState::Released => self.release_key(game_key),
        }
        self.publish(mailbox);
        true
    }

    /// Queues the current direction unless it equals the last one queued.
    pub fn publish(&mut self, mailbox: &mut IntentMailbox) {
        let direction = self.direction();
        if self.last_sent == Some(direction) {
            return;
        }
        // Releasing everything before anything was ever sent has nothing to cancel.
        if self.last_sent.is_none() && direction.is_zero() {
            return;
        }
        self.last_sent = Some(direction);
        mailbox.push(IntentEvent::Direction(direction));
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it is a movement key.
///
/// Supports the arrow keys and WASD (case-insensitive).
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::MoveLeft,
            ArrowRight => GameKey::MoveRight,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::MoveLeft,
            "d" => GameKey::MoveRight,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key, NamedKey};

    #[test]
    fn test_no_keys_is_zero() {
        assert_eq!(KeyState::new().direction(), Vec3::ZERO);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveForward);
        keys.press_key(GameKey::MoveBackward);
        assert_eq!(keys.direction(), Vec3::ZERO);

        keys.press_key(GameKey::MoveLeft);
        assert_eq!(keys.direction(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveForward);
        keys.press_key(GameKey::MoveRight);
        let d = keys.direction();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.x() < 0.0 && d.z() > 0.0);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            winit_key_to_game_key(&Key::Named(NamedKey::ArrowUp)),
            Some(GameKey::MoveForward)
        );
        assert_eq!(
            winit_key_to_game_key(&Key::Character("D".into())),
            Some(GameKey::MoveRight)
        );
        assert_eq!(winit_key_to_game_key(&Key::Character("q".into())), None);
        assert_eq!(winit_key_to_game_key(&Key::Named(NamedKey::Space)), None);
    }

    #[test]
    fn test_handle_key_publishes_changes_once() {
        let mut keys = KeyState::new();
        let mut mailbox = IntentMailbox::new();
        let w = Key::Character("w".into());

        assert!(keys.handle_key(&w, ElementState::Pressed, &mut mailbox));
        // Key repeat: same direction, nothing new queued.
        assert!(keys.handle_key(&w, ElementState::Pressed, &mut mailbox));
        assert!(keys.handle_key(&w, ElementState::Released, &mut mailbox));

        let events: Vec<_> = mailbox.drain().collect();
        assert_eq!(
            events,
            vec![
                IntentEvent::Direction(Vec3::new(0.0, 0.0, 1.0)),
                IntentEvent::Direction(Vec3::ZERO),
            ]
        );
    }

    #[test]
    fn test_non_movement_key_ignored() {
        let mut keys = KeyState::new();
        let mut mailbox = IntentMailbox::new();
        assert!(!keys.handle_key(
            &Key::Named(NamedKey::Escape),
            ElementState::Pressed,
            &mut mailbox
        ));
        assert!(mailbox.is_empty());
    }
}
