//! Saved player record.
//!
//! The record is read once when a session starts to place the player; the tick
//! loop never writes it back. Field names are camelCase on the wire.

use crate::error::Result;
use crate::math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerRecord {
    pub id: u32,
    pub name: String,
    pub user_id: String,
    pub level: u32,
    pub score: u32,
    pub position_x: f32,
    pub position_z: f32,
}

impl Default for PlayerRecord {
    fn default() -> Self {
        Self {
            id: 0,
            name: "Explorador".into(),
            user_id: "1".into(),
            level: 1,
            score: 0,
            position_x: 0.0,
            position_z: 0.0,
        }
    }
}

impl PlayerRecord {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Saved ground position, if one was ever stored.
    ///
    /// A fresh record stores `(0, 0)`, which means "no saved position" rather
    /// than the world origin.
    pub fn saved_position(&self) -> Option<Vec3> {
        (self.position_x != 0.0 || self.position_z != 0.0)
            .then(|| Vec3::new(self.position_x, 0.0, self.position_z))
    }

    /// Where the player should appear: the saved position or `fallback`.
    pub fn spawn_or(&self, fallback: Vec3) -> Vec3 {
        self.saved_position().unwrap_or(fallback)
    }
}
