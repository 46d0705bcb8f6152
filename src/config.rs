// Runtime settings.
// Read from a JSON file, every field optional, with environment overrides for
// the values most often changed from the command line.

use crate::error::{Error, Result};
use crate::game::assets::ObstaclePlacement;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides [`Settings::seed`].
pub const ENV_SEED: &str = "GUARDIANES_SEED";
/// Overrides [`Settings::log_level`].
pub const ENV_LOG: &str = "GUARDIANES_LOG";

/// Smallest maze side that still has an interior corridor.
pub const MIN_MAZE_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub maze_width: usize,
    pub maze_height: usize,
    /// World units per maze cell.
    pub cell_size: f32,
    pub wall_height: f32,
    pub player_size: f32,
    /// Player travel per tick.
    pub speed: f32,
    /// Displacement per overlapping obstacle per tick.
    pub pushback: f32,
    pub double_tap_ms: u64,
    /// Host window size in pixels until the first resize.
    pub viewport: (f32, f32),
    /// Ticks per second for the driver loop.
    pub tick_rate: u32,
    /// Driver gives up after this many ticks.
    pub max_ticks: u64,
    /// Base directory for obstacle model descriptors.
    pub asset_dir: PathBuf,
    pub obstacles: Vec<ObstaclePlacement>,
    /// Ground positions `[x, z]` of trees.
    pub trees: Vec<[f32; 2]>,
    /// Fixed seed for maze and tree generation; random when absent.
    pub seed: Option<u64>,
    /// Directory to save generated mazes in, if any.
    pub maze_dir: Option<PathBuf>,
    /// Default `tracing` filter, used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze_width: 21,
            maze_height: 21,
            cell_size: 100.0,
            wall_height: 100.0,
            player_size: 50.0,
            speed: 10.0,
            pushback: 5.0,
            double_tap_ms: 300,
            viewport: (1280.0, 720.0),
            tick_rate: 60,
            max_ticks: 20_000,
            asset_dir: PathBuf::from("assets"),
            obstacles: ObstaclePlacement::defaults(),
            trees: vec![
                [300.0, 300.0],
                [800.0, -300.0],
                [-300.0, 800.0],
                [-800.0, -800.0],
            ],
            seed: None,
            maze_dir: None,
            log_level: "info".into(),
        }
    }
}

impl Settings {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads settings from `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        settings.apply_env();
        Ok(settings)
    }

    /// Like [`Settings::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let mut settings = Self::default();
        settings.apply_env();
        Ok(settings)
    }

    /// Applies `GUARDIANES_SEED` and `GUARDIANES_LOG` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. An unparsable seed is ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(ENV_SEED).and_then(|v| v.trim().parse().ok()) {
            self.seed = Some(seed);
        }
        if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    /// Checks the values the generator and the tick loop rely on.
    pub fn validate(&self) -> Result<()> {
        let valid_side = |n: usize| n >= MIN_MAZE_SIZE && n % 2 == 1;
        if !valid_side(self.maze_width) || !valid_side(self.maze_height) {
            return Err(Error::InvalidMazeSize {
                width: self.maze_width,
                height: self.maze_height,
            });
        }

        let positive = [
            ("cell_size", self.cell_size),
            ("wall_height", self.wall_height),
            ("player_size", self.player_size),
            ("speed", self.speed),
            ("viewport", self.viewport.0),
            ("viewport", self.viewport.1),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidSetting {
                    name,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        if !(self.pushback.is_finite() && self.pushback >= 0.0) {
            return Err(Error::InvalidSetting {
                name: "pushback",
                reason: format!("must not be negative, got {}", self.pushback),
            });
        }
        if self.tick_rate == 0 {
            return Err(Error::InvalidSetting {
                name: "tick_rate",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().expect("defaults validate");
        assert_eq!(settings.obstacles.len(), 4);
        assert_eq!(settings.trees.len(), 4);
        assert_eq!(settings.double_tap_window(), Duration::from_millis(300));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"maze_width": 31, "speed": 25.0}"#).expect("parse");
        assert_eq!(settings.maze_width, 31);
        assert_eq!(settings.speed, 25.0);
        assert_eq!(settings.maze_height, 21);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_rejects_even_and_tiny_mazes() {
        for (w, h) in [(20, 21), (21, 4), (3, 3)] {
            let settings = Settings {
                maze_width: w,
                maze_height: h,
                ..Settings::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(Error::InvalidMazeSize { .. })
            ));
        }
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let settings = Settings {
            speed: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidSetting { name: "speed", .. })
        ));

        let settings = Settings::from_json(r#"{"viewport": [800.0, 0.0]}"#).expect("parse");
        assert!(matches!(
            settings.validate(),
            Err(Error::InvalidSetting { name: "viewport", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let mut settings = Settings::default();
        settings.apply_overrides(|key| match key {
            ENV_SEED => Some(" 42 ".into()),
            ENV_LOG => Some("debug".into()),
            _ => None,
        });
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.log_level, "debug");

        settings.apply_overrides(|key| (key == ENV_SEED).then(|| "not-a-number".into()));
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings =
            Settings::load_or_default(Path::new("/definitely/not/here.json")).expect("defaults");
        assert_eq!(settings.maze_width, Settings::default().maze_width);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("guardianes-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"tick_rate": 30, "trees": []}"#).expect("write");
        let settings = Settings::load(&path).expect("load");
        assert_eq!(settings.tick_rate, 30);
        assert!(settings.trees.is_empty());
        assert_eq!(settings.tick_interval(), Duration::from_secs(1) / 30);
        let _ = std::fs::remove_file(&path);
    }
}
