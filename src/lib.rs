//! Guardianes del Agua - movement, collision and maze core.
//!
//! A headless library for a small 3D exploration game. It carves mazes, turns
//! them into collidable worlds, and moves a player through them one tick at a
//! time. A renderer is expected to sit on top and consume player positions,
//! bounds and the follow camera.
//!
//! # Architecture
//! - `maze/`: maze generation, maze files and path finding
//! - `math/`: vectors, matrices and transforms
//! - `game/`: collision, input, motion, world building and the session
//! - `config`, `log`, `error`: settings, logging setup and the error type
//!
//! # Example
//!
//! ```rust
//! use guardianes::config::Settings;
//! use guardianes::game::GameSession;
//! use guardianes::game::record::PlayerRecord;
//! use guardianes::maze::MazeGenerator;
//! use rand::SeedableRng;
//!
//! let settings = Settings { obstacles: Vec::new(), ..Settings::default() };
//! let maze = MazeGenerator::seeded(1).generate(settings.maze_width, settings.maze_height);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut session = GameSession::from_settings(&settings, &maze, &PlayerRecord::default(), &mut rng);
//!
//! session.walk_to(session.world.cell_center(1, 2));
//! let report = session.tick();
//! assert!(report.moved);
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod log;
pub mod math;
pub mod maze;

pub use self::error::{Error, Result};
