//! Guardianes del Agua - headless demo driver.
//!
//! Loads settings, generates a maze, builds the world and walks the player from
//! the entrance to the exit along the maze's solution, one tick at a time. The
//! walk is driven exactly like a player would drive it: by queueing destination
//! intents whenever the player stands idle.
//!
//! # Usage
//! ```text
//! guardianes [CONFIG.json] [PLAYER.json]
//! ```
//! Without arguments, `guardianes.json` is used if present, otherwise defaults.
//! `GUARDIANES_SEED`, `GUARDIANES_LOG` and `RUST_LOG` are honored. Ctrl-C stops
//! the walk between ticks.

use guardianes::config::Settings;
use guardianes::game::GameSession;
use guardianes::game::record::PlayerRecord;
use guardianes::math::Vec3;
use guardianes::maze::{self, MazeGenerator};
use guardianes::{Result, log};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

const DEFAULT_CONFIG: &str = "guardianes.json";

/// Consecutive colliding ticks after which the walk counts as blocked.
const STUCK_TICKS: u32 = 300;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CONFIG.into()));
    let record_path = args.next().map(PathBuf::from);

    let settings = Settings::load_or_default(&config_path)?;
    log::init_logging(&settings.log_level);
    if !config_path.exists() {
        info!(path = %config_path.display(), "no config file, using defaults");
    }
    settings.validate()?;

    let record = match &record_path {
        Some(path) => PlayerRecord::load(path)?,
        None => PlayerRecord::default(),
    };

    let seed = settings.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        width = settings.maze_width,
        height = settings.maze_height,
        "generating maze"
    );
    let maze = MazeGenerator::seeded(seed).generate(settings.maze_width, settings.maze_height);
    if let Some(dir) = &settings.maze_dir {
        maze.save_to_file(dir)?;
    }

    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut session = GameSession::from_settings(&settings, &maze, &record, &mut rng);

    let start = session
        .world
        .cell_at(session.player_position())
        .unwrap_or_else(|| maze.entrance());
    let mut route: VecDeque<Vec3> = maze::shortest_path(&maze, start, maze.exit())
        .unwrap_or_default()
        .into_iter()
        .map(|(x, y)| session.world.cell_center(x, y))
        .collect();
    info!(waypoints = route.len(), "route planned");

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))?;

    let interval = settings.tick_interval();
    let started = Instant::now();
    let mut collisions = 0;
    let mut colliding_ticks = 0;

    while running.load(Ordering::SeqCst)
        && !session.exit_reached
        && session.tick_count < settings.max_ticks
    {
        let frame = Instant::now();

        if session.player.is_idle() {
            while route.front() == Some(&session.player_position()) {
                route.pop_front();
            }
            match route.front() {
                Some(&next) => session.walk_to(next),
                None => {
                    warn!(position = ?session.player_position(), "no route left to the exit");
                    break;
                }
            }
        }

        let report = session.tick();
        collisions += report.collisions.len();
        if report.collisions.is_empty() {
            colliding_ticks = 0;
        } else {
            colliding_ticks += 1;
            if colliding_ticks >= STUCK_TICKS {
                warn!(
                    position = ?session.player_position(),
                    next = ?route.front(),
                    "route blocked by an obstacle"
                );
                break;
            }
        }

        if session.tick_count % u64::from(settings.tick_rate) == 0 {
            info!(
                tick = session.tick_count,
                position = ?session.player_position(),
                remaining = route.len(),
                obstacles = session.world.obstacles().len(),
                "progress"
            );
        }

        if let Some(rest) = interval.checked_sub(frame.elapsed()) {
            thread::sleep(rest);
        }
    }

    let elapsed = started.elapsed();
    if session.exit_reached {
        info!(
            ticks = session.tick_count,
            collisions,
            seconds = elapsed.as_secs_f32(),
            "maze solved"
        );
    } else if !running.load(Ordering::SeqCst) {
        info!(ticks = session.tick_count, "interrupted");
    } else {
        warn!(
            ticks = session.tick_count,
            collisions,
            position = ?session.player_position(),
            "stopped before reaching the exit"
        );
    }
    Ok(())
}
