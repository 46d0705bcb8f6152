//! Game session management.
//!
//! This module defines [`GameSession`], the single owner of all mutable game
//! state: the player, the intent mailbox, the world and its obstacles, and the
//! pending obstacle loads. Host input handlers call into the session to queue
//! intents; the host loop calls [`GameSession::tick`] once per frame. Nothing
//! else moves the player.

pub mod assets;
pub mod collision;
pub mod input;
pub mod keys;
pub mod motion;
pub mod player;
pub mod record;
pub mod world;

use self::assets::ObstacleLoader;
use self::collision::Placed;
use self::input::{Camera, IntentEvent, IntentMailbox, PointerInput};
use self::keys::KeyState;
use self::motion::{MotionController, TickReport};
use self::player::PlayerState;
use self::record::PlayerRecord;
use self::world::World;
use crate::config::Settings;
use crate::math::{Transform, Vec3};
use crate::maze::MazeGrid;
use rand::Rng;
use std::time::Instant;
use tracing::{info, warn};
use winit::event::{ElementState, MouseButton};
use winit::keyboard;

/// Camera mount relative to the character's body: above and behind it.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 200.0, -300.0);

/// Vertical field of view of the follow camera, in degrees.
pub const CAMERA_FOV: f32 = 50.0;

/// Everything one play-through needs.
#[derive(Debug)]
pub struct GameSession {
    pub player: PlayerState,
    pub mailbox: IntentMailbox,
    pub controller: MotionController,
    pub world: World,
    pub loader: ObstacleLoader,
    pub pointer: PointerInput,
    pub keys: KeyState,
    /// Follow camera, refreshed after every tick.
    pub camera: Camera,
    /// Viewport size in pixels, used for pointer ray casts.
    pub viewport: (f32, f32),
    /// Ticks run so far.
    pub tick_count: u64,
    /// Whether the player has reached the maze exit.
    pub exit_reached: bool,
}

impl GameSession {
    /// Creates a session around an already built world, for a host window of
    /// `viewport` pixels.
    pub fn new(
        world: World,
        player: PlayerState,
        loader: ObstacleLoader,
        viewport: (f32, f32),
    ) -> Self {
        let camera = follow_camera(&player, viewport.0 / viewport.1);
        Self {
            player,
            mailbox: IntentMailbox::new(),
            controller: MotionController::default(),
            world,
            loader,
            pointer: PointerInput::default(),
            keys: KeyState::new(),
            camera,
            viewport,
            tick_count: 0,
            exit_reached: false,
        }
    }

    /// Builds the world for `maze`, places trees, starts obstacle loads and
    /// spawns the player at the saved position or the maze entrance.
    pub fn from_settings<R: Rng>(
        settings: &Settings,
        maze: &MazeGrid,
        record: &PlayerRecord,
        rng: &mut R,
    ) -> Self {
        let mut world = World::from_maze(maze, settings.cell_size, settings.wall_height);
        let player = PlayerState::new(record.spawn_or(world.spawn()))
            .with_speed(settings.speed)
            .with_size(settings.player_size);

        // A tree grown over the spawn point would trap the player from the start.
        let spawn_bounds = player.bounds();
        for &[x, z] in &settings.trees {
            let id = world.add_tree(x, z, rng);
            let blocks_spawn = world
                .obstacles()
                .get(id)
                .is_some_and(|tree| tree.bounds.overlaps(&spawn_bounds));
            if blocks_spawn {
                world.obstacles_mut().remove(id);
                warn!(x, z, "tree overlaps the spawn point, skipped");
            }
        }

        let mut loader = ObstacleLoader::new(&settings.asset_dir);
        loader.request_all(settings.obstacles.iter().cloned());

        info!(
            player = %record.name,
            level = record.level,
            spawn = ?player.position,
            pending_obstacles = loader.in_flight(),
            "session started"
        );

        let mut session = Self::new(world, player, loader, settings.viewport);
        session.controller = MotionController::new(settings.pushback);
        session.pointer = PointerInput::new(settings.double_tap_window());
        session
    }

    /// Advances the game by one tick.
    ///
    /// Finished obstacle loads are registered first, so they take part in this
    /// tick's collision scan.
    pub fn tick(&mut self) -> TickReport {
        self.loader.poll(self.world.obstacles_mut());

        let report = self
            .controller
            .tick(&mut self.player, &mut self.mailbox, self.world.obstacles());
        self.tick_count += 1;

        if !self.exit_reached && self.at_exit() {
            self.exit_reached = true;
            info!(ticks = self.tick_count, "exit reached");
        }

        self.camera = follow_camera(&self.player, self.camera.aspect);
        report
    }

    fn at_exit(&self) -> bool {
        let cell_size = self.world.cell_size();
        cell_size > 0.0 && self.player.position.distance(&self.world.exit()) < cell_size / 2.0
    }

    pub fn player_position(&self) -> Vec3 {
        self.player.position
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = (width, height);
            self.camera.aspect = width / height;
        }
    }

    /// Queues a walk to `target`, replacing any previous intent.
    pub fn walk_to(&mut self, target: Vec3) {
        self.mailbox.push(IntentEvent::Stop);
        self.mailbox.push(IntentEvent::MoveTo(target));
    }

    /// Cancels any pending destination.
    pub fn stop_movement(&mut self) {
        self.mailbox.push(IntentEvent::Stop);
    }

    /// Keyboard handler. Returns `true` if the key was a movement key.
    pub fn handle_key(&mut self, key: &keyboard::Key, state: ElementState) -> bool {
        self.keys.handle_key(key, state, &mut self.mailbox)
    }

    /// Mouse press handler. Returns the picked destination, if any.
    pub fn mouse_down(&mut self, button: MouseButton, x: f32, y: f32) -> Option<Vec3> {
        self.pointer
            .mouse_down(button, (x, y), self.viewport, &self.camera, &mut self.mailbox)
    }

    /// Touch start handler. Returns the picked destination on a double tap.
    pub fn touch_start(&mut self, x: f32, y: f32, now: Instant) -> Option<Vec3> {
        self.pointer
            .touch_start((x, y), self.viewport, &self.camera, now, &mut self.mailbox)
    }
}

/// Camera riding on the character: mounted at [`CAMERA_OFFSET`] in the body's
/// frame and looking at the body's center.
pub fn follow_camera(player: &PlayerState, aspect: f32) -> Camera {
    let mount = Transform::from_translation(CAMERA_OFFSET).compose(&player.world_matrix());
    let position = mount.transform_point(Vec3::ZERO);
    Camera::new(position, player.bounds().center(), CAMERA_FOV, aspect)
}
