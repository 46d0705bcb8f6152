//! World construction: maze walls, trees and the spawn point.
//!
//! A [`World`] owns the [`CollisionSet`] for a session. It is built once from a
//! [`MazeGrid`] and grows afterwards only when obstacle models finish loading.
//!
//! The maze is laid out on the XZ plane centered on the origin. Cell `(x, y)`
//! covers `cell_size` units along X and Z, with grid row `y` mapping to world Z.
//! Every wall cell gets its own box: pushback picks its axis from the offset
//! between box centers and assumes obstacles about one cell across.

use crate::game::collision::{
    Aabb, CollisionSet, ObstacleId, ObstacleKind, PlacedBox, compute_bounds,
};
use crate::math::{Transform, Vec3};
use crate::maze::MazeGrid;
use rand::Rng;
use tracing::{debug, info};

/// Reference size trees are modelled around (the default character size).
const TREE_BASE: f32 = 50.0;

/// Range of the random uniform scale applied to each tree.
const TREE_SCALE: std::ops::Range<f32> = 0.8..3.8;

/// The static world a session plays in.
#[derive(Debug, Clone)]
pub struct World {
    obstacles: CollisionSet,
    cell_size: f32,
    wall_height: f32,
    /// World X/Z of the grid's `(0, 0)` corner.
    origin: (f32, f32),
    columns: usize,
    rows: usize,
    spawn: Vec3,
    exit: Vec3,
}

impl Default for World {
    fn default() -> Self {
        Self::empty()
    }
}

impl World {
    /// An open field with no obstacles and spawn at the origin.
    pub fn empty() -> Self {
        Self {
            obstacles: CollisionSet::new(),
            cell_size: 0.0,
            wall_height: 0.0,
            origin: (0.0, 0.0),
            columns: 0,
            rows: 0,
            spawn: Vec3::ZERO,
            exit: Vec3::ZERO,
        }
    }

    /// Builds the wall obstacles for `maze`.
    pub fn from_maze(maze: &MazeGrid, cell_size: f32, wall_height: f32) -> Self {
        let origin = (
            -(maze.width() as f32 * cell_size) / 2.0,
            -(maze.height() as f32 * cell_size) / 2.0,
        );

        let mut world = Self {
            obstacles: CollisionSet::new(),
            cell_size,
            wall_height,
            origin,
            columns: maze.width(),
            rows: maze.height(),
            spawn: Vec3::ZERO,
            exit: Vec3::ZERO,
        };

        for y in 0..maze.height() {
            for x in 0..maze.width() {
                if maze.is_wall(x, y) {
                    let bounds = world.wall_bounds(x, y);
                    world.obstacles.push(ObstacleKind::Wall, bounds);
                }
            }
        }

        let (sx, sy) = maze.entrance();
        let (ex, ey) = maze.exit();
        world.spawn = world.cell_center(sx, sy);
        world.exit = world.cell_center(ex, ey);

        info!(
            width = maze.width(),
            height = maze.height(),
            walls = world.obstacles.len(),
            spawn = ?world.spawn,
            "world built from maze"
        );
        world
    }

    /// Box filling grid cell `(x, y)` up to the wall height.
    pub fn wall_bounds(&self, x: usize, y: usize) -> Aabb {
        let (ox, oz) = self.origin;
        let c = self.cell_size;
        Aabb::new(
            Vec3::new(ox + x as f32 * c, 0.0, oz + y as f32 * c),
            Vec3::new(ox + (x + 1) as f32 * c, self.wall_height, oz + (y + 1) as f32 * c),
        )
    }

    /// Ground-level center of grid cell `(x, y)`.
    pub fn cell_center(&self, x: usize, y: usize) -> Vec3 {
        let (ox, oz) = self.origin;
        Vec3::new(
            ox + (x as f32 + 0.5) * self.cell_size,
            0.0,
            oz + (y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Grid cell under a world position, if it lies on the maze.
    pub fn cell_at(&self, position: Vec3) -> Option<(usize, usize)> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let (ox, oz) = self.origin;
        let fx = ((position.x() - ox) / self.cell_size).floor();
        let fz = ((position.z() - oz) / self.cell_size).floor();
        if fx < 0.0 || fz < 0.0 {
            return None;
        }
        let (x, y) = (fx as usize, fz as usize);
        (x < self.columns && y < self.rows).then_some((x, y))
    }

    /// Adds a tree trunk at ground position `(x, z)` with a random scale.
    ///
    /// Only the trunk collides; the crown sits above the character.
    pub fn add_tree<R: Rng>(&mut self, x: f32, z: f32, rng: &mut R) -> ObstacleId {
        let scale = rng.gen_range(TREE_SCALE);
        let radius = TREE_BASE / 2.5;
        let height = TREE_BASE * 1.3;

        let trunk = PlacedBox::new(
            Aabb::new(
                Vec3::new(-radius, -height / 2.0, -radius),
                Vec3::new(radius, height / 2.0, radius),
            ),
            Transform::from_translation(Vec3::new(x, height * scale / 2.0, z))
                .with_uniform_scale(scale),
        );
        let bounds = compute_bounds(&trunk);
        debug!(x, z, scale, "tree placed");
        self.obstacles.push(ObstacleKind::Tree, bounds)
    }

    /// Registers an arbitrary obstacle.
    pub fn add_obstacle(&mut self, kind: ObstacleKind, bounds: Aabb) -> ObstacleId {
        self.obstacles.push(kind, bounds)
    }

    pub fn obstacles(&self) -> &CollisionSet {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut CollisionSet {
        &mut self.obstacles
    }

    /// Where the player starts: the center of the maze entrance.
    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }

    /// Center of the maze exit cell.
    pub fn exit(&self) -> Vec3 {
        self.exit
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn wall_height(&self) -> f32 {
        self.wall_height
    }
}
