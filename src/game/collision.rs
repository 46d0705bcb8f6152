//! Axis-aligned bounding volumes and broad-phase collision detection.
//!
//! # Overview
//!
//! This module implements the coarse collision layer of the game: every solid
//! thing in the world (maze walls, tree trunks, loaded obstacle models) is
//! represented by an [`Aabb`] in world space, and the player's box is tested
//! against all of them once per tick.
//!
//! # Core Components
//!
//! * [`Aabb`] - Axis-Aligned Bounding Box, the only collision primitive
//! * [`Placed`] - Anything with local geometry and a world matrix; see [`compute_bounds`]
//! * [`Obstacle`] - A registered box plus its identity and kind
//! * [`CollisionSet`] - The ordered set of obstacles for a world
//! * [`detect_collisions`] - The overlap scan
//!
//! # Detection vs. Response
//!
//! Detection never changes state. [`detect_collisions`] reports every overlapping
//! obstacle through a callback, and the caller decides what to do about it. The
//! motion controller uses this to apply one pushback per obstacle within a tick.
//!
//! # Performance Considerations
//!
//! The scan is linear in the number of obstacles. Worlds here hold a few hundred
//! boxes at most, so no spatial partitioning is used.

use crate::math::{Mat4, Transform, Vec3};
use std::fmt;

/// Axis-Aligned Bounding Box (AABB) in world space.
///
/// A closed box whose faces are aligned with the world axes, defined by its
/// minimum and maximum corners. It is a value snapshot: when the object it
/// describes moves, a new box is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from two corners, ordering each axis so that `min <= max`.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Box of the given size centered on `center`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// Smallest box containing every point. Returns `None` for an empty input.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(&p), max.max(&p)));
        Some(Self { min, max })
    }

    /// Checks if this box overlaps another.
    ///
    /// Uses closed intervals on all three axes: boxes that only share a face,
    /// an edge or a corner still overlap. The test is symmetric.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x() <= other.max.x()
            && self.max.x() >= other.min.x()
            && self.min.y() <= other.max.y()
            && self.max.y() >= other.min.y()
            && self.min.z() <= other.max.z()
            && self.max.z() >= other.min.z()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// The eight corners, in no particular order.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x(), lo.y(), lo.z()),
            Vec3::new(hi.x(), lo.y(), lo.z()),
            Vec3::new(lo.x(), hi.y(), lo.z()),
            Vec3::new(hi.x(), hi.y(), lo.z()),
            Vec3::new(lo.x(), lo.y(), hi.z()),
            Vec3::new(hi.x(), lo.y(), hi.z()),
            Vec3::new(lo.x(), hi.y(), hi.z()),
            Vec3::new(hi.x(), hi.y(), hi.z()),
        ]
    }

    /// World box enclosing this (local) box after applying `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let corners = self.corners().map(|c| matrix.transform_point(c));
        Self::from_points(corners).unwrap_or(*self)
    }
}

/// An object with model-space geometry placed in the world.
///
/// Implementors describe their local extent and how it is placed; the world
/// box is always derived after the full transform, so scale, rotation and any
/// parent transforms are accounted for.
pub trait Placed {
    /// Geometry extent in model space.
    fn local_extent(&self) -> Aabb;

    /// Model-to-world matrix, already composed with any parents.
    fn world_matrix(&self) -> Mat4;
}

/// Computes the world-space bounds of a placed object.
pub fn compute_bounds<P: Placed + ?Sized>(object: &P) -> Aabb {
    object.local_extent().transformed(&object.world_matrix())
}

/// A box-shaped piece of geometry under a local transform and an optional parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBox {
    pub extent: Aabb,
    pub transform: Transform,
    pub parent: Mat4,
}

impl PlacedBox {
    pub fn new(extent: Aabb, transform: Transform) -> Self {
        Self {
            extent,
            transform,
            parent: Mat4::identity(),
        }
    }

    pub fn with_parent(mut self, parent: Mat4) -> Self {
        self.parent = parent;
        self
    }
}

impl Placed for PlacedBox {
    fn local_extent(&self) -> Aabb {
        self.extent
    }

    fn world_matrix(&self) -> Mat4 {
        self.transform.compose(&self.parent)
    }
}

/// Stable handle for an obstacle in a [`CollisionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(u32);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an obstacle stands for. Only used for logging and removal decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObstacleKind {
    Wall,
    Tree,
    Platform,
    /// A loaded obstacle model, with its descriptor name.
    Model(String),
}

/// A registered collision box.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

/// The ordered set of static obstacles of a world.
///
/// Obstacles are appended while the world is built and when asynchronous loads
/// complete. They only leave the set through [`CollisionSet::remove`]; detection
/// never mutates it.
#[derive(Debug, Default, Clone)]
pub struct CollisionSet {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl CollisionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an obstacle and returns its handle.
    pub fn push(&mut self, kind: ObstacleKind, bounds: Aabb) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        self.obstacles.push(Obstacle { id, kind, bounds });
        id
    }

    /// Removes an obstacle, keeping the order of the rest.
    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(index))
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Runs [`detect_collisions`] over this set.
    pub fn detect<'a, F>(&'a self, moving: &Aabb, on_collision: F) -> usize
    where
        F: FnMut(&'a Obstacle),
    {
        detect_collisions(moving, &self.obstacles, on_collision)
    }
}

impl<'a> IntoIterator for &'a CollisionSet {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.obstacles.iter()
    }
}

/// Tests `moving` against every obstacle and calls `on_collision` for each overlap.
///
/// Obstacles are visited in sequence order and every overlap is reported, not
/// just the first. Returns the number of overlaps. An empty sequence is a no-op.
pub fn detect_collisions<'a, I, F>(moving: &Aabb, obstacles: I, mut on_collision: F) -> usize
where
    I: IntoIterator<Item = &'a Obstacle>,
    F: FnMut(&'a Obstacle),
{
    let mut hits = 0;
    for obstacle in obstacles {
        if moving.overlaps(&obstacle.bounds) {
            hits += 1;
            on_collision(obstacle);
        }
    }
    hits
}
