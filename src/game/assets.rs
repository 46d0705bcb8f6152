//! Obstacle model loading.
//!
//! Obstacle models are described by small JSON files giving their model-space
//! extent:
//!
//! ```json
//! { "name": "spikeball", "min": [-0.5, 0.0, -0.5], "max": [0.5, 1.0, 0.5] }
//! ```
//!
//! An [`ObstaclePlacement`] puts a model in the world with a position and a
//! per-axis scale. Loading happens on worker threads so the tick loop never
//! waits on the filesystem. Finished loads are queued on a channel and only
//! become obstacles when [`ObstacleLoader::poll`] runs on the tick loop; until
//! then the model does not exist for collision purposes. A failed load is logged
//! and dropped for good.

use crate::error::{Error, Result};
use crate::game::collision::{Aabb, CollisionSet, ObstacleId, ObstacleKind, PlacedBox, compute_bounds};
use crate::math::{Transform, Vec3};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use tracing::{error, info, warn};

/// Model-space extent of an obstacle model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl ModelDescriptor {
    pub fn extent(&self) -> Aabb {
        Aabb::new(Vec3::from(self.min), Vec3::from(self.max))
    }
}

/// Where and how large a model appears in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    /// Descriptor path, relative to the loader's base directory unless absolute.
    pub file: PathBuf,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl ObstaclePlacement {
    pub fn new(file: impl Into<PathBuf>, position: [f32; 3], scale: [f32; 3]) -> Self {
        Self {
            file: file.into(),
            position,
            scale,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(Vec3::from(self.position)).with_scale(Vec3::from(self.scale))
    }

    /// World bounds of `model` under this placement.
    pub fn bounds(&self, model: &ModelDescriptor) -> Aabb {
        compute_bounds(&PlacedBox::new(model.extent(), self.transform()))
    }

    /// The stock obstacle course along +Z.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("obstacle.json", [0.0, 0.0, 350.0], [100.0, 100.0, 100.0]),
            Self::new("axe_obstacle.json", [0.0, 0.0, 750.0], [0.3, 0.3, 0.3]),
            Self::new("spikeball_obstacle.json", [0.0, 0.0, 200.0], [50.0, 50.0, 50.0]),
            Self::new("plate_obstacle.json", [0.0, 0.0, 500.0], [0.5, 0.5, 0.5]),
        ]
    }
}

/// Reads and validates a model descriptor.
pub fn load_descriptor(path: &Path) -> Result<ModelDescriptor> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::AssetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let descriptor: ModelDescriptor = serde_json::from_str(&text)?;

    let inverted = (0..3).any(|i| descriptor.min[i] > descriptor.max[i]);
    let non_finite = descriptor
        .min
        .iter()
        .chain(&descriptor.max)
        .any(|v| !v.is_finite());
    if inverted || non_finite {
        return Err(Error::AssetLoad {
            path: path.to_path_buf(),
            reason: "extent min must be finite and not exceed max".into(),
        });
    }
    Ok(descriptor)
}

/// A finished load, successful or not.
#[derive(Debug)]
pub struct LoadOutcome {
    pub placement: ObstaclePlacement,
    pub result: Result<ModelDescriptor>,
}

/// Loads obstacle descriptors off the tick loop.
#[derive(Debug)]
pub struct ObstacleLoader {
    base_dir: PathBuf,
    sender: Sender<LoadOutcome>,
    receiver: Receiver<LoadOutcome>,
    in_flight: usize,
}

impl ObstacleLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            base_dir: base_dir.into(),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Number of requested loads not yet collected by [`ObstacleLoader::poll`].
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Starts loading `placement` on a worker thread.
    pub fn request(&mut self, placement: ObstaclePlacement) -> Result<()> {
        let path = self.base_dir.join(&placement.file);
        let sender = self.sender.clone();

        thread::Builder::new()
            .name("obstacle-loader".into())
            .spawn(move || {
                let result = load_descriptor(&path);
                // The receiver lives as long as the loader; a send error only
                // means the session is gone and nobody wants the result.
                let _ = sender.send(LoadOutcome { placement, result });
            })?;

        self.in_flight += 1;
        Ok(())
    }

    /// Requests every placement, logging (and skipping) any that cannot start.
    pub fn request_all<I: IntoIterator<Item = ObstaclePlacement>>(&mut self, placements: I) {
        for placement in placements {
            let file = placement.file.clone();
            if let Err(e) = self.request(placement) {
                warn!(file = %file.display(), error = %e, "could not start obstacle load");
            }
        }
    }

    /// Registers every load that has finished since the last poll.
    ///
    /// Never blocks. Returns the ids of the obstacles added.
    pub fn poll(&mut self, obstacles: &mut CollisionSet) -> Vec<ObstacleId> {
        let mut added = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(outcome) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    if let Some(id) = Self::register(outcome, obstacles) {
                        added.push(id);
                    }
                }
                Err(TryRecvError::Empty) => break,
                // The loader holds a sender itself, so this cannot happen.
                Err(TryRecvError::Disconnected) => break,
            }
        }
        added
    }

    fn register(outcome: LoadOutcome, obstacles: &mut CollisionSet) -> Option<ObstacleId> {
        let LoadOutcome { placement, result } = outcome;
        match result {
            Ok(model) => {
                let bounds = placement.bounds(&model);
                let id = obstacles.push(ObstacleKind::Model(model.name.clone()), bounds);
                info!(
                    obstacle = %id,
                    model = %model.name,
                    min = ?bounds.min,
                    max = ?bounds.max,
                    "obstacle loaded"
                );
                Some(id)
            }
            Err(e) => {
                error!(file = %placement.file.display(), error = %e, "failed to load obstacle");
                None
            }
        }
    }
}
