//! Maze generation using randomized depth-first passage carving.
//!
//! This module produces "perfect" mazes: every passage cell is reachable from
//! the entrance and there is exactly one simple path between any two passage
//! cells. The grid is stored cell-for-cell (walls are cells too), so a consumer
//! can map each cell straight onto a floor tile or a wall block.
//!
//! # Algorithm
//!
//! 1. Fill the whole grid with walls.
//! 2. Open the entrance `(1, 1)` and start carving there.
//! 3. At each cell, shuffle the four cardinal directions (Fisher–Yates) and try
//!    them in order. A step jumps two cells; if the target lies strictly inside
//!    the border and is still a wall, the target and the wall between are opened
//!    and carving continues from the target.
//! 4. When a cell has no directions left, carving backtracks to the previous cell.
//! 5. Finally the entrance and the exit `(width - 2, height - 2)` are forced open.
//!
//! Carving uses an explicit stack rather than recursion. The visiting order and
//! the sequence of random draws are identical to the recursive formulation.
//!
//! # Examples
//!
//! ```rust
//! use guardianes::maze::generator::MazeGenerator;
//!
//! let maze = MazeGenerator::seeded(7).generate(21, 21);
//! assert!(maze.is_passage(1, 1));
//! assert!(maze.is_passage(19, 19));
//! ```
//!
//! # Dimensions
//!
//! Width and height are expected to be odd and at least 5. Even sizes leave the
//! last interior row/column uncarved; this is the caller's responsibility
//! (see [`crate::config::Settings::validate`]).

use crate::error::{Error, Result};
use chrono::Local;
use rand::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Wall,
    Passage,
}

/// Step-by-two offsets for north, east, south and west.
const DIRECTIONS: [(isize, isize); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

/// A generated maze. Indexed as `(x, y)` with `x < width`, `y < height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl MazeGrid {
    /// Creates a grid with every cell set to wall.
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.tiles[y * self.width + x])
    }

    /// Whether `(x, y)` is an open cell. Out-of-range coordinates are not.
    pub fn is_passage(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Tile::Passage)
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Tile::Wall)
    }

    fn set(&mut self, x: usize, y: usize, tile: Tile) {
        if x < self.width && y < self.height {
            self.tiles[y * self.width + x] = tile;
        }
    }

    /// The entrance cell, `(1, 1)`.
    pub fn entrance(&self) -> (usize, usize) {
        (1, 1)
    }

    /// The exit cell, `(width - 2, height - 2)`.
    pub fn exit(&self) -> (usize, usize) {
        (self.width.saturating_sub(2), self.height.saturating_sub(2))
    }

    /// Number of open cells.
    pub fn passage_count(&self) -> usize {
        self.tiles.iter().filter(|t| **t == Tile::Passage).count()
    }

    /// The grid as `bits[x][y]`, `0` for passage and `1` for wall.
    pub fn to_bits(&self) -> Vec<Vec<u8>> {
        (0..self.width)
            .map(|x| {
                (0..self.height)
                    .map(|y| match self.tiles[y * self.width + x] {
                        Tile::Wall => 1,
                        Tile::Passage => 0,
                    })
                    .collect()
            })
            .collect()
    }

    /// Renders the maze as text, one line per row: `#` for walls, a space for passages.
    ///
    /// # Example Output
    /// ```text
    /// #######
    /// #     #
    /// ### # #
    /// #   # #
    /// #######
    /// ```
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(if self.is_wall(x, y) { '#' } else { ' ' });
            }
            out.push('\n');
        }
        out
    }

    /// Parses the format written by [`MazeGrid::to_text`].
    ///
    /// `#` is a wall and any other character is a passage. Trailing empty lines are
    /// ignored; all remaining lines must have the same length.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let Some(first) = lines.first() else {
            return Err(Error::MazeParse {
                line: 1,
                reason: "empty maze".to_string(),
            });
        };
        let width = first.chars().count();
        let height = lines.len();
        let mut grid = Self::filled(width, height);

        for (y, line) in lines.iter().enumerate() {
            let row: Vec<char> = line.chars().collect();
            if row.len() != width {
                return Err(Error::MazeParse {
                    line: y + 1,
                    reason: format!("expected {} columns, found {}", width, row.len()),
                });
            }
            for (x, c) in row.into_iter().enumerate() {
                if c != '#' {
                    grid.set(x, y, Tile::Passage);
                }
            }
        }

        Ok(grid)
    }

    /// Saves the maze to a timestamped `.mz` file inside `dir`.
    ///
    /// # File Naming
    /// `Maze_MM-DD-YY_HH-MM-SSPM.mz` (e.g., `Maze_06-24-25_11-24-03PM.mz`), using local time.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn save_to_file(&self, dir: &Path) -> Result<PathBuf> {
        let timestamp = Local::now().format("Maze_%m-%d-%y_%I-%M-%S%p.mz").to_string();
        fs::create_dir_all(dir)?;
        let output_path = dir.join(timestamp);
        fs::write(&output_path, self.to_text())?;

        info!(path = %output_path.display(), "maze saved");
        Ok(output_path)
    }
}

/// Maze generator holding its random source.
///
/// The generator is generic over [`Rng`] so tests can inject a seeded source and
/// get reproducible mazes.
pub struct MazeGenerator<R: Rng> {
    rng: R,
}

impl MazeGenerator<ThreadRng> {
    /// Creates a generator backed by the thread-local random source.
    pub fn new() -> Self {
        Self { rng: thread_rng() }
    }
}

impl Default for MazeGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl MazeGenerator<StdRng> {
    /// Creates a reproducible generator from a seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> MazeGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Carves a new maze of `width` × `height` cells.
    ///
    /// Sizes below 3 cannot hold an interior and produce an all-wall grid.
    pub fn generate(&mut self, width: usize, height: usize) -> MazeGrid {
        let mut maze = MazeGrid::filled(width, height);
        if width < 3 || height < 3 {
            warn!(width, height, "maze too small to carve");
            return maze;
        }

        maze.set(1, 1, Tile::Passage);
        self.carve_from(&mut maze, 1, 1);

        let (exit_x, exit_y) = maze.exit();
        maze.set(1, 1, Tile::Passage);
        maze.set(exit_x, exit_y, Tile::Passage);

        debug!(
            width,
            height,
            passages = maze.passage_count(),
            "maze generated"
        );
        maze
    }

    fn carve_from(&mut self, maze: &mut MazeGrid, start_x: usize, start_y: usize) {
        struct Frame {
            x: usize,
            y: usize,
            order: [usize; 4],
            next: usize,
        }

        let mut stack = vec![Frame {
            x: start_x,
            y: start_y,
            order: self.shuffled_directions(),
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.next == DIRECTIONS.len() {
                stack.pop();
                continue;
            }

            let (dx, dy) = DIRECTIONS[frame.order[frame.next]];
            frame.next += 1;

            let (cx, cy) = (frame.x as isize, frame.y as isize);
            let (nx, ny) = (cx + dx, cy + dy);
            let inside = nx > 0
                && nx < maze.width as isize - 1
                && ny > 0
                && ny < maze.height as isize - 1;
            if !inside || !maze.is_wall(nx as usize, ny as usize) {
                continue;
            }

            let (nx, ny) = (nx as usize, ny as usize);
            maze.set(nx, ny, Tile::Passage);
            maze.set(
                (cx + dx / 2) as usize,
                (cy + dy / 2) as usize,
                Tile::Passage,
            );

            let order = self.shuffled_directions();
            stack.push(Frame {
                x: nx,
                y: ny,
                order,
                next: 0,
            });
        }
    }

    /// Uniform Fisher–Yates shuffle of the four direction indices.
    fn shuffled_directions(&mut self) -> [usize; 4] {
        let mut order = [0, 1, 2, 3];
        for i in (1..order.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            order.swap(i, j);
        }
        order
    }
}

/// Convenience wrapper: carves a maze with the thread-local random source.
pub fn generate(width: usize, height: usize) -> MazeGrid {
    MazeGenerator::new().generate(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    fn open_neighbors(maze: &MazeGrid, x: usize, y: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        if x > 0 && maze.is_passage(x - 1, y) {
            out.push((x - 1, y));
        }
        if maze.is_passage(x + 1, y) {
            out.push((x + 1, y));
        }
        if y > 0 && maze.is_passage(x, y - 1) {
            out.push((x, y - 1));
        }
        if maze.is_passage(x, y + 1) {
            out.push((x, y + 1));
        }
        out
    }

    fn reachable_from_entrance(maze: &MazeGrid) -> HashSet<(usize, usize)> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([maze.entrance()]);
        seen.insert(maze.entrance());
        while let Some((x, y)) = queue.pop_front() {
            for next in open_neighbors(maze, x, y) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Counts undirected edges between horizontally/vertically adjacent passages.
    fn passage_edges(maze: &MazeGrid) -> usize {
        let mut edges = 0;
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                if !maze.is_passage(x, y) {
                    continue;
                }
                if maze.is_passage(x + 1, y) {
                    edges += 1;
                }
                if maze.is_passage(x, y + 1) {
                    edges += 1;
                }
            }
        }
        edges
    }

    #[test]
    fn test_maze_is_spanning_tree() {
        for seed in 0..20 {
            for (w, h) in [(5, 5), (7, 9), (21, 21), (31, 15)] {
                let maze = MazeGenerator::seeded(seed).generate(w, h);
                let reachable = reachable_from_entrance(&maze);
                assert_eq!(
                    reachable.len(),
                    maze.passage_count(),
                    "isolated passages for seed {} size {}x{}",
                    seed,
                    w,
                    h
                );
                assert_eq!(
                    passage_edges(&maze),
                    maze.passage_count() - 1,
                    "cycle found for seed {} size {}x{}",
                    seed,
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn test_every_odd_cell_is_carved() {
        let maze = MazeGenerator::seeded(3).generate(15, 11);
        for y in (1..10).step_by(2) {
            for x in (1..14).step_by(2) {
                assert!(maze.is_passage(x, y), "({}, {}) not carved", x, y);
            }
        }
    }

    #[test]
    fn test_boundary_invariant() {
        for seed in 0..10 {
            let maze = MazeGenerator::seeded(seed).generate(11, 13);
            assert!(maze.is_passage(1, 1));
            assert!(maze.is_passage(9, 11));
            for x in 0..11 {
                assert!(maze.is_wall(x, 0));
                assert!(maze.is_wall(x, 12));
            }
            for y in 0..13 {
                assert!(maze.is_wall(0, y));
                assert!(maze.is_wall(10, y));
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = MazeGenerator::seeded(42).generate(21, 21);
        let b = MazeGenerator::seeded(42).generate(21, 21);
        assert_eq!(a, b);
    }

    #[test]
    fn test_exit_forced_open_on_even_size() {
        let maze = MazeGenerator::seeded(1).generate(8, 8);
        assert!(maze.is_passage(1, 1));
        assert!(maze.is_passage(6, 6));
    }

    #[test]
    fn test_tiny_maze_is_all_wall() {
        let maze = MazeGenerator::seeded(1).generate(2, 2);
        assert_eq!(maze.passage_count(), 0);
    }

    #[test]
    fn test_bits_match_tiles() {
        let maze = MazeGenerator::seeded(9).generate(7, 7);
        let bits = maze.to_bits();
        assert_eq!(bits.len(), 7);
        assert_eq!(bits[1][1], 0);
        assert_eq!(bits[0][0], 1);
        for x in 0..7 {
            for y in 0..7 {
                assert_eq!(bits[x][y] == 0, maze.is_passage(x, y));
            }
        }
    }

    #[test]
    fn test_text_parses_back() {
        let maze = MazeGenerator::seeded(5).generate(9, 7);
        let parsed = MazeGrid::parse(&maze.to_text()).expect("parse");
        assert_eq!(parsed, maze);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = MazeGrid::parse("###\n# \n###\n").unwrap_err();
        assert!(matches!(err, Error::MazeParse { line: 2, .. }));
    }

    #[test]
    fn test_save_to_file_writes_text() {
        let dir = std::env::temp_dir().join(format!("guardianes-maze-{}", std::process::id()));
        let maze = MazeGenerator::seeded(2).generate(7, 7);
        let path = maze.save_to_file(&dir).expect("save");
        let text = fs::read_to_string(&path).expect("read");
        assert_eq!(text, maze.to_text());
        let _ = fs::remove_dir_all(&dir);
    }
}
