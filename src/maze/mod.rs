//! Maze generation and maze file handling.
//!
//! The generator lives in [`generator`]; this module adds reading saved mazes
//! back from disk so a world can be rebuilt from a known layout.

pub mod generator;

pub use self::generator::{MazeGenerator, MazeGrid, Tile};

use crate::error::Result;
use std::collections::VecDeque;
use std::path::Path;

/// Reads a maze file written by [`MazeGrid::save_to_file`].
///
/// Each line of the file is one row of the grid. `#` becomes a wall; any other
/// character is a passage.
///
/// # Example
/// ```text
/// #####
/// #   #
/// # ###
/// #   #
/// #####
/// ```
pub fn parse_maze_file(path: &Path) -> Result<MazeGrid> {
    let text = std::fs::read_to_string(path)?;
    MazeGrid::parse(&text)
}

/// Shortest passage-only route from `from` to `to`, both ends included.
///
/// Breadth-first search over the four orthogonal neighbors. Returns `None` when
/// either end is a wall or the two are not connected. In a perfect maze the
/// route is also the only simple one.
pub fn shortest_path(
    maze: &MazeGrid,
    from: (usize, usize),
    to: (usize, usize),
) -> Option<Vec<(usize, usize)>> {
    if !maze.is_passage(from.0, from.1) || !maze.is_passage(to.0, to.1) {
        return None;
    }

    let (w, h) = (maze.width(), maze.height());
    let mut prev: Vec<Option<(usize, usize)>> = vec![None; w * h];
    prev[from.1 * w + from.0] = Some(from);

    let mut queue = VecDeque::from([from]);
    while let Some((cx, cy)) = queue.pop_front() {
        if (cx, cy) == to {
            break;
        }
        let neighbors = [
            (cx.wrapping_sub(1), cy),
            (cx + 1, cy),
            (cx, cy.wrapping_sub(1)),
            (cx, cy + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= w || ny >= h || prev[ny * w + nx].is_some() || !maze.is_passage(nx, ny) {
                continue;
            }
            prev[ny * w + nx] = Some((cx, cy));
            queue.push_back((nx, ny));
        }
    }

    prev[to.1 * w + to.0]?;
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        current = prev[current.1 * w + current.0]?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_maze_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("guardianes-parse-{}", std::process::id()));
        let maze = MazeGenerator::seeded(11).generate(11, 11);
        let path = maze.save_to_file(&dir).expect("save");

        let loaded = parse_maze_file(&path).expect("load");
        assert_eq!(loaded, maze);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_shortest_path_entrance_to_exit() {
        let maze = MazeGenerator::seeded(21).generate(15, 15);
        let path = shortest_path(&maze, maze.entrance(), maze.exit()).expect("connected");

        assert_eq!(path.first(), Some(&maze.entrance()));
        assert_eq!(path.last(), Some(&maze.exit()));
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1), 1);
            assert!(maze.is_passage(b.0, b.1));
        }
    }

    #[test]
    fn test_shortest_path_edge_cases() {
        let maze = MazeGrid::parse("#####\n#   #\n# ###\n#   #\n#####\n").expect("parse");
        assert_eq!(shortest_path(&maze, (1, 1), (1, 1)), Some(vec![(1, 1)]));
        assert_eq!(
            shortest_path(&maze, (3, 1), (3, 3)),
            Some(vec![(3, 1), (2, 1), (1, 1), (1, 2), (1, 3), (2, 3), (3, 3)])
        );
        assert_eq!(shortest_path(&maze, (1, 1), (0, 0)), None);
    }

    #[test]
    fn test_parse_maze_file_missing() {
        let err = parse_maze_file(Path::new("/definitely/not/here.mz")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
