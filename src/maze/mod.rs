// Copyright 2025 Chisomo Makombo Sakala
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Grid model shared by the generator and the search algorithms.
//!
//! A maze of `n × m` rooms is laid out on a `(2n + 1) × (2m + 1)` lattice of
//! [`Cell`]s. Rooms sit at odd coordinates, the cells between two rooms are
//! passages (open) or wall segments, and every even/even cell is a post.

mod generator;
mod union_find;

use serde::Serialize;
use std::fmt;

pub use generator::Carver;
pub use generator::GeneratorOptions;
pub use generator::MAX_ROOMS;
pub use generator::generate;
pub use generator::get_rng;

/// `(row, column)` position of a cell inside its grid.
pub type Coord = (usize, usize);

/// Maze category benchmarked as a separate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Topology {
  /// Exactly one route between start and end.
  SingleRoute,
  /// At least two routes between start and end.
  MultiRoute,
}

impl Topology {
  /// Both classes in the order a run processes them.
  pub const ALL: [Topology; 2] = [Topology::SingleRoute, Topology::MultiRoute];

  pub fn is_single_route(self) -> bool {
    matches!(self, Topology::SingleRoute)
  }
}

impl fmt::Display for Topology {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Topology::SingleRoute => write!(f, "a single path"),
      Topology::MultiRoute => write!(f, "multiple paths"),
    }
  }
}

/// One lattice position with its wall state and per-search scratch fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
  pub is_wall: bool,
  pub is_start: bool,
  pub is_end: bool,
  /// Hops from the start, or [`Cell::UNREACHED`].
  pub distance: u32,
  pub visited: bool,
  /// Predecessor on the search tree. Assigned at most once per search.
  pub previous: Option<Coord>,
  pub visit_count: u32,
}

impl Cell {
  /// Marker left on every cell a search did not reach.
  pub const UNREACHED: u32 = u32::MAX;

  fn new(is_wall: bool) -> Self {
    Cell {
      is_wall,
      is_start: false,
      is_end: false,
      distance: Cell::UNREACHED,
      visited: false,
      previous: None,
      visit_count: 0,
    }
  }
}

/// Wall topology produced by the generator. Cheap to instantiate into
/// independent [`Grid`]s, one per algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
  rows: usize,
  cols: usize,
  walls: Vec<bool>,
  start: Coord,
  end: Coord,
}

impl Layout {
  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn start(&self) -> Coord {
    self.start
  }

  pub fn end(&self) -> Coord {
    self.end
  }

  pub fn is_wall(&self, (row, col): Coord) -> bool {
    self.walls[row * self.cols + col]
  }

  /// Row-major wall flags.
  pub fn walls(&self) -> &[bool] {
    &self.walls
  }

  /// Builds a fresh grid with untouched scratch fields.
  pub fn instantiate(&self) -> Grid {
    let mut cells: Vec<Cell> = self.walls.iter().map(|&w| Cell::new(w)).collect();
    cells[self.start.0 * self.cols + self.start.1].is_start = true;
    cells[self.end.0 * self.cols + self.end.1].is_end = true;
    Grid {
      rows: self.rows,
      cols: self.cols,
      cells,
      start: self.start,
      end: self.end,
    }
  }
}

/// A rectangular maze owned by exactly one search invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
  rows: usize,
  cols: usize,
  cells: Vec<Cell>,
  start: Coord,
  end: Coord,
}

impl Grid {
  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  pub fn start(&self) -> Coord {
    self.start
  }

  pub fn end(&self) -> Coord {
    self.end
  }

  /// Total number of cells, walls included.
  pub fn len(&self) -> usize {
    self.cells.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cells.is_empty()
  }

  pub fn wall_count(&self) -> usize {
    self.cells.iter().filter(|c| c.is_wall).count()
  }

  /// Number of cells a search could possibly visit.
  pub fn open_count(&self) -> usize {
    self.len() - self.wall_count()
  }

  pub fn in_bounds(&self, (row, col): Coord) -> bool {
    row < self.rows && col < self.cols
  }

  pub fn is_open(&self, coord: Coord) -> bool {
    self.in_bounds(coord) && !self[coord].is_wall
  }

  /// In-bounds orthogonal neighbours, in up, down, left, right order.
  pub fn neighbors(&self, (row, col): Coord) -> impl Iterator<Item = Coord> + '_ {
    [
      (row.wrapping_sub(1), col),
      (row + 1, col),
      (row, col.wrapping_sub(1)),
      (row, col + 1),
    ]
    .into_iter()
    .filter(move |&c| self.in_bounds(c))
  }

  /// Neighbours that are not walls.
  pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
    self.neighbors(coord).filter(move |&c| !self[c].is_wall)
  }

  /// Walks `previous` links back from the end cell and returns the route in
  /// start-to-end order. Empty when the end was never reached.
  pub fn shortest_path(&self) -> Vec<Coord> {
    let mut path = vec![self.end];
    let mut current = self.end;
    while let Some(previous) = self[current].previous {
      // The predecessor links form a tree, so this never exceeds the cell count.
      if path.len() > self.len() {
        break;
      }
      path.push(previous);
      current = previous;
    }
    if current != self.start {
      return Vec::new();
    }
    path.reverse();
    path
  }

  /// Renders the grid with `#` walls, `S`/`E` endpoints and `*` on `path`.
  pub fn render_ascii(&self, path: &[Coord]) -> String {
    let on_path: std::collections::HashSet<Coord> = path.iter().copied().collect();
    let mut out = String::with_capacity(self.rows * (self.cols + 1));
    for row in 0..self.rows {
      for col in 0..self.cols {
        let cell = &self[(row, col)];
        let symbol = if cell.is_start {
          'S'
        } else if cell.is_end {
          'E'
        } else if cell.is_wall {
          '#'
        } else if on_path.contains(&(row, col)) {
          '*'
        } else {
          ' '
        };
        out.push(symbol);
      }
      out.push('\n');
    }
    out
  }
}

impl std::ops::Index<Coord> for Grid {
  type Output = Cell;

  fn index(&self, (row, col): Coord) -> &Self::Output {
    &self.cells[row * self.cols + col]
  }
}

impl std::ops::IndexMut<Coord> for Grid {
  fn index_mut(&mut self, (row, col): Coord) -> &mut Self::Output {
    &mut self.cells[row * self.cols + col]
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  /// Parses an ASCII picture (`#` wall, `S` start, `E` end, anything else open).
  pub(crate) fn grid_from_ascii(picture: &str) -> Grid {
    let lines: Vec<&str> = picture.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let rows = lines.len();
    let cols = lines[0].len();
    let mut walls = Vec::with_capacity(rows * cols);
    let mut start = (0, 0);
    let mut end = (0, 0);
    for (row, line) in lines.iter().enumerate() {
      for (col, ch) in line.chars().enumerate() {
        walls.push(ch == '#');
        match ch {
          'S' => start = (row, col),
          'E' => end = (row, col),
          _ => {}
        }
      }
    }
    Layout {
      rows,
      cols,
      walls,
      start,
      end,
    }
    .instantiate()
  }

  #[test]
  fn test_instantiate_marks_endpoints() {
    let grid = grid_from_ascii(
      "
      #####
      #S.E#
      #####
      ",
    );
    assert_eq!(grid.len(), 15);
    assert_eq!(grid.wall_count() + grid.open_count(), grid.len());
    assert!(grid[(1, 1)].is_start);
    assert!(grid[(1, 3)].is_end);
    assert_eq!(grid[(1, 2)].distance, Cell::UNREACHED);
  }

  #[test]
  fn test_neighbors_stay_in_bounds() {
    let grid = grid_from_ascii(
      "
      S.
      .E
      ",
    );
    let corner: Vec<_> = grid.neighbors((0, 0)).collect();
    assert_eq!(corner, vec![(1, 0), (0, 1)]);
    let other: Vec<_> = grid.neighbors((1, 1)).collect();
    assert_eq!(other, vec![(0, 1), (1, 0)]);
  }

  #[test]
  fn test_shortest_path_empty_when_unreached() {
    let grid = grid_from_ascii(
      "
      #####
      #S#E#
      #####
      ",
    );
    assert!(grid.shortest_path().is_empty());
  }

  #[test]
  fn test_shortest_path_follows_previous_links() {
    let mut grid = grid_from_ascii(
      "
      #####
      #S.E#
      #####
      ",
    );
    grid[(1, 1)].distance = 0;
    grid[(1, 2)].previous = Some((1, 1));
    grid[(1, 2)].distance = 1;
    grid[(1, 3)].previous = Some((1, 2));
    grid[(1, 3)].distance = 2;
    assert_eq!(grid.shortest_path(), vec![(1, 1), (1, 2), (1, 3)]);
    assert_eq!(grid.shortest_path(), grid.shortest_path());
  }

  #[test]
  fn test_render_ascii() {
    let grid = grid_from_ascii(
      "
      #####
      #S.E#
      #####
      ",
    );
    let rendered = grid.render_ascii(&[(1, 1), (1, 2), (1, 3)]);
    assert_eq!(rendered, "#####\n#S*E#\n#####\n");
  }
}
