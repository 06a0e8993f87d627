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

//! The closed registry of search algorithms.
//!
//! Every variant is a [`SearchFn`]: it consumes a fresh [`Grid`], mutates its
//! scratch fields, and returns the cells in the order they were first
//! visited. The route is recovered afterwards with [`Grid::shortest_path`].

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod wall_follower;

use crate::error::UnknownAlgorithm;
use crate::maze::Coord;
use crate::maze::Grid;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Search contract shared by every algorithm.
pub type SearchFn = fn(&mut Grid) -> Vec<Coord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
  #[serde(rename = "dijkstra")]
  Dijkstra,
  #[serde(rename = "astar")]
  AStar,
  #[serde(rename = "bfs")]
  Bfs,
  #[serde(rename = "dfs")]
  Dfs,
  #[serde(rename = "wallFollower")]
  WallFollower,
}

impl Algorithm {
  /// Registry order. Reports list algorithms in this order.
  pub const ALL: [Algorithm; 5] = [
    Algorithm::Dijkstra,
    Algorithm::AStar,
    Algorithm::Bfs,
    Algorithm::Dfs,
    Algorithm::WallFollower,
  ];

  /// Algorithms scheduled when no explicit set is configured.
  pub const DEFAULT_ACTIVE: [Algorithm; 4] = [
    Algorithm::AStar,
    Algorithm::Bfs,
    Algorithm::Dfs,
    Algorithm::WallFollower,
  ];

  /// Registry key, as written to reports.
  pub fn name(self) -> &'static str {
    match self {
      Algorithm::Dijkstra => "dijkstra",
      Algorithm::AStar => "astar",
      Algorithm::Bfs => "bfs",
      Algorithm::Dfs => "dfs",
      Algorithm::WallFollower => "wallFollower",
    }
  }

  pub fn search_fn(self) -> SearchFn {
    match self {
      Algorithm::Dijkstra => dijkstra::search,
      Algorithm::AStar => astar::search,
      Algorithm::Bfs => bfs::search,
      Algorithm::Dfs => dfs::search,
      Algorithm::WallFollower => wall_follower::search,
    }
  }

  /// Runs the algorithm on `grid` and returns its visit order.
  pub fn search(self, grid: &mut Grid) -> Vec<Coord> {
    (self.search_fn())(grid)
  }
}

impl fmt::Display for Algorithm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Algorithm {
  type Err = UnknownAlgorithm;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Algorithm::ALL
      .into_iter()
      .find(|a| a.name() == s)
      .ok_or_else(|| UnknownAlgorithm(s.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::maze::Cell;
  use crate::maze::GeneratorOptions;
  use crate::maze::Topology;
  use crate::maze::generate;
  use crate::maze::get_rng;
  use crate::maze::tests::grid_from_ascii;

  #[test]
  fn test_names_round_trip_through_from_str() {
    for algorithm in Algorithm::ALL {
      assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
    }
    assert!("greedy".parse::<Algorithm>().is_err());
  }

  #[test]
  fn test_every_algorithm_solves_generated_mazes() {
    for topology in Topology::ALL {
      for seed in 0..10 {
        let layout = generate(10, 10, topology, &GeneratorOptions::default(), &mut get_rng(Some(seed))).unwrap();
        for algorithm in Algorithm::ALL {
          let mut grid = layout.instantiate();
          let visited = algorithm.search(&mut grid);
          let path = grid.shortest_path();

          assert!(!path.is_empty(), "{algorithm} found no path (seed {seed})");
          assert_eq!(path.first(), Some(&grid.start()));
          assert_eq!(path.last(), Some(&grid.end()));
          assert!(visited.len() >= path.len(), "{algorithm} (seed {seed})");
          assert!(visited.len() <= grid.open_count(), "{algorithm} (seed {seed})");
          for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.0.abs_diff(b.0) + a.1.abs_diff(b.1), 1);
            assert!(!grid[b].is_wall);
          }
        }
      }
    }
  }

  #[test]
  fn test_single_route_paths_agree() {
    for seed in 0..10 {
      let layout = generate(10, 10, Topology::SingleRoute, &GeneratorOptions::default(), &mut get_rng(Some(seed))).unwrap();
      let paths: Vec<Vec<Coord>> = Algorithm::ALL
        .into_iter()
        .map(|a| {
          let mut grid = layout.instantiate();
          a.search(&mut grid);
          grid.shortest_path()
        })
        .collect();
      assert!(paths.windows(2).all(|w| w[0] == w[1]), "seed {seed}");
    }
  }

  #[test]
  fn test_bfs_is_minimal_on_multi_route() {
    for seed in 0..10 {
      let layout = generate(10, 10, Topology::MultiRoute, &GeneratorOptions::default(), &mut get_rng(Some(seed))).unwrap();
      let hops = |algorithm: Algorithm| {
        let mut grid = layout.instantiate();
        algorithm.search(&mut grid);
        grid.shortest_path().len()
      };
      let bfs = hops(Algorithm::Bfs);
      assert_eq!(bfs, hops(Algorithm::Dijkstra));
      assert_eq!(bfs, hops(Algorithm::AStar));
      assert!(hops(Algorithm::Dfs) >= bfs);
      assert!(hops(Algorithm::WallFollower) >= bfs);
    }
  }

  #[test]
  fn test_unreachable_end_yields_empty_path() {
    for algorithm in Algorithm::ALL {
      let mut grid = grid_from_ascii(
        "
        #######
        #S..#E#
        #######
        ",
      );
      let visited = algorithm.search(&mut grid);
      assert_eq!(visited.len(), 3, "{algorithm}");
      assert!(grid.shortest_path().is_empty(), "{algorithm}");
      assert_eq!(grid[(1, 5)].distance, Cell::UNREACHED);
    }
  }

  #[test]
  fn test_finite_distance_only_on_visited_cells() {
    for seed in 0..5 {
      let layout = generate(12, 12, Topology::MultiRoute, &GeneratorOptions::default(), &mut get_rng(Some(seed))).unwrap();
      for algorithm in Algorithm::ALL {
        let mut grid = layout.instantiate();
        algorithm.search(&mut grid);
        for row in 0..grid.rows() {
          for col in 0..grid.cols() {
            let cell = &grid[(row, col)];
            if !cell.visited {
              assert_eq!(cell.distance, Cell::UNREACHED, "{algorithm} left ({row}, {col}) half-set (seed {seed})");
              assert_eq!(cell.previous, None, "{algorithm} (seed {seed})");
            }
          }
        }
      }
    }
  }

  #[test]
  fn test_reconstruction_is_idempotent() {
    let layout = generate(6, 6, Topology::MultiRoute, &GeneratorOptions::default(), &mut get_rng(Some(3))).unwrap();
    for algorithm in Algorithm::ALL {
      let mut grid = layout.instantiate();
      algorithm.search(&mut grid);
      assert_eq!(grid.shortest_path(), grid.shortest_path());
    }
  }
}
