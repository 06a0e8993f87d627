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
use super::Coord;
use super::Layout;
use super::Topology;
use super::union_find::UnionFind;
use crate::error::GenerationError;
use crate::error::HarnessError;
use crate::error::UnknownCarver;
use crate::error::ValidationError;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// Largest supported number of rooms per axis. Keeps lattice coordinates
/// inside `u16` for the replay format.
pub const MAX_ROOMS: usize = 16_000;

/// Chance that the backtracker steps to a random neighbour instead of the
/// one farthest from the start.
const RANDOM_STEP_PROBABILITY: f64 = 0.75;

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
  match seed {
    Some(s) => StdRng::seed_from_u64(s),
    None => StdRng::from_os_rng(),
  }
}

/// Spanning-tree construction used before any loops are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carver {
  /// Randomized depth-first carving with a bias away from the start.
  #[default]
  Backtracker,
  /// Shuffled edges joined through a union-find.
  Kruskal,
}

impl fmt::Display for Carver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Carver::Backtracker => write!(f, "backtracker"),
      Carver::Kruskal => write!(f, "kruskal"),
    }
  }
}

impl FromStr for Carver {
  type Err = UnknownCarver;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "backtracker" => Ok(Carver::Backtracker),
      "kruskal" => Ok(Carver::Kruskal),
      other => Err(UnknownCarver(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
  pub carver: Carver,
  /// Probability of removing each leftover interior wall in multi-route mazes.
  pub loop_density: f64,
}

impl Default for GeneratorOptions {
  fn default() -> Self {
    GeneratorOptions {
      carver: Carver::Backtracker,
      loop_density: 0.1,
    }
  }
}

/// Generates a maze of `rows × cols` rooms.
///
/// Start is the top-left room and end the bottom-right one. A
/// [`Topology::SingleRoute`] maze is a spanning tree over the rooms, so exactly
/// one route joins them. A [`Topology::MultiRoute`] maze additionally gets one
/// wall removed across the start-to-end route, then every remaining interior
/// wall removed with probability `loop_density`.
pub fn generate<R: Rng + ?Sized>(
  rows: usize,
  cols: usize,
  topology: Topology,
  options: &GeneratorOptions,
  rng: &mut R,
) -> Result<Layout, HarnessError> {
  for size in [rows, cols] {
    if size < 2 {
      return Err(ValidationError::MazeTooSmall(size).into());
    }
    if size > MAX_ROOMS {
      return Err(
        ValidationError::MazeTooLarge {
          size,
          max: MAX_ROOMS,
        }
        .into(),
      );
    }
  }
  if !(options.loop_density > 0.0 && options.loop_density <= 1.0) {
    return Err(ValidationError::LoopDensity(options.loop_density).into());
  }

  let mut lattice = Lattice::new(rows, cols);
  match options.carver {
    Carver::Backtracker => carve_backtracker(&mut lattice, rng),
    Carver::Kruskal => carve_kruskal(&mut lattice, rng),
  }

  let start = (0, 0);
  let end = (rows - 1, cols - 1);
  if topology == Topology::MultiRoute {
    open_route_cycle(&mut lattice, start, end, rng)?;
    open_random_loops(&mut lattice, options.loop_density, rng);
  }

  let layout = lattice.into_layout(start, end);
  check_layout(&layout)?;
  Ok(layout)
}

type Room = (usize, usize);

/// Room graph embedded in the cell lattice.
struct Lattice {
  rooms_rows: usize,
  rooms_cols: usize,
  cols: usize,
  walls: Vec<bool>,
}

impl Lattice {
  fn new(rooms_rows: usize, rooms_cols: usize) -> Self {
    let rows = rooms_rows * 2 + 1;
    let cols = rooms_cols * 2 + 1;
    let walls = (0..rows)
      .flat_map(|r| (0..cols).map(move |c| r % 2 == 0 || c % 2 == 0))
      .collect();
    Lattice {
      rooms_rows,
      rooms_cols,
      cols,
      walls,
    }
  }

  fn room_count(&self) -> usize {
    self.rooms_rows * self.rooms_cols
  }

  fn room_index(&self, (i, j): Room) -> usize {
    i * self.rooms_cols + j
  }

  fn room_cell((i, j): Room) -> Coord {
    (i * 2 + 1, j * 2 + 1)
  }

  fn passage(a: Room, b: Room) -> Coord {
    (a.0 + b.0 + 1, a.1 + b.1 + 1)
  }

  fn is_open(&self, a: Room, b: Room) -> bool {
    let (r, c) = Self::passage(a, b);
    !self.walls[r * self.cols + c]
  }

  fn open(&mut self, a: Room, b: Room) {
    let (r, c) = Self::passage(a, b);
    self.walls[r * self.cols + c] = false;
  }

  fn room_neighbors(&self, (i, j): Room) -> impl Iterator<Item = Room> + use<> {
    let (rows, cols) = (self.rooms_rows, self.rooms_cols);
    [
      (i.wrapping_sub(1), j),
      (i + 1, j),
      (i, j.wrapping_sub(1)),
      (i, j + 1),
    ]
    .into_iter()
    .filter(move |&(r, c)| r < rows && c < cols)
  }

  /// Every pair of adjacent rooms, each listed once.
  fn room_edges(&self) -> Vec<(Room, Room)> {
    let (rows, cols) = (self.rooms_rows, self.rooms_cols);
    (0..rows)
      .flat_map(|i| (0..cols).map(move |j| (i, j)))
      .flat_map(|(i, j)| {
        [
          (j + 1 < cols).then_some(((i, j), (i, j + 1))),
          (i + 1 < rows).then_some(((i, j), (i + 1, j))),
        ]
      })
      .flatten()
      .collect()
  }

  /// Rooms reachable from `from` without crossing `cut`.
  fn reachable_without(&self, from: Room, cut: Option<(Room, Room)>) -> Vec<Option<Room>> {
    // Each slot holds the predecessor of a reached room; `from` points at itself.
    let mut parent = vec![None; self.room_count()];
    parent[self.room_index(from)] = Some(from);
    let mut queue = VecDeque::from([from]);
    while let Some(room) = queue.pop_front() {
      for next in self.room_neighbors(room) {
        let crosses_cut = cut.is_some_and(|(a, b)| (a, b) == (room, next) || (b, a) == (room, next));
        if crosses_cut || !self.is_open(room, next) {
          continue;
        }
        let slot = self.room_index(next);
        if parent[slot].is_none() {
          parent[slot] = Some(room);
          queue.push_back(next);
        }
      }
    }
    parent
  }

  /// Room sequence from `from` to `to` through open passages.
  fn route(&self, from: Room, to: Room) -> Option<Vec<Room>> {
    let parent = self.reachable_without(from, None);
    parent[self.room_index(to)]?;
    let mut route = vec![to];
    let mut current = to;
    while current != from {
      current = parent[self.room_index(current)]?;
      route.push(current);
    }
    route.reverse();
    Some(route)
  }

  fn into_layout(self, start: Room, end: Room) -> Layout {
    Layout {
      rows: self.rooms_rows * 2 + 1,
      cols: self.cols,
      walls: self.walls,
      start: Self::room_cell(start),
      end: Self::room_cell(end),
    }
  }
}

fn carve_backtracker<R: Rng + ?Sized>(lattice: &mut Lattice, rng: &mut R) {
  let origin = (0, 0);
  let mut visited = vec![false; lattice.room_count()];
  visited[lattice.room_index(origin)] = true;
  let mut stack = vec![origin];

  // Every room is pushed and popped once.
  while let Some(&room) = stack.last() {
    let candidates: Vec<Room> = lattice
      .room_neighbors(room)
      .filter(|&n| !visited[lattice.room_index(n)])
      .collect();

    if candidates.is_empty() {
      stack.pop();
      continue;
    }

    let next = if rng.random_bool(RANDOM_STEP_PROBABILITY) {
      candidates[rng.random_range(0..candidates.len())]
    } else {
      *candidates
        .iter()
        .max_by_key(|&&(i, j)| i * i + j * j)
        .unwrap_or(&candidates[0])
    };

    lattice.open(room, next);
    visited[lattice.room_index(next)] = true;
    stack.push(next);
  }
}

fn carve_kruskal<R: Rng + ?Sized>(lattice: &mut Lattice, rng: &mut R) {
  let mut uf = UnionFind::new(lattice.room_count());
  let mut edges = lattice.room_edges();
  edges.shuffle(rng);

  for (a, b) in edges {
    if uf.unite(lattice.room_index(a), lattice.room_index(b)) {
      lattice.open(a, b);
    }
  }
}

/// Opens one wall whose rooms sit on opposite sides of a random edge of the
/// current start-to-end route, which always yields a second route.
fn open_route_cycle<R: Rng + ?Sized>(
  lattice: &mut Lattice,
  start: Room,
  end: Room,
  rng: &mut R,
) -> Result<(), GenerationError> {
  let route = lattice
    .route(start, end)
    .ok_or(GenerationError::Disconnected)?;
  let k = rng.random_range(0..route.len() - 1);
  let cut = (route[k], route[k + 1]);

  let start_side = lattice.reachable_without(start, Some(cut));
  let candidates: Vec<(Room, Room)> = lattice
    .room_edges()
    .into_iter()
    .filter(|&(a, b)| {
      !lattice.is_open(a, b)
        && start_side[lattice.room_index(a)].is_some() != start_side[lattice.room_index(b)].is_some()
    })
    .collect();

  if candidates.is_empty() {
    return Err(GenerationError::NoCycleCandidate(Lattice::room_cell(cut.0)));
  }
  let (a, b) = candidates[rng.random_range(0..candidates.len())];
  lattice.open(a, b);
  Ok(())
}

fn open_random_loops<R: Rng + ?Sized>(lattice: &mut Lattice, density: f64, rng: &mut R) {
  for (a, b) in lattice.room_edges() {
    if !lattice.is_open(a, b) && rng.random_bool(density) {
      lattice.open(a, b);
    }
  }
}

/// Re-checks the endpoint invariants on the finished layout.
fn check_layout(layout: &Layout) -> Result<(), GenerationError> {
  let (start, end) = (layout.start(), layout.end());
  if start == end {
    return Err(GenerationError::StartIsEnd(start));
  }
  for (role, coord) in [("start", start), ("end", end)] {
    if layout.is_wall(coord) {
      return Err(GenerationError::EndpointIsWall { role, coord });
    }
  }

  let grid = layout.instantiate();
  let mut seen = vec![false; grid.len()];
  seen[start.0 * grid.cols() + start.1] = true;
  let mut queue = VecDeque::from([start]);
  while let Some(coord) = queue.pop_front() {
    if coord == end {
      return Ok(());
    }
    for next in grid.open_neighbors(coord) {
      let slot = next.0 * grid.cols() + next.1;
      if !seen[slot] {
        seen[slot] = true;
        queue.push_back(next);
      }
    }
  }
  Err(GenerationError::Disconnected)
}
