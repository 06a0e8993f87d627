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
use crate::maze::Cell;
use crate::maze::Coord;
use crate::maze::Grid;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Uniform-cost search. The open set is a min-heap on distance from start;
/// a cell takes its predecessor when it is popped for the first time.
pub(super) fn search(grid: &mut Grid) -> Vec<Coord> {
  let (start, end) = (grid.start(), grid.end());
  let mut order = Vec::new();

  grid[start].distance = 0;
  let mut open: BinaryHeap<Reverse<(u32, Coord, Option<Coord>)>> = BinaryHeap::new();
  open.push(Reverse((0, start, None)));

  while let Some(Reverse((distance, coord, parent))) = open.pop() {
    if grid[coord].visited {
      continue;
    }
    let cell = &mut grid[coord];
    cell.visited = true;
    cell.previous = parent;
    order.push(coord);

    if coord == end {
      break;
    }

    let next_distance = distance + 1;
    let neighbors: Vec<Coord> = grid.open_neighbors(coord).collect();
    for next in neighbors {
      let cell = &mut grid[next];
      if !cell.visited && next_distance < cell.distance {
        cell.distance = next_distance;
        open.push(Reverse((next_distance, next, Some(coord))));
      }
    }
  }

  // Queued but unsettled cells count as not reached.
  for Reverse((_, coord, _)) in open {
    if !grid[coord].visited {
      grid[coord].distance = Cell::UNREACHED;
    }
  }

  order
}
