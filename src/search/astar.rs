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

fn manhattan(a: Coord, b: Coord) -> u32 {
  (a.0.abs_diff(b.0) + a.1.abs_diff(b.1)) as u32
}

/// A* with the Manhattan heuristic. Heap entries are ordered by
/// `g + h`, then by `h` so that cells closer to the end win ties.
pub(super) fn search(grid: &mut Grid) -> Vec<Coord> {
  let (start, end) = (grid.start(), grid.end());
  let mut order = Vec::new();

  let h = manhattan(start, end);
  grid[start].distance = 0;
  let mut open: BinaryHeap<Reverse<(u32, u32, Coord, Option<Coord>)>> = BinaryHeap::new();
  open.push(Reverse((h, h, start, None)));

  while let Some(Reverse((_, _, coord, parent))) = open.pop() {
    if grid[coord].visited {
      continue;
    }
    let cell = &mut grid[coord];
    cell.visited = true;
    cell.previous = parent;
    let g = cell.distance;
    order.push(coord);

    if coord == end {
      break;
    }

    let neighbors: Vec<Coord> = grid.open_neighbors(coord).collect();
    for next in neighbors {
      let cell = &mut grid[next];
      let tentative = g + 1;
      if !cell.visited && tentative < cell.distance {
        cell.distance = tentative;
        let h = manhattan(next, end);
        open.push(Reverse((tentative + h, h, next, Some(coord))));
      }
    }
  }

  // Queued but unsettled cells count as not reached.
  for Reverse((_, _, coord, _)) in open {
    if !grid[coord].visited {
      grid[coord].distance = Cell::UNREACHED;
    }
  }

  order
}
