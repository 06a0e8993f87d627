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
use crate::maze::Coord;
use crate::maze::Grid;

/// Depth-first search on an explicit stack.
pub(super) fn search(grid: &mut Grid) -> Vec<Coord> {
  let (start, end) = (grid.start(), grid.end());
  let mut order = Vec::new();
  let mut stack: Vec<(Coord, Option<Coord>)> = vec![(start, None)];

  while let Some((coord, parent)) = stack.pop() {
    if grid[coord].visited {
      continue;
    }
    let distance = parent.map_or(0, |p| grid[p].distance + 1);
    let cell = &mut grid[coord];
    cell.visited = true;
    cell.previous = parent;
    cell.distance = distance;
    order.push(coord);

    if coord == end {
      break;
    }

    // Reversed so the first neighbour is explored first.
    let neighbors: Vec<Coord> = grid.open_neighbors(coord).collect();
    for next in neighbors.into_iter().rev() {
      if !grid[next].visited {
        stack.push((next, Some(coord)));
      }
    }
  }

  order
}
