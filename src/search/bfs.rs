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
use std::collections::VecDeque;

/// Breadth-first search. Cells are claimed when enqueued and reported in
/// dequeue order.
pub(super) fn search(grid: &mut Grid) -> Vec<Coord> {
  let (start, end) = (grid.start(), grid.end());
  let mut order = Vec::new();

  grid[start].distance = 0;
  grid[start].visited = true;
  let mut queue = VecDeque::from([start]);

  while let Some(coord) = queue.pop_front() {
    order.push(coord);
    if coord == end {
      break;
    }

    let distance = grid[coord].distance + 1;
    let neighbors: Vec<Coord> = grid.open_neighbors(coord).collect();
    for next in neighbors {
      let cell = &mut grid[next];
      if !cell.visited {
        cell.visited = true;
        cell.distance = distance;
        cell.previous = Some(coord);
        queue.push_back(next);
      }
    }
  }

  order
}
