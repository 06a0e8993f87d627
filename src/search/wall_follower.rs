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

#[derive(Debug, Clone, Copy, PartialEq)]
enum Heading {
  North,
  East,
  South,
  West,
}

impl Heading {
  fn left(self) -> Self {
    match self {
      Heading::North => Heading::West,
      Heading::East => Heading::North,
      Heading::South => Heading::East,
      Heading::West => Heading::South,
    }
  }

  fn right(self) -> Self {
    self.left().left().left()
  }

  fn back(self) -> Self {
    self.left().left()
  }

  fn step(self, (row, col): Coord, grid: &Grid) -> Option<Coord> {
    let next = match self {
      Heading::North => (row.checked_sub(1)?, col),
      Heading::East => (row, col + 1),
      Heading::South => (row + 1, col),
      Heading::West => (row, col.checked_sub(1)?),
    };
    grid.is_open(next).then_some(next)
  }
}

/// Left-hand wall follower.
///
/// Each step turns left if it can, otherwise goes straight, right, or back.
/// Cells can be entered many times; `visit_count` tracks that, while the
/// returned order and the predecessor link only record the first entry.
/// The walk gives up after `4 × cells` moves, which bounds one full lap of
/// the wall it is holding.
pub(super) fn search(grid: &mut Grid) -> Vec<Coord> {
  let (start, end) = (grid.start(), grid.end());
  let mut order = vec![start];
  let max_moves = grid.len() * 4;

  let mut position = start;
  let mut heading = Heading::East;
  grid[start].distance = 0;
  grid[start].visited = true;
  grid[start].visit_count = 1;

  for _ in 0..max_moves {
    if position == end {
      break;
    }
    let Some((next, turned)) = [heading.left(), heading, heading.right(), heading.back()]
      .into_iter()
      .find_map(|h| h.step(position, &*grid).map(|c| (c, h)))
    else {
      // Boxed in on all four sides.
      break;
    };

    let distance = grid[position].distance + 1;
    let cell = &mut grid[next];
    cell.visit_count += 1;
    if !cell.visited {
      cell.visited = true;
      cell.distance = distance;
      cell.previous = Some(position);
      order.push(next);
    }
    position = next;
    heading = turned;
  }

  order
}
