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
/// Disjoint sets over room indices, used to reject cycle-forming edges.
pub(super) struct UnionFind {
  parent: Vec<usize>,
  rank: Vec<u8>,
}

impl UnionFind {
  pub(super) fn new(size: usize) -> Self {
    UnionFind {
      parent: (0..size).collect(),
      rank: vec![0; size],
    }
  }

  pub(super) fn find(&mut self, x: usize) -> usize {
    let mut root = x;
    while self.parent[root] != root {
      root = self.parent[root];
    }
    // Path compression
    let mut node = x;
    while self.parent[node] != root {
      let next = self.parent[node];
      self.parent[node] = root;
      node = next;
    }
    root
  }

  /// Merges the sets of `x` and `y`. Returns `false` if they were already joined.
  pub(super) fn unite(&mut self, x: usize, y: usize) -> bool {
    let root_x = self.find(x);
    let root_y = self.find(y);
    if root_x == root_y {
      return false;
    }
    match self.rank[root_x].cmp(&self.rank[root_y]) {
      std::cmp::Ordering::Greater => self.parent[root_y] = root_x,
      std::cmp::Ordering::Less => self.parent[root_x] = root_y,
      std::cmp::Ordering::Equal => {
        self.parent[root_y] = root_x;
        self.rank[root_x] += 1;
      }
    }
    true
  }
}
