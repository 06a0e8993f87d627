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

//! Replay documents for external renderers.
//!
//! Coordinate lists are packed as little-endian `u16` `(row, col)` pairs and
//! base64 encoded; the wall map is a row-major bitset, least significant bit
//! first.

use crate::error::TraceError;
use crate::maze::Coord;
use crate::maze::Layout;
use crate::maze::Topology;
use crate::scheduler::TaskOutcome;
use crate::search::Algorithm;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDocument {
  pub maze_size: usize,
  pub single_path: bool,
  pub rows: usize,
  pub cols: usize,
  pub start: Coord,
  pub end: Coord,
  pub walls: String,
  pub runs: Vec<TraceRun>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRun {
  pub algorithm: Algorithm,
  pub elapsed_ms: f64,
  pub visited_count: usize,
  pub path_length: usize,
  pub visited: String,
  pub path: String,
}

pub fn encode_coords(coords: &[Coord]) -> Result<String, TraceError> {
  let mut bytes = Vec::with_capacity(coords.len() * 4);
  for &(row, col) in coords {
    let (Ok(r), Ok(c)) = (u16::try_from(row), u16::try_from(col)) else {
      return Err(TraceError::CoordOverflow((row, col)));
    };
    bytes.extend_from_slice(&r.to_le_bytes());
    bytes.extend_from_slice(&c.to_le_bytes());
  }
  Ok(STANDARD.encode(bytes))
}

pub fn encode_walls(walls: &[bool]) -> String {
  let mut bytes = vec![0u8; walls.len().div_ceil(8)];
  for (i, _) in walls.iter().enumerate().filter(|(_, w)| **w) {
    bytes[i / 8] |= 1 << (i % 8);
  }
  STANDARD.encode(bytes)
}

pub fn build_trace(
  maze_size: usize,
  topology: Topology,
  layout: &Layout,
  outcomes: &[TaskOutcome],
) -> Result<TraceDocument, TraceError> {
  let runs = outcomes
    .iter()
    .map(|o| {
      Ok(TraceRun {
        algorithm: o.algorithm,
        elapsed_ms: o.elapsed_ms,
        visited_count: o.visited.len(),
        path_length: o.path.len(),
        visited: encode_coords(&o.visited)?,
        path: encode_coords(&o.path)?,
      })
    })
    .collect::<Result<Vec<_>, TraceError>>()?;

  Ok(TraceDocument {
    maze_size,
    single_path: topology.is_single_route(),
    rows: layout.rows(),
    cols: layout.cols(),
    start: layout.start(),
    end: layout.end(),
    walls: encode_walls(layout.walls()),
    runs,
  })
}

pub fn write_trace(path: &Path, document: &TraceDocument) -> Result<(), TraceError> {
  let json = serde_json::to_string_pretty(document)?;
  fs::write(path, json).map_err(|source| TraceError::Write {
    path: path.to_path_buf(),
    source,
  })
}
