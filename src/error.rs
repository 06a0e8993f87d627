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
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error enum for the mazebench library.
#[derive(Error, Debug)]
pub enum HarnessError {
  #[error("Invalid input: {0}")]
  Validation(#[from] ValidationError),

  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Maze generation failed: {0}")]
  Generation(#[from] GenerationError),

  #[error("Report error: {0}")]
  Report(#[from] ReportError),

  #[error("Trace export failed: {0}")]
  Trace(#[from] TraceError),
}

/// Rejected run parameters. Raised before any maze is generated.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
  #[error("maze size must be at least 2, got {0}")]
  MazeTooSmall(usize),

  #[error("maze size {size} exceeds the supported maximum of {max}")]
  MazeTooLarge { size: usize, max: usize },

  #[error("repetition count must be at least 1, got {0}")]
  NoRepetitions(usize),

  #[error("loop density must lie in (0, 1], got {0}")]
  LoopDensity(f64),

  #[error("the active algorithm set is empty")]
  NoAlgorithms,

  #[error("algorithm '{0}' is listed more than once")]
  DuplicateAlgorithm(String),

  #[error("sweep step must be at least 1")]
  SweepStep,

  #[error("report marker '{0}' must be a non-empty name without path separators")]
  InvalidMarker(String),
}

/// Errors related to configuration resolution (src/config.rs).
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to merge configuration sources: {0}")]
  Extract(#[from] Box<figment::Error>),

  #[error("Unsupported config file extension: {0}")]
  UnsupportedFormat(PathBuf),

  #[error("Config file not found: {0}")]
  FileNotFound(PathBuf),
}

/// Internal-consistency failures of the maze generator. Never retried.
#[derive(Error, Debug)]
pub enum GenerationError {
  #[error("start and end coincide at {0:?}")]
  StartIsEnd((usize, usize)),

  #[error("{role} cell {coord:?} is a wall")]
  EndpointIsWall {
    role: &'static str,
    coord: (usize, usize),
  },

  #[error("end is unreachable from start")]
  Disconnected,

  #[error("no wall can open a second route across {0:?}")]
  NoCycleCandidate((usize, usize)),
}

/// A single algorithm task that did not produce a result.
#[derive(Error, Debug)]
pub enum TaskError {
  #[error("worker for '{algorithm}' panicked: {message}")]
  Panicked { algorithm: String, message: String },

  #[error("worker for '{algorithm}' was cancelled")]
  Cancelled { algorithm: String },
}

/// Errors related to writing and reading report files (src/report.rs).
#[derive(Error, Debug)]
pub enum ReportError {
  #[error("Failed to create output directory {path}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write report {path}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to read report {path}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("CSV error in report {path}")]
  Csv {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },

  #[error("{path} does not start with the report header, found {found:?}")]
  Header { path: PathBuf, found: Vec<String> },
}

/// Errors related to the replay document (src/trace.rs).
#[derive(Error, Debug)]
pub enum TraceError {
  #[error("Failed to serialize trace")]
  Serialize(#[from] serde_json::Error),

  #[error("Failed to write trace {path}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Coordinate {0:?} does not fit the u16 wire format")]
  CoordOverflow((usize, usize)),
}

#[derive(Error, Debug)]
#[error("unknown algorithm '{0}' (expected one of: dijkstra, astar, bfs, dfs, wallFollower)")]
pub struct UnknownAlgorithm(pub String);

#[derive(Error, Debug)]
#[error("unknown carver '{0}' (expected backtracker or kruskal)")]
pub struct UnknownCarver(pub String);
