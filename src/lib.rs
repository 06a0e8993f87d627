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

//! # Mazebench
//!
//! `mazebench` measures how graph-search algorithms behave on generated mazes.
//! Each run generates mazes with exactly one route and mazes with several
//! routes, solves every maze with each active algorithm on its own worker, and
//! writes per-algorithm averages to a CSV report.
//!
//! ## Core Modules
//!
//! * [`maze`]: The cell grid, the wall layout and the maze generator.
//! * [`search`]: The algorithm registry (Dijkstra, A*, BFS, DFS, wall follower).
//! * [`scheduler`]: Runs one search per blocking worker and measures it.
//! * [`memory`]: The per-thread heap accounting allocator.
//! * [`metrics`]: Per-algorithm collection and rounding of measurements.
//! * [`report`]: CSV report naming, writing and table rendering.
//! * [`trace`]: JSON replay documents for external renderers.
//! * [`benchmark`]: The `run_benchmarks` and `run_sweep` drivers.
//! * [`config`]: Layered settings (defaults, file, env, flags) resolved into a `Config`.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod benchmark;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod maze;
pub mod memory;
pub mod metrics;
pub mod report;
pub mod scheduler;
pub mod search;
pub mod trace;
