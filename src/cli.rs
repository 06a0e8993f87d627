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
use crate::maze::Carver;
use crate::search::Algorithm;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Benchmark graph-search algorithms on generated mazes")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
  /// Benchmark the active algorithms on single- and multi-route mazes of one size.
  Run(RunArgs),

  /// Repeat `run` with growing maze sizes.
  Sweep(SweepArgs),

  /// Print one generated maze with the route each active algorithm found.
  Show(ShowArgs),

  /// Write a JSON replay of every algorithm's visit order on one maze.
  ///
  /// Runs the whole registry unless `--algorithms` narrows it.
  Trace(TraceArgs),

  /// Print report files (or every `.csv` in a directory) as aligned tables.
  Report {
    #[arg(required = true)]
    paths: Vec<PathBuf>,
  },
}

#[derive(Debug, Args)]
pub struct RunArgs {
  /// Rooms per side of the square maze.
  pub maze_size: usize,

  /// Mazes generated per topology class.
  pub repetitions: usize,

  /// Suffix appended to the report file name. Same as `--marker`.
  #[arg(value_name = "MARKER", conflicts_with = "marker")]
  pub marker_arg: Option<String>,

  #[command(flatten)]
  pub tuning: TuningArgs,
}

#[derive(Debug, Args)]
pub struct SweepArgs {
  /// First maze size.
  #[arg(long, default_value_t = 25)]
  pub start: usize,

  /// Size increment between runs.
  #[arg(long, default_value_t = 25)]
  pub step: usize,

  /// Largest maze size to run.
  #[arg(long)]
  pub max_size: usize,

  /// Mazes generated per topology class at each size.
  #[arg(long, visible_alias = "reps", default_value_t = 10)]
  pub repetitions: usize,

  #[command(flatten)]
  pub tuning: TuningArgs,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
  /// Rooms per side of the square maze.
  pub maze_size: usize,

  /// Generate a maze with several routes instead of one.
  #[arg(long)]
  pub multi_route: bool,

  #[command(flatten)]
  pub tuning: TuningArgs,
}

#[derive(Debug, Args)]
pub struct TraceArgs {
  /// Rooms per side of the square maze.
  pub maze_size: usize,

  /// Generate a maze with several routes instead of one.
  #[arg(long)]
  pub multi_route: bool,

  /// Destination of the JSON document.
  #[arg(long)]
  pub out: PathBuf,

  #[command(flatten)]
  pub tuning: TuningArgs,
}

/// Harness settings that can also come from a config file or `MAZEBENCH_*`
/// environment variables. Flags given here win.
#[derive(Debug, Clone, Default, Args, Serialize)]
pub struct TuningArgs {
  /// TOML or JSON file with harness settings.
  #[arg(long, env = "MAZEBENCH_CONFIG")]
  #[serde(skip)]
  pub config: Option<PathBuf>,

  /// Directory the report is written to.
  #[arg(short = 'o', long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub output_dir: Option<PathBuf>,

  /// Comma-separated algorithms to schedule, e.g. `astar,bfs`. Config files
  /// and `MAZEBENCH_ALGORITHMS` accept the same form or a list.
  #[arg(long, value_delimiter = ',')]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub algorithms: Option<Vec<Algorithm>>,

  /// Probability of removing each leftover wall in multi-route mazes.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub loop_density: Option<f64>,

  /// Spanning-tree carver: `backtracker` or `kruskal`.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub carver: Option<Carver>,

  /// Seed for maze generation.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub seed: Option<u64>,

  /// Suffix appended to the report file name.
  #[arg(short = 'n', long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub marker: Option<String>,
}
