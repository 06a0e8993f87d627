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
use crate::maze::Topology;
use crate::scheduler::TaskOutcome;
use crate::search::Algorithm;
use serde::Serialize;
use std::collections::BTreeMap;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Raw, unrounded measurements of one search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunMetrics {
  pub elapsed_ms: f64,
  pub visited_nodes: usize,
  pub visited_percentage: f64,
  pub path_length: usize,
  pub memory_delta_bytes: i64,
}

impl From<&TaskOutcome> for RunMetrics {
  fn from(outcome: &TaskOutcome) -> Self {
    RunMetrics {
      elapsed_ms: outcome.elapsed_ms,
      visited_nodes: outcome.visited.len(),
      visited_percentage: outcome.visited_percentage,
      path_length: outcome.path.len(),
      memory_delta_bytes: outcome.memory_delta_bytes,
    }
  }
}

/// Per-algorithm means for one topology class, rounded for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
  pub algorithm: Algorithm,
  pub topology: Topology,
  pub samples: usize,
  /// Milliseconds, 4 decimal places.
  pub time_ms: f64,
  pub visited_nodes: f64,
  /// Percent, 2 decimal places.
  pub visited_percentage: f64,
  pub path_length: f64,
  /// Megabytes, 2 decimal places.
  pub memory_mb: f64,
}

/// Rounds half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
  let factor = 10f64.powi(places);
  (value * factor).round() / factor
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
  values.sum::<f64>() / count as f64
}

/// Averages `runs` and applies the reporting precision.
///
/// # Panics
///
/// If `runs` is empty. Callers only aggregate algorithms that recorded at
/// least one run.
pub fn aggregate(algorithm: Algorithm, topology: Topology, runs: &[RunMetrics]) -> AggregateMetrics {
  assert!(!runs.is_empty(), "cannot average zero runs of {algorithm}");
  let n = runs.len();
  AggregateMetrics {
    algorithm,
    topology,
    samples: n,
    time_ms: round_to(mean(runs.iter().map(|r| r.elapsed_ms), n), 4),
    visited_nodes: mean(runs.iter().map(|r| r.visited_nodes as f64), n),
    visited_percentage: round_to(mean(runs.iter().map(|r| r.visited_percentage), n), 2),
    path_length: mean(runs.iter().map(|r| r.path_length as f64), n),
    memory_mb: round_to(
      mean(runs.iter().map(|r| r.memory_delta_bytes as f64), n) / BYTES_PER_MB,
      2,
    ),
  }
}

/// Running per-algorithm lists for one topology class.
///
/// Only the coordinating task appends, after a worker has finished.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
  topology: Topology,
  runs: BTreeMap<Algorithm, Vec<RunMetrics>>,
}

impl MetricsCollector {
  pub fn new(topology: Topology) -> Self {
    MetricsCollector {
      topology,
      runs: BTreeMap::new(),
    }
  }

  pub fn record(&mut self, algorithm: Algorithm, metrics: RunMetrics) {
    self.runs.entry(algorithm).or_default().push(metrics);
  }

  pub fn samples(&self, algorithm: Algorithm) -> usize {
    self.runs.get(&algorithm).map_or(0, Vec::len)
  }

  /// Means for every algorithm with at least one run, in registry order.
  pub fn aggregate(&self) -> Vec<AggregateMetrics> {
    Algorithm::ALL
      .into_iter()
      .filter_map(|algorithm| {
        let runs = self.runs.get(&algorithm)?;
        (!runs.is_empty()).then(|| aggregate(algorithm, self.topology, runs))
      })
      .collect()
  }
}
