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
use crate::config::Config;
use crate::error::HarnessError;
use crate::error::TaskError;
use crate::error::ValidationError;
use crate::maze::Layout;
use crate::maze::Topology;
use crate::maze::generate;
use crate::maze::get_rng;
use crate::metrics::AggregateMetrics;
use crate::metrics::MetricsCollector;
use crate::metrics::RunMetrics;
use crate::report::write_report;
use crate::scheduler::Task;
use crate::scheduler::TaskOutcome;
use crate::scheduler::run_batch;
use crate::search::Algorithm;
use rand::RngCore;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::Instrument;

/// Receives one human-readable line per finished repetition.
pub type ProgressSender = UnboundedSender<String>;

/// Structured result of one harness run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkSummary {
  pub maze_size: usize,
  pub repetitions: usize,
  pub seed: u64,
  pub single_route: Vec<AggregateMetrics>,
  pub multi_route: Vec<AggregateMetrics>,
  pub report_path: PathBuf,
  /// Tasks that panicked and were left out of the averages.
  pub failed_tasks: usize,
}

fn emit(progress: Option<&ProgressSender>, line: String) {
  tracing::info!("{}", line);
  if let Some(tx) = progress {
    // A dropped receiver only means nobody is listening any more.
    let _ = tx.send(line);
  }
}

/// Main benchmark runner.
///
/// Runs `config.repetitions` batches per topology class, one batch at a time,
/// then writes the report. Validation and generation errors abort the run
/// before a report exists; a failed task only drops that sample.
pub async fn run_benchmarks(
  config: &Config,
  progress: Option<&ProgressSender>,
) -> Result<BenchmarkSummary, HarnessError> {
  config.validate()?;

  let span = tracing::info_span!(
    "run_benchmarks",
    size = config.maze_size,
    reps = config.repetitions,
    seed = config.seed
  );

  async {
    tracing::info!(
      algorithms = ?config.algorithms,
      carver = %config.generator.carver,
      "--- Starting Benchmark Pipeline ---"
    );
    let mut rng = get_rng(Some(config.seed));

    let (single, single_failures) = run_topology(config, Topology::SingleRoute, &mut rng, progress)
      .instrument(tracing::info_span!("topology", topology = %Topology::SingleRoute))
      .await?;
    let (multi, multi_failures) = run_topology(config, Topology::MultiRoute, &mut rng, progress)
      .instrument(tracing::info_span!("topology", topology = %Topology::MultiRoute))
      .await?;

    let failed_tasks = single_failures + multi_failures;
    let single_route = single.aggregate();
    let multi_route = multi.aggregate();
    let report_path = config.report_path();
    write_report(&report_path, &single_route, &multi_route)?;
    tracing::info!(path = %report_path.display(), failed_tasks, "--- Benchmark run complete ---");

    Ok(BenchmarkSummary {
      maze_size: config.maze_size,
      repetitions: config.repetitions,
      seed: config.seed,
      single_route,
      multi_route,
      report_path,
      failed_tasks,
    })
  }
  .instrument(span)
  .await
}

/// Runs every repetition of one topology class. Returns the filled collector
/// and the number of failed tasks.
async fn run_topology(
  config: &Config,
  topology: Topology,
  rng: &mut StdRng,
  progress: Option<&ProgressSender>,
) -> Result<(MetricsCollector, usize), HarnessError> {
  let mut collector = MetricsCollector::new(topology);
  let mut failures = 0;

  for rep in 0..config.repetitions {
    let maze_seed = rng.next_u64();
    let results = run_maze(config, topology, maze_seed)
      .instrument(tracing::debug_span!("repetition", rep = rep + 1, maze_seed))
      .await?
      .1;

    failures += record_batch(&mut collector, results, rep + 1);

    emit(
      progress,
      format!(
        "Completed test {} of {} for mazes with {} for size: {}",
        rep + 1,
        config.repetitions,
        topology,
        config.maze_size
      ),
    );
  }

  Ok((collector, failures))
}

/// Folds one batch into `collector`. Failed tasks are logged and left out;
/// their siblings are still recorded. Returns the number of failures.
fn record_batch(
  collector: &mut MetricsCollector,
  results: Vec<(Algorithm, Result<TaskOutcome, TaskError>)>,
  rep: usize,
) -> usize {
  let mut failures = 0;
  for (algorithm, result) in results {
    match result {
      Ok(outcome) => collector.record(algorithm, RunMetrics::from(&outcome)),
      Err(e) => {
        failures += 1;
        tracing::error!(error = %e, %algorithm, rep, "Task failed; sample dropped");
      }
    }
  }
  failures
}

/// Generates one maze and runs a batch of every configured algorithm on it.
pub async fn run_maze(
  config: &Config,
  topology: Topology,
  maze_seed: u64,
) -> Result<(Layout, Vec<(Algorithm, Result<TaskOutcome, TaskError>)>), HarnessError> {
  let layout = generate(
    config.maze_size,
    config.maze_size,
    topology,
    &config.generator,
    &mut get_rng(Some(maze_seed)),
  )?;
  let tasks = config
    .algorithms
    .iter()
    .map(|&algorithm| Task::new(algorithm, layout.instantiate()))
    .collect();
  let results = run_batch(tasks).await;
  Ok((layout, results))
}

/// Generates one maze from `config.seed` and solves it with every configured
/// algorithm. Failed tasks are logged and left out.
pub async fn solve_once(
  config: &Config,
  topology: Topology,
) -> Result<(Layout, Vec<TaskOutcome>), HarnessError> {
  config.validate()?;
  let (layout, results) = run_maze(config, topology, config.seed).await?;
  let outcomes = results
    .into_iter()
    .filter_map(|(algorithm, result)| match result {
      Ok(outcome) => Some(outcome),
      Err(e) => {
        tracing::error!(error = %e, %algorithm, "Task failed");
        None
      }
    })
    .collect();
  Ok((layout, outcomes))
}

/// Runs the harness at `start`, `start + step`, ... up to `max_size`.
///
/// Stops at the first size that fails and returns the summaries gathered so
/// far.
pub async fn run_sweep(
  base: &Config,
  start: usize,
  step: usize,
  max_size: usize,
  progress: Option<&ProgressSender>,
) -> Result<Vec<BenchmarkSummary>, HarnessError> {
  if step == 0 {
    return Err(ValidationError::SweepStep.into());
  }
  base.with_maze_size(start)?;

  let mut summaries = Vec::new();
  for size in (start..=max_size).step_by(step) {
    emit(progress, format!("Running tests with maze size {size}"));
    let result = match base.with_maze_size(size) {
      Ok(config) => run_benchmarks(&config, progress).await,
      Err(e) => Err(e.into()),
    };
    match result {
      Ok(summary) => summaries.push(summary),
      Err(e) => {
        tracing::error!(error = %e, size, "Sweep stopped");
        emit(progress, format!("Test failed for maze size {size}: {e}"));
        break;
      }
    }
  }
  Ok(summaries)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Settings;
  use crate::report::read_report;
  use tempfile::tempdir;
  use tokio::sync::mpsc::unbounded_channel;

  fn config(dir: &std::path::Path, size: usize, reps: usize) -> Config {
    Config::new(
      size,
      reps,
      Settings {
        output_dir: dir.to_path_buf(),
        seed: Some(17),
        ..Settings::default()
      },
    )
    .unwrap()
  }

  #[tokio::test]
  async fn test_two_repetitions_give_one_row_per_active_algorithm() {
    let temp = tempdir().unwrap();
    let config = config(temp.path(), 6, 2);
    let summary = run_benchmarks(&config, None).await.unwrap();

    assert_eq!(summary.failed_tasks, 0);
    for rows in [&summary.single_route, &summary.multi_route] {
      assert_eq!(rows.len(), config.algorithms.len());
      assert!(rows.iter().all(|r| r.samples == 2));
      assert!(rows.iter().all(|r| r.visited_percentage <= 100.0));
      assert!(rows.iter().all(|r| r.visited_nodes >= r.path_length));
    }

    let table = read_report(&summary.report_path).unwrap();
    assert_eq!(table.len(), 1 + 2 * config.algorithms.len());
    assert_eq!(table[1][0], "astar");
    assert_eq!(table[1][1], "true");
    assert_eq!(table[5][0], "astar");
    assert_eq!(table[5][1], "false");
    assert!(summary.report_path.ends_with("averages6x6x2.csv"));
  }

  #[tokio::test]
  async fn test_progress_lines_per_repetition() {
    let temp = tempdir().unwrap();
    let config = config(temp.path(), 4, 3);
    let (tx, mut rx) = unbounded_channel();
    run_benchmarks(&config, Some(&tx)).await.unwrap();
    drop(tx);

    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
      lines.push(line);
    }
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Completed test 1 of 3 for mazes with a single path for size: 4");
    assert_eq!(lines[5], "Completed test 3 of 3 for mazes with multiple paths for size: 4");
  }

  #[tokio::test]
  async fn test_zero_repetitions_fail_before_any_work() {
    let temp = tempdir().unwrap();
    let mut config = config(temp.path(), 5, 1);
    config.repetitions = 0;
    let err = run_benchmarks(&config, None).await.unwrap_err();
    assert!(matches!(
      err,
      HarnessError::Validation(ValidationError::NoRepetitions(0))
    ));
    assert!(!config.report_path().exists());
  }

  #[tokio::test]
  async fn test_one_by_one_maze_is_rejected() {
    let temp = tempdir().unwrap();
    let mut config = config(temp.path(), 5, 1);
    config.maze_size = 1;
    let err = run_benchmarks(&config, None).await.unwrap_err();
    assert!(matches!(
      err,
      HarnessError::Validation(ValidationError::MazeTooSmall(1))
    ));
  }

  #[tokio::test]
  async fn test_same_seed_same_paths() {
    let temp = tempdir().unwrap();
    let config = config(temp.path(), 6, 1);
    let a = run_benchmarks(&config, None).await.unwrap();
    let b = run_benchmarks(&config, None).await.unwrap();
    let lengths = |s: &BenchmarkSummary| s.multi_route.iter().map(|r| r.path_length).collect::<Vec<_>>();
    assert_eq!(lengths(&a), lengths(&b));
  }

  fn exploding(_: &mut crate::maze::Grid) -> Vec<crate::maze::Coord> {
    panic!("search blew up");
  }

  #[tokio::test]
  async fn test_failed_task_is_counted_and_dropped() {
    let layout = generate(5, 5, Topology::SingleRoute, &Default::default(), &mut get_rng(Some(2))).unwrap();
    let mut collector = MetricsCollector::new(Topology::SingleRoute);
    let mut failures = 0;

    for rep in 1..=3 {
      let mut tasks = vec![Task::new(Algorithm::Bfs, layout.instantiate())];
      tasks.push(if rep == 2 {
        Task {
          algorithm: Algorithm::Dfs,
          grid: layout.instantiate(),
          search: exploding,
        }
      } else {
        Task::new(Algorithm::Dfs, layout.instantiate())
      });
      tasks.push(Task {
        algorithm: Algorithm::WallFollower,
        grid: layout.instantiate(),
        search: exploding,
      });
      failures += record_batch(&mut collector, run_batch(tasks).await, rep);
    }

    assert_eq!(failures, 4);
    assert_eq!(collector.samples(Algorithm::Bfs), 3);
    assert_eq!(collector.samples(Algorithm::Dfs), 2);
    assert_eq!(collector.samples(Algorithm::WallFollower), 0);

    let rows = collector.aggregate();
    let algorithms: Vec<Algorithm> = rows.iter().map(|r| r.algorithm).collect();
    assert_eq!(algorithms, vec![Algorithm::Bfs, Algorithm::Dfs]);
    assert_eq!(rows[1].samples, 2);
  }

  #[tokio::test]
  async fn test_solve_once_returns_every_algorithm() {
    let temp = tempdir().unwrap();
    let config = config(temp.path(), 5, 1);
    let (layout, outcomes) = solve_once(&config, Topology::MultiRoute).await.unwrap();
    assert_eq!(layout.rows(), 11);
    let algorithms: Vec<Algorithm> = outcomes.iter().map(|o| o.algorithm).collect();
    assert_eq!(algorithms, config.algorithms);
    assert!(outcomes.iter().all(|o| o.path.first() == Some(&layout.start())));
  }

  #[tokio::test]
  async fn test_sweep_runs_each_size() {
    let temp = tempdir().unwrap();
    let config = config(temp.path(), 2, 1);
    let summaries = run_sweep(&config, 2, 2, 6, None).await.unwrap();
    let sizes: Vec<usize> = summaries.iter().map(|s| s.maze_size).collect();
    assert_eq!(sizes, vec![2, 4, 6]);
    assert!(temp.path().join("averages4x4x1.csv").exists());
  }

  #[tokio::test]
  async fn test_sweep_rejects_zero_step() {
    let temp = tempdir().unwrap();
    let config = config(temp.path(), 2, 1);
    assert!(run_sweep(&config, 2, 0, 6, None).await.is_err());
  }
}
