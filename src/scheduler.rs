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
use crate::error::TaskError;
use crate::maze::Coord;
use crate::maze::Grid;
use crate::memory::HeapProbe;
use crate::search::Algorithm;
use crate::search::SearchFn;
use serde::Serialize;
use std::time::Instant;
use tokio::task::JoinError;
use tracing::Instrument;

/// One algorithm paired with the grid it owns for the duration of the run.
pub struct Task {
  pub algorithm: Algorithm,
  pub grid: Grid,
  pub search: SearchFn,
}

impl Task {
  pub fn new(algorithm: Algorithm, grid: Grid) -> Self {
    Task {
      algorithm,
      grid,
      search: algorithm.search_fn(),
    }
  }
}

/// Everything a worker reports back for one finished search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutcome {
  pub algorithm: Algorithm,
  pub elapsed_ms: f64,
  pub visited: Vec<Coord>,
  pub path: Vec<Coord>,
  pub memory_delta_bytes: i64,
  pub visited_percentage: f64,
}

/// Runs the search synchronously on the calling thread and measures it.
pub fn measure(task: Task) -> TaskOutcome {
  let Task {
    algorithm,
    mut grid,
    search,
  } = task;

  let probe = HeapProbe::start();
  let started = Instant::now();
  let visited = search(&mut grid);
  let elapsed = started.elapsed();
  let memory_delta_bytes = probe.delta();

  let path = grid.shortest_path();
  let visited_percentage = visited.len() as f64 / grid.open_count() as f64 * 100.0;

  TaskOutcome {
    algorithm,
    elapsed_ms: elapsed.as_secs_f64() * 1_000.0,
    visited,
    path,
    memory_delta_bytes,
    visited_percentage,
  }
}

/// Runs a single task on its own blocking worker. The worker inherits the
/// caller's span.
pub async fn run_one(task: Task) -> Result<TaskOutcome, TaskError> {
  let algorithm = task.algorithm;
  let span = tracing::Span::current();
  tokio::task::spawn_blocking(move || {
    let _enter = span.enter();
    tracing::debug!("Search started");
    measure(task)
  })
  .await
  .map_err(|e| task_error(algorithm, e))
}

/// Fans every task out through [`run_one`] and waits for all of them.
///
/// Results come back in task order. A panicking task yields an `Err` for that
/// task only; its siblings still run to completion.
pub async fn run_batch(tasks: Vec<Task>) -> Vec<(Algorithm, Result<TaskOutcome, TaskError>)> {
  let handles: Vec<_> = tasks
    .into_iter()
    .map(|task| {
      let algorithm = task.algorithm;
      let span = tracing::debug_span!("task", %algorithm);
      (algorithm, tokio::spawn(run_one(task).instrument(span)))
    })
    .collect();

  let mut results = Vec::with_capacity(handles.len());
  for (algorithm, handle) in handles {
    let result = match handle.await {
      Ok(result) => result,
      Err(e) => Err(task_error(algorithm, e)),
    };
    results.push((algorithm, result));
  }
  results
}

fn task_error(algorithm: Algorithm, err: JoinError) -> TaskError {
  let algorithm = algorithm.to_string();
  if !err.is_panic() {
    return TaskError::Cancelled { algorithm };
  }
  let payload = err.into_panic();
  let message = if let Some(s) = payload.downcast_ref::<&str>() {
    s.to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "non-string panic payload".to_string()
  };
  TaskError::Panicked { algorithm, message }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::maze::GeneratorOptions;
  use crate::maze::Topology;
  use crate::maze::generate;
  use crate::maze::get_rng;

  fn exploding(_: &mut Grid) -> Vec<Coord> {
    panic!("boom");
  }

  fn layout() -> crate::maze::Layout {
    generate(8, 8, Topology::MultiRoute, &GeneratorOptions::default(), &mut get_rng(Some(11))).unwrap()
  }

  #[test]
  fn test_measure_reports_percentage_and_path() {
    let layout = layout();
    let outcome = measure(Task::new(Algorithm::Bfs, layout.instantiate()));
    assert_eq!(outcome.algorithm, Algorithm::Bfs);
    assert!(outcome.elapsed_ms >= 0.0);
    assert!(outcome.visited_percentage > 0.0 && outcome.visited_percentage <= 100.0);
    assert_eq!(outcome.path.first(), Some(&layout.start()));
    assert_eq!(outcome.path.last(), Some(&layout.end()));
  }

  #[tokio::test]
  async fn test_batch_returns_one_result_per_task_in_order() {
    let layout = layout();
    let tasks = Algorithm::ALL
      .into_iter()
      .map(|a| Task::new(a, layout.instantiate()))
      .collect();
    let results = run_batch(tasks).await;
    let order: Vec<Algorithm> = results.iter().map(|(a, _)| *a).collect();
    assert_eq!(order, Algorithm::ALL.to_vec());
    assert!(results.iter().all(|(_, r)| r.is_ok()));
  }

  #[tokio::test]
  async fn test_panicking_task_does_not_poison_siblings() {
    let layout = layout();
    let tasks = vec![
      Task::new(Algorithm::Bfs, layout.instantiate()),
      Task {
        algorithm: Algorithm::Dfs,
        grid: layout.instantiate(),
        search: exploding,
      },
      Task::new(Algorithm::AStar, layout.instantiate()),
    ];
    let results = run_batch(tasks).await;
    assert_eq!(results.len(), 3);
    assert!(results[0].1.is_ok());
    assert!(results[2].1.is_ok());
    match &results[1].1 {
      Err(TaskError::Panicked { algorithm, message }) => {
        assert_eq!(algorithm, "dfs");
        assert_eq!(message, "boom");
      }
      other => panic!("expected a panic error, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_run_one() {
    let outcome = run_one(Task::new(Algorithm::Dijkstra, layout().instantiate()))
      .await
      .unwrap();
    assert!(!outcome.path.is_empty());
  }

  #[tokio::test]
  async fn test_run_one_turns_panic_into_error() {
    let task = Task {
      algorithm: Algorithm::WallFollower,
      grid: layout().instantiate(),
      search: exploding,
    };
    match run_one(task).await {
      Err(TaskError::Panicked { algorithm, message }) => {
        assert_eq!(algorithm, "wallFollower");
        assert_eq!(message, "boom");
      }
      other => panic!("expected a panic error, got {other:?}"),
    }
  }
}
