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
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use mazebench::benchmark::ProgressSender;
use mazebench::benchmark::run_benchmarks;
use mazebench::benchmark::run_sweep;
use mazebench::benchmark::solve_once;
use mazebench::cli::Cli;
use mazebench::cli::Commands;
use mazebench::cli::ShowArgs;
use mazebench::cli::SweepArgs;
use mazebench::cli::TraceArgs;
use mazebench::config::Config;
use mazebench::logging::setup_tracing;
use mazebench::maze::Topology;
use mazebench::memory::TrackingAllocator;
use mazebench::report::collect_report_files;
use mazebench::report::read_report;
use mazebench::report::render_table;
use mazebench::search::Algorithm;
use mazebench::trace::build_trace;
use mazebench::trace::write_trace;
use std::path::PathBuf;
use tokio::sync::mpsc::unbounded_channel;
use tracing::Instrument;

#[global_allocator]
static ALLOCATOR: TrackingAllocator = TrackingAllocator;

#[tokio::main]
async fn main() -> Result<()> {
  let _guard = setup_tracing()?;

  let Cli { command } = Cli::parse();

  // Progress lines go to stdout in the order the harness produced them.
  let (tx, mut rx) = unbounded_channel::<String>();
  let printer = tokio::spawn(async move {
    while let Some(line) = rx.recv().await {
      println!("{line}");
    }
  });

  let result = execute(command, &tx)
    .instrument(tracing::info_span!("mazebench"))
    .await;

  drop(tx);
  printer.await?;
  result
}

async fn execute(command: Commands, progress: &ProgressSender) -> Result<()> {
  match command {
    Commands::Run(run_args) => {
      tracing::info!("Initializing Benchmark Run...");
      let config = Config::try_from(run_args).context("Failed to resolve run configuration")?;
      let summary = run_benchmarks(&config, Some(progress))
        .await
        .with_context(|| format!("Benchmark run for size {} failed", config.maze_size))?;
      if summary.failed_tasks > 0 {
        tracing::warn!(failed = summary.failed_tasks, "Some tasks failed and were excluded");
      }
      println!("Results saved to {}", summary.report_path.display());
    }
    Commands::Sweep(args) => sweep(args, progress).await?,
    Commands::Show(args) => show(args).await?,
    Commands::Trace(args) => trace(args).await?,
    Commands::Report { paths } => report(&paths)?,
  }
  Ok(())
}

async fn sweep(
  SweepArgs {
    start,
    step,
    max_size,
    repetitions,
    tuning,
  }: SweepArgs,
  progress: &ProgressSender,
) -> Result<()> {
  tracing::info!(start, step, max_size, "Initializing Sweep...");
  let base = Config::from_tuning(start, repetitions, &tuning).context("Failed to resolve sweep configuration")?;
  let summaries = run_sweep(&base, start, step, max_size, Some(progress)).await?;
  for summary in &summaries {
    println!("Results saved to {}", summary.report_path.display());
  }
  Ok(())
}

fn topology(multi_route: bool) -> Topology {
  if multi_route {
    Topology::MultiRoute
  } else {
    Topology::SingleRoute
  }
}

async fn show(
  ShowArgs {
    maze_size,
    multi_route,
    tuning,
  }: ShowArgs,
) -> Result<()> {
  let config = Config::from_tuning(maze_size, 1, &tuning)?;
  let (layout, outcomes) = solve_once(&config, topology(multi_route)).await?;
  println!("Maze {maze_size}x{maze_size} (seed {})", config.seed);
  for outcome in outcomes {
    println!(
      "\n{}: visited {} cells ({:.2}%), path length {}, {:.4} ms",
      outcome.algorithm,
      outcome.visited.len(),
      outcome.visited_percentage,
      outcome.path.len(),
      outcome.elapsed_ms
    );
    print!("{}", layout.instantiate().render_ascii(&outcome.path));
  }
  Ok(())
}

async fn trace(
  TraceArgs {
    maze_size,
    multi_route,
    out,
    tuning,
  }: TraceArgs,
) -> Result<()> {
  let mut config = Config::from_tuning(maze_size, 1, &tuning)?;
  if tuning.algorithms.is_none() {
    config.algorithms = Algorithm::ALL.to_vec();
  }
  let topology = topology(multi_route);
  let (layout, outcomes) = solve_once(&config, topology).await?;
  let document = build_trace(maze_size, topology, &layout, &outcomes)?;
  write_trace(&out, &document).with_context(|| format!("Cannot save trace to {}", out.display()))?;
  tracing::info!(path = %out.display(), runs = document.runs.len(), "Trace written");
  println!("Trace saved to {}", out.display());
  Ok(())
}

fn report(paths: &[PathBuf]) -> Result<()> {
  for file in collect_report_files(paths)? {
    let rows = read_report(&file).with_context(|| format!("Cannot render {}", file.display()))?;
    println!("{}", file.display());
    print!("{}", render_table(&rows));
  }
  Ok(())
}
