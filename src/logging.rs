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
use anyhow::Result;
use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Env var naming the log file. Unset or empty means stderr.
pub const LOG_FILE_ENV: &str = "MAZEBENCH_LOG_FILE";

/// Sets up the global tracing subscriber.
///
/// Reads the `MAZEBENCH_LOG_FILE` env var.
/// - If set, logs to that file (relative paths resolve against the working directory).
/// - If not set, logs to stderr.
///
/// Log level is controlled by the `RUST_LOG` env var (e.g., `RUST_LOG=debug`).
///
/// The returned guard flushes the file writer on drop; keep it alive until exit.
pub fn setup_tracing() -> Result<Option<WorkerGuard>> {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  match env::var(LOG_FILE_ENV) {
    Ok(log_file) if !log_file.is_empty() => {
      let path = Path::new(&log_file);
      let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
      let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("{LOG_FILE_ENV} does not name a file: {log_file}"))?;
      std::fs::create_dir_all(dir)?;

      let file_appender = tracing_appender::rolling::never(dir, file_name);
      let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

      tracing_subscriber::registry()
        .with(env_filter)
        .with(
          fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false), // No ANSI colors in files
        )
        .try_init()?;
      Ok(Some(guard))
    }
    _ => {
      tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
      Ok(None)
    }
  }
}
