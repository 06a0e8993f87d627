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
use crate::error::ReportError;
use crate::metrics::AggregateMetrics;
use crate::search::Algorithm;
use serde::Serialize;
use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

/// Column names of the report table.
pub const HEADER: [&str; 7] = [
  "Algorithm",
  "SinglePath",
  "Time",
  "VisitedNodes",
  "VisitedPercentage",
  "PathLength",
  "MemoryUsed",
];

/// `averages<n>x<n>x<reps>[x<marker>].csv`
pub fn report_file_name(maze_size: usize, repetitions: usize, marker: Option<&str>) -> String {
  match marker {
    Some(marker) => format!("averages{maze_size}x{maze_size}x{repetitions}x{marker}.csv"),
    None => format!("averages{maze_size}x{maze_size}x{repetitions}.csv"),
  }
}

/// One CSV record, already formatted to the reporting precision.
#[derive(Debug, Serialize)]
struct ReportRow {
  algorithm: Algorithm,
  single_path: bool,
  time: String,
  visited_nodes: String,
  visited_percentage: String,
  path_length: String,
  memory_used: String,
}

impl From<&AggregateMetrics> for ReportRow {
  fn from(row: &AggregateMetrics) -> Self {
    ReportRow {
      algorithm: row.algorithm,
      single_path: row.topology.is_single_route(),
      time: format!("{:.4}", row.time_ms),
      visited_nodes: row.visited_nodes.to_string(),
      visited_percentage: format!("{:.2}", row.visited_percentage),
      path_length: row.path_length.to_string(),
      memory_used: format!("{:.2}", row.memory_mb),
    }
  }
}

/// Writes the header, the single-route rows, then the multi-route rows.
/// Creates the parent directory when needed.
pub fn write_report(
  path: &Path,
  single_route: &[AggregateMetrics],
  multi_route: &[AggregateMetrics],
) -> Result<(), ReportError> {
  if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
    fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
      path: dir.to_path_buf(),
      source,
    })?;
  }
  let write_err = |source| ReportError::Write {
    path: path.to_path_buf(),
    source,
  };
  let csv_err = |source| ReportError::Csv {
    path: path.to_path_buf(),
    source,
  };

  let file = File::create(path).map_err(write_err)?;
  // The header is written explicitly so an empty report still carries it.
  let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);
  wtr.write_record(HEADER).map_err(csv_err)?;
  for row in single_route.iter().chain(multi_route) {
    wtr.serialize(ReportRow::from(row)).map_err(csv_err)?;
  }
  wtr.flush().map_err(write_err)
}

/// Reads a report back as rows of fields, header included.
///
/// Every record must have as many fields as the header. An empty file yields
/// no rows.
pub fn read_report(path: &Path) -> Result<Vec<Vec<String>>, ReportError> {
  let file = File::open(path).map_err(|source| ReportError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  let mut rdr = csv::ReaderBuilder::new()
    .has_headers(false)
    .flexible(false)
    .from_reader(file);

  let rows = rdr
    .records()
    .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<String>>()))
    .collect::<Result<Vec<_>, _>>()
    .map_err(|source| ReportError::Csv {
      path: path.to_path_buf(),
      source,
    })?;

  if let Some(header) = rows.first() {
    if header.iter().map(String::as_str).ne(HEADER) {
      return Err(ReportError::Header {
        path: path.to_path_buf(),
        found: header.clone(),
      });
    }
  }
  Ok(rows)
}

/// Expands directories into the `.csv` files they contain, sorted by name.
pub fn collect_report_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, ReportError> {
  let mut files = Vec::new();
  for path in paths {
    if !path.is_dir() {
      files.push(path.clone());
      continue;
    }
    let entries = fs::read_dir(path).map_err(|source| ReportError::Read {
      path: path.clone(),
      source,
    })?;
    let mut found: Vec<PathBuf> = entries
      .filter_map(Result::ok)
      .map(|e| e.path())
      .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "csv"))
      .collect();
    found.sort();
    files.extend(found);
  }
  Ok(files)
}

/// Left-aligns every column, two spaces apart.
pub fn render_table(rows: &[Vec<String>]) -> String {
  let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
  let widths: Vec<usize> = (0..columns)
    .map(|c| rows.iter().filter_map(|r| r.get(c)).map(String::len).max().unwrap_or(0))
    .collect();

  let mut out = String::new();
  for row in rows {
    let line: Vec<String> = row
      .iter()
      .enumerate()
      .map(|(c, field)| format!("{field:<width$}", width = widths[c]))
      .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
  }
  out
}
