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
use crate::cli::RunArgs;
use crate::cli::TuningArgs;
use crate::error::ConfigError;
use crate::error::HarnessError;
use crate::error::ValidationError;
use crate::maze::Carver;
use crate::maze::GeneratorOptions;
use crate::report::report_file_name;
use crate::search::Algorithm;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format;
use figment::providers::Json;
use figment::providers::Serialized;
use figment::providers::Toml;
use rand::RngCore;
use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error as _;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;

/// Generates a secure 64-bit seed.
fn generate_seed() -> u64 {
  let mut rng = rand::rng();
  rng.next_u64()
}

/// Tunables merged from defaults, an optional file, the environment and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub output_dir: PathBuf,
  #[serde(deserialize_with = "list_or_joined")]
  pub algorithms: Vec<Algorithm>,
  pub loop_density: f64,
  pub carver: Carver,
  pub seed: Option<u64>,
  pub marker: Option<String>,
}

impl Default for Settings {
  fn default() -> Self {
    let generator = GeneratorOptions::default();
    Settings {
      output_dir: PathBuf::from("./results"),
      algorithms: Algorithm::DEFAULT_ACTIVE.to_vec(),
      loop_density: generator.loop_density,
      carver: generator.carver,
      seed: None,
      marker: None,
    }
  }
}

impl Settings {
  /// Layers `tuning.config` (if any), `MAZEBENCH_*` variables and the explicit
  /// flags in `tuning` over the defaults.
  pub fn load(tuning: &TuningArgs) -> Result<Self, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(path) = &tuning.config {
      figment = merge_file(figment, path)?;
    }

    figment
      .merge(Env::prefixed("MAZEBENCH_").ignore(&["config", "log_file"]))
      .merge(Serialized::defaults(tuning))
      .extract()
      .map_err(|e| ConfigError::Extract(Box::new(e)))
  }
}

/// Accepts `["astar", "bfs"]` as well as `"astar,bfs"`, the form
/// `--algorithms` and `MAZEBENCH_ALGORITHMS` take.
fn list_or_joined<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Algorithm>, D::Error> {
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Listed {
    Seq(Vec<Algorithm>),
    Joined(String),
  }

  match Listed::deserialize(deserializer)? {
    Listed::Seq(algorithms) => Ok(algorithms),
    Listed::Joined(joined) => joined
      .split(',')
      .map(str::trim)
      .filter(|name| !name.is_empty())
      .map(|name| name.parse().map_err(D::Error::custom))
      .collect(),
  }
}

fn merge_file(figment: Figment, path: &Path) -> Result<Figment, ConfigError> {
  if !path.is_file() {
    return Err(ConfigError::FileNotFound(path.to_path_buf()));
  }
  match path.extension().and_then(|e| e.to_str()) {
    Some("toml") => Ok(figment.merge(Toml::file(path))),
    Some("json") => Ok(figment.merge(Json::file(path))),
    _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
  }
}

/// Fully validated and resolved configuration for one harness run.
#[derive(Debug, Clone)]
pub struct Config {
  pub maze_size: usize,
  pub repetitions: usize,
  pub algorithms: Vec<Algorithm>,
  pub generator: GeneratorOptions,
  pub seed: u64,
  pub output_dir: PathBuf,
  pub marker: Option<String>,
}

impl Config {
  pub fn new(maze_size: usize, repetitions: usize, settings: Settings) -> Result<Self, ValidationError> {
    let config = Config {
      maze_size,
      repetitions,
      algorithms: settings.algorithms,
      generator: GeneratorOptions {
        carver: settings.carver,
        loop_density: settings.loop_density,
      },
      seed: settings.seed.unwrap_or_else(generate_seed),
      output_dir: settings.output_dir,
      marker: settings.marker,
    };
    config.validate()?;
    Ok(config)
  }

  /// Resolves settings from every source, then validates.
  pub fn from_tuning(maze_size: usize, repetitions: usize, tuning: &TuningArgs) -> Result<Self, HarnessError> {
    let settings = Settings::load(tuning)?;
    Ok(Config::new(maze_size, repetitions, settings)?)
  }

  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.maze_size < 2 {
      return Err(ValidationError::MazeTooSmall(self.maze_size));
    }
    if self.maze_size > crate::maze::MAX_ROOMS {
      return Err(ValidationError::MazeTooLarge {
        size: self.maze_size,
        max: crate::maze::MAX_ROOMS,
      });
    }
    if self.repetitions == 0 {
      return Err(ValidationError::NoRepetitions(self.repetitions));
    }
    let density = self.generator.loop_density;
    if !(density > 0.0 && density <= 1.0) {
      return Err(ValidationError::LoopDensity(density));
    }
    if self.algorithms.is_empty() {
      return Err(ValidationError::NoAlgorithms);
    }
    if let Some(marker) = &self.marker {
      let is_plain_name = !marker.is_empty() && marker != ".." && !marker.contains(['/', '\\']);
      if !is_plain_name {
        return Err(ValidationError::InvalidMarker(marker.clone()));
      }
    }
    for (i, algorithm) in self.algorithms.iter().enumerate() {
      if self.algorithms[..i].contains(algorithm) {
        return Err(ValidationError::DuplicateAlgorithm(algorithm.to_string()));
      }
    }
    Ok(())
  }

  pub fn report_path(&self) -> PathBuf {
    self.output_dir.join(report_file_name(
      self.maze_size,
      self.repetitions,
      self.marker.as_deref(),
    ))
  }

  /// Same settings at another maze size.
  pub fn with_maze_size(&self, maze_size: usize) -> Result<Self, ValidationError> {
    let config = Config {
      maze_size,
      ..self.clone()
    };
    config.validate()?;
    Ok(config)
  }
}

impl TryFrom<RunArgs> for Config {
  type Error = HarnessError;

  fn try_from(
    RunArgs {
      maze_size,
      repetitions,
      marker_arg,
      mut tuning,
    }: RunArgs,
  ) -> Result<Self, Self::Error> {
    if marker_arg.is_some() {
      tuning.marker = marker_arg;
    }
    Config::from_tuning(maze_size, repetitions, &tuning)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::tempdir;

  /// Runs `f` while holding figment's environment lock.
  fn jailed(f: impl FnOnce()) {
    figment::Jail::expect_with(|_| {
      f();
      Ok(())
    });
  }

  fn settings() -> Settings {
    Settings {
      seed: Some(1),
      ..Settings::default()
    }
  }

  #[test]
  fn test_defaults_skip_dijkstra() {
    let config = Config::new(10, 3, settings()).unwrap();
    assert_eq!(config.algorithms, Algorithm::DEFAULT_ACTIVE.to_vec());
    assert_eq!(config.seed, 1);
    assert_eq!(config.report_path(), PathBuf::from("./results/averages10x10x3.csv"));
  }

  #[test]
  fn test_zero_repetitions_rejected() {
    let err = Config::new(10, 0, settings()).unwrap_err();
    assert_eq!(err, ValidationError::NoRepetitions(0));
  }

  #[test]
  fn test_tiny_maze_rejected() {
    let err = Config::new(1, 3, settings()).unwrap_err();
    assert_eq!(err, ValidationError::MazeTooSmall(1));
  }

  #[test]
  fn test_duplicate_and_empty_algorithms_rejected() {
    let dup = Settings {
      algorithms: vec![Algorithm::Bfs, Algorithm::Bfs],
      ..settings()
    };
    assert_eq!(
      Config::new(4, 1, dup).unwrap_err(),
      ValidationError::DuplicateAlgorithm("bfs".into())
    );
    let empty = Settings {
      algorithms: vec![],
      ..settings()
    };
    assert_eq!(Config::new(4, 1, empty).unwrap_err(), ValidationError::NoAlgorithms);
  }

  #[test]
  fn test_flags_override_file() {
    jailed(|| {
      let temp = tempdir().unwrap();
      let file = temp.path().join("bench.toml");
      fs::write(
        &file,
        "algorithms = [\"dijkstra\", \"bfs\"]\nloop_density = 0.3\ncarver = \"kruskal\"\nseed = 9\n",
      )
      .unwrap();

      let tuning = TuningArgs {
        config: Some(file),
        seed: Some(5),
        ..TuningArgs::default()
      };
      let settings = Settings::load(&tuning).unwrap();
      assert_eq!(settings.algorithms, vec![Algorithm::Dijkstra, Algorithm::Bfs]);
      assert_eq!(settings.loop_density, 0.3);
      assert_eq!(settings.carver, Carver::Kruskal);
      assert_eq!(settings.seed, Some(5));
    });
  }

  #[test]
  fn test_json_config_file() {
    jailed(|| {
      let temp = tempdir().unwrap();
      let file = temp.path().join("bench.json");
      fs::write(&file, r#"{"marker": "nightly", "algorithms": ["wallFollower"]}"#).unwrap();
      let tuning = TuningArgs {
        config: Some(file),
        ..TuningArgs::default()
      };
      let settings = Settings::load(&tuning).unwrap();
      assert_eq!(settings.marker.as_deref(), Some("nightly"));
      assert_eq!(settings.algorithms, vec![Algorithm::WallFollower]);
    });
  }

  #[test]
  fn test_comma_joined_algorithms_in_file() {
    jailed(|| {
      let temp = tempdir().unwrap();
      let file = temp.path().join("bench.json");
      fs::write(&file, r#"{"algorithms": "dfs, wallFollower"}"#).unwrap();
      let tuning = TuningArgs {
        config: Some(file),
        ..TuningArgs::default()
      };
      let settings = Settings::load(&tuning).unwrap();
      assert_eq!(settings.algorithms, vec![Algorithm::Dfs, Algorithm::WallFollower]);
    });
  }

  #[test]
  fn test_algorithms_from_env_in_both_forms() {
    figment::Jail::expect_with(|jail| {
      jail.set_env("MAZEBENCH_ALGORITHMS", "astar,bfs");
      let settings = Settings::load(&TuningArgs::default()).unwrap();
      assert_eq!(settings.algorithms, vec![Algorithm::AStar, Algorithm::Bfs]);

      jail.set_env("MAZEBENCH_ALGORITHMS", "[dijkstra,dfs]");
      let settings = Settings::load(&TuningArgs::default()).unwrap();
      assert_eq!(settings.algorithms, vec![Algorithm::Dijkstra, Algorithm::Dfs]);

      jail.set_env("MAZEBENCH_ALGORITHMS", "astar,greedy");
      assert!(Settings::load(&TuningArgs::default()).is_err());
      Ok(())
    });
  }

  #[test]
  fn test_missing_and_unknown_config_files() {
    let temp = tempdir().unwrap();
    let missing = TuningArgs {
      config: Some(temp.path().join("nope.toml")),
      ..TuningArgs::default()
    };
    assert!(matches!(Settings::load(&missing), Err(ConfigError::FileNotFound(_))));

    let yaml = temp.path().join("bench.yaml");
    fs::write(&yaml, "seed: 1").unwrap();
    let unknown = TuningArgs {
      config: Some(yaml),
      ..TuningArgs::default()
    };
    assert!(matches!(Settings::load(&unknown), Err(ConfigError::UnsupportedFormat(_))));
  }

  #[test]
  fn test_positional_marker_names_report() {
    let args = RunArgs {
      maze_size: 7,
      repetitions: 2,
      marker_arg: Some("laptop".into()),
      tuning: TuningArgs {
        seed: Some(1),
        ..TuningArgs::default()
      },
    };
    let config = Config::try_from(args).unwrap();
    assert_eq!(config.marker.as_deref(), Some("laptop"));
    assert!(config.report_path().ends_with("averages7x7x2xlaptop.csv"));
  }

  #[test]
  fn test_marker_with_path_separators_rejected() {
    for marker in ["../x", "a/b", "a\\b", "..", ""] {
      let bad = Settings {
        marker: Some(marker.to_string()),
        ..settings()
      };
      assert_eq!(
        Config::new(4, 1, bad).unwrap_err(),
        ValidationError::InvalidMarker(marker.to_string())
      );
    }
    let ok = Settings {
      marker: Some("nightly-2".into()),
      ..settings()
    };
    assert!(Config::new(4, 1, ok).unwrap().report_path().ends_with("averages4x4x1xnightly-2.csv"));
  }

  #[test]
  fn test_with_maze_size_revalidates() {
    let config = Config::new(4, 1, settings()).unwrap();
    assert_eq!(config.with_maze_size(30).unwrap().maze_size, 30);
    assert!(config.with_maze_size(1).is_err());
  }
}
