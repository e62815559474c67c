//! On-disk snapshots of selected survivors.
//!
//! Layout: `<root>/<mode>/<generation>/<index>.json`, one
//! [`CheckpointRecord`] per agent. A generation directory is rewritten as a
//! whole on save, so it never mixes agents of two runs.

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use gapflight_engine::{Agent, Genome, Mode};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CheckpointError {
    #[display("no checkpoint found at {}", path.display())]
    NotFound {
        #[error(not(source))]
        path: PathBuf,
    },
    #[display("corrupt checkpoint record {}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[display("checkpoint directory {} is not named after a generation", path.display())]
    InvalidPath {
        #[error(not(source))]
        path: PathBuf,
    },
    #[display("checkpoint record {} is for mode {found}, expected {expected}", path.display())]
    ModeMismatch {
        #[error(not(source))]
        path: PathBuf,
        expected: Mode,
        found: Mode,
    },
    #[display("I/O error on {}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl CheckpointError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// One saved agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub mode: Mode,
    pub fitness: u32,
    pub saved_at: DateTime<Utc>,
    pub genome: Genome,
}

/// A loaded generation.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub generation: u32,
    /// Agents in file order, dead, with their recorded fitness.
    pub agents: Vec<Agent>,
}

impl Checkpoint {
    #[must_use]
    pub fn best_fitness(&self) -> u32 {
        self.agents.iter().map(Agent::fitness).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct CheckpointStore {
    root: PathBuf,
}

impl CheckpointStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn generation_dir(&self, mode: Mode, generation: u32) -> PathBuf {
        self.root.join(mode.to_string()).join(generation.to_string())
    }

    /// Writes `agents` as generation `generation`, replacing any earlier save.
    ///
    /// Returns the generation directory.
    pub fn save(
        &self,
        agents: &[Agent],
        generation: u32,
        mode: Mode,
    ) -> Result<PathBuf, CheckpointError> {
        let dir = self.generation_dir(mode, generation);
        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CheckpointError::io(&dir, e)),
        }
        fs::create_dir_all(&dir).map_err(|e| CheckpointError::io(&dir, e))?;

        let saved_at = Utc::now();
        for (i, agent) in agents.iter().enumerate() {
            let record = CheckpointRecord {
                mode,
                fitness: agent.fitness(),
                saved_at,
                genome: agent.genome().clone(),
            };
            let path = dir.join(format!("{i}.json"));
            write_record(&path, &record)?;
        }

        info!(
            generation,
            %mode,
            agents = agents.len(),
            path = %dir.display(),
            "saved checkpoint"
        );
        Ok(dir)
    }

    /// Loads a generation directory written by [`Self::save`].
    ///
    /// Every `*.json` file in `dir` is one agent; files are read in index
    /// order. Records must all be of `mode`.
    pub fn load(dir: &Path, mode: Mode) -> Result<Checkpoint, CheckpointError> {
        let generation = dir
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.parse::<u32>().ok())
            .ok_or_else(|| CheckpointError::InvalidPath {
                path: dir.to_owned(),
            })?;

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound {
                    path: dir.to_owned(),
                });
            }
            Err(e) => return Err(CheckpointError::io(dir, e)),
        };
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| CheckpointError::io(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        if paths.is_empty() {
            return Err(CheckpointError::NotFound {
                path: dir.to_owned(),
            });
        }
        paths.sort_by_cached_key(|path| {
            let index = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<usize>().ok());
            (index, path.clone())
        });

        let mut agents = Vec::with_capacity(paths.len());
        for path in paths {
            let record = read_record(&path)?;
            if record.mode != mode {
                return Err(CheckpointError::ModeMismatch {
                    path,
                    expected: mode,
                    found: record.mode,
                });
            }
            let mut agent = Agent::with_fitness(mode, record.genome, record.fitness);
            agent.kill(record.fitness);
            agents.push(agent);
        }

        info!(generation, %mode, agents = agents.len(), path = %dir.display(), "loaded checkpoint");
        Ok(Checkpoint { generation, agents })
    }
}

fn write_record(path: &Path, record: &CheckpointRecord) -> Result<(), CheckpointError> {
    let file = File::create(path).map_err(|e| CheckpointError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record).map_err(|e| CheckpointError::Io {
        path: path.to_owned(),
        source: e.into(),
    })?;
    writer.flush().map_err(|e| CheckpointError::io(path, e))
}

fn read_record(path: &Path) -> Result<CheckpointRecord, CheckpointError> {
    let file = File::open(path).map_err(|e| CheckpointError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        if source.is_io() {
            CheckpointError::Io {
                path: path.to_owned(),
                source: source.into(),
            }
        } else {
            CheckpointError::Corrupt {
                path: path.to_owned(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;
    use tempfile::TempDir;

    use super::*;

    fn test_store() -> (CheckpointStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = CheckpointStore::new(dir.path().join("checkpoint"));
        (store, dir)
    }

    fn sample_agents(count: usize) -> Vec<Agent> {
        let mut rng = Pcg32::seed_from_u64(3);
        (0..count)
            .map(|i| {
                let fitness = u32::try_from(i).unwrap() * 100;
                Agent::with_fitness(Mode::Thrust, Genome::random(&mut rng, 1.0), fitness)
            })
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let (store, _dir) = test_store();
        let agents = sample_agents(12);
        let path = store.save(&agents, 20, Mode::Thrust).unwrap();
        assert_eq!(path, store.root().join("thrust").join("20"));
        assert!(path.join("11.json").is_file());

        let loaded = CheckpointStore::load(&path, Mode::Thrust).unwrap();
        assert_eq!(loaded.generation, 20);
        assert_eq!(loaded.agents.len(), 12);
        // index order, not lexicographic order
        for (saved, loaded) in agents.iter().zip(&loaded.agents) {
            assert_eq!(saved.genome(), loaded.genome());
            assert_eq!(saved.fitness(), loaded.fitness());
            assert!(!loaded.is_alive());
        }
        assert_eq!(loaded.best_fitness(), 1100);
    }

    #[test]
    fn test_save_replaces_previous_generation() {
        let (store, _dir) = test_store();
        store.save(&sample_agents(5), 10, Mode::Thrust).unwrap();
        let path = store.save(&sample_agents(2), 10, Mode::Thrust).unwrap();
        let loaded = CheckpointStore::load(&path, Mode::Thrust).unwrap();
        assert_eq!(loaded.agents.len(), 2);
    }

    #[test]
    fn test_missing_and_empty_directories() {
        let (store, _dir) = test_store();
        let missing = store.generation_dir(Mode::Thrust, 5);
        assert!(matches!(
            CheckpointStore::load(&missing, Mode::Thrust),
            Err(CheckpointError::NotFound { .. })
        ));

        fs::create_dir_all(&missing).unwrap();
        assert!(matches!(
            CheckpointStore::load(&missing, Mode::Thrust),
            Err(CheckpointError::NotFound { .. })
        ));
    }

    #[test]
    fn test_generation_must_be_numeric() {
        let (store, _dir) = test_store();
        let path = store.root().join("thrust").join("latest");
        fs::create_dir_all(&path).unwrap();
        assert!(matches!(
            CheckpointStore::load(&path, Mode::Thrust),
            Err(CheckpointError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_corrupt_record() {
        let (store, _dir) = test_store();
        let path = store.save(&sample_agents(3), 5, Mode::Thrust).unwrap();
        fs::write(path.join("1.json"), "{ not json").unwrap();
        assert!(matches!(
            CheckpointStore::load(&path, Mode::Thrust),
            Err(CheckpointError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_wrong_genome_length_is_corrupt() {
        let (store, _dir) = test_store();
        let path = store.save(&sample_agents(1), 5, Mode::Thrust).unwrap();
        let record = serde_json::json!({
            "mode": "thrust",
            "fitness": 10,
            "saved_at": "2024-01-01T00:00:00Z",
            "genome": [0.0, 1.0, 2.0],
        });
        fs::write(path.join("0.json"), record.to_string()).unwrap();
        assert!(matches!(
            CheckpointStore::load(&path, Mode::Thrust),
            Err(CheckpointError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_mode_mismatch() {
        let (store, _dir) = test_store();
        let path = store.save(&sample_agents(2), 5, Mode::Thrust).unwrap();
        let err = CheckpointStore::load(&path, Mode::Gravity).unwrap_err();
        assert!(matches!(
            err,
            CheckpointError::ModeMismatch {
                expected: Mode::Gravity,
                found: Mode::Thrust,
                ..
            }
        ));
    }
}
