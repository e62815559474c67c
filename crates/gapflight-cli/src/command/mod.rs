use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use gapflight_training::TrainingConfig;
use tracing_subscriber::EnvFilter;

use self::{play::PlayArg, train::TrainArg, watch::WatchArg};

mod play;
mod train;
mod watch;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write log output to this file (terminal front ends log nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// What to run
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Fly a single agent with the keyboard
    Play(#[clap(flatten)] PlayArg),
    /// Train agents and watch them in the terminal
    Watch(#[clap(flatten)] WatchArg),
    /// Train agents without a display
    Train(#[clap(flatten)] TrainArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let command = args
        .command
        .unwrap_or_else(|| Command::Play(PlayArg::default()));
    let draws_terminal = !matches!(command, Command::Train(_));
    init_tracing(args.log_file.as_deref(), draws_terminal)?;

    match command {
        Command::Play(arg) => play::run(&arg)?,
        Command::Watch(arg) => watch::run(&arg)?,
        Command::Train(arg) => train::run(&arg)?,
    }
    Ok(())
}

/// Installs the log subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Logs go to
/// `log_file` if given, else to stderr unless a terminal front end owns
/// the screen.
fn init_tracing(log_file: Option<&Path>, draws_terminal: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file: {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None if draws_terminal => builder.with_writer(io::sink).try_init(),
        None => builder.with_writer(io::stderr).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!(e))
}

/// Run parameters shared by every command.
///
/// Values are layered: built-in defaults, then the `--config` file, then
/// the flags given here.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// JSON file with run parameters
    #[arg(long)]
    config: Option<PathBuf>,
    /// Physics mode (gravity, helicopter or thrust)
    #[arg(long)]
    mode: Option<String>,
    /// Agents per generation
    #[arg(long)]
    population_size: Option<usize>,
    /// Save survivors every N generations
    #[arg(long)]
    checkpoint_freq: Option<u32>,
    /// Seed of the obstacle course and of breeding
    #[arg(long)]
    seed: Option<u64>,
    /// Camera speed in pixels per tick
    #[arg(long)]
    camera_speed: Option<u32>,
    /// Height of each gap in rows
    #[arg(long)]
    gap_rows: Option<usize>,
    /// Directory checkpoints are written to
    #[arg(long)]
    checkpoint_dir: Option<PathBuf>,
    /// Agents kept unconditionally by selection
    #[arg(long)]
    elite_count: Option<usize>,
    /// Agents per selection tournament
    #[arg(long)]
    tournament_size: Option<usize>,
    /// Per-gene mutation probability
    #[arg(long)]
    mutation_rate: Option<f32>,
    /// Standard deviation of the mutation noise
    #[arg(long)]
    mutation_sigma: Option<f32>,
}

impl ConfigArg {
    /// Builds and validates the run configuration.
    pub(crate) fn load(&self) -> anyhow::Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => read_config_file(path)?,
            None => TrainingConfig::default(),
        };
        self.apply(&mut config)?;
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn apply(&self, config: &mut TrainingConfig) -> anyhow::Result<()> {
        if let Some(mode) = &self.mode {
            config.mode = TrainingConfig::parse_mode(mode)?;
        }
        override_with(&mut config.population_size, self.population_size);
        override_with(&mut config.checkpoint_freq, self.checkpoint_freq);
        override_with(&mut config.seed, self.seed);
        override_with(&mut config.camera_speed, self.camera_speed);
        override_with(&mut config.gap_rows, self.gap_rows);
        override_with(&mut config.checkpoint_dir, self.checkpoint_dir.clone());
        let evolution = &mut config.evolution;
        override_with(&mut evolution.elite_count, self.elite_count);
        override_with(&mut evolution.tournament_size, self.tournament_size);
        override_with(&mut evolution.mutation_rate, self.mutation_rate);
        override_with(&mut evolution.mutation_sigma, self.mutation_sigma);
        Ok(())
    }
}

fn override_with<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<TrainingConfig> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(config)
}
