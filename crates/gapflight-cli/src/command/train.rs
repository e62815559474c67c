use std::path::{Path, PathBuf};

use anyhow::Context as _;
use gapflight_training::{TickOutcome, Trainer, TrainingConfig};

use super::ConfigArg;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    #[clap(flatten)]
    config: ConfigArg,
    /// Resume from a saved generation directory (e.g. checkpoint/gravity/20)
    #[arg(long)]
    checkpoint: Option<PathBuf>,
    /// Stop after this many generations (runs until killed otherwise)
    #[arg(long)]
    generations: Option<u32>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        config,
        checkpoint,
        generations,
    } = arg;

    let config = config.load()?;
    let mut trainer = start(config, checkpoint.as_deref())?;

    let mut completed = 0;
    let mut last_checkpoint = None;
    trainer.run(|outcome| {
        let TickOutcome::GenerationCompleted(report) = outcome else {
            return false;
        };
        completed += 1;
        if let Some(path) = &report.checkpoint {
            last_checkpoint = Some(path.clone());
        }
        generations.is_some_and(|limit| completed >= limit)
    })?;

    eprintln!("Training finished:");
    eprintln!("  Generations: {completed}");
    eprintln!("  Next generation: {}", trainer.generation());
    eprintln!("  High score: {}", trainer.high_score());
    match last_checkpoint {
        Some(path) => eprintln!("  Last checkpoint: {}", path.display()),
        None => eprintln!("  Last checkpoint: none"),
    }
    Ok(())
}

/// Creates the trainer, resuming from `checkpoint` if given.
pub(crate) fn start(
    config: TrainingConfig,
    checkpoint: Option<&Path>,
) -> anyhow::Result<Trainer> {
    match checkpoint {
        Some(path) => Trainer::resume(config, path)
            .with_context(|| format!("failed to resume from {}", path.display())),
        None => Trainer::new(config).context("failed to start training"),
    }
}
