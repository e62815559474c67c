//! The training loop.
//!
//! A [`Trainer`] owns everything a run needs: the course, both cohorts, the
//! breeding RNG and the checkpoint store. Each call to [`Trainer::tick`]
//! advances the course by one step and moves every living agent; when the
//! last agent of both cohorts has died, the generation ends within the
//! same call:
//!
//! 1. the generation number is incremented and the high score updated,
//! 2. survivors are selected from the previous cohort followed by the
//!    current one, and reset to start a fresh life,
//! 3. a new cohort is bred from the survivors,
//! 4. the course is reset and reseeded,
//! 5. survivors are checkpointed if the new generation number is a
//!    multiple of the checkpoint frequency.
//!
//! The survivors then replay the course next to their offspring, so the
//! best known genome is re-scored on every generation.

use std::{
    mem,
    path::{Path, PathBuf},
};

use gapflight_engine::{Agent, AgentSprite, Course, Mode, Scene};
use rand_pcg::Pcg32;
use tracing::{debug, info, warn};

use crate::{
    FitnessStats,
    checkpoint::{CheckpointError, CheckpointStore},
    config::{ConfigError, TrainingConfig},
    evolution::{Evolution, EvolutionError, EvolutionPhase, SelectionError},
    population::Population,
};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainingError {
    #[display("invalid configuration")]
    Config { source: ConfigError },
    #[display("checkpoint failed")]
    Checkpoint { source: CheckpointError },
    #[display("selection failed")]
    Selection { source: SelectionError },
    #[display("breeding failed")]
    Evolution { source: EvolutionError },
}

/// Summary of a finished generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Number of the generation that just finished.
    pub generation: u32,
    /// Fitness over both cohorts.
    pub stats: Option<FitnessStats>,
    /// High score after the update.
    pub high_score: u32,
    /// Directory of the checkpoint written at this boundary.
    pub checkpoint: Option<PathBuf>,
}

#[derive(Debug, Clone, derive_more::IsVariant)]
pub enum TickOutcome {
    Running,
    GenerationCompleted(GenerationReport),
}

#[derive(Debug)]
pub struct Trainer {
    config: TrainingConfig,
    evolution: Evolution,
    course: Course,
    breeding_rng: Pcg32,
    current: Population,
    previous: Population,
    generation: u32,
    high_score: u32,
    phase: EvolutionPhase,
    store: CheckpointStore,
}

impl Trainer {
    /// Columns visible to policy agents.
    pub const WINDOW: usize = 4;
    /// Stream of the breeding RNG; the obstacle stream uses the default one.
    const BREEDING_STREAM: u64 = 0x0b5e_ed00;

    /// Starts a fresh run from random genomes.
    pub fn new(config: TrainingConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let mut trainer = Self::empty(config);
        let agents = trainer.evolution.generate_new_population(
            trainer.config.population_size,
            None,
            &mut trainer.breeding_rng,
        )?;
        trainer.current = Population::new(trainer.generation, agents);
        info!(
            mode = %trainer.config.mode,
            population = trainer.config.population_size,
            seed = trainer.config.seed,
            "starting fresh run"
        );
        Ok(trainer)
    }

    /// Resumes from the generation saved in `dir`.
    ///
    /// The loaded agents become the previous cohort and a new cohort is
    /// bred from them right away, so both are evaluated in the first
    /// generation after the checkpoint.
    pub fn resume(config: TrainingConfig, dir: &Path) -> Result<Self, TrainingError> {
        config.validate()?;
        let checkpoint = CheckpointStore::load(dir, config.mode)?;
        if checkpoint.agents.len() != config.population_size {
            warn!(
                loaded = checkpoint.agents.len(),
                population = config.population_size,
                "checkpoint size differs from the configured population size"
            );
        }

        let mut trainer = Self::empty(config);
        trainer.generation = checkpoint.generation + 1;
        trainer.high_score = checkpoint.best_fitness();

        let mut survivors = checkpoint.agents;
        let offspring = trainer.evolution.generate_new_population(
            trainer.config.population_size,
            Some(&survivors),
            &mut trainer.breeding_rng,
        )?;
        for agent in &mut survivors {
            agent.reset_values();
        }
        trainer.previous = Population::new(trainer.generation, survivors);
        trainer.current = Population::new(trainer.generation, offspring);
        info!(
            generation = trainer.generation,
            high_score = trainer.high_score,
            alive = trainer.num_alive(),
            "resumed from checkpoint"
        );
        Ok(trainer)
    }

    fn empty(config: TrainingConfig) -> Self {
        Self {
            evolution: Evolution::new(config.mode, config.evolution.clone()),
            course: Course::new(config.course_params()),
            breeding_rng: Pcg32::new(config.seed, Self::BREEDING_STREAM),
            current: Population::default(),
            previous: Population::default(),
            generation: 1,
            high_score: 0,
            phase: EvolutionPhase::Evaluating,
            store: CheckpointStore::new(config.checkpoint_dir.clone()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Step of the generation cycle the trainer is in.
    ///
    /// A generation ends inside a single [`Trainer::tick`], so between
    /// successful calls this is always [`EvolutionPhase::Evaluating`]. After
    /// a tick fails at a generation boundary it names the step that failed:
    /// selection errors leave [`EvolutionPhase::Selecting`], breeding and
    /// checkpoint errors leave [`EvolutionPhase::Breeding`].
    #[must_use]
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    #[must_use]
    pub fn camera(&self) -> u32 {
        self.course.camera()
    }

    /// Living agents across both cohorts.
    #[must_use]
    pub fn num_alive(&self) -> usize {
        self.current.alive_count() + self.previous.alive_count()
    }

    #[must_use]
    pub fn current(&self) -> &Population {
        &self.current
    }

    #[must_use]
    pub fn previous(&self) -> &Population {
        &self.previous
    }

    /// Advances the run by one tick, ending the generation if nobody is left.
    pub fn tick(&mut self) -> Result<TickOutcome, TrainingError> {
        self.course.advance();
        let camera = self.course.camera();
        let window = self.course.window(Self::WINDOW);
        let ceiling = self.high_score.saturating_add(self.config.score_margin);

        self.current.step(&window, camera, ceiling);
        self.previous.step(&window, camera, ceiling);

        if self.num_alive() > 0 {
            return Ok(TickOutcome::Running);
        }
        let report = self.end_generation()?;
        Ok(TickOutcome::GenerationCompleted(report))
    }

    /// Ticks until `should_quit` returns `true` for an outcome.
    ///
    /// The predicate is consulted after every tick, so a quit never
    /// interrupts a generation boundary halfway.
    pub fn run<F>(&mut self, mut should_quit: F) -> Result<(), TrainingError>
    where
        F: FnMut(&TickOutcome) -> bool,
    {
        loop {
            let outcome = self.tick()?;
            if should_quit(&outcome) {
                return Ok(());
            }
        }
    }

    fn end_generation(&mut self) -> Result<GenerationReport, TrainingError> {
        let finished = self.generation;
        let population_size = self.config.population_size;
        self.generation += 1;

        let mut pool = mem::take(&mut self.previous).into_agents();
        pool.append(&mut mem::take(&mut self.current).into_agents());

        let stats = FitnessStats::new(pool.iter().map(Agent::fitness));
        let best = pool.iter().map(Agent::fitness).max().unwrap_or(0);
        self.high_score = self.high_score.max(best);

        self.phase = EvolutionPhase::Selecting;
        let mut survivors =
            self.evolution
                .next_population_selection(pool, population_size, &mut self.breeding_rng)?;
        for agent in &mut survivors {
            agent.reset_values();
        }

        self.phase = EvolutionPhase::Breeding;
        let offspring = self.evolution.generate_new_population(
            population_size,
            Some(&survivors),
            &mut self.breeding_rng,
        )?;
        self.course.reset();

        let checkpoint = if self.generation % self.config.checkpoint_freq == 0 {
            Some(self.store.save(&survivors, self.generation, self.config.mode)?)
        } else {
            None
        };

        self.previous = Population::new(self.generation, survivors);
        self.current = Population::new(self.generation, offspring);
        self.phase = EvolutionPhase::Evaluating;

        if let Some(stats) = &stats {
            info!(
                generation = finished,
                max = stats.max,
                mean = stats.mean,
                median = stats.median,
                high_score = self.high_score,
                "generation finished"
            );
        }
        debug!(generation = self.generation, alive = self.num_alive(), "next generation");

        Ok(GenerationReport {
            generation: finished,
            stats,
            high_score: self.high_score,
            checkpoint,
        })
    }

    /// Snapshot for renderers.
    ///
    /// With `single`, only one agent is shown: the first living survivor,
    /// or else the first living offspring.
    #[must_use]
    pub fn scene(&self, single: bool) -> Scene {
        let agents = if single {
            self.previous
                .first_alive()
                .map(|a| AgentSprite::of(a, true))
                .or_else(|| self.current.first_alive().map(|a| AgentSprite::of(a, false)))
                .into_iter()
                .collect()
        } else {
            self.current
                .sprites(false)
                .chain(self.previous.sprites(true))
                .collect()
        };
        let camera = self.course.camera();
        Scene {
            mode: self.config.mode,
            camera,
            agents,
            obstacles: Scene::obstacles_on_screen(&self.course),
            generation: Some(self.generation),
            alive: self.num_alive(),
            high_score: self.high_score.max(camera),
            score: camera,
        }
    }
}
