//! Selection and reproduction.
//!
//! A generation ends with two steps:
//!
//! 1. **Selection** ([`Evolution::next_population_selection`]) picks the
//!    survivors that will be replayed next to their offspring. The top
//!    `elite_count` agents of the combined pool are kept unconditionally,
//!    so the best fitness never decreases; the remaining slots are filled
//!    by tournaments drawn without replacement, which keeps weaker but
//!    different genomes in play.
//! 2. **Reproduction** ([`Evolution::generate_new_population`]) breeds
//!    fresh agents from the survivors: two parents are drawn by
//!    fitness-proportionate (roulette) selection, combined with BLX-α and
//!    mutated with Gaussian noise.
//!
//! # Fitness Floor
//!
//! Roulette weights are `max(fitness, floor)` with
//! `floor = max(1, fitness_floor_ratio × mean fitness)`. Without the floor
//! an agent that died at distance 0 could never become a parent, and a
//! pool of equally bad agents would have no valid distribution at all.
//!
//! # Determinism
//!
//! Both steps draw only from the RNG passed in, and ties in fitness are
//! broken by the agents' order in the pool, so a seeded RNG reproduces the
//! same survivors and offspring.

use std::cmp::Reverse;

use gapflight_engine::{Agent, Genome, Mode};
use rand::{
    Rng,
    distr::{Distribution as _, weighted::WeightedIndex},
    seq::index,
};
use serde::{Deserialize, Serialize};

use crate::operators::{self, GenomeError};

/// Parameters of the genetic operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Number of top agents kept unconditionally by selection.
    pub elite_count: usize,
    /// Agents drawn per selection tournament.
    pub tournament_size: usize,
    /// BLX-α exploration factor.
    pub blx_alpha: f32,
    /// Per-gene mutation probability.
    pub mutation_rate: f32,
    /// Standard deviation of the Gaussian mutation.
    pub mutation_sigma: f32,
    /// Weights are clamped to `[-max_weight, max_weight]`.
    pub max_weight: f32,
    /// Weights of first-generation genomes are drawn from `[-init_weight, init_weight]`.
    pub init_weight: f32,
    /// Roulette floor as a fraction of the mean fitness.
    pub fitness_floor_ratio: f32,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            elite_count: 2,
            tournament_size: 3,
            blx_alpha: 0.3,
            mutation_rate: 0.1,
            mutation_sigma: 0.3,
            max_weight: 4.0,
            init_weight: 1.0,
            fitness_floor_ratio: 0.05,
        }
    }
}

/// Where a run is in its generation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum EvolutionPhase {
    /// Agents are being stepped through the course.
    #[display("evaluating")]
    Evaluating,
    /// Survivors are being chosen from both cohorts.
    #[display("selecting")]
    Selecting,
    /// Offspring are being bred from the survivors.
    #[display("breeding")]
    Breeding,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SelectionError {
    #[display("cannot select {requested} agents from a pool of {available}")]
    PoolTooSmall { available: usize, requested: usize },
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("cannot breed from an empty pool of parents")]
    #[from(ignore)]
    EmptyParentPool,
    #[display("invalid parent weights")]
    ParentWeights { source: rand::distr::weighted::Error },
    #[display("genetic operator failed")]
    Genome { source: GenomeError },
}

/// The evolutionary engine for one run.
#[derive(Debug, Clone)]
pub struct Evolution {
    mode: Mode,
    params: EvolutionParams,
}

impl Evolution {
    #[must_use]
    pub fn new(mode: Mode, params: EvolutionParams) -> Self {
        Self { mode, params }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn params(&self) -> &EvolutionParams {
        &self.params
    }

    /// Breeds `count` new agents.
    ///
    /// Without parents (the first generation of a fresh run) every genome
    /// is random. Otherwise each child comes from two roulette-selected
    /// parents through crossover and mutation.
    pub fn generate_new_population<R>(
        &self,
        count: usize,
        parents: Option<&[Agent]>,
        rng: &mut R,
    ) -> Result<Vec<Agent>, EvolutionError>
    where
        R: Rng + ?Sized,
    {
        let Some(parents) = parents else {
            return Ok((0..count)
                .map(|_| Agent::new(self.mode, Genome::random(rng, self.params.init_weight)))
                .collect());
        };
        if parents.is_empty() {
            return Err(EvolutionError::EmptyParentPool);
        }

        let roulette = WeightedIndex::new(self.roulette_weights(parents))?;
        let mut children = Vec::with_capacity(count);
        for _ in 0..count {
            let p1 = &parents[roulette.sample(rng)];
            let p2 = &parents[roulette.sample(rng)];
            let mut child = operators::blx_alpha(
                p1.genome(),
                p2.genome(),
                self.params.blx_alpha,
                self.params.max_weight,
                rng,
            )?;
            operators::mutate(
                &mut child,
                self.params.mutation_sigma,
                self.params.max_weight,
                self.params.mutation_rate,
                rng,
            )?;
            children.push(Agent::new(self.mode, child));
        }
        Ok(children)
    }

    /// Chooses `count` survivors from `pool`.
    ///
    /// The pool is ranked by fitness (descending, stable in pool order).
    /// The top `elite_count` are taken as is; every remaining slot goes to
    /// the winner of a tournament among the agents not yet chosen.
    ///
    /// Fails if the pool holds fewer than `count` agents.
    pub fn next_population_selection<R>(
        &self,
        pool: Vec<Agent>,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Agent>, SelectionError>
    where
        R: Rng + ?Sized,
    {
        if pool.len() < count {
            return Err(SelectionError::PoolTooSmall {
                available: pool.len(),
                requested: count,
            });
        }

        let mut ranked = pool;
        ranked.sort_by_key(|agent| Reverse(agent.fitness()));

        let elite = self.params.elite_count.min(count);
        let mut selected: Vec<Agent> = ranked.drain(..elite).collect();
        while selected.len() < count {
            let winner = tournament_select(ranked.len(), self.params.tournament_size, rng);
            selected.push(ranked.remove(winner));
        }
        Ok(selected)
    }

    #[expect(clippy::cast_precision_loss)]
    fn roulette_weights(&self, parents: &[Agent]) -> Vec<f64> {
        let total: f64 = parents.iter().map(|p| f64::from(p.fitness())).sum();
        let mean = total / parents.len() as f64;
        let floor = f64::max(1.0, f64::from(self.params.fitness_floor_ratio) * mean);
        parents
            .iter()
            .map(|p| f64::max(f64::from(p.fitness()), floor))
            .collect()
    }
}

/// Runs one tournament over a ranked slice of length `len`.
///
/// Candidates are ranked best first, so the winner of a tournament is the
/// sampled position closest to the front. Returns that position.
fn tournament_select<R>(len: usize, tournament_size: usize, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    assert!(len > 0);
    let amount = tournament_size.clamp(1, len);
    index::sample(rng, len, amount)
        .into_iter()
        .min()
        .unwrap_or(0)
}
