//! Genetic operators on policy genomes.
//!
//! - **Initialization**: [`Genome::random`] draws weights uniformly from `[-init, init]`
//! - **Crossover**: [`blx_alpha`] blends two parents gene by gene
//! - **Mutation**: [`mutate`] adds Gaussian noise to a random subset of genes
//!
//! Both operators keep every weight inside `[-max_weight, max_weight]`.
//! Unlike feature weights, policy weights are signed and scale-sensitive
//! (they feed `tanh` units), so no normalization step follows.
//!
//! # BLX-α
//!
//! For parent genes `x1`, `x2` with `d = |x2 - x1|`, the child gene is
//! drawn uniformly from `[min - α·d, max + α·d]`. `α = 0` keeps children
//! strictly between their parents; larger values explore beyond them.
//!
//! # Gaussian Mutation
//!
//! Each gene is perturbed with probability `rate` by a sample from
//! `N(0, sigma²)`.

use gapflight_engine::{Genome, GenomeLengthError};
use rand::Rng;
use rand_distr::Normal;

/// Failure of a genetic operator.
///
/// Operators are total on well-formed genomes; any of these errors points
/// at a defect in the caller and must not be retried.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum GenomeError {
    #[display("parent genomes differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[display("operator produced a malformed genome")]
    Malformed { source: GenomeLengthError },
    #[display("invalid mutation sigma {sigma}")]
    InvalidSigma {
        #[error(not(source))]
        sigma: f32,
    },
}

/// Performs BLX-α crossover between two parents.
pub fn blx_alpha<R>(
    p1: &Genome,
    p2: &Genome,
    alpha: f32,
    max_weight: f32,
    rng: &mut R,
) -> Result<Genome, GenomeError>
where
    R: Rng + ?Sized,
{
    let (w1, w2) = (p1.weights(), p2.weights());
    if w1.len() != w2.len() {
        return Err(GenomeError::LengthMismatch {
            left: w1.len(),
            right: w2.len(),
        });
    }
    let child = w1
        .iter()
        .zip(w2)
        .map(|(&x1, &x2)| {
            let min = f32::min(x1, x2);
            let max = f32::max(x1, x2);
            let d = max - min;
            let lower = min - alpha * d;
            let upper = max + alpha * d;
            rng.random_range(lower..=upper)
                .clamp(-max_weight, max_weight)
        })
        .collect();
    Genome::from_weights(child).map_err(|source| GenomeError::Malformed { source })
}

/// Applies Gaussian mutation in place.
///
/// `sigma` must be finite and non-negative; the genome is left untouched
/// otherwise.
pub fn mutate<R>(
    genome: &mut Genome,
    sigma: f32,
    max_weight: f32,
    rate: f32,
    rng: &mut R,
) -> Result<(), GenomeError>
where
    R: Rng + ?Sized,
{
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(GenomeError::InvalidSigma { sigma });
    }
    let normal = Normal::new(0.0, sigma).map_err(|_| GenomeError::InvalidSigma { sigma })?;
    for w in genome.weights_mut() {
        if rng.random_bool(rate.into()) {
            *w = (*w + rng.sample(normal)).clamp(-max_weight, max_weight);
        }
    }
    Ok(())
}
