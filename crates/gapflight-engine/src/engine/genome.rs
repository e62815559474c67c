use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{SENSOR_COUNT, Sensors};

/// Error returned when a weight vector does not match the policy topology.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("genome has {actual} weights, expected {}", Genome::LEN)]
pub struct GenomeLengthError {
    pub actual: usize,
}

/// Heritable control policy of an agent.
///
/// The genome is the flat parameter vector of a fixed-topology network:
///
/// ```text
/// SENSOR_COUNT inputs -> HIDDEN tanh units -> 1 tanh output
/// ```
///
/// Weights are stored hidden-layer first, one row per hidden unit with its
/// bias last, followed by the output row with its bias last. The length is
/// fixed at [`Genome::LEN`]; any other length is rejected on construction
/// and on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Genome {
    weights: Vec<f32>,
}

impl Genome {
    /// Number of hidden units.
    pub const HIDDEN: usize = 8;
    /// Total number of weights and biases.
    pub const LEN: usize = Self::HIDDEN * (SENSOR_COUNT + 1) + Self::HIDDEN + 1;

    /// Wraps a weight vector, checking its length.
    pub fn from_weights(weights: Vec<f32>) -> Result<Self, GenomeLengthError> {
        if weights.len() != Self::LEN {
            return Err(GenomeLengthError {
                actual: weights.len(),
            });
        }
        Ok(Self { weights })
    }

    /// Creates a genome with every weight drawn uniformly from `[-limit, limit]`.
    pub fn random<R>(rng: &mut R, limit: f32) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = (0..Self::LEN)
            .map(|_| rng.random_range(-limit..=limit))
            .collect();
        Self { weights }
    }

    /// A genome with all weights zero. Its output is always `0.0`.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            weights: vec![0.0; Self::LEN],
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Mutable access to the weights. The length cannot change through this view.
    pub fn weights_mut(&mut self) -> &mut [f32] {
        &mut self.weights
    }

    /// Evaluates the network, returning a value in `[-1.0, 1.0]`.
    #[must_use]
    pub fn evaluate(&self, sensors: &Sensors) -> f32 {
        let inputs = sensors.values();
        let (hidden_weights, output_weights) =
            self.weights.split_at(Self::HIDDEN * (SENSOR_COUNT + 1));

        let mut sum = output_weights[Self::HIDDEN];
        for (row, out_w) in hidden_weights
            .chunks_exact(SENSOR_COUNT + 1)
            .zip(output_weights)
        {
            let activation = row[SENSOR_COUNT]
                + row[..SENSOR_COUNT]
                    .iter()
                    .zip(inputs)
                    .map(|(w, x)| w * x)
                    .sum::<f32>();
            sum += out_w * activation.tanh();
        }
        sum.tanh()
    }
}

impl TryFrom<Vec<f32>> for Genome {
    type Error = GenomeLengthError;

    fn try_from(weights: Vec<f32>) -> Result<Self, Self::Error> {
        Self::from_weights(weights)
    }
}

impl From<Genome> for Vec<f32> {
    fn from(genome: Genome) -> Self {
        genome.weights
    }
}
