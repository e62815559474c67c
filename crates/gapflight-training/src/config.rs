//! Run configuration.
//!
//! [`TrainingConfig`] is what a JSON config file deserializes into. Every
//! field has a default, so a file only needs the fields it changes.

use std::path::PathBuf;

use gapflight_engine::{CourseParams, GapColumn, Mode, ObstacleStream};
use serde::{Deserialize, Serialize};

use crate::evolution::EvolutionParams;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid mode `{value}` (expected one of gravity, helicopter, thrust)")]
    InvalidMode {
        #[error(not(source))]
        value: String,
    },
    #[display("population size must be positive")]
    NonPositivePopulation,
    #[display("checkpoint frequency must be positive")]
    ZeroCheckpointFrequency,
    #[display("camera speed must be positive")]
    ZeroCameraSpeed,
    #[display("fps must be positive")]
    ZeroFps,
    #[display("box gap must be positive")]
    ZeroBoxGap,
    #[display("gap rows must be in 1..={max}, got {gap_rows}")]
    GapRowsOutOfRange { gap_rows: usize, max: usize },
    #[display("elite count {elite_count} exceeds population size {population_size}")]
    EliteCountTooLarge {
        elite_count: usize,
        population_size: usize,
    },
    #[display("score margin must be at most {max}, got {score_margin}")]
    ScoreMarginTooLarge { score_margin: u32, max: u32 },
    #[display("tournament size must be positive")]
    ZeroTournamentSize,
    #[display("{name} must be in [0, 1], got {value}")]
    InvalidProbability {
        name: &'static str,
        #[error(not(source))]
        value: f32,
    },
    #[display("{name} must be a finite, non-negative number, got {value}")]
    InvalidParameter {
        name: &'static str,
        #[error(not(source))]
        value: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub mode: Mode,
    pub population_size: usize,
    /// Save survivors every this many generations.
    pub checkpoint_freq: u32,
    pub seed: u64,
    /// Pixels per tick.
    pub camera_speed: u32,
    /// Gap height in rows.
    pub gap_rows: usize,
    /// Horizontal spacing between columns, in box widths.
    pub box_gap: u32,
    /// Logical ticks per second; sets the spawn cadence together with `box_gap`.
    pub fps: u32,
    /// Agents are stopped once they get this far past the high score.
    pub score_margin: u32,
    pub checkpoint_dir: PathBuf,
    #[serde(flatten)]
    pub evolution: EvolutionParams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            population_size: 150,
            checkpoint_freq: 5,
            seed: 0,
            camera_speed: 8,
            gap_rows: 4,
            box_gap: 9,
            fps: 50,
            score_margin: 10_000,
            checkpoint_dir: PathBuf::from("checkpoint"),
            evolution: EvolutionParams::default(),
        }
    }
}

impl TrainingConfig {
    /// Largest gap that still fits below the lowest possible gap offset.
    pub const MAX_GAP_ROWS: usize = GapColumn::ROWS - *ObstacleStream::GAP_OFFSET_RANGE.end();
    /// Largest accepted `score_margin`.
    pub const MAX_SCORE_MARGIN: u32 = 100_000_000;

    /// Parses a mode name as given on the command line or in a config file.
    pub fn parse_mode(value: &str) -> Result<Mode, ConfigError> {
        value.parse().map_err(|_| ConfigError::InvalidMode {
            value: value.to_owned(),
        })
    }

    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::NonPositivePopulation);
        }
        if self.checkpoint_freq == 0 {
            return Err(ConfigError::ZeroCheckpointFrequency);
        }
        if self.camera_speed == 0 {
            return Err(ConfigError::ZeroCameraSpeed);
        }
        if self.fps == 0 {
            return Err(ConfigError::ZeroFps);
        }
        if self.box_gap == 0 {
            return Err(ConfigError::ZeroBoxGap);
        }
        if !(1..=Self::MAX_GAP_ROWS).contains(&self.gap_rows) {
            return Err(ConfigError::GapRowsOutOfRange {
                gap_rows: self.gap_rows,
                max: Self::MAX_GAP_ROWS,
            });
        }
        if self.score_margin > Self::MAX_SCORE_MARGIN {
            return Err(ConfigError::ScoreMarginTooLarge {
                score_margin: self.score_margin,
                max: Self::MAX_SCORE_MARGIN,
            });
        }

        let evolution = &self.evolution;
        if evolution.elite_count > self.population_size {
            return Err(ConfigError::EliteCountTooLarge {
                elite_count: evolution.elite_count,
                population_size: self.population_size,
            });
        }
        if evolution.tournament_size == 0 {
            return Err(ConfigError::ZeroTournamentSize);
        }
        for (name, value) in [
            ("mutation_rate", evolution.mutation_rate),
            ("fitness_floor_ratio", evolution.fitness_floor_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        for (name, value) in [
            ("blx_alpha", evolution.blx_alpha),
            ("mutation_sigma", evolution.mutation_sigma),
            ("max_weight", evolution.max_weight),
            ("init_weight", evolution.init_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }

    /// Course parameters derived from this configuration.
    #[must_use]
    pub fn course_params(&self) -> CourseParams {
        CourseParams {
            seed: self.seed,
            camera_speed: self.camera_speed,
            gap_rows: self.gap_rows,
            spawn_interval: ObstacleStream::spawn_interval(self.box_gap, self.fps, self.camera_speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainingConfig::default();
        config.validate().unwrap();
        assert_eq!(config.course_params(), CourseParams::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{ "mode": "gravity", "population_size": 10, "elite_count": 1 }"#)
                .unwrap();
        assert_eq!(config.mode, Mode::Gravity);
        assert_eq!(config.population_size, 10);
        assert_eq!(config.evolution.elite_count, 1);
        assert_eq!(config.checkpoint_freq, 5);
        assert_eq!(config.evolution.tournament_size, 3);
    }

    #[test]
    fn test_unknown_mode_in_file_is_rejected() {
        assert!(serde_json::from_str::<TrainingConfig>(r#"{ "mode": "rocket" }"#).is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(TrainingConfig::parse_mode("thrust").unwrap(), Mode::Thrust);
        let err = TrainingConfig::parse_mode("rocket").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode { value } if value == "rocket"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let invalid = [
            TrainingConfig {
                population_size: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                checkpoint_freq: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                camera_speed: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                gap_rows: 0,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                gap_rows: 8,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                population_size: 1,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                score_margin: u32::MAX,
                ..TrainingConfig::default()
            },
            TrainingConfig {
                evolution: EvolutionParams {
                    tournament_size: 0,
                    ..EvolutionParams::default()
                },
                ..TrainingConfig::default()
            },
            TrainingConfig {
                evolution: EvolutionParams {
                    mutation_rate: 1.5,
                    ..EvolutionParams::default()
                },
                ..TrainingConfig::default()
            },
            TrainingConfig {
                evolution: EvolutionParams {
                    mutation_sigma: f32::NAN,
                    ..EvolutionParams::default()
                },
                ..TrainingConfig::default()
            },
        ];
        for config in invalid {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_largest_gap_fits_the_field() {
        let config = TrainingConfig {
            gap_rows: TrainingConfig::MAX_GAP_ROWS,
            ..TrainingConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(TrainingConfig::MAX_GAP_ROWS, 7);
    }
}
