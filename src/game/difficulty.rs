//! Score-driven difficulty curve
//!
//! Difficulty is a pure function of the score: the tick rate grows past one
//! threshold, walls turn lethal past another, and an obstacle quota appears
//! past a third.

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Settings derived from the score, consumed by the engine and the tick limiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Difficulty {
    /// Ticks per second the caller should run the simulation at
    pub tick_rate: u32,
    /// Whether leaving the grid ends the round instead of wrapping
    pub walls_lethal: bool,
    /// Number of obstacles the field should hold at this score
    pub target_obstacle_count: usize,
}

/// Thresholds of the difficulty curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyPolicy {
    /// Tick rate at the start of a round
    pub base_tick_rate: u32,
    /// Score from which the grid edges kill
    pub lethal_walls_at: u32,
    /// Score from which the tick rate starts climbing
    pub speed_up_at: u32,
    /// Points per additional tick per second
    pub speed_step: u32,
    /// Score at which the first obstacle appears
    pub obstacles_at: u32,
    /// Points per additional obstacle
    pub obstacle_step: u32,
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self {
            base_tick_rate: 5,
            lethal_walls_at: 10,
            speed_up_at: 20,
            speed_step: 5,
            obstacles_at: 30,
            obstacle_step: 5,
        }
    }
}

impl DifficultyPolicy {
    pub fn compute(&self, score: u32) -> Difficulty {
        let tick_rate = if score >= self.speed_up_at {
            self.base_tick_rate
                .saturating_add(1)
                .saturating_add((score - self.speed_up_at) / self.speed_step)
        } else {
            self.base_tick_rate
        };

        let target_obstacle_count = if score >= self.obstacles_at {
            1 + ((score - self.obstacles_at) / self.obstacle_step) as usize
        } else {
            0
        };

        Difficulty {
            tick_rate,
            walls_lethal: score >= self.lethal_walls_at,
            target_obstacle_count,
        }
    }

    /// Settings for a fresh round
    pub fn initial(&self) -> Difficulty {
        self.compute(0)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.base_tick_rate == 0 {
            return Err(GameError::InvalidConfig("base_tick_rate must be non-zero"));
        }
        if self.speed_step == 0 || self.obstacle_step == 0 {
            return Err(GameError::InvalidConfig("difficulty steps must be non-zero"));
        }
        Ok(())
    }
}

/// Difficulty under the default curve
pub fn compute_difficulty(score: u32) -> Difficulty {
    DifficultyPolicy::default().compute(score)
}
