//! Core simulation for the grid snake
//!
//! This module contains all the game logic without any terminal or rendering dependencies.
//! Side effects (sound, high score storage, time) go through the collaborators in
//! [`GameContext`].

pub mod action;
pub mod clock;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod food;
pub mod obstacle;
pub mod placement;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{GameConfig, GridGeometry};
pub use difficulty::{Difficulty, DifficultyPolicy, compute_difficulty};
pub use engine::{GameContext, GameEngine, Phase, Snapshot, StepResult};
pub use error::GameError;
pub use food::FoodSpawner;
pub use obstacle::ObstacleField;
pub use state::{AgentState, Cell, Collision, Outcome};
