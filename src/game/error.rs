use thiserror::Error;

use super::engine::Phase;

/// Errors raised by the simulation core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The requested operation is not valid in the current phase.
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition { phase: Phase, action: &'static str },
    /// Every cell of the grid is excluded, so nothing can be placed.
    #[error("no free cell after {attempts} attempts ({occupied} of {capacity} cells occupied)")]
    PlacementExhausted {
        attempts: u32,
        occupied: usize,
        capacity: usize,
    },
    /// Indicates an invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
