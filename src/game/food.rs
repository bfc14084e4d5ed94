use std::collections::HashSet;

use rand::Rng;

use super::config::GridGeometry;
use super::error::GameError;
use super::placement::sample_free_cell;
use super::state::Cell;

/// The single food item on the board and its expiry timer
#[derive(Debug, Clone, PartialEq)]
pub struct FoodSpawner {
    geometry: GridGeometry,
    position: Cell,
    spawn_time_ms: u64,
    lifetime_ms: u64,
    max_attempts: u32,
}

impl FoodSpawner {
    /// Place the first food item avoiding `excluded`
    pub fn new<R: Rng + ?Sized>(
        geometry: GridGeometry,
        lifetime_ms: u64,
        max_attempts: u32,
        rng: &mut R,
        excluded: &HashSet<Cell>,
        now_ms: u64,
    ) -> Result<Self, GameError> {
        let mut food = Self {
            geometry,
            position: Cell::new(0, 0),
            spawn_time_ms: now_ms,
            lifetime_ms,
            max_attempts,
        };
        food.place_avoiding(rng, excluded, now_ms)?;
        Ok(food)
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn spawn_time_ms(&self) -> u64 {
        self.spawn_time_ms
    }

    pub fn lifetime_ms(&self) -> u64 {
        self.lifetime_ms
    }

    /// Move the food to a random free cell and restart its timer
    pub fn place_avoiding<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        excluded: &HashSet<Cell>,
        now_ms: u64,
    ) -> Result<Cell, GameError> {
        let cell = sample_free_cell(rng, self.geometry, excluded, self.max_attempts)?;
        self.position = cell;
        self.spawn_time_ms = now_ms;
        Ok(cell)
    }

    pub fn restamp(&mut self, now_ms: u64) {
        self.spawn_time_ms = now_ms;
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawn_time_ms) > self.lifetime_ms
    }

    #[cfg(test)]
    pub(crate) fn set_position(&mut self, cell: Cell) {
        self.position = cell;
    }
}
