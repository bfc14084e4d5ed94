use std::collections::HashSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use super::config::GridGeometry;
use super::error::GameError;
use super::state::Cell;

/// Pick a uniformly random cell not in `excluded`.
///
/// Rejection sampling runs for at most `max_attempts` draws; after that the free
/// cells are enumerated and one is chosen directly, so only a full grid fails.
pub fn sample_free_cell<R: Rng + ?Sized>(
    rng: &mut R,
    geometry: GridGeometry,
    excluded: &HashSet<Cell>,
    max_attempts: u32,
) -> Result<Cell, GameError> {
    for _ in 0..max_attempts {
        let cell = Cell::new(
            rng.gen_range(0..geometry.width),
            rng.gen_range(0..geometry.height),
        );
        if !excluded.contains(&cell) {
            return Ok(cell);
        }
    }

    geometry
        .cells()
        .filter(|cell| !excluded.contains(cell))
        .choose(rng)
        .ok_or(GameError::PlacementExhausted {
            attempts: max_attempts,
            occupied: excluded.len(),
            capacity: geometry.cell_count(),
        })
}
