use std::collections::HashSet;

use rand::Rng;

use super::config::GridGeometry;
use super::error::GameError;
use super::placement::sample_free_cell;
use super::state::Cell;

/// Static obstacles, in spawn order. Only grows during a round.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleField {
    geometry: GridGeometry,
    cells: Vec<Cell>,
    max_attempts: u32,
}

impl ObstacleField {
    pub fn new(geometry: GridGeometry, max_attempts: u32) -> Self {
        Self {
            geometry,
            cells: Vec::new(),
            max_attempts,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Add one obstacle on a random cell outside `excluded`
    pub fn add_one_avoiding<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        excluded: &HashSet<Cell>,
    ) -> Result<Cell, GameError> {
        // Never stack two obstacles on one cell
        let mut blocked = excluded.clone();
        blocked.extend(self.cells.iter().copied());

        let cell = sample_free_cell(rng, self.geometry, &blocked, self.max_attempts)?;
        self.cells.push(cell);
        Ok(cell)
    }

    pub fn reset(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_add_avoids_excluded_and_existing() {
        let mut rng = StdRng::seed_from_u64(4);
        let geometry = GridGeometry::new(3, 1);
        let mut field = ObstacleField::new(geometry, 32);
        let excluded: HashSet<Cell> = [Cell::new(0, 0)].into_iter().collect();

        let first = field.add_one_avoiding(&mut rng, &excluded).unwrap();
        let second = field.add_one_avoiding(&mut rng, &excluded).unwrap();

        assert_ne!(first, second);
        assert!(!excluded.contains(&first));
        assert!(!excluded.contains(&second));
        assert_eq!(field.cells(), &[first, second]);

        assert!(field.add_one_avoiding(&mut rng, &excluded).is_err());
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_reset_clears() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut field = ObstacleField::new(GridGeometry::new(10, 10), 32);
        field.add_one_avoiding(&mut rng, &HashSet::new()).unwrap();
        assert!(!field.is_empty());

        field.reset();
        assert!(field.is_empty());
    }
}
