use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::difficulty::DifficultyPolicy;
use super::error::GameError;
use super::state::Cell;

/// Screen size in pixels the classic layout is derived from
pub const DEFAULT_SCREEN_WIDTH: u32 = 600;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 400;
/// Side length of one grid cell in pixels
pub const DEFAULT_CELL_SIZE: u32 = 20;
/// How long a food item stays on the board
pub const DEFAULT_FOOD_LIFETIME_MS: u64 = 8000;
pub const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 4096;

/// Dimensions of the playing grid, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub width: i32,
    pub height: i32,
}

impl GridGeometry {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Derive the grid from a pixel surface and the cell size
    pub fn from_screen(screen_width: u32, screen_height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        Self {
            width: (screen_width / cell_size) as i32,
            height: (screen_height / cell_size) as i32,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn center(&self) -> Cell {
        Cell::new(self.width / 2, self.height / 2)
    }

    /// Toroidal wrap of an arbitrary coordinate back onto the grid
    pub fn wrap(&self, cell: Cell) -> Cell {
        Cell::new(cell.x.rem_euclid(self.width), cell.y.rem_euclid(self.height))
    }

    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }

    /// Every cell of the grid in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self::from_screen(
            DEFAULT_SCREEN_WIDTH,
            DEFAULT_SCREEN_HEIGHT,
            DEFAULT_CELL_SIZE,
        )
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of the playing grid
    pub geometry: GridGeometry,
    /// Score thresholds for speed, walls and obstacles
    pub difficulty: DifficultyPolicy,
    /// Milliseconds a food item lives before it is moved
    pub food_lifetime_ms: u64,
    /// Random draws tried before falling back to a full scan for a free cell
    pub max_placement_attempts: u32,
    /// Seed for reproducible rounds; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            geometry: GridGeometry::default(),
            difficulty: DifficultyPolicy::default(),
            food_lifetime_ms: DEFAULT_FOOD_LIFETIME_MS,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            geometry: GridGeometry::new(width, height),
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Load a configuration from a JSON file; absent fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.geometry.width <= 0 || self.geometry.height <= 0 {
            return Err(GameError::InvalidConfig("grid must have at least one cell"));
        }
        if self.geometry.cell_count() < 2 {
            return Err(GameError::InvalidConfig(
                "grid needs room for the agent and its food",
            ));
        }
        if self.max_placement_attempts == 0 {
            return Err(GameError::InvalidConfig(
                "max_placement_attempts must be non-zero",
            ));
        }
        self.difficulty.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.geometry, GridGeometry::new(30, 20));
        assert_eq!(config.food_lifetime_ms, 8000);
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12);
        assert_eq!(config.geometry.width, 15);
        assert_eq!(config.geometry.height, 12);
    }

    #[test]
    fn test_geometry_from_screen() {
        assert_eq!(GridGeometry::from_screen(600, 400, 20), GridGeometry::new(30, 20));
        assert_eq!(GridGeometry::from_screen(610, 415, 20), GridGeometry::new(30, 20));
    }

    #[test]
    fn test_geometry_center_and_wrap() {
        let geometry = GridGeometry::new(30, 20);
        assert_eq!(geometry.center(), Cell::new(15, 10));
        assert_eq!(geometry.wrap(Cell::new(30, 5)), Cell::new(0, 5));
        assert_eq!(geometry.wrap(Cell::new(-1, 5)), Cell::new(29, 5));
        assert_eq!(geometry.wrap(Cell::new(4, -1)), Cell::new(4, 19));
        assert_eq!(geometry.wrap(Cell::new(4, 20)), Cell::new(4, 0));
    }

    #[test]
    fn test_geometry_cells() {
        let geometry = GridGeometry::new(3, 2);
        let cells: Vec<Cell> = geometry.cells().collect();
        assert_eq!(cells.len(), geometry.cell_count());
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[5], Cell::new(2, 1));
        assert!(cells.iter().all(|c| geometry.contains(*c)));
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        let config = GameConfig::new(0, 10);
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_single_cell_grid_rejected() {
        assert_eq!(
            GameConfig::new(1, 1).validate(),
            Err(GameError::InvalidConfig(
                "grid needs room for the agent and its food"
            ))
        );
        assert!(GameConfig::new(2, 1).validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "food_lifetime_ms": 5000, "rng_seed": 3 }"#).unwrap();
        assert_eq!(config.food_lifetime_ms, 5000);
        assert_eq!(config.rng_seed, Some(3));
        assert_eq!(config.geometry, GridGeometry::default());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "geometry": { "width": 12, "height": 8 } }"#).unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(config.geometry, GridGeometry::new(12, 8));
        assert_eq!(config.food_lifetime_ms, DEFAULT_FOOD_LIFETIME_MS);
    }

    #[test]
    fn test_missing_json_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GameConfig::from_json_file(&dir.path().join("nope.json")).is_err());
    }
}
