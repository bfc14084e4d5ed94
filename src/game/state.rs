use rand::Rng;
use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::GridGeometry;
use super::error::GameError;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// What ended the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Agent left the grid while walls were lethal
    Wall,
    /// Agent ran into its own body
    SelfCollision,
    /// Agent ran into an obstacle
    Obstacle,
}

/// Result of advancing the agent one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    GameOver(Collision),
}

impl Outcome {
    pub fn is_game_over(&self) -> bool {
        matches!(self, Outcome::GameOver(_))
    }
}

/// The player-controlled snake
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    geometry: GridGeometry,
    /// Body segments, with head at index 0
    body: Vec<Cell>,
    /// Length the body grows toward
    target_length: usize,
    heading: Direction,
    score: u32,
}

impl AgentState {
    /// A length-1 agent at the grid center with a random heading
    pub fn new<R: Rng + ?Sized>(geometry: GridGeometry, rng: &mut R) -> Self {
        Self {
            geometry,
            body: vec![geometry.center()],
            target_length: 1,
            heading: Direction::random(rng),
            score: 0,
        }
    }

    /// An agent occupying `body` (head first), with a target length matching it
    pub fn with_body(
        geometry: GridGeometry,
        body: Vec<Cell>,
        heading: Direction,
    ) -> Result<Self, GameError> {
        if body.is_empty() {
            return Err(GameError::InvalidConfig("agent body needs a head"));
        }
        Ok(Self {
            geometry,
            target_length: body.len(),
            body,
            heading,
            score: 0,
        })
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Never true; the head is always present
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Change heading; reversing into the neck is ignored once the body is longer than one cell
    pub fn set_heading(&mut self, direction: Direction) {
        if self.body.len() > 1 && self.heading.is_opposite(direction) {
            return;
        }
        self.heading = direction;
    }

    /// Move one cell along the heading.
    ///
    /// Checks run in the order wall, self, obstacle. On game over the body is
    /// left untouched.
    pub fn advance(&mut self, walls_lethal: bool, obstacles: &[Cell]) -> Outcome {
        let mut new_head = self.head().moved_in_direction(self.heading);

        if walls_lethal {
            if !self.geometry.contains(new_head) {
                return Outcome::GameOver(Collision::Wall);
            }
        } else {
            new_head = self.geometry.wrap(new_head);
        }

        // The tail cell still counts here even though it would be vacated this tick.
        if self.body.len() > 2 && self.body.contains(&new_head) {
            return Outcome::GameOver(Collision::SelfCollision);
        }

        if obstacles.contains(&new_head) {
            return Outcome::GameOver(Collision::Obstacle);
        }

        self.body.insert(0, new_head);
        if self.body.len() > self.target_length {
            self.body.pop();
        }

        Outcome::Continue
    }

    /// Register one food item: the body catches up on the following advances
    pub fn grow(&mut self) {
        self.target_length += 1;
        self.score += 1;
    }

    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        *self = Self::new(self.geometry, rng);
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
