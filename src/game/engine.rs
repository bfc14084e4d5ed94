use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use super::{
    action::Direction,
    clock::Clock,
    config::GameConfig,
    difficulty::Difficulty,
    error::GameError,
    food::FoodSpawner,
    obstacle::ObstacleField,
    state::{AgentState, Cell, Collision, Outcome},
};
use crate::audio::{AudioCue, Cue};
use crate::highscore::HighScoreStore;

/// Phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    GameOver,
}

/// Collaborators the engine delegates side effects to
pub struct GameContext {
    pub clock: Box<dyn Clock>,
    pub audio: Box<dyn AudioCue>,
    pub high_scores: Box<dyn HighScoreStore>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub outcome: Outcome,
    /// Whether the agent ate food this step
    pub ate_food: bool,
    /// Whether the food timed out and was moved before the agent advanced
    pub food_expired: bool,
    /// Obstacle spawned this step, if any
    pub obstacle_added: Option<Cell>,
    /// Whether this step ended the round with a new record
    pub new_high_score: bool,
}

impl StepResult {
    fn continuing() -> Self {
        Self {
            outcome: Outcome::Continue,
            ate_food: false,
            food_expired: false,
            obstacle_added: None,
            new_high_score: false,
        }
    }
}

/// Read-only view handed to the renderer once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub body: &'a [Cell],
    pub food: Cell,
    pub obstacles: &'a [Cell],
    pub score: u32,
    pub high_score: u32,
    pub walls_lethal: bool,
    pub paused: bool,
    pub phase: Phase,
    pub width: i32,
    pub height: i32,
}

/// Owns one round of the simulation and advances it tick by tick
pub struct GameEngine {
    config: GameConfig,
    context: GameContext,
    rng: StdRng,
    agent: AgentState,
    food: FoodSpawner,
    obstacles: ObstacleField,
    phase: Phase,
    difficulty: Difficulty,
    high_score: u32,
    pending_heading: Option<Direction>,
    ticks: u64,
    save_failure_reported: bool,
}

impl GameEngine {
    /// Create a new engine and start the first round
    pub fn new(config: GameConfig, context: GameContext) -> Result<Self, GameError> {
        config.validate()?;

        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let geometry = config.geometry;

        let agent = AgentState::new(geometry, &mut rng);
        let excluded: HashSet<Cell> = agent.body().iter().copied().collect();
        let food = FoodSpawner::new(
            geometry,
            config.food_lifetime_ms,
            config.max_placement_attempts,
            &mut rng,
            &excluded,
            context.clock.now_ms(),
        )?;
        let obstacles = ObstacleField::new(geometry, config.max_placement_attempts);
        let high_score = context.high_scores.load();
        let difficulty = config.difficulty.initial();

        info!(
            width = geometry.width,
            height = geometry.height,
            high_score,
            "round started"
        );

        Ok(Self {
            config,
            context,
            rng,
            agent,
            food,
            obstacles,
            phase: Phase::Running,
            difficulty,
            high_score,
            pending_heading: None,
            ticks: 0,
            save_failure_reported: false,
        })
    }

    /// Buffer a heading change for the next tick; the last one queued wins
    pub fn queue_turn(&mut self, direction: Direction) {
        self.pending_heading = Some(direction);
    }

    /// Execute one step of the game
    pub fn tick(&mut self) -> Result<StepResult, GameError> {
        if self.phase != Phase::Running {
            return Err(GameError::InvalidTransition {
                phase: self.phase,
                action: "tick",
            });
        }

        match self.step_running() {
            Err(err @ GameError::PlacementExhausted { .. }) => {
                warn!(%err, "grid is full, ending round");
                self.finish_round();
                Err(err)
            }
            other => other,
        }
    }

    fn step_running(&mut self) -> Result<StepResult, GameError> {
        let now = self.context.clock.now_ms();
        let mut result = StepResult::continuing();

        if let Some(direction) = self.pending_heading.take() {
            self.agent.set_heading(direction);
        }

        if self.food.is_expired(now) {
            let excluded = self.body_and_obstacles();
            let cell = self.food.place_avoiding(&mut self.rng, &excluded, now)?;
            debug!(x = cell.x, y = cell.y, "food expired, moved");
            result.food_expired = true;
        }

        self.ticks += 1;
        let outcome = self
            .agent
            .advance(self.difficulty.walls_lethal, self.obstacles.cells());

        if let Outcome::GameOver(collision) = outcome {
            result.outcome = outcome;
            result.new_high_score = self.finish_round_after(collision);
            return Ok(result);
        }

        if self.agent.head() == self.food.position() {
            self.agent.grow();
            self.context.audio.play(Cue::Eaten);
            result.ate_food = true;

            let score = self.agent.score();
            self.difficulty = self.config.difficulty.compute(score);
            if self.obstacles.len() < self.difficulty.target_obstacle_count {
                let mut excluded: HashSet<Cell> = self.agent.body().iter().copied().collect();
                excluded.insert(self.food.position());
                let cell = self.obstacles.add_one_avoiding(&mut self.rng, &excluded)?;
                debug!(x = cell.x, y = cell.y, count = self.obstacles.len(), "obstacle added");
                result.obstacle_added = Some(cell);
            }

            let excluded = self.body_and_obstacles();
            self.food.place_avoiding(&mut self.rng, &excluded, now)?;
            debug!(score, "food eaten");
        }

        self.difficulty = self.config.difficulty.compute(self.agent.score());
        Ok(result)
    }

    fn finish_round_after(&mut self, collision: Collision) -> bool {
        info!(?collision, score = self.agent.score(), ticks = self.ticks, "game over");
        self.finish_round()
    }

    /// Enter GameOver, play the cue, and record a new high score. Returns whether one was set.
    fn finish_round(&mut self) -> bool {
        self.phase = Phase::GameOver;
        self.context.audio.play(Cue::GameOver);

        let score = self.agent.score();
        if score <= self.high_score {
            return false;
        }

        self.high_score = score;
        info!(score, "new high score");
        if let Err(err) = self.context.high_scores.save(score) {
            if !self.save_failure_reported {
                warn!(error = %err, "could not persist high score");
                self.save_failure_reported = true;
            }
        }
        true
    }

    /// Start a new round after a game over
    pub fn reset(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::GameOver {
            return Err(GameError::InvalidTransition {
                phase: self.phase,
                action: "reset",
            });
        }

        // Food goes first so a failed placement leaves the finished round intact
        let agent = AgentState::new(self.config.geometry, &mut self.rng);
        let excluded: HashSet<Cell> = agent.body().iter().copied().collect();
        let now = self.context.clock.now_ms();
        self.food.place_avoiding(&mut self.rng, &excluded, now)?;

        self.agent = agent;
        self.obstacles.reset();
        self.difficulty = self.config.difficulty.initial();
        self.pending_heading = None;
        self.ticks = 0;
        self.phase = Phase::Running;
        info!(high_score = self.high_score, "round started");
        Ok(())
    }

    /// Restarts the food lifetime from now, leaving the food where it is
    pub fn restart_food_timer(&mut self) {
        let now = self.context.clock.now_ms();
        self.food.restamp(now);
    }

    fn body_and_obstacles(&self) -> HashSet<Cell> {
        self.agent
            .body()
            .iter()
            .chain(self.obstacles.cells())
            .copied()
            .collect()
    }

    pub fn snapshot(&self, paused: bool) -> Snapshot<'_> {
        Snapshot {
            body: self.agent.body(),
            food: self.food.position(),
            obstacles: self.obstacles.cells(),
            score: self.agent.score(),
            high_score: self.high_score,
            walls_lethal: self.difficulty.walls_lethal,
            paused,
            phase: self.phase,
            width: self.config.geometry.width,
            height: self.config.geometry.height,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Ticks per second the caller should pace the next tick at
    pub fn tick_rate(&self) -> u32 {
        self.difficulty.tick_rate
    }

    pub fn score(&self) -> u32 {
        self.agent.score()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    pub fn food(&self) -> &FoodSpawner {
        &self.food
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn audio(&self) -> &dyn AudioCue {
        self.context.audio.as_ref()
    }

    pub fn audio_mut(&mut self) -> &mut dyn AudioCue {
        self.context.audio.as_mut()
    }
}
