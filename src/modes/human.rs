use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stdout, stdout};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info, warn};

use super::Screen;
use crate::game::{Command, GameConfig, GameContext, GameEngine, GameError};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, View};

fn tick_period(tick_rate: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(tick_rate.max(1)))
}

fn paced_interval(tick_rate: u32) -> Interval {
    let period = tick_period(tick_rate);
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Keyboard play in the terminal
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    screen: Screen,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, context: GameContext) -> Result<Self> {
        let engine = GameEngine::new(config, context).context("Failed to start game engine")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            screen: Screen::Menu,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_rate = self.engine.tick_rate();
        let mut tick_timer = paced_interval(tick_rate);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                        // A restart drops back to the starting pace
                        self.sync_tick_timer(&mut tick_rate, &mut tick_timer);
                    }
                }

                // Game logic tick, paced by the difficulty curve
                _ = tick_timer.tick() => {
                    self.update_game()?;
                    self.sync_tick_timer(&mut tick_rate, &mut tick_timer);
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(self.screen.is_ticking());
                    let view = self.view();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &view);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn sync_tick_timer(&self, tick_rate: &mut u32, tick_timer: &mut Interval) {
        let current = self.engine.tick_rate();
        if current != *tick_rate {
            *tick_rate = current;
            debug!(tick_rate = current, "tick rate changed");
            *tick_timer = paced_interval(current);
        }
    }

    fn view(&self) -> View<'_> {
        View {
            screen: self.screen,
            snapshot: self.engine.snapshot(self.screen == Screen::Paused),
            metrics: &self.metrics,
            audio: self.engine.audio().settings(),
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            let action = self.input_handler.handle_key_event(key, self.screen);
            self.handle_action(action)?;
        }

        Ok(())
    }

    fn handle_action(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::GameCommand(command) => self.apply_command(command),
            KeyAction::Start => {
                if self.screen == Screen::Menu {
                    // Time spent on the menu does not count against the first food
                    self.engine.restart_food_timer();
                    self.screen = Screen::Playing;
                    self.metrics.on_round_start();
                    info!("game started from menu");
                }
            }
            KeyAction::Restart => {
                if self.screen == Screen::GameOver {
                    self.engine.reset().context("Failed to restart round")?;
                    self.screen = Screen::Playing;
                    self.metrics.on_round_start();
                }
            }
            KeyAction::None => {}
        }

        Ok(())
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => {
                if self.screen == Screen::Playing {
                    self.engine.queue_turn(direction);
                }
            }
            Command::TogglePause => {
                self.screen = match self.screen {
                    Screen::Playing => Screen::Paused,
                    Screen::Paused => Screen::Playing,
                    other => other,
                };
            }
            Command::ToggleMusic => {
                let mut settings = self.engine.audio().settings();
                settings.music = !settings.music;
                self.engine.audio_mut().apply(settings);
            }
            Command::ToggleSfx => {
                let mut settings = self.engine.audio().settings();
                settings.sfx = !settings.sfx;
                self.engine.audio_mut().apply(settings);
            }
            Command::Quit => {
                self.should_quit = true;
            }
        }
    }

    fn update_game(&mut self) -> Result<()> {
        if !self.screen.is_ticking() {
            return Ok(());
        }

        match self.engine.tick() {
            Ok(result) => {
                self.metrics.observe_length(self.engine.agent().len());
                if result.outcome.is_game_over() {
                    self.on_game_over();
                }
                Ok(())
            }
            Err(err @ GameError::PlacementExhausted { .. }) => {
                warn!(%err, "round ended early");
                self.on_game_over();
                Ok(())
            }
            Err(err) => Err(err).context("Simulation step failed"),
        }
    }

    fn on_game_over(&mut self) {
        self.screen = Screen::GameOver;
        self.metrics.on_game_over(self.engine.score());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioSettings, Silent};
    use crate::game::{Direction, ManualClock, Phase};
    use crate::highscore::MemoryHighScoreStore;

    fn mode() -> HumanMode {
        mode_with_clock(ManualClock::new(0))
    }

    fn mode_with_clock(clock: ManualClock) -> HumanMode {
        let context = GameContext {
            clock: Box::new(clock),
            audio: Box::new(Silent::default()),
            high_scores: Box::new(MemoryHighScoreStore::new(0)),
        };
        HumanMode::new(GameConfig::default().with_seed(5), context).unwrap()
    }

    fn start(mode: &mut HumanMode) {
        mode.handle_action(KeyAction::Start).unwrap();
    }

    #[test]
    fn test_starts_on_menu() {
        let mut mode = mode();
        assert_eq!(mode.screen, Screen::Menu);

        mode.update_game().unwrap();
        assert_eq!(mode.engine.ticks(), 0);

        start(&mut mode);
        assert_eq!(mode.screen, Screen::Playing);
    }

    #[test]
    fn test_menu_time_does_not_age_first_food() {
        let clock = ManualClock::new(0);
        let mut mode = mode_with_clock(clock.clone());
        let food = mode.engine.food().position();

        // Longer than the food lifetime
        clock.advance(9000);
        start(&mut mode);
        assert_eq!(mode.engine.food().spawn_time_ms(), 9000);

        mode.update_game().unwrap();
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.engine.food().position(), food);
        assert_eq!(mode.engine.food().spawn_time_ms(), 9000);
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut mode = mode();
        start(&mut mode);

        mode.handle_action(KeyAction::GameCommand(Command::TogglePause))
            .unwrap();
        assert_eq!(mode.screen, Screen::Paused);
        mode.update_game().unwrap();
        assert_eq!(mode.engine.ticks(), 0);

        mode.handle_action(KeyAction::GameCommand(Command::TogglePause))
            .unwrap();
        mode.update_game().unwrap();
        assert_eq!(mode.engine.ticks(), 1);
    }

    #[test]
    fn test_turns_ignored_outside_play() {
        let mut mode = mode();
        let heading = mode.engine.agent().heading();
        let turn = heading.opposite();

        // Queued in the menu would be applied on the first tick
        mode.handle_action(KeyAction::GameCommand(Command::Turn(turn)))
            .unwrap();
        start(&mut mode);
        mode.update_game().unwrap();
        assert_eq!(mode.engine.agent().heading(), heading);
    }

    #[test]
    fn test_turn_applies_on_next_tick() {
        let mut mode = mode();
        start(&mut mode);
        let turn = match mode.engine.agent().heading() {
            Direction::Up | Direction::Down => Direction::Left,
            Direction::Left | Direction::Right => Direction::Up,
        };

        mode.handle_action(KeyAction::GameCommand(Command::Turn(turn)))
            .unwrap();
        mode.update_game().unwrap();
        assert_eq!(mode.engine.agent().heading(), turn);
    }

    #[test]
    fn test_audio_toggles() {
        let mut mode = mode();
        assert_eq!(mode.engine.audio().settings(), AudioSettings::default());

        mode.handle_action(KeyAction::GameCommand(Command::ToggleMusic))
            .unwrap();
        mode.handle_action(KeyAction::GameCommand(Command::ToggleSfx))
            .unwrap();
        assert_eq!(
            mode.engine.audio().settings(),
            AudioSettings {
                music: false,
                sfx: false,
            }
        );
    }

    #[test]
    fn test_game_over_then_restart() {
        let context = GameContext {
            clock: Box::new(ManualClock::new(0)),
            audio: Box::new(Silent::default()),
            high_scores: Box::new(MemoryHighScoreStore::new(0)),
        };
        let mut config = GameConfig::default().with_seed(2);
        config.difficulty.lethal_walls_at = 0;
        let mut mode = HumanMode::new(config, context).unwrap();
        start(&mut mode);

        // Heading straight with lethal walls reaches an edge within one grid width
        for _ in 0..40 {
            mode.update_game().unwrap();
            if mode.screen == Screen::GameOver {
                break;
            }
        }
        assert_eq!(mode.screen, Screen::GameOver);
        assert_eq!(mode.engine.phase(), Phase::GameOver);
        assert_eq!(mode.metrics.rounds_played, 1);

        // No ticks while the game over screen is up
        mode.update_game().unwrap();

        mode.handle_action(KeyAction::Restart).unwrap();
        assert_eq!(mode.screen, Screen::Playing);
        assert_eq!(mode.engine.phase(), Phase::Running);
        assert_eq!(mode.engine.score(), 0);
    }

    #[test]
    fn test_quit() {
        let mut mode = mode();
        mode.handle_action(KeyAction::GameCommand(Command::Quit))
            .unwrap();
        assert!(mode.should_quit);
        assert_eq!(mode.engine.phase(), Phase::Running);
    }

    #[tokio::test]
    async fn test_tick_timer_follows_engine_pace() {
        let mut mode = mode();
        let mut tick_rate = 9;
        let mut tick_timer = paced_interval(tick_rate);

        mode.sync_tick_timer(&mut tick_rate, &mut tick_timer);
        assert_eq!(tick_rate, 5);
        assert_eq!(tick_timer.period(), Duration::from_millis(200));

        // Unchanged pace keeps the running timer
        mode.sync_tick_timer(&mut tick_rate, &mut tick_timer);
        assert_eq!(tick_rate, 5);
    }

    #[test]
    fn test_tick_period() {
        assert_eq!(tick_period(5), Duration::from_millis(200));
        assert_eq!(tick_period(0), Duration::from_secs(1));
    }
}
