use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::audio::AudioSettings;
use crate::game::{Cell, Snapshot};
use crate::metrics::GameMetrics;
use crate::modes::Screen;

/// Everything one frame needs
pub struct View<'a> {
    pub screen: Screen,
    pub snapshot: Snapshot<'a>,
    pub metrics: &'a GameMetrics,
    pub audio: AudioSettings,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, view: &View) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Round stats on the left, records on the right
        let hud = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        frame.render_widget(self.render_stats(view), hud[0]);
        frame.render_widget(self.render_records(view), hud[1]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        let body = match view.screen {
            Screen::Menu => self.render_menu(view),
            Screen::Playing => self.render_grid(&view.snapshot),
            Screen::Paused => self.render_paused(),
            Screen::GameOver => self.render_game_over(&view.snapshot),
        };
        frame.render_widget(body, game_area);

        frame.render_widget(self.render_controls(view.screen), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let body: HashSet<Cell> = snapshot.body.iter().copied().collect();
        let obstacles: HashSet<Cell> = snapshot.obstacles.iter().copied().collect();
        let head = snapshot.body.first().copied();

        let mut lines = Vec::with_capacity(snapshot.height as usize);
        for y in 0..snapshot.height {
            let mut spans = Vec::with_capacity(snapshot.width as usize);

            for x in 0..snapshot.width {
                let pos = Cell::new(x, y);

                let cell = if Some(pos) == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == snapshot.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if obstacles.contains(&pos) {
                    Span::styled("▓ ", Style::default().fg(Color::Gray))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        // A red frame warns that the edges now kill
        let (border_type, border_color, title) = if snapshot.walls_lethal {
            (BorderType::Thick, Color::Red, " Snake - walls! ")
        } else {
            (BorderType::Double, Color::White, " Snake ")
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, view: &View) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::raw(" "),
            Span::styled("Score: ", label),
            Span::styled(
                view.snapshot.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled("Time: ", label),
            Span::styled(view.metrics.format_time(), value),
            Span::raw("   "),
            Span::styled("Rounds: ", label),
            Span::styled(view.metrics.rounds_played.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Left)
    }

    fn render_records(&self, view: &View) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Longest: ", label),
            Span::styled(view.metrics.longest_body.to_string(), value),
            Span::raw("   "),
            Span::styled("Best: ", label),
            Span::styled(view.metrics.best_this_session.to_string(), value),
            Span::raw("   "),
            Span::styled("High score: ", label),
            Span::styled(
                view.snapshot.high_score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
        ])];

        Paragraph::new(text).alignment(Alignment::Right)
    }

    fn render_menu(&self, view: &View) -> Paragraph<'_> {
        let on_off = |on: bool| if on { "On" } else { "Off" };
        let hint = Style::default().fg(Color::Gray);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press ENTER to start"),
            Line::from(""),
            Line::from(format!("Music: {} (M)", on_off(view.audio.music))),
            Line::from(format!("Effects: {} (S)", on_off(view.audio.sfx))),
            Line::from(""),
            Line::from(format!("High score: {}", view.snapshot.high_score)),
            Line::from(""),
            Line::from(Span::styled("Press Q to quit", hint)),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press P to continue or Q to quit",
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_game_over(&self, snapshot: &Snapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, screen: Screen) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let spans = match screen {
            Screen::Playing => vec![
                Span::styled("↑↓←→", key),
                Span::raw(" or "),
                Span::styled("WASD", key),
                Span::raw(" to move | "),
                Span::styled("P", key),
                Span::raw(" pause | "),
                Span::styled("M", key),
                Span::raw(" music | "),
                Span::styled("X", key),
                Span::raw(" effects | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
            _ => vec![
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
        };

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
