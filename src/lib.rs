//! Grid Snake - a terminal snake with expiring food and a score-driven difficulty curve
//!
//! This library provides:
//! - Core simulation (game module): agent, food, obstacles, difficulty, tick engine
//! - Collaborators the core delegates to (audio, highscore modules)
//! - TUI rendering (render module) and key decoding (input module)
//! - The interactive front end (modes module)

pub mod audio;
pub mod game;
pub mod highscore;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
