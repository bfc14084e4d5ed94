//! High score persistence
//!
//! The best score is kept as a single decimal integer in a text file,
//! overwritten on every new record.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_HIGHSCORE_FILE: &str = "highscore.txt";

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("failed to write high score to {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Storage for the all-time best score
pub trait HighScoreStore {
    /// Stored score, 0 when nothing usable is stored
    fn load(&self) -> u32;
    fn save(&mut self, score: u32) -> Result<(), HighScoreError>;
}

/// Plain-text high score file
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no high score file, starting at 0");
                return 0;
            }
            Err(err) => {
                warn!(path = ?self.path, %err, "could not read high score, starting at 0");
                return 0;
            }
        };

        match text.trim().parse::<u32>() {
            Ok(score) => {
                info!(score, "loaded high score");
                score
            }
            Err(err) => {
                warn!(path = ?self.path, %err, "corrupt high score file, starting at 0");
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        let io_err = |source| HighScoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, score.to_string()).map_err(io_err)?;
        info!(score, path = ?self.path, "saved high score");
        Ok(())
    }
}

/// In-memory store; clones share the same value
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    score: Rc<Cell<u32>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        Self {
            score: Rc::new(Cell::new(score)),
            saves: Rc::default(),
        }
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.score.get()
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        self.score.set(score);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
