/// Screens of the terminal front end, layered on top of the engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Title screen with audio toggles
    Menu,
    Playing,
    /// Ticks are suspended; nothing in the round changes
    Paused,
    GameOver,
}

impl Screen {
    pub fn is_ticking(&self) -> bool {
        matches!(self, Screen::Playing)
    }
}
