pub mod human;
pub mod screen;

pub use human::HumanMode;
pub use screen::Screen;
