pub mod board;
pub mod engine;
pub mod game;
pub mod session;

pub use engine::UciEngine;
pub use game::{GameModel, Screen};
pub use session::Phase;
