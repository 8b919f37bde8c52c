//! Domain layer: chess types, coordinates, difficulty and the UCI text protocol.

pub mod chess;
pub mod coords;
pub mod difficulty;
pub mod uci;

pub use chess::{Piece, PieceColor, PieceKind, Promotion, shakmaty_to_color, shakmaty_to_piece};
pub use coords::{BoardSquare, CandidateMove, DisplaySquare};
pub use difficulty::Difficulty;
