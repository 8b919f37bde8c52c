mod board_view;
mod level_picker;
mod overlays;

pub use board_view::ChessBoardView;
pub use level_picker::render_level_picker;
pub use overlays::{render_failure, render_game_over, render_promotion_dialog};
