//! Theme constants and colors for the chess UI.

use gpui::{Rgba, rgb, rgba};

// Layout constants
pub const BOARD_PADDING: f32 = 20.0;
pub const RANK_LABEL_WIDTH: f32 = 24.0;
pub const FILE_LABEL_HEIGHT: f32 = 24.0;
pub const STATUS_HEIGHT: f32 = 48.0;
pub const MIN_SQUARE_SIZE: f32 = 30.0;
pub const PIECE_SCALE: f32 = 0.8; // glyph size relative to square

// Initial window size
pub const INITIAL_WINDOW_WIDTH: f32 = 720.0;
pub const INITIAL_WINDOW_HEIGHT: f32 = 780.0;

// Board colors
pub const LIGHT_SQUARE: u32 = 0xEFD9B5;
pub const DARK_SQUARE: u32 = 0xB48764;
pub const SELECTED_SQUARE: u32 = 0xADD8E6;
pub const LAST_MOVE_SQUARE: u32 = 0xCDD26A;
pub const TARGET_TINT: u32 = 0x7FFFD480;
pub const WHITE_PIECE: u32 = 0xFAFAFA;
pub const BLACK_PIECE: u32 = 0x1A1A1A;

// Panel colors
pub const PANEL_BG: u32 = 0x2a2a2a;
pub const OVERLAY_BG: u32 = 0x000000B0;
pub const BORDER_COLOR: u32 = 0x4a4a4a;
pub const TEXT_PRIMARY: u32 = 0xffffff;
pub const TEXT_SECONDARY: u32 = 0x888888;
pub const TEXT_ERROR: u32 = 0xf87171;

/// Get the color for a board square based on its position
pub fn square_color(row: u8, col: u8) -> Rgba {
    if (row + col) % 2 == 0 {
        rgb(LIGHT_SQUARE)
    } else {
        rgb(DARK_SQUARE)
    }
}

/// Semi-transparent tint drawn over legal destinations
pub fn target_tint() -> Rgba {
    rgba(TARGET_TINT)
}

pub fn overlay_bg() -> Rgba {
    rgba(OVERLAY_BG)
}
