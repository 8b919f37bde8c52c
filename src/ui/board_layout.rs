//! Board layout calculations - handles sizing and coordinate transformations.
//!
//! The board panel fills the window. Inside its padding the rank labels
//! take a column on the left, the 8x8 grid sits to their right, and the
//! file labels and status line run underneath.

use crate::domain::DisplaySquare;
use crate::ui::theme::{
    BOARD_PADDING, FILE_LABEL_HEIGHT, MIN_SQUARE_SIZE, PIECE_SCALE, RANK_LABEL_WIDTH,
    STATUS_HEIGHT,
};
use gpui::{Pixels, Size, px};

/// Handles all layout calculations for the chess board
#[derive(Clone, Copy, Debug)]
pub struct BoardLayout {
    pub panel_size: Size<Pixels>,
}

impl BoardLayout {
    pub fn new(panel_size: Size<Pixels>) -> Self {
        Self { panel_size }
    }

    /// Calculate square size from measured panel dimensions
    pub fn square_size(&self) -> f32 {
        let panel_width: f32 = self.panel_size.width.into();
        let panel_height: f32 = self.panel_size.height.into();
        let available_width = panel_width - BOARD_PADDING * 2.0 - RANK_LABEL_WIDTH;
        let available_height =
            panel_height - BOARD_PADDING * 2.0 - FILE_LABEL_HEIGHT - STATUS_HEIGHT;
        (available_width.min(available_height) / 8.0).max(MIN_SQUARE_SIZE)
    }

    /// Calculate glyph size based on square size
    pub fn piece_size(&self) -> f32 {
        self.square_size() * PIECE_SCALE
    }

    /// Top-left corner of the 8x8 grid, relative to the panel
    pub fn board_origin(&self) -> (f32, f32) {
        (BOARD_PADDING + RANK_LABEL_WIDTH, BOARD_PADDING)
    }

    /// Get the total size of the board (8 squares)
    pub fn board_total_size(&self) -> f32 {
        self.square_size() * 8.0
    }

    /// Convert position relative to board panel to a display square.
    /// Anything outside the grid (margins, labels, status line) is None.
    pub fn pos_to_square(&self, x: f32, y: f32) -> Option<DisplaySquare> {
        let (origin_x, origin_y) = self.board_origin();
        let board_x = x - origin_x;
        let board_y = y - origin_y;

        if board_x < 0.0 || board_y < 0.0 {
            return None;
        }

        let square_size = self.square_size();
        let col = (board_x / square_size) as usize;
        let row = (board_y / square_size) as usize;

        if row < 8 && col < 8 {
            DisplaySquare::new(col as u8, row as u8)
        } else {
            None
        }
    }

    /// Top-left corner of a square relative to the panel
    pub fn square_origin(&self, square: DisplaySquare) -> (f32, f32) {
        let (origin_x, origin_y) = self.board_origin();
        let square_size = self.square_size();
        (
            origin_x + square.col as f32 * square_size,
            origin_y + square.row as f32 * square_size,
        )
    }

    /// Top edge of the status line
    pub fn status_top(&self) -> f32 {
        BOARD_PADDING + self.board_total_size() + FILE_LABEL_HEIGHT
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(Size {
            width: px(720.0),
            height: px(780.0),
        })
    }
}
