//! Square rendering component.

use crate::domain::{DisplaySquare, Piece};
use crate::ui::components::render_piece;
use crate::ui::theme::{LAST_MOVE_SQUARE, SELECTED_SQUARE, square_color, target_tint};
use gpui::{div, prelude::*, px, rgb};

/// Background emphasis for a square
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SquareHighlight {
    None,
    Selected,
    LastMove,
}

/// Render a single board square with optional piece.
/// Legal destinations of the selection get a translucent tint on top.
pub fn render_square(
    square: DisplaySquare,
    piece: Option<Piece>,
    highlight: SquareHighlight,
    is_target: bool,
    square_size: f32,
    piece_size: f32,
) -> impl IntoElement {
    let background = match highlight {
        SquareHighlight::None => square_color(square.row, square.col),
        SquareHighlight::Selected => rgb(SELECTED_SQUARE),
        SquareHighlight::LastMove => rgb(LAST_MOVE_SQUARE),
    };

    div()
        .relative()
        .flex_shrink_0() // never shrink - maintain aspect ratio
        .size(px(square_size))
        .bg(background)
        .when(is_target, |el| {
            el.child(div().absolute().top_0().left_0().size_full().bg(target_tint()))
        })
        .when_some(piece, |el, p| el.child(render_piece(p, piece_size)))
}
