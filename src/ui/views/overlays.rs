//! Modal overlays drawn on top of the board panel.

use std::time::Duration;

use gpui::{Entity, div, prelude::*, rgb};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::{Piece, PieceColor, Promotion};
use crate::models::GameModel;
use crate::models::session::HUMAN;
use crate::ui::theme::{
    BORDER_COLOR, PANEL_BG, TEXT_ERROR, TEXT_PRIMARY, TEXT_SECONDARY, overlay_bg,
};

fn backdrop() -> gpui::Div {
    div()
        .absolute()
        .top_0()
        .left_0()
        .size_full()
        .flex()
        .items_center()
        .justify_center()
        .bg(overlay_bg())
}

fn card() -> gpui::Div {
    div()
        .flex()
        .flex_col()
        .items_center()
        .gap_3()
        .p_4()
        .rounded_md()
        .border_1()
        .border_color(rgb(BORDER_COLOR))
        .bg(rgb(PANEL_BG))
}

/// Ask which piece a pawn promotes to
pub fn render_promotion_dialog(model: &Entity<GameModel>) -> impl IntoElement {
    backdrop().child(
        card()
            .child(
                div()
                    .text_color(rgb(TEXT_PRIMARY))
                    .child("Promote pawn to"),
            )
            .child(div().flex().gap_2().children(Promotion::ALL.iter().map(|&promotion| {
                let model_choose = model.clone();
                let piece = Piece {
                    kind: promotion.kind(),
                    color: HUMAN,
                };
                Button::new(promotion.label())
                    .label(format!("{} {}", piece.glyph(), promotion.label()))
                    .primary()
                    .on_click(move |_, _, cx| {
                        model_choose.update(cx, |game, cx| game.choose_promotion(promotion, cx));
                    })
            }))),
    )
}

/// Result banner; the board stays visible behind it
pub fn render_game_over(result: &str, restart_delay: Option<Duration>) -> impl IntoElement {
    let winner = match result {
        "1-0" => Some(PieceColor::White),
        "0-1" => Some(PieceColor::Black),
        _ => None,
    };
    let headline = match winner {
        Some(color) if color == HUMAN => "You win",
        Some(_) => "Engine wins",
        None => "Draw",
    };
    let hint = match restart_delay {
        Some(delay) => format!("A new game starts in {} s", delay.as_secs()),
        None => "Press New game to play again".to_string(),
    };

    backdrop().child(
        card()
            .child(
                div()
                    .text_xl()
                    .text_color(rgb(TEXT_PRIMARY))
                    .child(format!("Game over: {result}")),
            )
            .child(div().text_color(rgb(TEXT_PRIMARY)).child(headline))
            .child(div().text_xs().text_color(rgb(TEXT_SECONDARY)).child(hint)),
    )
}

/// Full-window error screen after the engine failed
pub fn render_failure(message: &str) -> impl IntoElement {
    div()
        .size_full()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .gap_3()
        .child(
            div()
                .text_xl()
                .text_color(rgb(TEXT_ERROR))
                .child("The engine stopped working"),
        )
        .child(
            div()
                .text_color(rgb(TEXT_PRIMARY))
                .child(message.to_string()),
        )
        .child(
            div()
                .text_xs()
                .text_color(rgb(TEXT_SECONDARY))
                .child("Restart the application to play again."),
        )
}
