//! Level picker - shown once before the first game when no level was given.

use gpui::{Entity, div, prelude::*, px, rgb};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::Difficulty;
use crate::models::GameModel;
use crate::ui::theme::{BOARD_PADDING, TEXT_PRIMARY, TEXT_SECONDARY};

const LEVELS_PER_ROW: usize = 5;

/// Render the level picker: one button per level, lowest first
pub fn render_level_picker(
    model: &Entity<GameModel>,
    engine_name: Option<&str>,
) -> impl IntoElement {
    let levels: Vec<Difficulty> = Difficulty::all().collect();
    let subtitle = match engine_name {
        Some(name) => format!("Playing White against {name}"),
        None => "Playing White".to_string(),
    };

    div()
        .size_full()
        .flex()
        .flex_col()
        .items_center()
        .justify_center()
        .gap_4()
        .p(px(BOARD_PADDING))
        .child(
            div()
                .text_xl()
                .text_color(rgb(TEXT_PRIMARY))
                .child("Choose a level"),
        )
        .child(div().text_color(rgb(TEXT_SECONDARY)).child(subtitle))
        .child(
            div()
                .flex()
                .flex_col()
                .gap_2()
                .children(levels.chunks(LEVELS_PER_ROW).map(|row| {
                    div().flex().gap_2().children(row.iter().map(|&level| {
                        let model_pick = model.clone();
                        Button::new(("level", usize::from(level.level())))
                            .label(level.to_string())
                            .primary()
                            .w(px(48.))
                            .on_click(move |_, _, cx| {
                                model_pick.update(cx, |game, cx| game.pick_level(level, cx));
                            })
                    }))
                })),
        )
        .child(
            div()
                .text_xs()
                .text_color(rgb(TEXT_SECONDARY))
                .child("1 is the easiest, 20 the strongest"),
        )
}
