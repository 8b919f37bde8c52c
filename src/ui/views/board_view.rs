//! Chess board view - the board, its labels and the status line.

use gpui::{
    AnyElement, Context, Div, Entity, MouseButton, MouseDownEvent, Subscription, Window, canvas,
    div, prelude::*, px, rgb,
};
use gpui_component::button::{Button, ButtonVariants};

use crate::domain::DisplaySquare;
use crate::models::game::GameSession;
use crate::models::{GameModel, Phase, Screen};
use crate::ui::BoardLayout;
use crate::ui::components::{SquareHighlight, render_square};
use crate::ui::theme::{
    BOARD_PADDING, BORDER_COLOR, FILE_LABEL_HEIGHT, PANEL_BG, RANK_LABEL_WIDTH, STATUS_HEIGHT,
    TEXT_PRIMARY, TEXT_SECONDARY,
};
use crate::ui::views::{
    render_failure, render_game_over, render_level_picker, render_promotion_dialog,
};

const FILES: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

/// The main chess board view that observes a GameModel
pub struct ChessBoardView {
    model: Entity<GameModel>,
    _subscription: Subscription,
}

impl ChessBoardView {
    pub fn new(model: Entity<GameModel>, cx: &mut Context<Self>) -> Self {
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());
        Self {
            model,
            _subscription,
        }
    }
}

impl Render for ChessBoardView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let model_measure = self.model.clone();
        let game = self.model.read(cx);

        let content: AnyElement = match game.screen() {
            Screen::PickLevel => {
                render_level_picker(&self.model, game.engine_name()).into_any_element()
            }
            Screen::Failed(message) => render_failure(message).into_any_element(),
            Screen::Playing(session) => render_board_panel(&self.model, game, session),
        };

        // Canvas to measure actual panel size
        let measure_canvas = canvas(
            move |bounds, _window, cx| {
                model_measure.update(cx, |game, cx| {
                    if game.panel_size != bounds.size {
                        game.panel_size = bounds.size;
                        cx.notify();
                    }
                });
            },
            |_, _, _, _| {},
        )
        .absolute()
        .top_0()
        .left_0()
        .size_full();

        div()
            .relative()
            .size_full()
            .bg(rgb(PANEL_BG))
            .font_family("Berkeley Mono")
            .child(measure_canvas)
            .child(content)
    }
}

fn render_board_panel(
    model: &Entity<GameModel>,
    game: &GameModel,
    session: &GameSession,
) -> AnyElement {
    let model_down = model.clone();
    let layout = game.layout();
    let square_size = layout.square_size();
    let (board_x, board_y) = layout.board_origin();
    let phase = session.phase();

    // Rank numbers left of the grid, file letters below it
    let rank_labels = (0..8u8).filter_map(|row| {
        let (_, y) = layout.square_origin(DisplaySquare::new(0, row)?);
        Some(
            render_label((8 - row).to_string())
                .left(px(board_x - RANK_LABEL_WIDTH))
                .top(px(y))
                .w(px(RANK_LABEL_WIDTH))
                .h(px(square_size)),
        )
    });
    let file_labels = (0..8u8).filter_map(|col| {
        let (x, _) = layout.square_origin(DisplaySquare::new(col, 7)?);
        Some(
            render_label(FILES[usize::from(col)].to_string())
                .left(px(x))
                .top(px(board_y + layout.board_total_size()))
                .w(px(square_size))
                .h(px(FILE_LABEL_HEIGHT)),
        )
    });

    let status_bar = render_status_bar(model, game, session, &layout);

    div()
        .id("board-panel")
        .relative()
        .size_full()
        .overflow_hidden()
        .child(render_board(session, &layout))
        .children(rank_labels)
        .children(file_labels)
        .child(status_bar)
        .when(phase == Phase::AwaitingPromotionChoice, |el| {
            el.child(render_promotion_dialog(model))
        })
        .when(phase == Phase::GameOver, |el| {
            el.child(render_game_over(&session.result(), game.restart_delay()))
        })
        // Mouse down: hand the click to the session
        .on_mouse_down(MouseButton::Left, move |ev: &MouseDownEvent, _window, cx| {
            model_down.update(cx, |game, cx| {
                let pos = ev.position;
                game.click_at(pos.x.into(), pos.y.into(), cx);
            });
        })
        .into_any_element()
}

fn render_label(text: String) -> Div {
    div()
        .absolute()
        .flex()
        .items_center()
        .justify_center()
        .text_color(rgb(TEXT_SECONDARY))
        .child(text)
}

/// The 8x8 grid, each square placed where `BoardLayout` hit-tests it
fn render_board(session: &GameSession, layout: &BoardLayout) -> impl IntoElement {
    let square_size = layout.square_size();
    let piece_size = layout.piece_size();
    let (board_x, board_y) = layout.board_origin();
    let selection = session.selection();
    let targets = session.legal_targets();
    let last_move = session.last_engine_squares();

    let highlight = |square: DisplaySquare| {
        if selection == Some(square) {
            SquareHighlight::Selected
        } else if last_move.is_some_and(|(from, to)| from == square || to == square) {
            SquareHighlight::LastMove
        } else {
            SquareHighlight::None
        }
    };

    div()
        .absolute()
        .left(px(board_x))
        .top(px(board_y))
        .size(px(layout.board_total_size()))
        .overflow_hidden()
        .rounded_md()
        .children(DisplaySquare::all().map(|square| {
            let (x, y) = layout.square_origin(square);
            div()
                .absolute()
                .left(px(x - board_x))
                .top(px(y - board_y))
                .child(render_square(
                    square,
                    session.piece_at(square),
                    highlight(square),
                    targets.contains(&square),
                    square_size,
                    piece_size,
                ))
        }))
}

fn render_status_bar(
    model: &Entity<GameModel>,
    game: &GameModel,
    session: &GameSession,
    layout: &BoardLayout,
) -> impl IntoElement {
    let model_new_game = model.clone();
    let engine = game.engine_name().unwrap_or("engine");

    div()
        .absolute()
        .left(px(BOARD_PADDING))
        .top(px(layout.status_top()))
        .flex()
        .items_center()
        .justify_between()
        .gap_2()
        .w(px(RANK_LABEL_WIDTH + layout.board_total_size()))
        .h(px(STATUS_HEIGHT))
        .px_2()
        .border_t_1()
        .border_color(rgb(BORDER_COLOR))
        .child(
            div()
                .flex()
                .flex_col()
                .child(
                    div()
                        .text_color(rgb(TEXT_PRIMARY))
                        .child(session.status().to_string()),
                )
                .child(
                    div()
                        .text_xs()
                        .text_color(rgb(TEXT_SECONDARY))
                        .child(format!("{engine}, level {}", session.level())),
                ),
        )
        .child(
            Button::new("new-game")
                .label("New game")
                .compact()
                .ghost()
                .on_click(move |_, _, cx| {
                    model_new_game.update(cx, |game, cx| game.new_game(cx));
                }),
        )
}
