//! Application setup and window creation.

use gpui::{App, Bounds, TitlebarOptions, WindowBounds, WindowOptions, prelude::*, px, size};
use gpui_component::Root;
use tracing::error;

use crate::config::Config;
use crate::models::{GameModel, UciEngine};
use crate::ui::theme::{INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH};
use crate::ui::views::ChessBoardView;

/// Initialize and run the chess application against a started engine
pub fn run(cx: &mut App, engine: UciEngine, config: Config) {
    gpui_component::init(cx);

    // Create the game model
    let model = cx.new(|cx| GameModel::new(engine, &config, cx));

    let bounds = Bounds::centered(
        None,
        size(px(INITIAL_WINDOW_WIDTH), px(INITIAL_WINDOW_HEIGHT)),
        cx,
    );
    let opened = cx.open_window(
        WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some("Chess".into()),
                ..Default::default()
            }),
            ..Default::default()
        },
        |window, cx| {
            let view = cx.new(|cx| ChessBoardView::new(model, cx));
            cx.new(|cx| Root::new(view, window, cx))
        },
    );
    if let Err(err) = opened {
        error!(%err, "failed to open window");
        cx.quit();
    }
}
