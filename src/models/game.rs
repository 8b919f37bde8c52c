//! Game model - the application layer tying a session to the window.
//!
//! `GameModel` is the gpui entity the view observes. It owns the engine
//! (idle until a level is picked, then inside the session), routes clicks
//! through the board layout into the session and schedules the engine's
//! turn and the automatic restart on the foreground executor.

use std::fmt::Display;
use std::time::Duration;

use gpui::{AsyncApp, Context, Pixels, Size, Task, WeakEntity, px};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::domain::{Difficulty, Promotion};
use crate::models::board::ShakmatyBoard;
use crate::models::engine::UciEngine;
use crate::models::session::{Phase, Session, SessionSettings};
use crate::ui::BoardLayout;
use crate::ui::theme::{INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH};

/// Pause before the engine is asked to move, so the "thinking" status
/// gets a frame on screen first
const ENGINE_TURN_DELAY: Duration = Duration::from_millis(30);

pub type GameSession = Session<ShakmatyBoard, UciEngine>;

/// Work a phase change hands to the executor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FollowUp {
    Nothing,
    EngineTurn,
    Restart(Duration),
}

fn follow_up(before: Option<Phase>, after: Option<Phase>, restart_delay: Option<Duration>) -> FollowUp {
    if before == after {
        return FollowUp::Nothing;
    }
    match (after, restart_delay) {
        (Some(Phase::EngineThinking), _) => FollowUp::EngineTurn,
        (Some(Phase::GameOver), Some(delay)) => FollowUp::Restart(delay),
        _ => FollowUp::Nothing,
    }
}

/// A timed restart only fires on a game that is still over;
/// "New game" may have started another one meanwhile
fn restart_due(phase: Option<Phase>) -> bool {
    phase == Some(Phase::GameOver)
}

/// What the window is showing
pub enum Screen {
    /// Waiting for the human to choose a difficulty
    PickLevel,
    Playing(Box<GameSession>),
    /// The session died; the message is shown until the window closes
    Failed(String),
}

pub struct GameModel {
    screen: Screen,
    /// The engine before a level has been picked
    idle_engine: Option<UciEngine>,
    engine_name: Option<String>,
    base_unit: Duration,
    restart_delay: Option<Duration>,
    /// Measured panel size from canvas
    pub panel_size: Size<Pixels>,
    _engine_task: Option<Task<()>>,
    _restart_task: Option<Task<()>>,
}

impl GameModel {
    pub fn new(engine: UciEngine, config: &Config, cx: &mut Context<Self>) -> Self {
        let mut model = Self {
            screen: Screen::PickLevel,
            engine_name: engine.name().map(str::to_string),
            idle_engine: Some(engine),
            base_unit: config.base_unit,
            restart_delay: config.restart_delay,
            panel_size: Size {
                width: px(INITIAL_WINDOW_WIDTH),
                height: px(INITIAL_WINDOW_HEIGHT),
            },
            _engine_task: None,
            _restart_task: None,
        };
        if let Some(level) = config.level {
            model.pick_level(level, cx);
        }
        model
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.screen {
            Screen::Playing(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    pub fn restart_delay(&self) -> Option<Duration> {
        self.restart_delay
    }

    pub fn layout(&self) -> BoardLayout {
        BoardLayout::new(self.panel_size)
    }

    fn phase(&self) -> Option<Phase> {
        self.session().map(Session::phase)
    }

    /// Fix the difficulty and start the first game
    pub fn pick_level(&mut self, level: Difficulty, cx: &mut Context<Self>) {
        let Some(engine) = self.idle_engine.take() else {
            warn!(%level, "level already picked");
            return;
        };
        let settings = SessionSettings {
            level,
            base_unit: self.base_unit,
        };
        match Session::new(ShakmatyBoard::new(), engine, settings) {
            Ok(session) => {
                self.screen = Screen::Playing(Box::new(session));
                self.phase_changed(None, cx);
            }
            Err(err) => self.fail(err),
        }
        cx.notify();
    }

    /// Handle a click at a position relative to the board panel
    pub fn click_at(&mut self, x: f32, y: f32, cx: &mut Context<Self>) {
        let Some(square) = self.layout().pos_to_square(x, y) else {
            return;
        };
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };
        let before = session.phase();
        session.click(square);
        self.phase_changed(Some(before), cx);
        cx.notify();
    }

    pub fn choose_promotion(&mut self, promotion: Promotion, cx: &mut Context<Self>) {
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };
        let before = session.phase();
        session.choose_promotion(promotion);
        self.phase_changed(Some(before), cx);
        cx.notify();
    }

    /// Start over right away, dropping any pending automatic restart
    pub fn new_game(&mut self, cx: &mut Context<Self>) {
        self._restart_task = None;
        self.restart(cx);
    }

    fn restart(&mut self, cx: &mut Context<Self>) {
        let screen = std::mem::replace(&mut self.screen, Screen::PickLevel);
        let Screen::Playing(session) = screen else {
            self.screen = screen;
            return;
        };
        match session.restart(ShakmatyBoard::new()) {
            Ok(session) => {
                info!("new game");
                self.screen = Screen::Playing(Box::new(session));
                self.phase_changed(None, cx);
            }
            Err(err) => self.fail(err),
        }
        cx.notify();
    }

    /// Kick off whatever the new phase needs from the executor
    fn phase_changed(&mut self, before: Option<Phase>, cx: &mut Context<Self>) {
        match follow_up(before, self.phase(), self.restart_delay) {
            FollowUp::EngineTurn => self.schedule_engine_turn(cx),
            FollowUp::Restart(delay) => self.schedule_restart(delay, cx),
            FollowUp::Nothing => {}
        }
    }

    fn schedule_engine_turn(&mut self, cx: &mut Context<Self>) {
        let task = cx.spawn(async move |weak: WeakEntity<GameModel>, cx: &mut AsyncApp| {
            cx.background_executor().timer(ENGINE_TURN_DELAY).await;
            weak.update(cx, |game, cx| game.run_engine_turn(cx)).ok();
        });
        self._engine_task = Some(task);
    }

    fn run_engine_turn(&mut self, cx: &mut Context<Self>) {
        let Screen::Playing(session) = &mut self.screen else {
            return;
        };
        let before = session.phase();
        match session.play_engine_turn() {
            Ok(()) => self.phase_changed(Some(before), cx),
            Err(err) => self.fail(err),
        }
        cx.notify();
    }

    fn schedule_restart(&mut self, delay: Duration, cx: &mut Context<Self>) {
        let task = cx.spawn(async move |weak: WeakEntity<GameModel>, cx: &mut AsyncApp| {
            cx.background_executor().timer(delay).await;
            weak.update(cx, |game, cx| {
                if restart_due(game.phase()) {
                    game.restart(cx);
                }
            })
            .ok();
        });
        self._restart_task = Some(task);
    }

    /// Tear the session down and show the error; the engine goes with it
    fn fail(&mut self, err: impl Display) {
        error!(%err, "session failed");
        self.screen = Screen::Failed(err.to_string());
        self.idle_engine = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Option<Duration> = Some(Duration::from_secs(3));

    #[test]
    fn test_follow_up_on_phase_change() {
        assert_eq!(
            follow_up(None, Some(Phase::AwaitingSelection), DELAY),
            FollowUp::Nothing
        );
        assert_eq!(
            follow_up(Some(Phase::AwaitingDestination), Some(Phase::EngineThinking), DELAY),
            FollowUp::EngineTurn
        );
        assert_eq!(
            follow_up(Some(Phase::EngineThinking), Some(Phase::AwaitingSelection), DELAY),
            FollowUp::Nothing
        );
    }

    #[test]
    fn test_follow_up_needs_a_change() {
        // a second click while the engine is thinking must not queue another turn
        assert_eq!(
            follow_up(Some(Phase::EngineThinking), Some(Phase::EngineThinking), DELAY),
            FollowUp::Nothing
        );
        assert_eq!(
            follow_up(Some(Phase::GameOver), Some(Phase::GameOver), DELAY),
            FollowUp::Nothing
        );
    }

    #[test]
    fn test_game_over_restart() {
        assert_eq!(
            follow_up(Some(Phase::EngineThinking), Some(Phase::GameOver), DELAY),
            FollowUp::Restart(Duration::from_secs(3))
        );
        // restart disabled
        assert_eq!(
            follow_up(Some(Phase::AwaitingDestination), Some(Phase::GameOver), None),
            FollowUp::Nothing
        );
        // the session may have ended, or a new game started, before the timer fired
        assert!(restart_due(Some(Phase::GameOver)));
        assert!(!restart_due(Some(Phase::AwaitingSelection)));
        assert!(!restart_due(None));
    }

    #[test]
    fn test_fail_shows_error_screen() {
        let mut model = GameModel {
            screen: Screen::PickLevel,
            idle_engine: None,
            engine_name: Some("Scripted".to_string()),
            base_unit: Duration::from_millis(100),
            restart_delay: DELAY,
            panel_size: Size {
                width: px(INITIAL_WINDOW_WIDTH),
                height: px(INITIAL_WINDOW_HEIGHT),
            },
            _engine_task: None,
            _restart_task: None,
        };
        model.fail("engine disconnected");
        assert!(matches!(model.screen(), Screen::Failed(msg) if msg == "engine disconnected"));
        assert!(model.session().is_none());
        assert_eq!(model.phase(), None);
        assert!(!restart_due(model.phase()));
    }
}
