//! Game session - the selection and turn state machine.
//!
//! A `Session` owns one game: the board, the engine handle and the current
//! interaction phase. The UI feeds it clicks and promotion choices and asks
//! it to run the engine's turn; everything it exposes back is read-only.

use std::time::Duration;

use shakmaty::uci::UciMove;
use tracing::{debug, info};

use crate::domain::{
    BoardSquare, CandidateMove, Difficulty, DisplaySquare, Piece, PieceColor, PieceKind,
    Promotion,
};
use crate::models::board::{BoardError, BoardState};
use crate::models::engine::{Engine, EngineError, EngineReply};

/// The side the human plays
pub const HUMAN: PieceColor = PieceColor::White;

/// Interaction phase; exactly one is active at a time
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    AwaitingSelection,
    AwaitingDestination,
    AwaitingPromotionChoice,
    EngineThinking,
    GameOver,
}

/// Failures that end a session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("engine played {mv:?}, which the board rejected: {source}")]
    EngineMove {
        mv: String,
        #[source]
        source: BoardError,
    },
}

/// Per-session settings fixed before the first move
#[derive(Clone, Copy, Debug)]
pub struct SessionSettings {
    pub level: Difficulty,
    /// Think time unit, multiplied by the level factor
    pub base_unit: Duration,
}

pub struct Session<B, E> {
    board: B,
    engine: E,
    settings: SessionSettings,
    phase: Phase,
    selection: Option<BoardSquare>,
    /// Origin and destination waiting for a promotion piece
    pending_promotion: Option<CandidateMove>,
    status: String,
    last_engine_move: Option<String>,
}

impl<B: BoardState, E: Engine> Session<B, E> {
    /// Start a session on `board`, configuring the engine for the level
    pub fn new(board: B, mut engine: E, settings: SessionSettings) -> Result<Self, SessionError> {
        engine.configure(settings.level)?;

        let mut session = Self {
            board,
            engine,
            settings,
            phase: Phase::AwaitingSelection,
            selection: None,
            pending_promotion: None,
            status: "Select a white piece to move.".to_string(),
            last_engine_move: None,
        };
        if session.board.is_game_over() {
            session.finish_game();
        } else if session.board.current_turn() != HUMAN {
            session.set_phase(Phase::EngineThinking);
            session.status = "Engine is thinking...".to_string();
        }

        info!(level = settings.level.level(), "session started");
        Ok(session)
    }

    /// End this game and start a new one on `board`, keeping the engine
    pub fn restart(self, board: B) -> Result<Self, SessionError> {
        let Self {
            mut engine,
            settings,
            ..
        } = self;
        engine.new_game()?;
        Self::new(board, engine, settings)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn level(&self) -> Difficulty {
        self.settings.level
    }

    /// Currently selected square, in display coordinates
    pub fn selection(&self) -> Option<DisplaySquare> {
        self.selection.map(BoardSquare::to_display)
    }

    /// Legal destinations of the selected piece, for highlighting
    pub fn legal_targets(&self) -> Vec<DisplaySquare> {
        match self.selection {
            Some(from) => self
                .board
                .legal_moves_from(from)
                .into_iter()
                .map(BoardSquare::to_display)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn piece_at(&self, square: DisplaySquare) -> Option<Piece> {
        self.board.piece_at(square.to_board())
    }

    /// Game result, "*" while the game is running
    pub fn result(&self) -> String {
        self.board.result()
    }

    pub fn last_engine_move(&self) -> Option<&str> {
        self.last_engine_move.as_deref()
    }

    /// Origin and destination of the engine's last move, for highlighting
    pub fn last_engine_squares(&self) -> Option<(DisplaySquare, DisplaySquare)> {
        let uci = UciMove::from_ascii(self.last_engine_move()?.as_bytes()).ok()?;
        let mv = CandidateMove::from_uci(&uci)?;
        Some((mv.from.to_display(), mv.to.to_display()))
    }

    /// Whether the human may pick up the piece on `square` right now
    pub fn is_selectable(&self, square: DisplaySquare) -> bool {
        self.board.current_turn() == HUMAN
            && self
                .board
                .piece_at(square.to_board())
                .is_some_and(|p| p.color == HUMAN)
    }

    /// Handle a click on a board square
    pub fn click(&mut self, square: DisplaySquare) {
        match self.phase {
            Phase::AwaitingSelection => self.select(square),
            Phase::AwaitingDestination => self.choose_destination(square.to_board()),
            phase => debug!(?phase, ?square, "click ignored"),
        }
    }

    /// Complete a pending promotion with the chosen piece
    pub fn choose_promotion(&mut self, promotion: Promotion) {
        if self.phase != Phase::AwaitingPromotionChoice {
            debug!(phase = ?self.phase, "promotion choice ignored");
            return;
        }
        match self.pending_promotion.take() {
            Some(candidate) => self.submit(candidate.with_promotion(promotion)),
            None => self.reset_selection(),
        }
    }

    /// Let the engine move. Blocks until the engine answers; a no-op unless
    /// the engine is on turn.
    pub fn play_engine_turn(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::EngineThinking {
            return Ok(());
        }

        let budget = self.settings.level.time_budget(self.settings.base_unit);
        debug!(?budget, "requesting engine move");
        let reply = self.engine.best_move(self.board.moves_played(), budget)?;

        let mv = reply.best.mv.clone();
        self.board
            .apply_uci(&mv)
            .map_err(|source| SessionError::EngineMove {
                mv: mv.clone(),
                source,
            })?;
        info!(%mv, "engine move");

        self.status = engine_move_status(&reply);
        self.last_engine_move = Some(mv);

        if self.board.is_game_over() {
            self.finish_game();
        } else {
            self.set_phase(Phase::AwaitingSelection);
        }
        Ok(())
    }

    fn select(&mut self, square: DisplaySquare) {
        if !self.is_selectable(square) {
            return;
        }
        let from = square.to_board();
        if let Some(piece) = self.board.piece_at(from) {
            self.status = format!("Selected {} on {}", piece.symbol(), from);
        }
        self.selection = Some(from);
        self.set_phase(Phase::AwaitingDestination);
    }

    fn choose_destination(&mut self, to: BoardSquare) {
        let Some(from) = self.selection else {
            self.reset_selection();
            return;
        };
        let candidate = CandidateMove::new(from, to);

        let promotes = matches!(
            self.board.piece_at(from),
            Some(Piece { kind: PieceKind::Pawn, color }) if to.rank == color.promotion_rank()
        );
        if promotes {
            self.pending_promotion = Some(candidate);
            self.status = "Choose a piece to promote to.".to_string();
            self.set_phase(Phase::AwaitingPromotionChoice);
            return;
        }

        self.submit(candidate);
    }

    /// Check a candidate move and play it if legal. Always clears the selection.
    fn submit(&mut self, candidate: CandidateMove) {
        self.selection = None;
        self.pending_promotion = None;

        if !self.board.is_legal(&candidate) {
            debug!(mv = %candidate, "illegal move attempt");
            self.reset_selection();
            self.status = "Move not legal. Try again.".to_string();
            return;
        }

        if let Err(e) = self.board.apply(&candidate) {
            debug!(mv = %candidate, error = %e, "move rejected on apply");
            self.reset_selection();
            self.status = "Move not legal. Try again.".to_string();
            return;
        }
        info!(mv = %candidate, "human move");

        if self.board.is_game_over() {
            self.finish_game();
        } else {
            self.status = "Engine is thinking...".to_string();
            self.set_phase(Phase::EngineThinking);
        }
    }

    fn reset_selection(&mut self) {
        self.selection = None;
        self.pending_promotion = None;
        self.set_phase(Phase::AwaitingSelection);
    }

    fn finish_game(&mut self) {
        let result = self.board.result();
        info!(%result, "game over");
        self.selection = None;
        self.pending_promotion = None;
        self.status = format!("Game over: {}", result);
        self.set_phase(Phase::GameOver);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase change");
            self.phase = phase;
        }
    }
}

/// Status line after an engine move, with the evaluation from White's side
fn engine_move_status(reply: &EngineReply) -> String {
    let mut status = format!("Engine plays {}", reply.best.mv);
    if let Some(info) = &reply.info {
        if let (Some(depth), Some(score)) = (info.depth, info.score) {
            status.push_str(&format!(" (depth {}, {})", depth, score.flipped().display()));
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::domain::uci::{BestMove, Score, UciInfo};
    use crate::models::board::ShakmatyBoard;

    /// Plays back canned replies and records what it was asked
    #[derive(Default)]
    struct ScriptedEngine {
        replies: VecDeque<Result<&'static str, EngineError>>,
        requests: Vec<(Vec<String>, Duration)>,
        configured: Option<Difficulty>,
        new_games: usize,
    }

    impl ScriptedEngine {
        fn with_moves(moves: &[&'static str]) -> Self {
            Self {
                replies: moves.iter().map(|m| Ok(*m)).collect(),
                ..Self::default()
            }
        }
    }

    impl Engine for ScriptedEngine {
        fn configure(&mut self, level: Difficulty) -> Result<(), EngineError> {
            self.configured = Some(level);
            Ok(())
        }

        fn new_game(&mut self) -> Result<(), EngineError> {
            self.new_games += 1;
            Ok(())
        }

        fn best_move(
            &mut self,
            moves: &[String],
            budget: Duration,
        ) -> Result<EngineReply, EngineError> {
            self.requests.push((moves.to_vec(), budget));
            let mv = self
                .replies
                .pop_front()
                .unwrap_or(Err(EngineError::Disconnected))?;
            Ok(EngineReply {
                best: BestMove {
                    mv: mv.to_string(),
                    ponder: None,
                },
                info: Some(UciInfo {
                    depth: Some(7),
                    score: Some(Score::Centipawns(-20)),
                    pv: vec![mv.to_string()],
                }),
            })
        }
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            level: Difficulty::new(5).unwrap(),
            base_unit: Duration::from_millis(100),
        }
    }

    fn session(engine: ScriptedEngine) -> Session<ShakmatyBoard, ScriptedEngine> {
        Session::new(ShakmatyBoard::new(), engine, settings()).unwrap()
    }

    fn session_after(moves: &[&str], engine: ScriptedEngine) -> Session<ShakmatyBoard, ScriptedEngine> {
        let mut board = ShakmatyBoard::new();
        for m in moves {
            board.apply_uci(m).unwrap();
        }
        Session::new(board, engine, settings()).unwrap()
    }

    /// Display square of a square name like "e2"
    fn d(name: &str) -> DisplaySquare {
        let square = shakmaty::Square::from_ascii(name.as_bytes()).unwrap();
        BoardSquare::from_shakmaty(square).to_display()
    }

    fn play(session: &mut Session<ShakmatyBoard, ScriptedEngine>, from: &str, to: &str) {
        session.click(d(from));
        session.click(d(to));
    }

    #[test]
    fn test_fresh_session() {
        let session = session(ScriptedEngine::default());
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert!(session.legal_targets().is_empty());
        assert_eq!(session.result(), "*");
        assert_eq!(session.engine.configured, Difficulty::new(5));
    }

    #[test]
    fn test_selectable_squares_match_white_pieces() {
        let session = session(ScriptedEngine::default());
        for square in DisplaySquare::all() {
            let white_piece = session.piece_at(square).is_some_and(|p| p.color == PieceColor::White);
            assert_eq!(session.is_selectable(square), white_piece, "{:?}", square);
        }
    }

    #[test]
    fn test_select_pawn_shows_two_targets() {
        let mut session = session(ScriptedEngine::default());
        session.click(DisplaySquare::new(4, 6).unwrap());
        assert_eq!(session.phase(), Phase::AwaitingDestination);
        assert_eq!(session.selection(), DisplaySquare::new(4, 6));
        assert_eq!(session.status(), "Selected P on e2");

        let mut targets = session.legal_targets();
        targets.sort_by_key(|s| s.row);
        assert_eq!(
            targets,
            vec![DisplaySquare::new(4, 4).unwrap(), DisplaySquare::new(4, 5).unwrap()]
        );
    }

    #[test]
    fn test_click_empty_or_opponent_is_noop() {
        let mut session = session(ScriptedEngine::default());
        session.click(d("e4"));
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        session.click(d("e7"));
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert!(session.board.moves_played().is_empty());
    }

    #[test]
    fn test_illegal_move_resets() {
        let mut session = session(ScriptedEngine::default());
        play(&mut session, "e2", "e5");
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert_eq!(session.status(), "Move not legal. Try again.");
        assert!(session.board.moves_played().is_empty());
        assert!(session.engine.requests.is_empty());
    }

    #[test]
    fn test_reclick_selected_square_deselects() {
        let mut session = session(ScriptedEngine::default());
        play(&mut session, "g1", "g1");
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert!(session.board.moves_played().is_empty());
    }

    #[test]
    fn test_second_own_piece_is_a_destination() {
        let mut session = session(ScriptedEngine::default());
        play(&mut session, "e2", "d2");
        // not a re-selection of d2
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert!(session.board.moves_played().is_empty());
    }

    #[test]
    fn test_human_then_engine_move() {
        let mut session = session(ScriptedEngine::with_moves(&["e7e5"]));
        play(&mut session, "e2", "e4");
        assert_eq!(session.phase(), Phase::EngineThinking);
        assert_eq!(session.selection(), None);
        assert_eq!(session.status(), "Engine is thinking...");

        // clicks are ignored while the engine is on turn
        session.click(d("d2"));
        assert_eq!(session.phase(), Phase::EngineThinking);

        session.play_engine_turn().unwrap();
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.board.current_turn(), HUMAN);
        assert_eq!(session.board.moves_played(), ["e2e4", "e7e5"]);
        assert_eq!(session.last_engine_move(), Some("e7e5"));
        assert_eq!(session.last_engine_squares(), Some((d("e7"), d("e5"))));
        assert_eq!(session.status(), "Engine plays e7e5 (depth 7, +0.20)");

        let (moves, budget) = &session.engine.requests[0];
        assert_eq!(moves, &["e2e4".to_string()]);
        assert_eq!(*budget, Duration::from_millis(1600));
    }

    #[test]
    fn test_engine_turn_is_noop_on_human_turn() {
        let mut session = session(ScriptedEngine::with_moves(&["e7e5"]));
        session.play_engine_turn().unwrap();
        assert!(session.engine.requests.is_empty());
        assert_eq!(session.phase(), Phase::AwaitingSelection);
    }

    const PROMOTION_SETUP: [&str; 8] = [
        "h2h4", "g7g5", "h4g5", "h7h6", "g5h6", "g8f6", "h6h7", "f6g8",
    ];

    #[test]
    fn test_promotion_waits_for_choice() {
        let mut session = session_after(&PROMOTION_SETUP, ScriptedEngine::default());
        // pawn on display row 1 to row 0
        session.click(DisplaySquare::new(7, 1).unwrap());
        session.click(DisplaySquare::new(6, 0).unwrap());
        assert_eq!(session.phase(), Phase::AwaitingPromotionChoice);
        assert_eq!(session.board.moves_played().len(), PROMOTION_SETUP.len());

        // the board does not take clicks until a piece is chosen
        session.click(d("a2"));
        assert_eq!(session.phase(), Phase::AwaitingPromotionChoice);

        session.choose_promotion(Promotion::Knight);
        assert_eq!(session.phase(), Phase::EngineThinking);
        assert_eq!(session.selection(), None);
        assert_eq!(
            session.board.moves_played().last().map(String::as_str),
            Some("h7g8n")
        );
        assert_eq!(session.piece_at(d("g8")).map(|p| p.kind), Some(PieceKind::Knight));
    }

    #[test]
    fn test_illegal_promotion_resets() {
        let mut session = session_after(&PROMOTION_SETUP, ScriptedEngine::default());
        // h8 is occupied by the black rook
        play(&mut session, "h7", "h8");
        assert_eq!(session.phase(), Phase::AwaitingPromotionChoice);
        session.choose_promotion(Promotion::Queen);
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert_eq!(session.board.moves_played().len(), PROMOTION_SETUP.len());
    }

    #[test]
    fn test_promotion_choice_outside_dialog_is_ignored() {
        let mut session = session(ScriptedEngine::default());
        session.choose_promotion(Promotion::Queen);
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert!(session.board.moves_played().is_empty());
    }

    #[test]
    fn test_engine_mates_human() {
        let mut session = session(ScriptedEngine::with_moves(&["e7e5", "d8h4"]));
        play(&mut session, "f2", "f3");
        session.play_engine_turn().unwrap();
        play(&mut session, "g2", "g4");
        session.play_engine_turn().unwrap();

        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.result(), "0-1");
        assert_eq!(session.status(), "Game over: 0-1");

        // nothing but a restart gets through
        session.click(d("e2"));
        assert_eq!(session.phase(), Phase::GameOver);
        session.play_engine_turn().unwrap();
        assert_eq!(session.engine.requests.len(), 2);
    }

    #[test]
    fn test_human_mates_engine() {
        let mut session = session(ScriptedEngine::with_moves(&["e7e5", "b8c6", "g8f6"]));
        for (from, to) in [("e2", "e4"), ("f1", "c4"), ("d1", "h5")] {
            play(&mut session, from, to);
            session.play_engine_turn().unwrap();
        }
        play(&mut session, "h5", "f7");
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.result(), "1-0");
        assert_eq!(session.engine.requests.len(), 3);
    }

    #[test]
    fn test_engine_disconnect_is_fatal() {
        let mut engine = ScriptedEngine::default();
        engine.replies.push_back(Err(EngineError::Disconnected));
        let mut session = session(engine);
        play(&mut session, "e2", "e4");
        let err = session.play_engine_turn().unwrap_err();
        assert!(matches!(err, SessionError::Engine(EngineError::Disconnected)));
    }

    #[test]
    fn test_engine_illegal_reply_is_fatal() {
        let mut session = session(ScriptedEngine::with_moves(&["e2e4"]));
        play(&mut session, "d2", "d4");
        let err = session.play_engine_turn().unwrap_err();
        assert!(matches!(err, SessionError::EngineMove { .. }));

        let mut session = self::session(ScriptedEngine::with_moves(&["zz"]));
        play(&mut session, "d2", "d4");
        let err = session.play_engine_turn().unwrap_err();
        assert!(matches!(
            err,
            SessionError::EngineMove {
                source: BoardError::Unparsable(_),
                ..
            }
        ));
    }

    #[test]
    fn test_restart_starts_clean() {
        let mut session = session(ScriptedEngine::with_moves(&["e7e5"]));
        play(&mut session, "e2", "e4");
        session.play_engine_turn().unwrap();
        session.click(d("g1"));

        let session = session.restart(ShakmatyBoard::new()).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.selection(), None);
        assert!(session.board.moves_played().is_empty());
        assert_eq!(session.last_engine_move(), None);
        assert_eq!(session.engine.new_games, 1);
        assert_eq!(session.level(), Difficulty::new(5).unwrap());
    }

    #[test]
    fn test_session_on_engine_turn_starts_thinking() {
        let session = session_after(&["e2e4"], ScriptedEngine::default());
        assert_eq!(session.phase(), Phase::EngineThinking);
        assert!(!session.is_selectable(d("d2")));
    }
}
