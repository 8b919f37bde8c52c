//! Board state - the rules oracle the session asks about pieces and legality.
//!
//! `BoardState` is the seam between the interaction state machine and the
//! rules library; `ShakmatyBoard` is the production implementation.

use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, File, Move, Position};

use crate::domain::{
    BoardSquare, CandidateMove, Piece, PieceColor, shakmaty_to_color, shakmaty_to_piece,
};

/// Errors raised when a move cannot be applied to the board
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    /// The move is well-formed but not legal in the current position
    #[error("illegal move: {0}")]
    Illegal(String),

    /// The text is not a move in UCI notation
    #[error("unparsable move: {0:?}")]
    Unparsable(String),
}

/// What the session needs from the rules side of the game
pub trait BoardState {
    /// Side to move
    fn current_turn(&self) -> PieceColor;

    fn piece_at(&self, square: BoardSquare) -> Option<Piece>;

    /// Destination squares of all legal moves starting on `from`
    fn legal_moves_from(&self, from: BoardSquare) -> Vec<BoardSquare>;

    fn is_legal(&self, mv: &CandidateMove) -> bool;

    fn apply(&mut self, mv: &CandidateMove) -> Result<(), BoardError>;

    /// Apply a move given in UCI notation (as returned by an engine)
    fn apply_uci(&mut self, uci: &str) -> Result<(), BoardError>;

    fn is_game_over(&self) -> bool;

    /// "1-0", "0-1", "1/2-1/2", or "*" while the game is running
    fn result(&self) -> String;

    /// Moves played since the start position, in UCI notation
    fn moves_played(&self) -> &[String];
}

/// Board state backed by a shakmaty position
#[derive(Clone, Debug, Default)]
pub struct ShakmatyBoard {
    position: Chess,
    moves_played: Vec<String>,
}

impl ShakmatyBoard {
    /// A board in the standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the legal move matching a candidate, if any
    fn find_legal(&self, candidate: &CandidateMove) -> Option<Move> {
        let from_sq = candidate.from.to_shakmaty();
        let to_sq = candidate.to.to_shakmaty();
        let promotion = candidate.promotion.map(|p| p.to_role());

        self.position.legal_moves().into_iter().find(|m| {
            let (move_from, move_to) = match m {
                Move::Normal { from, to, .. } => (*from, *to),
                Move::EnPassant { from, to, .. } => (*from, *to),
                Move::Castle { king, rook } => (*king, castle_destination(*rook)),
                Move::Put { .. } => return false,
            };
            move_from == from_sq && move_to == to_sq && m.promotion() == promotion
        })
    }

    /// Play a legal move and record it in standard UCI notation
    fn play(&mut self, legal: Move) -> Result<(), BoardError> {
        let uci = legal.to_uci(CastlingMode::Standard).to_string();
        self.position = self
            .position
            .clone()
            .play(legal)
            .map_err(|_| BoardError::Illegal(uci.clone()))?;
        self.moves_played.push(uci);
        Ok(())
    }
}

/// For castling, the user clicks the king's destination (g1/g8 or c1/c8)
fn castle_destination(rook: shakmaty::Square) -> shakmaty::Square {
    if rook.file() == File::H {
        shakmaty::Square::from_coords(File::G, rook.rank())
    } else {
        shakmaty::Square::from_coords(File::C, rook.rank())
    }
}

impl BoardState for ShakmatyBoard {
    fn current_turn(&self) -> PieceColor {
        shakmaty_to_color(self.position.turn())
    }

    fn piece_at(&self, square: BoardSquare) -> Option<Piece> {
        self.position
            .board()
            .piece_at(square.to_shakmaty())
            .map(shakmaty_to_piece)
    }

    fn legal_moves_from(&self, from: BoardSquare) -> Vec<BoardSquare> {
        let from_sq = from.to_shakmaty();
        let mut targets = Vec::new();

        for m in &self.position.legal_moves() {
            let (move_from, move_to) = match m {
                Move::Normal { from, to, .. } => (*from, *to),
                Move::EnPassant { from, to, .. } => (*from, *to),
                Move::Castle { king, rook } => (*king, castle_destination(*rook)),
                Move::Put { .. } => continue,
            };
            // promotions list the same destination once per piece kind
            let target = BoardSquare::from_shakmaty(move_to);
            if move_from == from_sq && !targets.contains(&target) {
                targets.push(target);
            }
        }

        targets
    }

    fn is_legal(&self, mv: &CandidateMove) -> bool {
        self.find_legal(mv).is_some()
    }

    fn apply(&mut self, mv: &CandidateMove) -> Result<(), BoardError> {
        let legal = self
            .find_legal(mv)
            .ok_or_else(|| BoardError::Illegal(mv.to_string()))?;
        self.play(legal)
    }

    fn apply_uci(&mut self, uci: &str) -> Result<(), BoardError> {
        let parsed = UciMove::from_ascii(uci.as_bytes())
            .map_err(|_| BoardError::Unparsable(uci.to_string()))?;
        let legal = parsed
            .to_move(&self.position)
            .map_err(|_| BoardError::Illegal(uci.to_string()))?;
        self.play(legal)
    }

    fn is_game_over(&self) -> bool {
        self.position.is_game_over()
    }

    fn result(&self) -> String {
        if self.position.is_checkmate() {
            // the side to move has been mated
            match self.current_turn() {
                PieceColor::White => "0-1".to_string(),
                PieceColor::Black => "1-0".to_string(),
            }
        } else if self.position.is_game_over() {
            "1/2-1/2".to_string()
        } else {
            "*".to_string()
        }
    }

    fn moves_played(&self) -> &[String] {
        &self.moves_played
    }
}
