//! Board coordinate systems and the conversions between them.
//!
//! Display coordinates follow screen rows (row 0 is the top of the window,
//! i.e. rank 8). Board coordinates follow the rules library (rank 0 is
//! White's back rank). Keeping them as separate types means a display row
//! can never be handed to the board by accident.

use std::fmt;

use shakmaty::uci::UciMove;
use shakmaty::{File, Rank, Square};

use crate::domain::chess::Promotion;

/// A square in screen order: `col` left to right, `row` top to bottom
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct DisplaySquare {
    pub col: u8,
    pub row: u8,
}

/// A square in board order: `file` a..h, `rank` 1..8, both zero-based
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct BoardSquare {
    pub file: u8,
    pub rank: u8,
}

impl DisplaySquare {
    pub fn new(col: u8, row: u8) -> Option<Self> {
        (col < 8 && row < 8).then_some(Self { col, row })
    }

    pub fn to_board(self) -> BoardSquare {
        BoardSquare {
            file: self.col,
            rank: 7 - self.row,
        }
    }

    /// All 64 squares in reading order
    pub fn all() -> impl Iterator<Item = DisplaySquare> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| DisplaySquare { col, row }))
    }
}

impl BoardSquare {
    pub fn to_display(self) -> DisplaySquare {
        DisplaySquare {
            col: self.file,
            row: 7 - self.rank,
        }
    }

    pub fn to_shakmaty(self) -> Square {
        Square::from_coords(File::new(self.file as u32), Rank::new(self.rank as u32))
    }

    pub fn from_shakmaty(sq: Square) -> Self {
        Self {
            file: sq.file() as u8,
            rank: sq.rank() as u8,
        }
    }

}

impl fmt::Display for BoardSquare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_shakmaty(), f)
    }
}

/// A move proposed by the human, awaiting a legality check
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CandidateMove {
    pub from: BoardSquare,
    pub to: BoardSquare,
    pub promotion: Option<Promotion>,
}

impl CandidateMove {
    pub fn new(from: BoardSquare, to: BoardSquare) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// The squares of a move in UCI notation such as "e2e4" or "e7e8q".
    /// Drops are not board moves and give None.
    pub fn from_uci(uci: &UciMove) -> Option<Self> {
        match *uci {
            UciMove::Normal {
                from,
                to,
                promotion,
            } => Some(Self {
                from: BoardSquare::from_shakmaty(from),
                to: BoardSquare::from_shakmaty(to),
                promotion: promotion.and_then(Promotion::from_role),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for CandidateMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.uci_char())?;
        }
        Ok(())
    }
}
