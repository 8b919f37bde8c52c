//! Pure chess domain types and utilities.
//! No GPUI dependencies - this is the domain layer.

use shakmaty::{Color as SColor, Role};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceKind {
    pub fn to_role(self) -> Role {
        match self {
            PieceKind::Pawn => Role::Pawn,
            PieceKind::Knight => Role::Knight,
            PieceKind::Bishop => Role::Bishop,
            PieceKind::Rook => Role::Rook,
            PieceKind::Queen => Role::Queen,
            PieceKind::King => Role::King,
        }
    }
}

impl PieceColor {
    pub fn to_shakmaty(self) -> SColor {
        match self {
            PieceColor::White => SColor::White,
            PieceColor::Black => SColor::Black,
        }
    }

    /// Board-index rank a pawn of this color promotes on
    pub fn promotion_rank(self) -> u8 {
        match self {
            PieceColor::White => 7,
            PieceColor::Black => 0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: PieceColor,
}

impl Piece {
    /// Unicode chess glyph for this piece. The filled set is used for both
    /// colors; the view tints it.
    pub fn glyph(&self) -> &'static str {
        match self.kind {
            PieceKind::King => "♚",
            PieceKind::Queen => "♛",
            PieceKind::Rook => "♜",
            PieceKind::Bishop => "♝",
            PieceKind::Knight => "♞",
            PieceKind::Pawn => "♟",
        }
    }

    /// FEN-style letter, uppercase for white
    pub fn symbol(&self) -> char {
        self.kind.to_role().of(self.color.to_shakmaty()).char()
    }
}

/// The piece kinds a pawn may promote to
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Dialog order: strongest first
    pub const ALL: [Promotion; 4] = [
        Promotion::Queen,
        Promotion::Rook,
        Promotion::Bishop,
        Promotion::Knight,
    ];

    pub fn kind(self) -> PieceKind {
        match self {
            Promotion::Queen => PieceKind::Queen,
            Promotion::Rook => PieceKind::Rook,
            Promotion::Bishop => PieceKind::Bishop,
            Promotion::Knight => PieceKind::Knight,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Promotion::Queen => "Queen",
            Promotion::Rook => "Rook",
            Promotion::Bishop => "Bishop",
            Promotion::Knight => "Knight",
        }
    }

    pub fn to_role(self) -> Role {
        self.kind().to_role()
    }

    /// The promotion for a role, None for pawns and kings
    pub fn from_role(role: Role) -> Option<Self> {
        Promotion::ALL.into_iter().find(|p| p.to_role() == role)
    }

    /// Lowercase letter used in UCI move text
    pub fn uci_char(self) -> char {
        self.to_role().char()
    }
}

/// Convert shakmaty color to our domain color
pub fn shakmaty_to_color(color: SColor) -> PieceColor {
    match color {
        SColor::White => PieceColor::White,
        SColor::Black => PieceColor::Black,
    }
}

/// Convert shakmaty piece to our domain Piece
pub fn shakmaty_to_piece(piece: shakmaty::Piece) -> Piece {
    let kind = match piece.role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    };
    Piece {
        kind,
        color: shakmaty_to_color(piece.color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_roles() {
        let roles: Vec<Role> = Promotion::ALL.iter().map(|p| p.to_role()).collect();
        assert_eq!(roles, vec![Role::Queen, Role::Rook, Role::Bishop, Role::Knight]);
        assert!(Promotion::ALL.iter().all(|p| p.kind() != PieceKind::Pawn));
        assert!(Promotion::ALL.iter().all(|p| p.kind() != PieceKind::King));
    }

    #[test]
    fn test_promotion_rank() {
        assert_eq!(PieceColor::White.promotion_rank(), 7);
        assert_eq!(PieceColor::Black.promotion_rank(), 0);
    }

    #[test]
    fn test_shakmaty_conversion() {
        let piece = shakmaty_to_piece(shakmaty::Piece {
            color: SColor::Black,
            role: Role::Knight,
        });
        assert_eq!(piece.kind, PieceKind::Knight);
        assert_eq!(piece.color, PieceColor::Black);
        assert_eq!(piece.symbol(), 'n');
        assert_eq!(piece.glyph(), "♞");
    }

    #[test]
    fn test_letters_come_from_roles() {
        let letters: String = Promotion::ALL.iter().map(|p| p.uci_char()).collect();
        assert_eq!(letters, "qrbn");
        assert_eq!(Promotion::from_role(Role::Bishop), Some(Promotion::Bishop));
        assert_eq!(Promotion::from_role(Role::King), None);
        assert_eq!(Promotion::from_role(Role::Pawn), None);

        let white_king = Piece {
            kind: PieceKind::King,
            color: PieceColor::White,
        };
        assert_eq!(white_king.symbol(), 'K');
        let black_rook = Piece {
            kind: PieceKind::Rook,
            color: PieceColor::Black,
        };
        assert_eq!(black_rook.symbol(), 'r');
    }
}
