//! UCI (Universal Chess Interface) protocol types and utilities.
//!
//! This module handles low-level UCI protocol text: commands we send and
//! the lines an engine answers with. It does not spawn or talk to a process
//! (that's done in the models layer).

use std::time::Duration;

/// UCI commands that can be sent to an engine
#[derive(Debug, Clone)]
pub enum UciCommand {
    /// Initialize UCI mode
    Uci,
    /// Check if engine is ready
    IsReady,
    /// Set a new game
    UciNewGame,
    /// Set an engine option
    SetOption { name: String, value: String },
    /// Set position: the start position followed by the moves played so far
    Position { moves: Vec<String> },
    /// Search for a fixed amount of time
    GoMoveTime(Duration),
    /// Quit the engine
    Quit,
}

impl UciCommand {
    /// Convert command to UCI protocol string
    pub fn to_uci_string(&self) -> String {
        match self {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::UciNewGame => "ucinewgame".to_string(),
            UciCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            UciCommand::Position { moves } => {
                let mut cmd = String::from("position startpos");
                if !moves.is_empty() {
                    cmd.push_str(" moves ");
                    cmd.push_str(&moves.join(" "));
                }
                cmd
            }
            // engines reject a zero movetime
            UciCommand::GoMoveTime(budget) => format!("go movetime {}", budget.as_millis().max(1)),
            UciCommand::Quit => "quit".to_string(),
        }
    }
}

/// Categorized UCI output line
#[derive(Debug, Clone, PartialEq)]
pub enum UciOutputKind {
    /// "uciok" - engine is ready for UCI
    UciOk,
    /// "readyok" - engine is ready
    ReadyOk,
    /// "info ..." - analysis information
    Info(String),
    /// "bestmove ..." - best move found
    BestMove(String),
    /// Engine identification
    Id(String),
    /// Option definition
    Option(String),
    /// Unknown/other output
    Other(String),
}

impl UciOutputKind {
    /// Parse a raw UCI output line into a categorized type
    pub fn parse(line: &str) -> Self {
        let line = line.trim();

        if line == "uciok" {
            UciOutputKind::UciOk
        } else if line == "readyok" {
            UciOutputKind::ReadyOk
        } else if let Some(rest) = line.strip_prefix("info ") {
            UciOutputKind::Info(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("bestmove") {
            UciOutputKind::BestMove(rest.trim().to_string())
        } else if let Some(rest) = line.strip_prefix("id ") {
            UciOutputKind::Id(rest.to_string())
        } else if let Some(rest) = line.strip_prefix("option ") {
            UciOutputKind::Option(rest.to_string())
        } else {
            UciOutputKind::Other(line.to_string())
        }
    }
}

/// The payload of a `bestmove` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestMove {
    pub mv: String,
    pub ponder: Option<String>,
}

impl BestMove {
    /// Parse the part after "bestmove". Returns None when the engine has no
    /// move to offer ("(none)", "0000" or nothing at all).
    pub fn parse(rest: &str) -> Option<Self> {
        let mut tokens = rest.split_whitespace();
        let mv = tokens.next()?;
        if mv == "(none)" || mv == "0000" {
            return None;
        }
        let ponder = match (tokens.next(), tokens.next()) {
            (Some("ponder"), Some(p)) => Some(p.to_string()),
            _ => None,
        };
        Some(Self {
            mv: mv.to_string(),
            ponder,
        })
    }
}

/// A `type spin` option advertised by the engine during the handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinOption {
    pub name: String,
    pub default: i64,
    pub min: i64,
    pub max: i64,
}

impl SpinOption {
    /// Parse the part after "option ". Non-spin options yield None.
    pub fn parse(option_str: &str) -> Option<Self> {
        let rest = option_str.trim().strip_prefix("name ")?;
        // option names may contain spaces, so split on the " type " keyword
        let (name, rest) = rest.split_once(" type ")?;
        let mut tokens = rest.split_whitespace();
        if tokens.next()? != "spin" {
            return None;
        }

        let (mut default, mut min, mut max) = (None, None, None);
        while let Some(key) = tokens.next() {
            let value = tokens.next().and_then(|v| v.parse::<i64>().ok());
            match key {
                "default" => default = value,
                "min" => min = value,
                "max" => max = value,
                _ => {}
            }
        }

        Some(Self {
            name: name.trim().to_string(),
            default: default?,
            min: min?,
            max: max?,
        })
    }
}

/// Engine evaluation score
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// Centipawn score
    Centipawns(i32),
    /// Mate in N moves (negative = getting mated)
    Mate(i32),
}

impl Score {
    /// Format score for display (e.g., "+0.35" or "M3" or "-M2")
    pub fn display(&self) -> String {
        match self {
            Score::Centipawns(cp) => {
                let pawns = *cp as f64 / 100.0;
                if pawns >= 0.0 {
                    format!("+{:.2}", pawns)
                } else {
                    format!("{:.2}", pawns)
                }
            }
            Score::Mate(moves) => {
                if *moves > 0 {
                    format!("M{}", moves)
                } else {
                    format!("-M{}", moves.abs())
                }
            }
        }
    }

    /// The same score seen from the other side
    pub fn flipped(self) -> Self {
        match self {
            Score::Centipawns(cp) => Score::Centipawns(-cp),
            Score::Mate(m) => Score::Mate(-m),
        }
    }
}

/// The parts of a UCI info line that we report after an engine move
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UciInfo {
    /// Search depth
    pub depth: Option<u32>,
    /// Evaluation score, from the engine's point of view
    pub score: Option<Score>,
    /// Principal variation (best line) as UCI moves
    pub pv: Vec<String>,
}

impl UciInfo {
    /// Parse a UCI info string (the part after "info ")
    pub fn parse(info_str: &str) -> Self {
        let mut info = UciInfo::default();
        let mut tokens = info_str.split_whitespace().peekable();

        while let Some(token) = tokens.next() {
            match token {
                "depth" => info.depth = tokens.next().and_then(|t| t.parse().ok()),
                "score" => {
                    // score cp <x> | score mate <x>, optionally followed by a bound
                    let kind = tokens.next();
                    let value = tokens.next().and_then(|t| t.parse::<i32>().ok());
                    info.score = match (kind, value) {
                        (Some("cp"), Some(cp)) => Some(Score::Centipawns(cp)),
                        (Some("mate"), Some(m)) => Some(Score::Mate(m)),
                        _ => info.score,
                    };
                }
                "pv" => {
                    while let Some(&mv) = tokens.peek() {
                        if is_info_keyword(mv) {
                            break;
                        }
                        info.pv.push(mv.to_string());
                        tokens.next();
                    }
                }
                // "string" swallows the remainder of the line
                "string" => break,
                _ => {}
            }
        }

        info
    }

    /// Check if this info line has meaningful analysis data (depth + score + pv)
    pub fn has_analysis(&self) -> bool {
        self.depth.is_some() && self.score.is_some() && !self.pv.is_empty()
    }
}

fn is_info_keyword(token: &str) -> bool {
    matches!(
        token,
        "depth"
            | "seldepth"
            | "multipv"
            | "score"
            | "nodes"
            | "nps"
            | "time"
            | "hashfull"
            | "tbhits"
            | "currmove"
            | "currmovenumber"
            | "string"
            | "refutation"
            | "currline"
    )
}
