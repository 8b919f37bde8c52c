//! Command line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::domain::Difficulty;

/// Play chess against a UCI engine
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Engine executable, looked up on PATH when not a path
    #[arg(long, env = "CHESS_ENGINE", default_value = "stockfish")]
    pub engine: PathBuf,

    /// Extra argument passed to the engine (repeatable)
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Difficulty level; a level picker is shown when omitted
    #[arg(long, env = "CHESS_LEVEL", value_parser = clap::value_parser!(u8).range(1..=20))]
    pub level: Option<u8>,

    /// Engine think time unit in milliseconds
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub base_unit_ms: u64,

    /// Seconds before a finished game restarts (0 disables)
    #[arg(long, default_value_t = 3)]
    pub restart_delay_secs: u64,
}

/// Validated runtime configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub engine: PathBuf,
    pub engine_args: Vec<String>,
    pub level: Option<Difficulty>,
    pub base_unit: Duration,
    pub restart_delay: Option<Duration>,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            engine: cli.engine,
            engine_args: cli.engine_args,
            level: cli.level.and_then(Difficulty::new),
            base_unit: Duration::from_millis(cli.base_unit_ms),
            restart_delay: (cli.restart_delay_secs > 0)
                .then(|| Duration::from_secs(cli.restart_delay_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        let argv = std::iter::once("gpui-engine-chess").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(Config::from)
    }

    #[test]
    fn test_explicit_flags() {
        let config = parse(&[
            "--engine",
            "/usr/games/stockfish",
            "--engine-arg",
            "-q",
            "--engine-arg",
            "bench",
            "--level",
            "7",
            "--base-unit-ms",
            "50",
            "--restart-delay-secs",
            "0",
        ])
        .unwrap();
        assert_eq!(config.engine, PathBuf::from("/usr/games/stockfish"));
        assert_eq!(config.engine_args, vec!["-q", "bench"]);
        assert_eq!(config.level, Difficulty::new(7));
        assert_eq!(config.base_unit, Duration::from_millis(50));
        assert_eq!(config.restart_delay, None);
    }

    #[test]
    fn test_level_out_of_range_rejected() {
        assert!(parse(&["--level", "0"]).is_err());
        assert!(parse(&["--level", "21"]).is_err());
        assert!(parse(&["--base-unit-ms", "0"]).is_err());
    }

    #[test]
    fn test_restart_delay() {
        let config = parse(&["--restart-delay-secs", "5"]).unwrap();
        assert_eq!(config.restart_delay, Some(Duration::from_secs(5)));
    }
}
