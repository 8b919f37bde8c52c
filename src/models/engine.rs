//! Engine model - manages the UCI engine process the human plays against.
//!
//! Architecture:
//! - Engine I/O runs on OS threads (reader/writer) connected by channels
//! - Requests are synchronous: `best_move` writes the position, starts a
//!   timed search and blocks on the event channel until `bestmove` arrives

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::Difficulty;
use crate::domain::uci::{BestMove, SpinOption, UciCommand, UciInfo, UciOutputKind};

/// How long a freshly spawned engine gets to answer `uci` / `isready`
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// How long `quit` gets before the process is killed
const QUIT_GRACE: Duration = Duration::from_millis(250);
const QUIT_POLL: Duration = Duration::from_millis(5);

/// Engine option driven by the difficulty level, when the engine has it
const SKILL_OPTION: &str = "Skill Level";

/// Errors talking to the engine process
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The executable could not be started
    #[error("failed to start engine {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child process came up without the pipes we asked for
    #[error("failed to open engine {0}")]
    Pipe(&'static str),

    /// The engine did not answer the handshake in time
    #[error("engine did not answer {command:?} within {timeout:?}")]
    Timeout {
        command: &'static str,
        timeout: Duration,
    },

    /// The engine process exited or closed its pipes
    #[error("engine disconnected")]
    Disconnected,

    /// The engine sent something we cannot use
    #[error("malformed engine reply: {0:?}")]
    Malformed(String),

    /// Reading engine output failed
    #[error("engine i/o error: {0}")]
    Io(String),
}

/// Messages sent from the engine reader thread to the model
#[derive(Debug)]
pub enum EngineEvent {
    /// A line of output from the engine
    Output(String),
    /// Engine process exited
    Exited,
    /// Error occurred
    Error(String),
}

/// A fixed point in time by which `command` must be answered
struct Deadline {
    command: &'static str,
    timeout: Duration,
    at: Instant,
}

impl Deadline {
    fn new(command: &'static str, timeout: Duration) -> Self {
        Self {
            command,
            timeout,
            at: Instant::now() + timeout,
        }
    }

    fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    fn expired(&self) -> EngineError {
        EngineError::Timeout {
            command: self.command,
            timeout: self.timeout,
        }
    }
}

/// What the engine answered to a search request
#[derive(Debug, Clone, PartialEq)]
pub struct EngineReply {
    pub best: BestMove,
    /// Last info line that carried depth, score and pv
    pub info: Option<UciInfo>,
}

/// A move-search oracle for the non-human side
pub trait Engine {
    /// Apply the difficulty level to the engine's own settings
    fn configure(&mut self, level: Difficulty) -> Result<(), EngineError>;

    /// Forget everything about the previous game
    fn new_game(&mut self) -> Result<(), EngineError>;

    /// Search the position reached by `moves` from the start position
    fn best_move(&mut self, moves: &[String], budget: Duration) -> Result<EngineReply, EngineError>;
}

/// A UCI engine running as a child process
pub struct UciEngine {
    /// Name reported by `id name`
    name: Option<String>,
    /// The skill option, if the engine advertised one
    skill: Option<SpinOption>,
    /// Channel receiver for engine events
    event_receiver: Receiver<EngineEvent>,
    /// Channel sender for commands to engine writer thread
    command_sender: Option<Sender<String>>,
    /// Handle to the engine process
    process: Option<Child>,
    /// Budget for `uci` and `isready` round trips
    reply_timeout: Duration,
}

impl UciEngine {
    /// Spawn the engine and complete the UCI handshake
    pub fn start<S: AsRef<OsStr>>(program: S, args: &[String]) -> Result<Self, EngineError> {
        Self::spawn(program.as_ref(), args, HANDSHAKE_TIMEOUT)
    }

    fn spawn(program: &OsStr, args: &[String], reply_timeout: Duration) -> Result<Self, EngineError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                program: program.to_string_lossy().into_owned(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Pipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(EngineError::Pipe("stdout"))?;

        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();
        let (cmd_tx, cmd_rx) = mpsc::channel::<String>();

        // Spawn reader thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(text) => {
                        if event_tx.send(EngineEvent::Output(text)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(EngineEvent::Error(e.to_string()));
                        break;
                    }
                }
            }
            let _ = event_tx.send(EngineEvent::Exited);
        });

        // Spawn writer thread (OS thread for blocking I/O)
        thread::spawn(move || {
            let mut writer = stdin;
            while let Ok(cmd) = cmd_rx.recv() {
                if writeln!(writer, "{}", cmd).is_err() {
                    break;
                }
                if writer.flush().is_err() {
                    break;
                }
            }
        });

        let mut engine = Self {
            name: None,
            skill: None,
            event_receiver: event_rx,
            command_sender: Some(cmd_tx),
            process: Some(child),
            reply_timeout,
        };
        engine.handshake()?;

        info!(
            engine = engine.name().unwrap_or("unknown"),
            skill_option = engine.skill_option().is_some(),
            "engine started"
        );
        Ok(engine)
    }

    /// Name the engine reported during the handshake
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The skill option advertised during the handshake, if any
    pub fn skill_option(&self) -> Option<&SpinOption> {
        self.skill.as_ref()
    }

    /// `uci` through `readyok`, all under one deadline
    fn handshake(&mut self) -> Result<(), EngineError> {
        let deadline = Deadline::new("uci", self.reply_timeout);
        self.send_command(UciCommand::Uci)?;
        loop {
            let line = self.next_line(Some(&deadline))?;
            match UciOutputKind::parse(&line) {
                UciOutputKind::UciOk => break,
                UciOutputKind::Id(id) => {
                    if let Some(name) = id.strip_prefix("name ") {
                        self.name = Some(name.trim().to_string());
                    }
                }
                UciOutputKind::Option(option) => {
                    if let Some(spin) = SpinOption::parse(&option) {
                        if spin.name.eq_ignore_ascii_case(SKILL_OPTION) {
                            self.skill = Some(spin);
                        }
                    }
                }
                _ => {}
            }
        }
        self.wait_ready(&deadline)
    }

    /// Round-trip `isready` so every earlier command has been processed
    fn sync(&mut self) -> Result<(), EngineError> {
        let deadline = Deadline::new("isready", self.reply_timeout);
        self.wait_ready(&deadline)
    }

    fn wait_ready(&mut self, deadline: &Deadline) -> Result<(), EngineError> {
        self.send_command(UciCommand::IsReady)?;
        loop {
            let line = self.next_line(Some(deadline))?;
            if UciOutputKind::parse(&line) == UciOutputKind::ReadyOk {
                return Ok(());
            }
        }
    }

    /// Block until the next output line. With a deadline, chatter from the
    /// engine does not extend it; None waits as long as the engine lives.
    fn next_line(&mut self, deadline: Option<&Deadline>) -> Result<String, EngineError> {
        let event = match deadline {
            Some(deadline) if deadline.remaining().is_zero() => return Err(deadline.expired()),
            Some(deadline) => self
                .event_receiver
                .recv_timeout(deadline.remaining())
                .map_err(|e| match e {
                    RecvTimeoutError::Timeout => deadline.expired(),
                    RecvTimeoutError::Disconnected => EngineError::Disconnected,
                })?,
            None => self
                .event_receiver
                .recv()
                .map_err(|_| EngineError::Disconnected)?,
        };

        match event {
            EngineEvent::Output(line) => {
                debug!(target: "uci", "<< {}", line);
                Ok(line)
            }
            EngineEvent::Exited => Err(EngineError::Disconnected),
            EngineEvent::Error(e) => Err(EngineError::Io(e)),
        }
    }

    /// Send a UCI command to the engine
    fn send_command(&self, cmd: UciCommand) -> Result<(), EngineError> {
        let cmd_str = cmd.to_uci_string();
        debug!(target: "uci", ">> {}", cmd_str);
        self.command_sender
            .as_ref()
            .ok_or(EngineError::Disconnected)?
            .send(cmd_str)
            .map_err(|_| EngineError::Disconnected)
    }

    /// Ask the engine to quit and reap the process, killing it if it
    /// is still running after `QUIT_GRACE`
    fn stop(&mut self) -> Option<ExitStatus> {
        if self.command_sender.is_some() {
            let _ = self.send_command(UciCommand::Quit);
        }
        self.command_sender = None;

        let mut child = self.process.take()?;
        let asked = Instant::now();
        while asked.elapsed() < QUIT_GRACE {
            match child.try_wait() {
                Ok(Some(status)) => return Some(status),
                Ok(None) => thread::sleep(QUIT_POLL),
                Err(_) => break,
            }
        }
        debug!("engine ignored quit, killing it");
        let _ = child.kill();
        child.wait().ok()
    }
}

impl Engine for UciEngine {
    fn configure(&mut self, level: Difficulty) -> Result<(), EngineError> {
        let Some(skill) = self.skill.clone() else {
            debug!("engine has no {} option, level only sets think time", SKILL_OPTION);
            return Ok(());
        };

        let value = level.scale_to(skill.min, skill.max);
        info!(
            level = level.level(),
            value,
            default = skill.default,
            "setting engine {}",
            SKILL_OPTION
        );
        self.send_command(UciCommand::SetOption {
            name: skill.name,
            value: value.to_string(),
        })?;
        self.sync()
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.send_command(UciCommand::UciNewGame)?;
        self.sync()
    }

    fn best_move(&mut self, moves: &[String], budget: Duration) -> Result<EngineReply, EngineError> {
        self.send_command(UciCommand::Position {
            moves: moves.to_vec(),
        })?;
        self.send_command(UciCommand::GoMoveTime(budget))?;

        let mut last_info = None;
        loop {
            let line = self.next_line(None)?;
            match UciOutputKind::parse(&line) {
                UciOutputKind::Info(info_str) => {
                    let info = UciInfo::parse(&info_str);
                    if info.has_analysis() {
                        last_info = Some(info);
                    }
                }
                UciOutputKind::BestMove(rest) => {
                    let best = BestMove::parse(&rest).ok_or(EngineError::Malformed(line))?;
                    debug!(mv = %best.mv, ponder = ?best.ponder, "bestmove");
                    return Ok(EngineReply {
                        best,
                        info: last_info,
                    });
                }
                UciOutputKind::Other(text) => debug!(target: "uci", "ignoring {:?}", text),
                _ => {}
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        if self.process.is_some() {
            debug!("shutting the engine down");
        }
        let _ = self.stop();
    }
}
