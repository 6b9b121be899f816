//! UCI engine wrapper (async I/O) with per-call deadlines.
//!
//! One `UciEngine` owns one engine process and must never be shared across
//! worker tasks; each concurrently analyzed game gets its own session.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, warn};

use crate::error::ReviewError;

/// Result of a single position evaluation.
///
/// Scores are from the side to move's perspective, as the UCI protocol
/// reports them.
#[derive(Debug, Clone, Default)]
pub struct EvalScore {
    /// Centipawn score
    pub cp: Option<i32>,
    /// Mate in N moves (positive = side to move wins)
    pub mate: Option<i32>,
    /// Best move in coordinate notation, if the engine produced one
    pub best_move: Option<String>,
}

impl EvalScore {
    /// Signed centipawns for the side to move, with mate scores folded into
    /// the ±(10000 − 10·n) range so magnitudes beyond 9000 read as forced
    /// mate. `None` when the engine reported no score at all.
    pub fn mover_cp(&self) -> Option<i32> {
        if let Some(n) = self.mate {
            Some(if n > 0 { 10_000 - n * 10 } else { -10_000 - n * 10 })
        } else {
            self.cp
        }
    }
}

/// A single UCI engine session.
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    deadline: Duration,
}

impl UciEngine {
    /// Spawn an engine process and run the UCI handshake.
    pub async fn new(path: &str, deadline_secs: u64) -> Result<Self, ReviewError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| ReviewError::Engine(format!("Failed to spawn engine: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| ReviewError::Engine("Engine stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| ReviewError::Engine("Engine stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout,
            deadline: Duration::from_secs(deadline_secs),
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine.send("setoption name Threads value 1").await?;
        engine.send("setoption name Hash value 128").await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to the engine.
    async fn send(&mut self, cmd: &str) -> Result<(), ReviewError> {
        debug!(cmd, "UCI <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| ReviewError::Engine(format!("Failed to write to engine: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| ReviewError::Engine(format!("Failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Wait for a specific response line, bounded by the call deadline.
    async fn wait_for(&mut self, expected: &str) -> Result<(), ReviewError> {
        let deadline = self.deadline;
        let wait = async {
            let mut line = String::new();
            loop {
                line.clear();
                self.stdout.read_line(&mut line).await.map_err(|e| {
                    ReviewError::Engine(format!("Failed to read from engine: {e}"))
                })?;
                if line.is_empty() {
                    return Err(ReviewError::Engine("Engine closed its stdout".into()));
                }
                let trimmed = line.trim();
                debug!(line = trimmed, "UCI >");
                if trimmed == expected {
                    return Ok(());
                }
            }
        };
        tokio::time::timeout(deadline, wait)
            .await
            .map_err(|_| ReviewError::Engine(format!("Timed out waiting for '{expected}'")))?
    }

    /// Evaluate a position to the given depth.
    ///
    /// Each attempt runs under the configured deadline; a timed-out or
    /// otherwise failed attempt resyncs the session and retries once before
    /// surfacing the error to the caller.
    pub async fn evaluate(&mut self, fen: &str, depth: u32) -> Result<EvalScore, ReviewError> {
        match self.evaluate_once(fen, depth).await {
            Ok(score) => Ok(score),
            Err(e) => {
                warn!(error = %e, "Evaluation failed, resyncing engine for one retry");
                self.resync().await?;
                self.evaluate_once(fen, depth).await
            }
        }
    }

    async fn evaluate_once(&mut self, fen: &str, depth: u32) -> Result<EvalScore, ReviewError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        let deadline = self.deadline;
        let collect = async {
            let mut result = EvalScore::default();
            let mut line = String::new();
            loop {
                line.clear();
                self.stdout.read_line(&mut line).await.map_err(|e| {
                    ReviewError::Engine(format!("Failed to read from engine: {e}"))
                })?;
                if line.is_empty() {
                    return Err(ReviewError::Engine("Engine closed its stdout".into()));
                }
                let trimmed = line.trim();

                if trimmed.starts_with("info") && trimmed.contains(" pv ") {
                    if let Some(cp) = parse_cp(trimmed) {
                        result.cp = Some(cp);
                        result.mate = None;
                    }
                    if let Some(mate) = parse_mate(trimmed) {
                        result.mate = Some(mate);
                        result.cp = None;
                    }
                } else if trimmed.starts_with("bestmove") {
                    result.best_move = parse_best_move(trimmed);
                    return Ok(result);
                }
            }
        };

        tokio::time::timeout(deadline, collect)
            .await
            .map_err(|_| ReviewError::Engine("Evaluation timed out".into()))?
    }

    /// Bring the session back to a known-idle state after a failed call:
    /// stop any running search, drain its output, confirm readiness.
    async fn resync(&mut self) -> Result<(), ReviewError> {
        self.send("stop").await?;

        // Drain a pending `bestmove` if a search was still running. Absence
        // is fine; the engine may already be idle.
        let drain = async {
            let mut line = String::new();
            loop {
                line.clear();
                if self.stdout.read_line(&mut line).await.is_err() || line.is_empty() {
                    return;
                }
                if line.trim().starts_with("bestmove") {
                    return;
                }
            }
        };
        let _ = tokio::time::timeout(Duration::from_secs(2), drain).await;

        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Send quit command and wait for the process to exit.
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

/// Parse centipawn score from an info line.
fn parse_cp(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "cp" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse mate score from an info line.
fn parse_mate(line: &str) -> Option<i32> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == "mate" && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse the move from a `bestmove` line; `(none)` means no legal move.
fn parse_best_move(line: &str) -> Option<String> {
    let mv = line.split_whitespace().nth(1)?;
    if mv == "(none)" {
        None
    } else {
        Some(mv.to_string())
    }
}
