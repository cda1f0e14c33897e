/// Error types shared by the game logic and the high-score ledger.
use std::io;

use thiserror::Error;

/// Fatal errors: the simulation cannot continue with this configuration.
#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("no free slot for an obstacle pair starting at x={x} after {retries} retries")]
    PlacementExhausted { x: i32, retries: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Persistence errors.  Never fatal: callers recover by treating the store
/// as empty (load) or by logging and carrying on (save).
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("score store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed score entry on line {line}: {content:?}")]
    Parse { line: usize, content: String },
}
