/// All game entity types — pure data, no logic.

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// The run ended with a score good enough for the ledger; ticking is
    /// suspended until the player's name has been submitted or cancelled.
    AwaitingNameInput,
    GameOver,
}

/// Commands produced by the front end and fed into the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Jump,
    Reset,
    /// Cosmetic only: switches the colour theme.
    CycleTexture,
    QuitToMenu,
}

// ── Bird ──────────────────────────────────────────────────────────────────────

/// The bird only moves vertically; its horizontal lane is fixed by the config.
#[derive(Clone, Debug, PartialEq)]
pub struct Bird {
    pub y: i32,
    /// Positive = falling.
    pub velocity: i32,
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// Which member of a pair a pipe is, with its vertical extent.
#[derive(Clone, Debug, PartialEq)]
pub enum PipeSide {
    /// Hangs from the world top down to the start of the gap.
    Top { height: i32 },
    /// Rises from the end of the gap (`top`) to the world bottom.
    Bottom { top: i32, height: i32 },
}

/// One member of an obstacle pair.  Both members share `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Pipe {
    pub x: i32,
    pub width: i32,
    pub side: PipeSide,
}

/// Axis-aligned box in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

// ── High scores ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The state of one run.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub bird: Bird,
    /// Insertion order is left-to-right; pairs are pushed top then bottom.
    pub pipes: Vec<Pipe>,
    pub score: f32,
    pub status: GameStatus,
    /// Set once the ledger has accepted this run's score.
    pub new_record: bool,
    /// Score the run is ranked with, fixed on the tick that ends it.  A
    /// crash freezes the score from before that tick's scoring step.
    pub final_score: Option<f32>,
    pub frame: u64,
}
