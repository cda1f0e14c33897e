/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.
use log::debug;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bird, GameState, GameStatus, Pipe, PipeSide, Rect};
use crate::error::GameError;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// The bird's collision box: fixed lane, square sprite.
pub fn bird_rect(bird: &Bird, cfg: &GameConfig) -> Rect {
    Rect {
        x: cfg.bird_x,
        y: bird.y,
        width: cfg.bird_size,
        height: cfg.bird_size,
    }
}

pub fn pipe_rect(pipe: &Pipe) -> Rect {
    let (y, height) = match pipe.side {
        PipeSide::Top { height } => (0, height),
        PipeSide::Bottom { top, height } => (top, height),
    };
    Rect {
        x: pipe.x,
        y,
        width: pipe.width,
        height,
    }
}

/// Strict overlap test.  Boxes that merely touch do not intersect, and a
/// box with no area never intersects anything.
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    if a.width <= 0 || a.height <= 0 || b.width <= 0 || b.height <= 0 {
        return false;
    }
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

// ── Obstacle generation ──────────────────────────────────────────────────────

/// Append one top/bottom pair at `x`, or further right if `x` is crowded.
///
/// Each attempt draws a fresh gap height.  A slot is crowded when any
/// existing pipe sits closer than `pair_spacing`; the next attempt moves one
/// spacing to the right.  Gives up after `max_placement_retries` moves.
pub(crate) fn place_pair(
    pipes: &mut Vec<Pipe>,
    x: i32,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> Result<(), GameError> {
    let mut candidate = x;
    for attempt in 0..=cfg.max_placement_retries {
        let gap_top = rng.gen_range(cfg.gap_top_min..cfg.gap_top_max);
        let crowded = pipes
            .iter()
            .any(|p| (p.x - candidate).abs() < cfg.pair_spacing);

        if !crowded {
            let bottom_top = gap_top + cfg.pipe_gap;
            pipes.push(Pipe {
                x: candidate,
                width: cfg.pipe_width,
                side: PipeSide::Top { height: gap_top },
            });
            pipes.push(Pipe {
                x: candidate,
                width: cfg.pipe_width,
                side: PipeSide::Bottom {
                    top: bottom_top,
                    height: cfg.world_height - bottom_top,
                },
            });
            return Ok(());
        }

        debug!("pair slot x={} crowded (attempt {})", candidate, attempt);
        candidate += cfg.pair_spacing;
    }

    Err(GameError::PlacementExhausted {
        x,
        retries: cfg.max_placement_retries,
    })
}

/// Add an obstacle pair at horizontal position `x` (or the first free slot
/// to its right).
pub fn add_pipe_pair(
    state: &GameState,
    x: i32,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> Result<GameState, GameError> {
    let mut pipes = state.pipes.clone();
    place_pair(&mut pipes, x, cfg, rng)?;
    Ok(GameState {
        pipes,
        ..state.clone()
    })
}

fn initial_pipes(cfg: &GameConfig, rng: &mut impl Rng) -> Result<Vec<Pipe>, GameError> {
    let mut pipes = Vec::with_capacity(cfg.initial_pairs * 2);
    for i in 0..cfg.initial_pairs {
        let x = cfg.spawn_x + i as i32 * cfg.pair_spacing;
        place_pair(&mut pipes, x, cfg, rng)?;
    }
    Ok(pipes)
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: bird at rest at its start height and the
/// initial pairs lined up off-screen to the right.
pub fn init_state(cfg: &GameConfig, rng: &mut impl Rng) -> Result<GameState, GameError> {
    Ok(GameState {
        bird: Bird {
            y: cfg.bird_start_y,
            velocity: 0,
        },
        pipes: initial_pipes(cfg, rng)?,
        score: 0.0,
        status: GameStatus::Playing,
        new_record: false,
        final_score: None,
        frame: 0,
    })
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Set the bird's velocity to the jump impulse.  Ignored unless playing.
pub fn jump(state: &GameState, cfg: &GameConfig) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    GameState {
        bird: Bird {
            velocity: cfg.jump_velocity,
            ..state.bird.clone()
        },
        ..state.clone()
    }
}

/// Start a fresh run.  Only honoured from `GameOver`.
pub fn reset(
    state: &GameState,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> Result<GameState, GameError> {
    if state.status != GameStatus::GameOver {
        return Ok(state.clone());
    }
    init_state(cfg, rng)
}

// ── Per-tick step (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by one tick.  A no-op unless playing.
///
/// A collision marks the run as over but the rest of the tick still runs:
/// every remaining pipe moves, spawning and scoring still happen.  The run
/// is ranked with the score it had when it crashed (`final_score`).
pub fn tick(
    state: &GameState,
    cfg: &GameConfig,
    rng: &mut impl Rng,
) -> Result<GameState, GameError> {
    if state.status != GameStatus::Playing {
        return Ok(state.clone());
    }

    // ── 1. Gravity ───────────────────────────────────────────────────────────
    let velocity = state.bird.velocity + cfg.gravity;
    let bird = Bird {
        y: state.bird.y + velocity,
        velocity,
    };
    let bird_box = bird_rect(&bird, cfg);

    // ── 2. Scroll pipes, collide, drop the ones past the left edge ──────────
    let mut crashed = false;
    let mut pipes: Vec<Pipe> = Vec::with_capacity(state.pipes.len() + 2);
    for pipe in &state.pipes {
        let moved = Pipe {
            x: pipe.x - cfg.pipe_speed,
            ..pipe.clone()
        };
        if intersects(&pipe_rect(&moved), &bird_box) {
            crashed = true;
        }
        if moved.x + moved.width >= 0 {
            pipes.push(moved);
        }
    }

    // ── 3. Keep the course stocked ───────────────────────────────────────────
    if pipes.len() < cfg.min_obstacles {
        place_pair(&mut pipes, cfg.spawn_x, cfg, rng)?;
    }

    // ── 4. Score every pipe sitting exactly on the lane ──────────────────────
    let on_lane = pipes.iter().filter(|p| p.x == cfg.bird_x).count();
    let score = state.score + on_lane as f32 * cfg.score_per_obstacle;

    // ── 5. World bounds ──────────────────────────────────────────────────────
    let out_of_bounds = bird.y < 0 || bird.y > cfg.world_height;

    let (status, final_score) = if crashed {
        (GameStatus::GameOver, Some(state.score))
    } else if out_of_bounds {
        (GameStatus::GameOver, Some(score))
    } else {
        (GameStatus::Playing, None)
    };

    Ok(GameState {
        bird,
        pipes,
        score,
        status,
        final_score,
        frame: state.frame + 1,
        ..state.clone()
    })
}
