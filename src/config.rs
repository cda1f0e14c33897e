/// Tunables for the simulation plus the on-disk locations the binary uses.
///
/// All geometry is in world pixels; the renderer scales the 800x600 world
/// down to whatever terminal it is given.
use std::path::PathBuf;
use std::time::Duration;

use crate::error::GameError;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub world_width: i32,
    pub world_height: i32,
    pub pipe_width: i32,
    /// Vertical opening between the two members of a pair.
    pub pipe_gap: i32,
    /// Horizontal distance every obstacle moves left per tick.
    pub pipe_speed: i32,
    pub gravity: i32,
    /// Velocity a jump sets (negative = upward).
    pub jump_velocity: i32,
    /// Fixed horizontal offset of the bird (the scoring lane).
    pub bird_x: i32,
    pub bird_size: i32,
    pub bird_start_y: i32,
    pub spawn_x: i32,
    /// Minimum horizontal distance between two pairs at placement time.
    pub pair_spacing: i32,
    /// A new pair is generated whenever fewer obstacles than this remain.
    pub min_obstacles: usize,
    pub initial_pairs: usize,
    pub score_per_obstacle: f32,
    /// Gap-top heights are drawn uniformly from `gap_top_min..gap_top_max`.
    pub gap_top_min: i32,
    pub gap_top_max: i32,
    pub max_placement_retries: u32,
    pub tick_period: Duration,
    pub ledger_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 800,
            world_height: 600,
            pipe_width: 50,
            pipe_gap: 100,
            pipe_speed: 5,
            gravity: 1,
            jump_velocity: -10,
            bird_x: 100,
            bird_size: 30,
            bird_start_y: 250,
            spawn_x: 800,
            pair_spacing: 200,
            min_obstacles: 10,
            initial_pairs: 5,
            score_per_obstacle: 0.5,
            gap_top_min: 100,
            gap_top_max: 400,
            max_placement_retries: 64,
            tick_period: Duration::from_millis(20),
            ledger_capacity: 5,
        }
    }
}

impl GameConfig {
    /// Reject configurations under which a legal obstacle pair cannot exist.
    pub fn validate(&self) -> Result<(), GameError> {
        let fail = |msg: String| Err(GameError::InvalidConfig(msg));

        if self.world_width <= 0 || self.world_height <= 0 {
            return fail(format!(
                "world must be non-empty, got {}x{}",
                self.world_width, self.world_height
            ));
        }
        if self.pipe_width <= 0 || self.pipe_speed <= 0 || self.bird_size <= 0 {
            return fail("pipe width, pipe speed and bird size must be positive".to_string());
        }
        if self.pair_spacing <= 0 {
            return fail(format!("pair spacing must be positive, got {}", self.pair_spacing));
        }
        if self.gap_top_min < 0 || self.gap_top_min >= self.gap_top_max {
            return fail(format!(
                "gap-top range {}..{} is empty or negative",
                self.gap_top_min, self.gap_top_max
            ));
        }
        // The tallest top pipe plus the gap must still leave a bottom pipe.
        if self.gap_top_max - 1 + self.pipe_gap >= self.world_height {
            return fail(format!(
                "gap of {} does not fit below gap-top {} in a world {} high",
                self.pipe_gap,
                self.gap_top_max - 1,
                self.world_height
            ));
        }
        if self.max_placement_retries == 0 {
            return fail("max placement retries must be at least 1".to_string());
        }
        if self.ledger_capacity == 0 {
            return fail("ledger capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

// ── File locations ────────────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

/// Score store location: `$FLAPPY_SCORES`, else `~/.flappy_bird_scores`.
pub fn score_file_path() -> PathBuf {
    std::env::var_os("FLAPPY_SCORES")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".flappy_bird_scores"))
}

/// Log file location: `$FLAPPY_LOG`, else `~/.flappy_bird.log`.
pub fn log_file_path() -> PathBuf {
    std::env::var_os("FLAPPY_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".flappy_bird.log"))
}
