//! Session controller: owns one run's state, the ledger and the RNG, and
//! applies ticks and commands to them in order.

use log::info;
use rand::Rng;

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{Command, GameState, GameStatus};
use crate::error::GameError;
use crate::ledger::Ledger;

/// Number of cosmetic colour themes the front end cycles through.
pub const TEXTURE_SETS: usize = 3;

/// What the front end should do after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The player left the session (back to the menu).
    Ended,
}

pub struct Session<R: Rng> {
    config: GameConfig,
    state: GameState,
    ledger: Ledger,
    rng: R,
    texture: usize,
}

impl<R: Rng> Session<R> {
    pub fn new(config: GameConfig, ledger: Ledger, mut rng: R) -> Result<Self, GameError> {
        config.validate()?;
        if ledger.capacity() != config.ledger_capacity {
            return Err(GameError::InvalidConfig(format!(
                "ledger holds {} entries but the config asks for {}",
                ledger.capacity(),
                config.ledger_capacity
            )));
        }
        let state = compute::init_state(&config, &mut rng)?;
        Ok(Self {
            config,
            state,
            ledger,
            rng,
            texture: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn texture(&self) -> usize {
        self.texture
    }

    /// The score this run competes for the ledger with.
    pub fn ranked_score(&self) -> f32 {
        self.state.final_score.unwrap_or(self.state.score)
    }

    /// Give the ledger back, e.g. to hand it to the next session.
    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// Run one simulation step.  On the step that ends the run, the ledger
    /// decides whether the player gets to enter a name first.
    pub fn tick(&mut self) -> Result<(), GameError> {
        let was_playing = self.state.status == GameStatus::Playing;
        self.state = compute::tick(&self.state, &self.config, &mut self.rng)?;

        if was_playing && self.state.status == GameStatus::GameOver {
            let score = self.ranked_score();
            info!(
                "game over after {} ticks with score {}",
                self.state.frame, score
            );
            if self.ledger.qualifies(score) {
                self.state.status = GameStatus::AwaitingNameInput;
            }
        }
        Ok(())
    }

    /// Apply a front-end command.  Commands that make no sense in the
    /// current state are ignored.
    pub fn apply(&mut self, command: Command) -> Result<Flow, GameError> {
        match command {
            Command::Jump => {
                self.state = compute::jump(&self.state, &self.config);
            }
            Command::Reset => {
                self.state = compute::reset(&self.state, &self.config, &mut self.rng)?;
            }
            Command::CycleTexture => {
                self.texture = (self.texture + 1) % TEXTURE_SETS;
            }
            Command::QuitToMenu => {
                if self.state.status == GameStatus::GameOver {
                    return Ok(Flow::Ended);
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Resolve a pending name prompt (`None` = cancelled).  Returns whether
    /// the ledger took the entry; either way the run is then over.
    pub fn submit_name(&mut self, raw_name: Option<&str>) -> bool {
        if self.state.status != GameStatus::AwaitingNameInput {
            return false;
        }
        let accepted = self.ledger.submit(raw_name, self.ranked_score());
        self.state.status = GameStatus::GameOver;
        self.state.new_record = accepted;
        accepted
    }
}
