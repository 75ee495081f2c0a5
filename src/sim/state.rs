//! Game state and entity types
//!
//! Everything a renderer needs to draw a frame lives in `GameState`.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ducks remain
    Playing,
    /// Every duck collected; only restart leaves this phase
    Completed,
}

impl GamePhase {
    /// Phase implied by a score (completed once score reaches target)
    pub fn for_score(score: u32, target: u32) -> Self {
        if score >= target {
            GamePhase::Completed
        } else {
            GamePhase::Playing
        }
    }
}

/// A duck waiting to be collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    /// Unique within the session
    pub id: u32,
    pub pos: Vec3,
}

/// The player's marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
}

impl Player {
    /// Player at the session origin (resting on the ground plane)
    pub fn at_origin(rest_height: f32) -> Self {
        Self {
            pos: Vec3::new(0.0, rest_height, 0.0),
        }
    }
}

/// RNG state wrapper for serialization
///
/// Each session draws from its own PCG stream of the run seed, so a restart
/// spawns new positions while the run stays reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Session counter, used as the PCG stream
    pub session: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, session: 0 }
    }

    /// RNG for the current session
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.session)
    }

    /// State for the session after this one
    pub fn next_session(&self) -> Self {
        Self {
            seed: self.seed,
            session: self.session.wrapping_add(1),
        }
    }
}

/// Complete game state (a value; transitions return a new one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Parameters the session was started with
    pub settings: Settings,
    pub rng_state: RngState,
    pub player: Player,
    /// Ducks still in play (sorted by id)
    pub collectibles: Vec<Collectible>,
    /// Ducks collected so far this session
    pub score: u32,
    pub phase: GamePhase,
}

impl GameState {
    /// True once score has reached the target
    pub fn completed(&self) -> bool {
        self.phase == GamePhase::Completed
    }

    /// Number of ducks still to collect
    pub fn remaining(&self) -> usize {
        self.collectibles.len()
    }

    /// Look up an active collectible by id
    pub fn collectible(&self, id: u32) -> Option<&Collectible> {
        self.collectibles.iter().find(|c| c.id == id)
    }
}
