//! Round state types: plain data, no frame logic.
//!
//! Everything one round mutates lives in [`RoundState`]; the frame stepper
//! in `compute` is the only thing that changes it.

use crate::config::GameConfig;
use crate::formation::Formation;
use crate::input::KeyLatch;
use crate::projectile::{Projectile, ProjectilePool};
use crate::shield::Shield;
use crate::world::WorldGrid;

/// Why a round stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundEnd {
    /// The player asked to leave
    Quit,
    /// The last life was lost
    LivesExhausted,
    /// The formation reached the bottom of the screen
    FormationLanded,
    /// Every enemy was destroyed
    FormationCleared,
}

impl RoundEnd {
    pub fn is_victory(&self) -> bool {
        *self == RoundEnd::FormationCleared
    }

    pub fn describe(&self) -> &'static str {
        match self {
            RoundEnd::Quit => "Quit",
            RoundEnd::LivesExhausted => "No lives left",
            RoundEnd::FormationLanded => "The invaders have landed",
            RoundEnd::FormationCleared => "Formation destroyed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Hit by enemy fire; frozen until the explosion finishes
    PlayerExploding,
    RoundOver(RoundEnd),
    Quit,
}

impl GameStatus {
    /// The round has stopped and will not step again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameStatus::RoundOver(_) | GameStatus::Quit)
    }

    pub fn round_end(&self) -> Option<RoundEnd> {
        match self {
            GameStatus::RoundOver(end) => Some(*end),
            GameStatus::Quit => Some(RoundEnd::Quit),
            _ => None,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Left column of the 3-wide ship, continuous
    pub x: f32,
    /// Showing the hit explosion
    pub hit: bool,
    pub explosion_elapsed: f32,
    pub lives: u32,
    pub score: u32,
    pub fire_latch: KeyLatch,
}

impl Player {
    /// Rounded left column of the ship
    pub fn column(&self) -> i32 {
        self.x.round() as i32
    }
}

// ── Master round state ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct RoundState {
    pub player: Player,
    pub player_shot: Projectile,
    pub enemy_shots: ProjectilePool,
    pub formation: Formation,
    pub shields: Vec<Shield>,
    /// Last rendered frame; read back by the collision resolver
    pub world: WorldGrid,
    pub status: GameStatus,
    pub config: GameConfig,
    /// Frames stepped so far
    pub frame: u64,
    /// Elapsed time of the most recent frame
    pub last_dt: f32,
}

impl RoundState {
    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn player_exploding(&self) -> bool {
        self.status == GameStatus::PlayerExploding
    }
}
