//! Console Invaders - a terminal space invaders clone
//!
//! Core modules:
//! - `entities`: pure data for one round (player, projectiles, status)
//! - `world`: the character grid every frame is rendered into
//! - `shield`, `formation`, `projectile`: the simulated entities
//! - `collision`: maps projectile positions back to what they struck
//! - `compute`: the frame stepper
//! - `session`: drives rounds over abstract input, clock and render sink
//! - `config`: tunable balance values, persisted as JSON

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod formation;
pub mod input;
pub mod projectile;
pub mod session;
pub mod shield;
pub mod world;

pub use config::GameConfig;
pub use entities::{GameStatus, RoundEnd, RoundState};

/// Fixed geometry of the playfield and its entities.
pub mod consts {
    /// Screen dimensions in character cells
    pub const SCREEN_WIDTH: usize = 120;
    pub const SCREEN_HEIGHT: usize = 30;

    /// Row 0 is reserved for the HUD; shots above this row hit nothing
    pub const PLAYFIELD_TOP: i32 = 1;

    /// Formation is FORMATION_COLS x FORMATION_ROWS enemies
    pub const FORMATION_COLS: usize = 10;
    pub const FORMATION_ROWS: usize = 4;
    pub const FORMATION_SIZE: usize = FORMATION_COLS * FORMATION_ROWS;
    /// Each enemy glyph is 3 characters wide, one frame per half of the glyph string
    pub const ALIEN_GLYPH_WIDTH: usize = 3;
    /// Screen columns between the left edges of neighbouring enemies
    pub const ALIEN_COL_SPACING: i32 = 6;
    /// Screen rows between neighbouring formation rows
    pub const ALIEN_ROW_SPACING: i32 = 2;
    /// Where a fresh formation starts
    pub const FORMATION_START_X: i32 = 2;
    pub const FORMATION_START_Y: i32 = 2;

    /// Player sits on the last row and is PLAYER_WIDTH columns wide
    pub const PLAYER_ROW: i32 = SCREEN_HEIGHT as i32 - 1;
    pub const PLAYER_WIDTH: usize = 3;

    /// Shields
    pub const SHIELD_COUNT: usize = 3;
    pub const SHIELD_LENGTH: usize = 8;
    pub const SHIELD_HEIGHT: usize = 3;
    pub const SHIELD_MAX_STRENGTH: u8 = 3;
    pub const SHIELD_SPACING: i32 = 30;
    pub const SHIELD_ROW: i32 = SCREEN_HEIGHT as i32 - 6;

    /// Enemy projectiles share a pool of this many slots
    pub const ENEMY_PROJECTILE_CAPACITY: usize = 5;
}
