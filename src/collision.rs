//! Collision resolution for projectiles.
//!
//! Shields are checked first for every projectile; a shot a shield absorbs
//! goes no further that frame. A rising player shot then looks one row ahead
//! in the last rendered world grid: anything other than a transparent glyph
//! there is confirmed against the footprints of the live enemies.

use crate::consts::{PLAYER_WIDTH, PLAYFIELD_TOP, SCREEN_HEIGHT};
use crate::formation::Formation;
use crate::projectile::Projectile;
use crate::shield::{absorb_hit, Shield};
use crate::world::{is_transparent, WorldGrid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerShotOutcome {
    InFlight,
    Absorbed,
    LeftScreen,
    HitEnemy { row: usize, col: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyShotOutcome {
    InFlight,
    Absorbed,
    /// Passed the bottom row without touching the player
    Missed,
    HitPlayer,
}

/// Which live enemy, if any, occupies screen cell (col, row).
pub fn struck_enemy(world: &WorldGrid, formation: &Formation, col: i32, row: i32) -> Option<(usize, usize)> {
    if row < PLAYFIELD_TOP || !world.contains(row, col) {
        return None;
    }
    if is_transparent(world.read_at(row as usize, col as usize)) {
        return None;
    }
    formation.enemy_at(col, row)
}

/// Resolve a visible player shot at its current position.
pub fn resolve_player_shot(
    shot: &Projectile,
    shields: &mut [Shield],
    world: &WorldGrid,
    formation: &Formation,
) -> PlayerShotOutcome {
    let (col, row) = shot.cell();
    if absorb_hit(shields, col, row) {
        return PlayerShotOutcome::Absorbed;
    }
    if row <= 0 {
        return PlayerShotOutcome::LeftScreen;
    }
    match struck_enemy(world, formation, col, row - 1) {
        Some((row, col)) => PlayerShotOutcome::HitEnemy { row, col },
        None => PlayerShotOutcome::InFlight,
    }
}

/// Whether screen column `col` falls inside the player's footprint.
pub fn covers_player(player_column: i32, col: i32) -> bool {
    (player_column..player_column + PLAYER_WIDTH as i32).contains(&col)
}

/// Resolve a visible enemy shot at its current position.
pub fn resolve_enemy_shot(
    shot: &Projectile,
    shields: &mut [Shield],
    player_column: i32,
    player_exploding: bool,
) -> EnemyShotOutcome {
    let (col, row) = shot.cell();
    if absorb_hit(shields, col, row) {
        return EnemyShotOutcome::Absorbed;
    }
    if row < SCREEN_HEIGHT as i32 {
        return EnemyShotOutcome::InFlight;
    }
    if !player_exploding && covers_player(player_column, col) {
        EnemyShotOutcome::HitPlayer
    } else {
        EnemyShotOutcome::Missed
    }
}
