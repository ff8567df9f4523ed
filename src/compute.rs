//! Frame stepper.
//!
//! `step` advances a round by one measured frame: input, player movement,
//! the player's shot, the formation, enemy fire, enemy shots, explosion
//! timers, then a fresh render into the world grid. All randomness comes
//! through the injected RNG so tests can pin fire decisions.

use rand::Rng;

use crate::collision::{resolve_enemy_shot, resolve_player_shot, EnemyShotOutcome, PlayerShotOutcome};
use crate::config::GameConfig;
use crate::consts::{ENEMY_PROJECTILE_CAPACITY, PLAYER_ROW, PLAYER_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::{GameStatus, Player, RoundEnd, RoundState};
use crate::formation::{Formation, FormationStep};
use crate::input::{InputSnapshot, KeyLatch};
use crate::projectile::{Projectile, ProjectilePool};
use crate::shield::standard_shields;
use crate::world::{WorldGrid, PLAYER_GLYPH, PLAYER_HIT_GLYPH};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh round: every enemy alive, shields at full strength, no
/// shots in flight, score and lives reset.
pub fn init_round(config: &GameConfig) -> RoundState {
    let config = config.clone().sanitized();
    let mut state = RoundState {
        player: Player {
            x: (SCREEN_WIDTH - PLAYER_WIDTH) as f32 / 2.0,
            hit: false,
            explosion_elapsed: 0.0,
            lives: config.starting_lives,
            score: 0,
            fire_latch: KeyLatch::disarmed(),
        },
        player_shot: Projectile::player_shot(config.player_shot_speed),
        enemy_shots: ProjectilePool::new(ENEMY_PROJECTILE_CAPACITY, config.enemy_shot_speed),
        formation: Formation::new(config.initial_anim_delay),
        shields: standard_shields(),
        world: WorldGrid::default(),
        status: GameStatus::Playing,
        config,
        frame: 0,
        last_dt: 0.0,
    };
    render(&mut state);
    log::info!("Round started with {} lives", state.player.lives);
    state
}

// ── Player movement ──────────────────────────────────────────────────────────

fn max_player_x() -> f32 {
    (SCREEN_WIDTH - PLAYER_WIDTH) as f32
}

pub fn move_player_left(state: &mut RoundState, dt: f32) {
    let dx = state.config.player_speed * dt;
    state.player.x = (state.player.x - dx).max(0.0);
}

pub fn move_player_right(state: &mut RoundState, dt: f32) {
    let dx = state.config.player_speed * dt;
    state.player.x = (state.player.x + dx).min(max_player_x());
}

// ── Player shot ──────────────────────────────────────────────────────────────

/// Launch the player's shot on a fresh press of fire.
///
/// Only one shot can be in flight and none can be fired while the player
/// is exploding. Returns true if a shot was launched.
pub fn player_fire(state: &mut RoundState, fire_held: bool) -> bool {
    state.player.fire_latch.observe(fire_held);
    if state.player_shot.visible || state.player_exploding() {
        return false;
    }
    if !state.player.fire_latch.trigger(fire_held) {
        return false;
    }
    state.player_shot.launch(state.player.x + 1.0, (PLAYER_ROW - 1) as f32);
    true
}

/// Move the player's shot and resolve what it ran into.
pub fn update_player_shot(state: &mut RoundState, dt: f32) -> PlayerShotOutcome {
    if !state.player_shot.visible {
        return PlayerShotOutcome::InFlight;
    }
    state.player_shot.advance(dt);
    let outcome = resolve_player_shot(
        &state.player_shot,
        &mut state.shields,
        &state.world,
        &state.formation,
    );
    match outcome {
        PlayerShotOutcome::InFlight => {}
        PlayerShotOutcome::Absorbed | PlayerShotOutcome::LeftScreen => {
            state.player_shot.visible = false;
        }
        PlayerShotOutcome::HitEnemy { row, col } => {
            state.player_shot.visible = false;
            if let Some(finished) = state.formation.strike(row, col) {
                log::debug!("enemy {} finished early by a new hit", finished);
            }
            state.player.score += state.config.kill_score;
            log::debug!("enemy ({}, {}) struck, score {}", row, col, state.player.score);
        }
    }
    outcome
}

// ── Enemies ──────────────────────────────────────────────────────────────────

/// Per-frame fire roll for every live enemy. Enemies lined up with the
/// player fire far more often. Shots past the pool's capacity are dropped.
///
/// Enemies whose row has sunk below the screen are not drawn and do not
/// fire; a shot never spawns below the player's row.
pub fn enemy_fire(state: &mut RoundState, rng: &mut impl Rng) -> usize {
    let player_column = state.player.column();
    let mut fired = 0;
    let on_screen = state
        .formation
        .alive_positions()
        .filter(|&(_, _, _, y)| y < SCREEN_HEIGHT as i32);
    for (_, _, x, y) in on_screen {
        let spawn_row = (y + 1).min(PLAYER_ROW);
        let chance = if x == player_column {
            state.config.aligned_fire_chance
        } else {
            state.config.base_fire_chance
        };
        if rng.gen::<f32>() < chance && state.enemy_shots.claim((x + 1) as f32, spawn_row as f32) {
            fired += 1;
        }
    }
    fired
}

/// Move every enemy shot and resolve hits on shields and the player.
/// Returns true if the player was freshly hit.
pub fn update_enemy_shots(state: &mut RoundState, dt: f32) -> bool {
    let player_column = state.player.column();
    let mut exploding = state.player_exploding();
    let mut player_hit = false;
    for shot in state.enemy_shots.iter_mut().filter(|p| p.visible) {
        shot.advance(dt);
        match resolve_enemy_shot(shot, &mut state.shields, player_column, exploding) {
            EnemyShotOutcome::InFlight => {}
            EnemyShotOutcome::Absorbed | EnemyShotOutcome::Missed => shot.visible = false,
            EnemyShotOutcome::HitPlayer => {
                shot.visible = false;
                exploding = true;
                player_hit = true;
            }
        }
    }
    if player_hit {
        hit_player(state);
    }
    player_hit
}

fn hit_player(state: &mut RoundState) {
    state.player.lives = state.player.lives.saturating_sub(1);
    state.player.hit = true;
    state.player.explosion_elapsed = 0.0;
    log::info!("Player hit, {} lives left", state.player.lives);
    state.status = if state.player.lives == 0 {
        GameStatus::RoundOver(RoundEnd::LivesExhausted)
    } else {
        GameStatus::PlayerExploding
    };
}

// ── Timers ───────────────────────────────────────────────────────────────────

/// Advance the enemy and player explosion timers.
pub fn update_explosions(state: &mut RoundState, dt: f32) {
    state
        .formation
        .tick_explosion(dt, state.config.enemy_explosion_secs);

    if state.status == GameStatus::PlayerExploding {
        state.player.explosion_elapsed += dt;
        if state.player.explosion_elapsed >= state.config.player_explosion_secs {
            state.player.explosion_elapsed = 0.0;
            state.player.hit = false;
            state.status = GameStatus::Playing;
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────────────────

/// Redraw every live entity into a freshly cleared world grid.
pub fn render(state: &mut RoundState) {
    let RoundState {
        world,
        shields,
        formation,
        player,
        player_shot,
        enemy_shots,
        ..
    } = state;

    world.clear();
    for shield in shields.iter() {
        shield.draw(world);
    }
    formation.draw(world);
    if player.hit {
        world.write_clipped(PLAYER_ROW, player.column(), std::iter::repeat(PLAYER_HIT_GLYPH).take(PLAYER_WIDTH));
    } else {
        world.write_clipped(PLAYER_ROW, player.column(), PLAYER_GLYPH.chars());
    }
    player_shot.draw(world);
    enemy_shots.draw(world);
}

// ── Per-frame step ───────────────────────────────────────────────────────────

fn finish_round(state: &mut RoundState, end: RoundEnd) {
    state.status = GameStatus::RoundOver(end);
    log::info!("Round over ({:?}), score {}", end, state.player.score);
}

/// Advance the round by one frame of `dt` seconds.
///
/// A quit request ends the round before anything moves. Once the round is
/// over further calls change nothing.
pub fn step(state: &mut RoundState, input: &InputSnapshot, dt: f32, rng: &mut impl Rng) -> GameStatus {
    if state.status.is_terminal() {
        return state.status;
    }
    let dt = dt.max(0.0);
    state.frame += 1;
    state.last_dt = dt;
    let time_to_move = state.formation.accumulate(dt);

    if input.quit {
        state.status = GameStatus::Quit;
        log::info!("Quit requested, score {}", state.player.score);
        return state.status;
    }

    if !state.player_exploding() {
        if input.left {
            move_player_left(state, dt);
        }
        if input.right {
            move_player_right(state, dt);
        }
    }

    if state.player_shot.visible {
        state.player.fire_latch.observe(input.fire);
        update_player_shot(state, dt);
    } else {
        player_fire(state, input.fire);
    }

    let delay_step = state.config.anim_delay_step;
    let min_delay = state.config.min_anim_delay;
    if state.formation.advance(time_to_move, delay_step, min_delay) == FormationStep::Landed {
        finish_round(state, RoundEnd::FormationLanded);
        render(state);
        return state.status;
    }

    enemy_fire(state, rng);
    update_enemy_shots(state, dt);
    update_explosions(state, dt);

    if !state.status.is_terminal() && state.formation.is_cleared() {
        finish_round(state, RoundEnd::FormationCleared);
    }

    render(state);
    if time_to_move {
        state.formation.flip_frame();
    }
    state.status
}
