use console_invaders::compute::*;
use console_invaders::consts::*;
use console_invaders::entities::*;
use console_invaders::formation::{EnemyState, BLOCK_WIDTH};
use console_invaders::input::{InputSnapshot, Key};
use console_invaders::GameConfig;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 60.0;

/// A formation that never moves within a test's time span.
fn frozen_config() -> GameConfig {
    GameConfig {
        initial_anim_delay: 1000.0,
        ..GameConfig::default()
    }
}

fn make_state() -> RoundState {
    init_round(&frozen_config())
}

/// Every fire roll comes up just under 1.0: nothing below certainty fires.
fn never_fire() -> StepRng {
    StepRng::new(u64::MAX, 0)
}

/// Every fire roll comes up 0.0: every enemy with a non-zero chance fires.
fn always_fire() -> StepRng {
    StepRng::new(0, 0)
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn pressing(key: Key) -> InputSnapshot {
    InputSnapshot::default().with(key)
}

fn exploding_count(state: &RoundState) -> usize {
    state
        .formation
        .cells()
        .iter()
        .filter(|&&s| s == EnemyState::Exploding)
        .count()
}

// ── init_round ───────────────────────────────────────────────────────────────

#[test]
fn init_round_fresh_state() {
    let s = init_round(&GameConfig::default());
    assert_eq!(s.formation.alive_count(), FORMATION_SIZE);
    assert_eq!(s.lives(), 3);
    assert_eq!(s.score(), 0);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.frame, 0);
    assert!(!s.player_shot.visible);
    assert_eq!(s.enemy_shots.active_count(), 0);
    assert_eq!(s.enemy_shots.capacity(), ENEMY_PROJECTILE_CAPACITY);
    assert_eq!(s.shields.len(), SHIELD_COUNT);
    assert!(s.shields.iter().all(|sh| sh.total_strength() == 72));
}

#[test]
fn init_round_renders_first_frame() {
    let s = init_round(&GameConfig::default());
    // player centred: x = 58.5 rounds to column 59
    assert_eq!(s.player.column(), 59);
    assert_eq!(s.world.row(PLAYER_ROW as usize)[59..62], ['<', 'I', '>']);
    assert_eq!(s.world.row(2)[2..5], ['<', 'o', '>']);
    assert_eq!(s.world.read_at(24, 30), '#');
}

#[test]
fn init_round_uses_configured_lives() {
    let config = GameConfig {
        starting_lives: 5,
        ..GameConfig::default()
    };
    assert_eq!(init_round(&config).lives(), 5);
}

// ── player movement ──────────────────────────────────────────────────────────

#[test]
fn movement_scales_with_elapsed_time() {
    let mut s = make_state();
    s.player.x = 50.0;
    move_player_right(&mut s, 0.5);
    assert!((s.player.x - 56.0).abs() < 1e-4);
    move_player_left(&mut s, 0.25);
    assert!((s.player.x - 53.0).abs() < 1e-4);
}

#[test]
fn movement_clamps_to_screen() {
    let mut s = make_state();
    s.player.x = 0.1;
    move_player_left(&mut s, DT);
    assert_eq!(s.player.x, 0.0);
    s.player.x = 116.9;
    move_player_right(&mut s, DT);
    assert_eq!(s.player.x, (SCREEN_WIDTH - PLAYER_WIDTH) as f32);
}

#[test]
fn movement_suppressed_while_exploding() {
    let mut s = make_state();
    s.status = GameStatus::PlayerExploding;
    let x = s.player.x;
    step(&mut s, &pressing(Key::Left), DT, &mut never_fire());
    assert_eq!(s.player.x, x);
}

#[test]
fn zero_elapsed_time_moves_nothing() {
    let mut s = make_state();
    s.player_shot.launch(100.0, 20.0);
    let x = s.player.x;
    step(&mut s, &pressing(Key::Right), 0.0, &mut never_fire());
    assert_eq!(s.player.x, x);
    assert_eq!(s.player_shot.y, 20.0);
}

// ── player firing ────────────────────────────────────────────────────────────

#[test]
fn fire_launches_shot_above_player() {
    let mut s = make_state();
    s.player.x = 100.0;
    assert!(!player_fire(&mut s, false));
    assert!(player_fire(&mut s, true));
    assert!(s.player_shot.visible);
    assert_eq!(s.player_shot.x, 101.0);
    assert_eq!(s.player_shot.y, (PLAYER_ROW - 1) as f32);
}

#[test]
fn held_fire_never_creates_second_shot() {
    let mut s = make_state();
    s.player.x = 100.0; // clear of shields and enemies
    let mut rng = never_fire();
    step(&mut s, &idle(), DT, &mut rng);
    let mut launches = 0;
    let mut was_visible = false;
    for _ in 0..200 {
        step(&mut s, &pressing(Key::Fire), DT, &mut rng);
        if s.player_shot.visible && !was_visible {
            launches += 1;
        }
        was_visible = s.player_shot.visible;
    }
    assert_eq!(launches, 1);
    assert!(!s.player_shot.visible, "shot should have left the top of the screen");

    // release, then press again
    step(&mut s, &idle(), DT, &mut rng);
    assert!(!s.player_shot.visible);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    assert!(s.player_shot.visible);
}

#[test]
fn fire_held_into_new_round_needs_release() {
    // the press that restarted the round is still down on its first frame
    let mut s = make_state();
    s.player.x = 100.0;
    let mut rng = never_fire();
    for _ in 0..5 {
        step(&mut s, &pressing(Key::Fire), DT, &mut rng);
        assert!(!s.player_shot.visible);
    }
    step(&mut s, &idle(), DT, &mut rng);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    assert!(s.player_shot.visible);
}

#[test]
fn repress_while_shot_in_flight_is_ignored() {
    let mut s = make_state();
    s.player.x = 100.0;
    let mut rng = never_fire();
    step(&mut s, &idle(), DT, &mut rng);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    let first_y = s.player_shot.y;
    step(&mut s, &idle(), DT, &mut rng);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    assert!(s.player_shot.visible);
    assert!(s.player_shot.y < first_y);
}

#[test]
fn cannot_fire_while_exploding() {
    let mut s = make_state();
    s.status = GameStatus::PlayerExploding;
    assert!(!player_fire(&mut s, true));
    assert!(!s.player_shot.visible);
}

#[test]
fn shield_absorbs_player_shot() {
    let mut s = make_state();
    s.player.x = 30.0; // shot at column 31, under the first shield
    let mut rng = never_fire();
    step(&mut s, &idle(), DT, &mut rng);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    for _ in 0..30 {
        step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    }
    assert!(!s.player_shot.visible);
    assert_eq!(s.shields[0].strength_at(1, 2), Some(SHIELD_MAX_STRENGTH - 1));
    assert_eq!(s.score(), 0);
}

// ── end to end: destroying an enemy ──────────────────────────────────────────

#[test]
fn shot_destroys_enemy_directly_above() {
    let mut s = make_state();
    // shot column 9 is inside enemy (3, 1), which spans columns 8..=10 on row 8
    s.player.x = 8.0;
    let mut rng = never_fire();

    step(&mut s, &idle(), DT, &mut rng);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    let mut frames = 0;
    while s.formation.state(3, 1) == EnemyState::Alive && frames < 200 {
        step(&mut s, &idle(), DT, &mut rng);
        frames += 1;
    }
    assert_eq!(s.formation.state(3, 1), EnemyState::Exploding);
    assert_eq!(s.score(), 100);
    assert!(!s.player_shot.visible);
    assert_eq!(s.formation.alive_count(), FORMATION_SIZE - 1);
    assert_eq!(exploding_count(&s), 1);

    let mut frames = 0;
    while s.formation.state(3, 1) == EnemyState::Exploding {
        step(&mut s, &idle(), DT, &mut rng);
        frames += 1;
        assert!(frames <= 40, "explosion lasted too long");
    }
    assert!(frames >= 30, "explosion ended after only {} frames", frames);
    assert_eq!(s.formation.state(3, 1), EnemyState::Dead);
    assert_eq!(s.score(), 100);
    assert_eq!(exploding_count(&s), 0);
}

#[test]
fn shot_between_enemies_flies_past() {
    let mut s = make_state();
    s.player.x = 11.0; // column 12 falls in the gap between enemy columns
    let mut rng = never_fire();
    step(&mut s, &idle(), DT, &mut rng);
    step(&mut s, &pressing(Key::Fire), DT, &mut rng);
    for _ in 0..200 {
        step(&mut s, &idle(), DT, &mut rng);
    }
    assert_eq!(s.formation.alive_count(), FORMATION_SIZE);
    assert_eq!(s.score(), 0);
}

#[test]
fn at_most_one_enemy_exploding() {
    let config = GameConfig {
        player_shot_speed: 200.0,
        ..frozen_config()
    };
    let mut s = init_round(&config);
    s.player.x = 20.0;
    let mut rng = StdRng::seed_from_u64(42);
    let mut never = never_fire();
    for i in 0..3000 {
        let input = InputSnapshot {
            left: rng.gen_bool(0.3),
            right: rng.gen_bool(0.3),
            fire: i % 2 == 0,
            ..InputSnapshot::default()
        };
        step(&mut s, &input, DT, &mut never);
        assert!(exploding_count(&s) <= 1);
        if s.status.is_terminal() {
            break;
        }
    }
    assert!(s.score() > 0);
}

// ── enemy fire ───────────────────────────────────────────────────────────────

#[test]
fn enemy_fire_drops_shots_when_pool_full() {
    let mut s = make_state();
    let mut rng = always_fire();
    assert_eq!(enemy_fire(&mut s, &mut rng), ENEMY_PROJECTILE_CAPACITY);
    assert_eq!(s.enemy_shots.active_count(), ENEMY_PROJECTILE_CAPACITY);
    assert_eq!(enemy_fire(&mut s, &mut rng), 0);
    assert_eq!(s.enemy_shots.active_count(), ENEMY_PROJECTILE_CAPACITY);
}

#[test]
fn aligned_enemies_fire_more_often() {
    let config = GameConfig {
        aligned_fire_chance: 1.0,
        base_fire_chance: 0.0,
        ..frozen_config()
    };
    let mut s = init_round(&config);
    // formation column 3 sits at screen x = 2 + 3 * 6 = 20
    s.player.x = 20.0;
    assert_eq!(enemy_fire(&mut s, &mut never_fire()), FORMATION_ROWS);
    assert!(s.enemy_shots.iter().filter(|p| p.visible).all(|p| p.x == 21.0));
    let mut rows: Vec<f32> = s.enemy_shots.iter().filter(|p| p.visible).map(|p| p.y).collect();
    rows.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(rows, vec![3.0, 5.0, 7.0, 9.0]);
}

#[test]
fn enemies_below_the_screen_hold_fire() {
    let config = GameConfig {
        aligned_fire_chance: 1.0,
        base_fire_chance: 0.0,
        ..frozen_config()
    };
    let mut s = init_round(&config);
    // back row sits at y = 25 + 3 * 2 = 31, off the grid but not yet landed
    s.formation.x = 4;
    s.formation.y = 25;
    s.player.x = 10.0;
    assert_eq!(s.formation.screen_pos(3, 1), (10, 31));
    assert!(!s.formation.has_landed());

    let status = step(&mut s, &idle(), 0.0, &mut never_fire());
    assert_eq!(status, GameStatus::Playing);
    assert_eq!(s.lives(), 3);
    // rows 0..=2 of column 1 are on screen and fire; every shot is on the grid
    assert_eq!(s.enemy_shots.active_count(), 3);
    assert!(s
        .enemy_shots
        .iter()
        .filter(|p| p.visible)
        .all(|p| (p.y as usize) < SCREEN_HEIGHT));
}

#[test]
fn dead_enemies_do_not_fire() {
    let mut s = make_state();
    s.formation.strike(0, 0);
    s.formation.tick_explosion(1.0, 0.6);
    let mut rng = always_fire();
    enemy_fire(&mut s, &mut rng);
    assert!(s.enemy_shots.iter().all(|p| p.x != 3.0 || p.y != 3.0));
}

// ── enemy shots ──────────────────────────────────────────────────────────────

#[test]
fn last_life_lost_ends_round() {
    let config = GameConfig {
        starting_lives: 1,
        ..frozen_config()
    };
    let mut s = init_round(&config);
    let col = s.player.column();
    s.enemy_shots.claim((col + 1) as f32, 29.6);
    let status = step(&mut s, &idle(), DT, &mut never_fire());
    assert_eq!(s.lives(), 0);
    assert_eq!(status, GameStatus::RoundOver(RoundEnd::LivesExhausted));
    assert_eq!(s.enemy_shots.active_count(), 0);
}

#[test]
fn player_hit_explodes_then_recovers() {
    let mut s = make_state();
    let col = s.player.column();
    s.enemy_shots.claim(col as f32, 29.6);
    let mut rng = never_fire();
    step(&mut s, &idle(), DT, &mut rng);
    assert_eq!(s.lives(), 2);
    assert_eq!(s.status, GameStatus::PlayerExploding);
    assert!(s.player.hit);
    assert_eq!(s.world.row(PLAYER_ROW as usize)[59..62], ['X', 'X', 'X']);

    // a second shot during the explosion does not cost a life
    s.enemy_shots.claim(col as f32, 29.6);
    step(&mut s, &idle(), DT, &mut rng);
    assert_eq!(s.lives(), 2);

    let mut frames = 0;
    while s.status == GameStatus::PlayerExploding {
        step(&mut s, &idle(), DT, &mut rng);
        frames += 1;
        assert!(frames <= 70);
    }
    assert_eq!(s.status, GameStatus::Playing);
    assert!(!s.player.hit);
}

#[test]
fn enemy_shot_misses_unaligned_player() {
    let mut s = make_state();
    s.enemy_shots.claim(5.0, 29.6);
    step(&mut s, &idle(), DT, &mut never_fire());
    assert_eq!(s.lives(), 3);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.enemy_shots.active_count(), 0);
}

#[test]
fn shield_absorbs_enemy_shot() {
    let mut s = make_state();
    s.enemy_shots.claim(31.0, 23.8);
    step(&mut s, &idle(), DT, &mut never_fire());
    assert_eq!(s.enemy_shots.active_count(), 0);
    assert_eq!(s.shields[0].strength_at(1, 0), Some(SHIELD_MAX_STRENGTH - 1));
}

// ── formation ────────────────────────────────────────────────────────────────

#[test]
fn formation_at_bottom_ends_round() {
    let mut s = make_state();
    s.formation.y = SCREEN_HEIGHT as i32 - FORMATION_ROWS as i32;
    let status = step(&mut s, &idle(), DT, &mut never_fire());
    assert_eq!(status, GameStatus::RoundOver(RoundEnd::FormationLanded));
    assert_eq!(s.lives(), 3);
    assert_eq!(s.formation.alive_count(), FORMATION_SIZE);
}

#[test]
fn formation_descends_until_it_lands() {
    let config = GameConfig {
        initial_anim_delay: 0.01,
        min_anim_delay: 0.01,
        ..GameConfig::default()
    };
    let mut s = init_round(&config);
    let mut rng = never_fire();
    let mut last_y = s.formation.y;
    for _ in 0..5000 {
        step(&mut s, &idle(), 0.02, &mut rng);
        assert!(s.formation.x >= 0);
        assert!(s.formation.x + BLOCK_WIDTH <= SCREEN_WIDTH as i32);
        assert!(s.formation.y >= last_y);
        last_y = s.formation.y;
        if s.status.is_terminal() {
            break;
        }
    }
    assert_eq!(s.status, GameStatus::RoundOver(RoundEnd::FormationLanded));
    assert!(s.formation.y + FORMATION_ROWS as i32 >= SCREEN_HEIGHT as i32);
    assert_eq!(s.formation.alive_count(), FORMATION_SIZE);
    assert_eq!(s.lives(), 3);
}

#[test]
fn formation_moves_on_its_cadence() {
    let mut s = init_round(&GameConfig::default()); // 0.35 s between moves
    let mut rng = never_fire();
    for _ in 0..20 {
        step(&mut s, &idle(), DT, &mut rng);
    }
    assert_eq!(s.formation.x, FORMATION_START_X);
    for _ in 0..2 {
        step(&mut s, &idle(), DT, &mut rng);
    }
    assert_eq!(s.formation.x, FORMATION_START_X + 1);
    assert_eq!(s.formation.frame_offset, ALIEN_GLYPH_WIDTH);
}

#[test]
fn cleared_formation_ends_round() {
    let mut s = make_state();
    for r in 0..FORMATION_ROWS {
        for c in 0..FORMATION_COLS {
            s.formation.strike(r, c);
        }
    }
    s.formation.tick_explosion(1.0, 0.6);
    let status = step(&mut s, &idle(), DT, &mut never_fire());
    assert_eq!(status, GameStatus::RoundOver(RoundEnd::FormationCleared));
}

// ── quit & terminal states ───────────────────────────────────────────────────

#[test]
fn quit_stops_before_anything_moves() {
    let mut s = make_state();
    let x = s.player.x;
    let input = pressing(Key::Quit).with(Key::Left);
    assert_eq!(step(&mut s, &input, DT, &mut never_fire()), GameStatus::Quit);
    assert_eq!(s.player.x, x);
    assert_eq!(s.status.round_end(), Some(RoundEnd::Quit));
}

#[test]
fn finished_round_does_not_step() {
    let mut s = make_state();
    s.status = GameStatus::RoundOver(RoundEnd::LivesExhausted);
    let frame = s.frame;
    let x = s.player.x;
    step(&mut s, &pressing(Key::Right), DT, &mut never_fire());
    assert_eq!(s.frame, frame);
    assert_eq!(s.player.x, x);
}
