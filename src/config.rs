//! Game balance settings
//!
//! Persisted as JSON in the user's home directory. Missing fields fall back
//! to their defaults; a missing or malformed file falls back entirely.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Player lateral speed (columns per second)
    pub player_speed: f32,
    /// Player shot speed (rows per second, upward)
    pub player_shot_speed: f32,
    /// Enemy shot speed (rows per second, downward)
    pub enemy_shot_speed: f32,
    /// Per-frame fire chance for an enemy lined up with the player
    pub aligned_fire_chance: f32,
    /// Per-frame fire chance for any other live enemy
    pub base_fire_chance: f32,
    /// How long a struck enemy shows as exploding (seconds)
    pub enemy_explosion_secs: f32,
    /// How long the player shows as exploding after a hit (seconds)
    pub player_explosion_secs: f32,
    /// Initial delay between formation moves (seconds)
    pub initial_anim_delay: f32,
    /// Delay removed at each edge reversal
    pub anim_delay_step: f32,
    /// Fastest the formation can get
    pub min_anim_delay: f32,
    pub starting_lives: u32,
    /// Points per enemy destroyed
    pub kill_score: u32,
    /// Minimum frame time; frames finishing early sleep the remainder
    pub frame_cap_ms: u64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_speed: 12.0,
            player_shot_speed: 20.0,
            enemy_shot_speed: 20.0,
            aligned_fire_chance: 0.20,
            base_fire_chance: 0.02,
            enemy_explosion_secs: 0.6,
            player_explosion_secs: 1.0,
            initial_anim_delay: 0.35,
            anim_delay_step: 0.05,
            min_anim_delay: 0.10,
            starting_lives: 3,
            kill_score: 100,
            frame_cap_ms: 16,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".console_invaders.json")
    }

    /// Clamp every field into a range the simulation can run with.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };

        self.player_speed = positive(self.player_speed, defaults.player_speed);
        self.player_shot_speed = positive(self.player_shot_speed, defaults.player_shot_speed);
        self.enemy_shot_speed = positive(self.enemy_shot_speed, defaults.enemy_shot_speed);
        self.enemy_explosion_secs = positive(self.enemy_explosion_secs, defaults.enemy_explosion_secs);
        self.player_explosion_secs = positive(self.player_explosion_secs, defaults.player_explosion_secs);
        self.initial_anim_delay = positive(self.initial_anim_delay, defaults.initial_anim_delay);
        self.min_anim_delay = positive(self.min_anim_delay, defaults.min_anim_delay).min(self.initial_anim_delay);
        if !self.anim_delay_step.is_finite() || self.anim_delay_step < 0.0 {
            self.anim_delay_step = defaults.anim_delay_step;
        }
        let chance = |v: f32, fallback: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { fallback };
        self.aligned_fire_chance = chance(self.aligned_fire_chance, defaults.aligned_fire_chance);
        self.base_fire_chance = chance(self.base_fire_chance, defaults.base_fire_chance);
        self.starting_lives = self.starting_lives.max(1);
        self
    }

    /// Load from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<GameConfig>(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config.sanitized()
                }
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Load from `path`; if nothing is there yet, write the defaults so the
    /// player has a file to edit.
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Could not write default config {}: {}", path.display(), e),
        }
        config
    }

    pub fn load() -> Self {
        Self::load_or_create(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
