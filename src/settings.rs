//! Gameplay tuning
//!
//! Every number the simulation reads lives here so a host can tweak the game
//! from a JSON file without recompiling. Missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;

/// Settings load/save errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunable gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f64,
    pub arena_height: f64,

    // === Player ===
    /// Pixels per tick at full input
    pub player_speed: f64,
    pub player_hitpoints: i32,
    /// Ticks between shots
    pub fire_cooldown: u32,
    /// Projectiles one player may have alive at once
    pub max_projectiles: u32,

    // === Projectiles ===
    pub projectile_speed: f64,
    pub projectile_radius: f64,
    /// Ticks an unobstructed projectile survives
    pub projectile_fuse: u32,

    // === Enemies ===
    pub enemy_speed: f64,
    pub enemy_size: f64,
    /// Ticks between contact hits on the player
    pub enemy_contact_cooldown: i32,
    /// Spawned hitpoints are drawn from `0..enemy_max_hitpoints`
    pub enemy_max_hitpoints: i32,
    /// Enemies past this x coordinate are removed
    pub enemy_despawn_x: f64,
    /// Whether the spawner runs at all
    pub enemy_spawning: bool,
    /// Ticks before the first enemy
    pub enemy_spawn_delay: u32,
    /// Minimum ticks between enemies
    pub enemy_spawn_interval: u32,
    /// Extra random ticks added to the interval (exclusive upper bound)
    pub enemy_spawn_jitter: u32,

    // === Frame loop ===
    /// Ticks the pause key is ignored after toggling
    pub pause_debounce: u32,
    /// Ticks the undo shortcut is ignored after removing a placement
    pub undo_debounce: u32,
    /// Draw hitbox outlines over sprites
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            player_speed: PLAYER_SPEED,
            player_hitpoints: PLAYER_HITPOINTS,
            fire_cooldown: FIRE_COOLDOWN,
            max_projectiles: MAX_PROJECTILES,

            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_fuse: PROJECTILE_FUSE,

            enemy_speed: ENEMY_SPEED,
            enemy_size: ENEMY_SIZE,
            enemy_contact_cooldown: ENEMY_CONTACT_COOLDOWN,
            enemy_max_hitpoints: ENEMY_MAX_HITPOINTS,
            enemy_despawn_x: ENEMY_DESPAWN_X,
            enemy_spawning: true,
            enemy_spawn_delay: ENEMY_SPAWN_DELAY,
            enemy_spawn_interval: ENEMY_SPAWN_INTERVAL,
            enemy_spawn_jitter: ENEMY_SPAWN_JITTER,

            pause_debounce: PAUSE_DEBOUNCE,
            undo_debounce: UNDO_DEBOUNCE,
            show_hitboxes: true,
        }
    }
}

impl Settings {
    /// Settings with the enemy spawner switched off (scripted scenes, tests)
    pub fn without_spawner() -> Self {
        Self {
            enemy_spawning: false,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&contents)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Load from `path`, falling back to defaults if it is missing or broken
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from_file(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}): {e}", path.as_ref().display());
                Self::default()
            }
        }
    }
}
