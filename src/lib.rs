//! Skirmish - hitbox geometry and entity simulation for a 2D arcade shooter
//!
//! Core modules:
//! - `geom`: Dual-representation vectors, hitbox trees and the visitors that walk them
//! - `sim`: Collision detection, entities, the live registry and the frame tick
//! - `renderer`: Drawing contract the host canvas implements
//! - `settings`: Data-driven gameplay tuning

pub mod geom;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::DVec2;
use std::f64::consts::TAU;

/// Gameplay defaults (mirrored by `Settings::default`)
pub mod consts {
    /// Canvas dimensions in pixels
    pub const ARENA_WIDTH: f64 = 1092.0;
    pub const ARENA_HEIGHT: f64 = 768.0;
    /// Thickness of the level wall frame
    pub const WALL_THICKNESS: f64 = 35.0;

    /// Player defaults
    pub const PLAYER_SIZE: f64 = 50.0;
    pub const PLAYER_SPEED: f64 = 3.0;
    pub const PLAYER_HITPOINTS: i32 = 3;
    /// Ticks between shots
    pub const FIRE_COOLDOWN: u32 = 16;
    /// Projectiles one player may have alive at once
    pub const MAX_PROJECTILES: u32 = 5;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f64 = 5.0;
    pub const PROJECTILE_RADIUS: f64 = 10.0;
    /// Ticks before an unobstructed projectile burns out
    pub const PROJECTILE_FUSE: u32 = 600;

    /// Enemy defaults
    pub const ENEMY_SIZE: f64 = 50.0;
    pub const ENEMY_SPEED: f64 = 3.0;
    /// Ticks between contact hits on the player
    pub const ENEMY_CONTACT_COOLDOWN: i32 = 64;
    /// Spawned hitpoints are drawn from `0..ENEMY_MAX_HITPOINTS`
    pub const ENEMY_MAX_HITPOINTS: i32 = 3;
    /// Enemies past this x coordinate have left the arena
    pub const ENEMY_DESPAWN_X: f64 = -50.0;

    /// Enemy spawner timing (ticks)
    pub const ENEMY_SPAWN_DELAY: u32 = 128;
    pub const ENEMY_SPAWN_INTERVAL: u32 = 32;
    pub const ENEMY_SPAWN_JITTER: u32 = 32;

    /// Ticks the pause key is ignored after toggling
    pub const PAUSE_DEBOUNCE: u32 = 32;
    /// Ticks the undo shortcut is ignored after removing a placement
    pub const UNDO_DEBOUNCE: u32 = 32;

    /// Draw heights (painter's order, lowest first)
    pub const WALL_DRAW_HEIGHT: f64 = 1000.0;
    pub const PLAYER_DRAW_HEIGHT: f64 = 998.0;
    /// Level pieces placed with the editor
    pub const PLACED_DRAW_HEIGHT: f64 = 999.0;
    pub const ACTOR_DRAW_HEIGHT: f64 = 500.0;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(pos: DVec2) -> (f64, f64) {
    (pos.length(), normalize_angle(pos.y.atan2(pos.x)))
}
