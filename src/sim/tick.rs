//! Per-frame simulation tick
//!
//! One pass per animation frame: run the enemy spawner, then update every
//! live entity in painter's order, then handle the undo and pause keys.
//! Updates see the positions left by entities processed earlier in the same
//! pass.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::SimError;
use super::entity::{Behavior, EntityId, EntityKind, HitOutcome, SpawnParams, Striker};
use super::state::{GameEvent, GamePhase, World};
use crate::consts::{ACTOR_DRAW_HEIGHT, WALL_THICKNESS};
use crate::geom::Vector;

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    /// Remove the last editor placement (Ctrl+Z in the browser)
    Undo,
}

impl Key {
    /// Map a browser `KeyboardEvent.key` value (case-insensitive)
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            " " => Some(Key::Fire),
            "escape" => Some(Key::Pause),
            _ => None,
        }
    }

    /// Map a key press together with the Ctrl modifier state
    pub fn from_key_event(name: &str, ctrl: bool) -> Option<Self> {
        if ctrl && name.eq_ignore_ascii_case("z") {
            return Some(Key::Undo);
        }
        Self::from_key_name(name)
    }

    /// Unit step for movement keys, in screen coordinates
    fn step(self) -> Option<(f64, f64)> {
        match self {
            Key::Up => Some((0.0, -1.0)),
            Key::Down => Some((0.0, 1.0)),
            Key::Left => Some((-1.0, 0.0)),
            Key::Right => Some((1.0, 0.0)),
            Key::Fire | Key::Pause | Key::Undo => None,
        }
    }
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys held down this frame
    pub pressed: HashSet<Key>,
    /// Mouse position in canvas coordinates
    pub pointer: Vector,
}

impl TickInput {
    pub fn holding(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            pressed: keys.into_iter().collect(),
            pointer: Vector::ZERO,
        }
    }

    pub fn with_pointer(mut self, pointer: Vector) -> Self {
        self.pointer = pointer;
        self
    }

    #[inline]
    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

/// Advance the world by one frame
///
/// Any error aborts the rest of the frame; the world is left as the failing
/// update found it.
pub fn tick(world: &mut World, input: &TickInput) -> Result<(), SimError> {
    match world.phase {
        GamePhase::GameOver => return Ok(()),
        GamePhase::Paused => {
            if world.pause_debounce > 0 {
                world.pause_debounce -= 1;
            } else if input.is_pressed(Key::Pause) {
                world.phase = GamePhase::Running;
                world.pause_debounce = world.settings.pause_debounce;
                world.push_event(GameEvent::Resumed);
                log::info!("Resumed at tick {}", world.time_ticks);
            }
            return Ok(());
        }
        GamePhase::Running => {}
    }

    world.time_ticks += 1;
    run_enemy_spawner(world)?;

    // Snapshot so spawns and despawns during the pass cannot skip or repeat anyone
    for id in world.entities.paint_order() {
        if world.entities.contains(id) {
            update_entity(world, id, input)?;
        }
    }

    world.undo_debounce = world.undo_debounce.saturating_sub(1);
    if input.is_pressed(Key::Undo) {
        world.undo_placement();
    }

    if world.pause_debounce > 0 {
        world.pause_debounce -= 1;
    } else if input.is_pressed(Key::Pause) && world.phase == GamePhase::Running {
        world.phase = GamePhase::Paused;
        world.pause_debounce = world.settings.pause_debounce;
        world.push_event(GameEvent::Paused);
        log::info!("Paused at tick {}", world.time_ticks);
    }

    Ok(())
}

fn update_entity(world: &mut World, id: EntityId, input: &TickInput) -> Result<(), SimError> {
    let Some(kind) = world.entities.get(id).map(|e| e.kind()) else {
        return Ok(());
    };
    match kind {
        EntityKind::Player => update_player(world, id, input),
        EntityKind::Enemy => update_enemy(world, id),
        EntityKind::Projectile => update_projectile(world, id),
        EntityKind::LevelGeometry => Ok(()),
    }
}

/// Spawn an enemy at the right edge when the countdown runs out
fn run_enemy_spawner(world: &mut World) -> Result<(), SimError> {
    if !world.settings.enemy_spawning {
        return Ok(());
    }
    world.enemy_spawn_countdown = world.enemy_spawn_countdown.saturating_sub(1);
    if world.enemy_spawn_countdown > 0 {
        return Ok(());
    }

    let (width, height) = (world.settings.arena_width, world.settings.arena_height);
    let max_hitpoints = world.settings.enemy_max_hitpoints;
    let interval = world.settings.enemy_spawn_interval;
    let jitter = world.settings.enemy_spawn_jitter;

    let rng = world.rng();
    // Keep the spawn lane between the top and bottom walls
    let y = rng.random::<f64>() * (height - 3.0 * WALL_THICKNESS) + WALL_THICKNESS;
    let hitpoints = if max_hitpoints > 0 {
        rng.random_range(0..max_hitpoints)
    } else {
        0
    };
    let extra = if jitter > 0 { rng.random_range(0..jitter) } else { 0 };
    let delay = interval.saturating_add(extra);

    world.spawn_enemy(SpawnParams::at(Vector::cartesian(width, y)?), hitpoints)?;
    world.enemy_spawn_countdown = delay;
    Ok(())
}

/// Apply `striker`'s hit to `target` and carry out the consequences
fn apply_hit(world: &mut World, target: EntityId, striker: Striker) -> HitOutcome {
    let Some(entity) = world.entities.get_mut(target) else {
        return HitOutcome::Unaffected;
    };
    let kind = entity.kind();
    let outcome = entity.hit_by(striker);
    let hitpoints = entity.hitpoints().unwrap_or(0);

    match (kind, outcome) {
        (_, HitOutcome::Unaffected) => {}
        (EntityKind::Player, HitOutcome::Damaged(_)) => {
            log::debug!("Player {target} hit by {:?}, {hitpoints} hp left", striker.kind);
            world.push_event(GameEvent::PlayerDamaged { id: target, hitpoints });
        }
        (EntityKind::Player, HitOutcome::Destroyed) => {
            world.push_event(GameEvent::PlayerDamaged { id: target, hitpoints });
            defeat_player(world, target);
        }
        (_, HitOutcome::Damaged(_)) => {
            world.push_event(GameEvent::EnemyDamaged { id: target, hitpoints });
        }
        (_, HitOutcome::Destroyed) => {
            world.push_event(GameEvent::EnemyDamaged { id: target, hitpoints });
            world.despawn(target);
        }
    }
    outcome
}

fn defeat_player(world: &mut World, id: EntityId) {
    if world.phase != GamePhase::GameOver {
        log::info!("Player {id} defeated at tick {}", world.time_ticks);
        world.phase = GamePhase::GameOver;
        world.push_event(GameEvent::PlayerDefeated { id });
    }
}

/// Move, block against level geometry, aim at the pointer, and fire
fn update_player(world: &mut World, id: EntityId, input: &TickInput) -> Result<(), SimError> {
    let Some(player) = world.entities.get(id) else {
        return Ok(());
    };
    let Behavior::Player(state) = &player.behavior else {
        return Ok(());
    };
    let Some(previous) = player.position else {
        return Ok(());
    };

    // Diagonals are capped to unit length before scaling by speed
    let mut steer = Vector::polar(0.0, 0.0)?;
    for key in [Key::Up, Key::Down, Key::Left, Key::Right] {
        if let Some((dx, dy)) = key.step().filter(|_| input.is_pressed(key)) {
            steer = steer.add(&Vector::cartesian(dx, dy)?)?;
        }
    }
    let velocity = Vector::polar(steer.normalize().magnitude() * state.speed, steer.angle())?;
    let striker = Striker::of(player);

    let moved = previous.add(&velocity)?;
    set_position(world, id, moved);

    let collisions = world.collisions_of(id)?;
    for collision in &collisions {
        apply_hit(world, collision.other, striker);
    }
    if collisions
        .iter()
        .any(|c| c.other_kind == EntityKind::LevelGeometry)
    {
        set_position(world, id, previous);
        world.push_event(GameEvent::MovementBlocked { id });
    }

    let Some(player) = world.entities.get_mut(id) else {
        return Ok(());
    };
    let position = player.position.unwrap_or(previous);
    let center = match player.bounds()? {
        Some(bounds) => bounds.center(),
        None => position.to_dvec2(),
    };
    let aim = Vector::from_dvec2(input.pointer.to_dvec2() - center)?;
    player.orientation = aim.angle();
    let orientation = player.orientation;

    let max_projectiles = world.settings.max_projectiles;
    let fire_cooldown = world.settings.fire_cooldown;
    let Some(Behavior::Player(state)) = world.entities.get_mut(id).map(|e| &mut e.behavior) else {
        return Ok(());
    };
    let fire = input.is_pressed(Key::Fire)
        && state.fire_cooldown == 0
        && state.projectiles_in_flight < max_projectiles;
    if fire {
        state.fire_cooldown = fire_cooldown;
    }
    state.fire_cooldown = state.fire_cooldown.saturating_sub(1);

    if fire {
        let params = SpawnParams::at(Vector::from_dvec2(center)?)
            .with_orientation(orientation)
            .with_scale(1.0)
            .with_draw_height(ACTOR_DRAW_HEIGHT);
        let shot = world.spawn_projectile(params, id)?;
        log::trace!("Player {id} fired {shot}");
    }
    Ok(())
}

/// Fly left, leave at the far edge, ram the player when off cooldown
fn update_enemy(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let despawn_x = world.settings.enemy_despawn_x;
    let contact_cooldown = world.settings.enemy_contact_cooldown;

    let Some(enemy) = world.entities.get_mut(id) else {
        return Ok(());
    };
    let Some(position) = enemy.position else {
        return Ok(());
    };
    let Behavior::Enemy(state) = &mut enemy.behavior else {
        return Ok(());
    };
    if state.contact_cooldown > 0 {
        state.contact_cooldown -= 1;
    }
    let ready = state.contact_cooldown <= 0;
    let moved = position.add(&state.velocity)?;
    enemy.position = Some(moved);
    let striker = Striker::of(enemy);

    if moved.x() < despawn_x {
        world.despawn(id);
        return Ok(());
    }
    if !ready {
        return Ok(());
    }

    let collisions = world.collisions_of(id)?;
    let Some(target) = collisions
        .iter()
        .find(|c| c.other_kind == EntityKind::Player)
        .map(|c| c.other)
    else {
        return Ok(());
    };

    apply_hit(world, target, striker);

    // Ramming costs the enemy a hitpoint too
    let Some(Behavior::Enemy(state)) = world.entities.get_mut(id).map(|e| &mut e.behavior) else {
        return Ok(());
    };
    state.hitpoints -= 1;
    let hitpoints = state.hitpoints;
    if hitpoints >= 1 {
        state.contact_cooldown = contact_cooldown;
    }
    world.push_event(GameEvent::EnemyDamaged { id, hitpoints });
    if hitpoints < 1 {
        world.despawn(id);
    }
    Ok(())
}

/// Strike whatever solid thing is in the way, otherwise keep flying
fn update_projectile(world: &mut World, id: EntityId) -> Result<(), SimError> {
    let Some(projectile) = world.entities.get(id) else {
        return Ok(());
    };
    let striker = Striker::of(projectile);

    let collisions = world.collisions_of(id)?;
    let blocked = collisions
        .iter()
        .any(|c| matches!(c.other_kind, EntityKind::LevelGeometry | EntityKind::Enemy));
    if blocked {
        for collision in &collisions {
            apply_hit(world, collision.other, striker);
        }
        world.despawn(id);
        return Ok(());
    }

    let Some(projectile) = world.entities.get_mut(id) else {
        return Ok(());
    };
    let Behavior::Projectile(state) = &mut projectile.behavior else {
        return Ok(());
    };
    state.fuse = state.fuse.saturating_sub(1);
    let expired = state.fuse == 0;
    let velocity = state.velocity;
    if let Some(position) = projectile.position {
        projectile.position = Some(position.add(&velocity)?);
    }
    if expired {
        log::trace!("Projectile {id} burned out");
        world.despawn(id);
    }
    Ok(())
}

fn set_position(world: &mut World, id: EntityId, position: Vector) {
    if let Some(entity) = world.entities.get_mut(id) {
        entity.position = Some(position);
    }
}
