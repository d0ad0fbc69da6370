//! World state threaded through every tick
//!
//! Holds the live registry plus the frame-loop counters (pause debounce,
//! enemy spawner) that would otherwise be globals.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::collision::Contact;
use super::entity::{Behavior, Entity, EntityId, EntityKind, SpawnParams};
use super::registry::{Collision, EntityRegistry};
use crate::Settings;
use crate::consts::*;
use crate::geom::{Hitbox, Vector};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Paused,
    /// Player ran out of hitpoints
    GameOver,
}

/// Things that happened during a tick, for hosts (sound, HUD) and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Spawned { id: EntityId, kind: EntityKind },
    Despawned { id: EntityId, kind: EntityKind },
    /// Movement rolled back by level geometry
    MovementBlocked { id: EntityId },
    PlayerDamaged { id: EntityId, hitpoints: i32 },
    EnemyDamaged { id: EntityId, hitpoints: i32 },
    PlayerDefeated { id: EntityId },
    Paused,
    Resumed,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub entities: EntityRegistry,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks until the pause key is honoured again
    pub pause_debounce: u32,
    /// Ticks until the next enemy spawns
    pub enemy_spawn_countdown: u32,
    /// Ticks until the undo shortcut is honoured again
    pub undo_debounce: u32,
    rng: Pcg32,
    next_id: u32,
    /// Editor placements, oldest first
    placements: Vec<EntityId>,
    events: Vec<GameEvent>,
}

impl World {
    /// A world with no entities
    pub fn empty(seed: u64, settings: Settings) -> Self {
        Self {
            enemy_spawn_countdown: settings.enemy_spawn_delay,
            settings,
            entities: EntityRegistry::new(),
            phase: GamePhase::Running,
            time_ticks: 0,
            pause_debounce: 0,
            undo_debounce: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            placements: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The default level: a wall frame around the arena and the player at
    /// the left edge, vertically centred
    pub fn new(seed: u64, settings: Settings) -> Result<Self, SimError> {
        let mut world = Self::empty(seed, settings);
        let (w, h, t) = (world.settings.arena_width, world.settings.arena_height, WALL_THICKNESS);

        let walls = Hitbox::group([
            Hitbox::rectangle(t, h)?,
            Hitbox::rectangle(w, t)?,
            Hitbox::at(w - t, 0.0, Hitbox::rectangle(t, h)?)?,
            Hitbox::at(0.0, h - t, Hitbox::rectangle(w, t)?)?,
        ]);
        world.spawn_level_geometry(
            SpawnParams::at(Vector::ZERO)
                .with_hitbox(walls)
                .with_sprite("LevelWalls.png")
                .with_draw_height(WALL_DRAW_HEIGHT),
        )?;

        let start = Vector::cartesian(50.0, h / 2.0 - PLAYER_SIZE / 2.0)?;
        world.spawn_player(
            SpawnParams::at(start)
                .with_scale(0.5)
                .with_hitbox(Hitbox::rectangle(PLAYER_SIZE, PLAYER_SIZE)?)
                .with_sprite("./Player.png")
                .with_draw_height(PLAYER_DRAW_HEIGHT),
        )?;

        log::info!(
            "World created with seed {seed}: {}x{} arena, {} entities",
            w,
            h,
            world.entities.len()
        );
        Ok(world)
    }

    /// Allocate an id no live entity uses
    pub fn next_entity_id(&mut self) -> EntityId {
        loop {
            let id = EntityId(self.next_id);
            self.next_id += 1;
            if !self.entities.contains(id) {
                return id;
            }
        }
    }

    fn take_id(&mut self, params: &SpawnParams) -> EntityId {
        match params.id {
            Some(id) => id,
            None => self.next_entity_id(),
        }
    }

    /// Register an already built entity
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, SimError> {
        let (id, kind) = (entity.id, entity.kind());
        self.entities.insert(entity)?;
        log::debug!("Spawned {kind:?} {id}");
        self.events.push(GameEvent::Spawned { id, kind });
        Ok(id)
    }

    pub fn spawn_player(&mut self, params: SpawnParams) -> Result<EntityId, SimError> {
        let id = self.take_id(&params);
        let entity = Entity::player(id, params, &self.settings)?;
        self.insert(entity)
    }

    pub fn spawn_enemy(
        &mut self,
        params: SpawnParams,
        hitpoints: i32,
    ) -> Result<EntityId, SimError> {
        let id = self.take_id(&params);
        let entity = Entity::enemy(id, params, hitpoints, &self.settings)?;
        self.insert(entity)
    }

    pub fn spawn_level_geometry(&mut self, params: SpawnParams) -> Result<EntityId, SimError> {
        let id = self.take_id(&params);
        let entity = Entity::level_geometry(id, params)?;
        self.insert(entity)
    }

    /// Fire a projectile on behalf of `owner`, counting it against the
    /// owner's in-flight total
    pub fn spawn_projectile(
        &mut self,
        params: SpawnParams,
        owner: EntityId,
    ) -> Result<EntityId, SimError> {
        let id = self.take_id(&params);
        let owner_entity = self.entities.get(owner).ok_or(SimError::NotAnEntity(owner))?;
        let entity = Entity::projectile(id, params, owner_entity, &self.settings)?;
        let id = self.insert(entity)?;
        let owner_behavior = self.entities.get_mut(owner).map(|e| &mut e.behavior);
        if let Some(Behavior::Player(player)) = owner_behavior {
            player.projectiles_in_flight += 1;
        }
        Ok(id)
    }

    /// Remove an entity from the world
    ///
    /// A despawned projectile frees its slot in the owner's in-flight count.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        if let Behavior::Projectile(projectile) = &entity.behavior {
            match self.entities.get_mut(projectile.owner).map(|e| &mut e.behavior) {
                Some(Behavior::Player(player)) => {
                    player.projectiles_in_flight = player.projectiles_in_flight.saturating_sub(1);
                }
                Some(_) => {}
                None => log::warn!("Projectile {id} outlived its owner {}", projectile.owner),
            }
        }
        log::debug!("Despawned {:?} {id}", entity.kind());
        self.events.push(GameEvent::Despawned {
            id,
            kind: entity.kind(),
        });
        Some(entity)
    }

    /// Place a level rectangle spanning the drag from `a` to `b`
    ///
    /// Either corner may come first; the rectangle is anchored at the
    /// top-left of the two.
    pub fn place_level_rect(&mut self, a: Vector, b: Vector) -> Result<EntityId, SimError> {
        let (a, b) = (a.to_dvec2(), b.to_dvec2());
        let size = (b - a).abs();
        let params = SpawnParams::at(Vector::from_dvec2(a.min(b))?)
            .with_hitbox(Hitbox::rectangle(size.x, size.y)?)
            .with_draw_height(PLACED_DRAW_HEIGHT);
        self.record_placement(params)
    }

    /// Place a level circle centred on `center` and reaching `edge`
    pub fn place_level_circle(
        &mut self,
        center: Vector,
        edge: Vector,
    ) -> Result<EntityId, SimError> {
        let radius = edge.subtract(&center)?.magnitude();
        let params = SpawnParams::at(center)
            .with_hitbox(Hitbox::circle(radius)?)
            .with_draw_height(PLACED_DRAW_HEIGHT);
        self.record_placement(params)
    }

    fn record_placement(&mut self, params: SpawnParams) -> Result<EntityId, SimError> {
        let id = self.spawn_level_geometry(params)?;
        self.placements.push(id);
        log::debug!("Placed level piece {id}");
        Ok(id)
    }

    /// Remove the most recent editor placement still in the world
    ///
    /// Entities that were not placed with the editor are never touched.
    /// Returns `None` while the undo debounce is running or when nothing is
    /// left to undo.
    pub fn undo_placement(&mut self) -> Option<EntityId> {
        if self.undo_debounce > 0 {
            return None;
        }
        while let Some(id) = self.placements.pop() {
            if self.despawn(id).is_some() {
                self.undo_debounce = self.settings.undo_debounce;
                log::debug!("Undid placement {id}");
                return Some(id);
            }
        }
        None
    }

    /// Collision between two live entities
    pub fn colliding_with(
        &self,
        id: EntityId,
        other: EntityId,
    ) -> Result<Option<Contact>, SimError> {
        self.entities.colliding_with(id, other)
    }

    /// Every live entity `id` overlaps
    pub fn collisions_of(&self, id: EntityId) -> Result<Vec<Collision>, SimError> {
        self.entities.collisions_of(id)
    }

    /// The first player in the registry
    pub fn player_id(&self) -> Option<EntityId> {
        self.entities.first_of_kind(EntityKind::Player).map(|e| e.id)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        let world = World::new(7, Settings::default()).unwrap();
        assert_eq!(world.entities.len(), 2);
        let player = world.entities.get(world.player_id().unwrap()).unwrap();
        let pos = player.position.unwrap();
        assert_eq!((pos.x(), pos.y()), (50.0, 359.0));
        assert_eq!(player.scale, 0.5);
        // The player starts clear of the walls
        assert!(world.collisions_of(player.id).unwrap().is_empty());
    }

    #[test]
    fn test_explicit_ids_are_respected() {
        let mut world = World::empty(1, Settings::default());
        let params = SpawnParams::at(Vector::ZERO).with_id(EntityId(1));
        assert_eq!(world.spawn_level_geometry(params.clone()).unwrap(), EntityId(1));
        assert_eq!(
            world.spawn_level_geometry(params),
            Err(SimError::DuplicateEntity(EntityId(1)))
        );
        // The allocator skips the taken id
        let next = world.spawn_level_geometry(SpawnParams::default()).unwrap();
        assert_eq!(next, EntityId(2));
    }

    #[test]
    fn test_projectile_counter_tracks_spawn_and_despawn() {
        let mut world = World::new(1, Settings::default()).unwrap();
        let player = world.player_id().unwrap();
        let shot = world
            .spawn_projectile(SpawnParams::at(Vector::ZERO), player)
            .unwrap();

        let in_flight = |world: &World| match &world.entities.get(player).unwrap().behavior {
            Behavior::Player(p) => p.projectiles_in_flight,
            _ => unreachable!(),
        };
        assert_eq!(in_flight(&world), 1);
        world.despawn(shot).unwrap();
        assert_eq!(in_flight(&world), 0);
        assert!(world.despawn(shot).is_none());
    }

    fn cart(x: f64, y: f64) -> Vector {
        Vector::cartesian(x, y).unwrap()
    }

    #[test]
    fn test_rect_drag_up_and_left() {
        let mut world = World::empty(1, Settings::without_spawner());
        let id = world.place_level_rect(cart(300.0, 200.0), cart(100.0, 50.0)).unwrap();
        let piece = world.entities.get(id).unwrap();
        let pos = piece.position.unwrap();
        assert_eq!((pos.x(), pos.y()), (100.0, 50.0));
        assert_eq!(piece.hitbox, Some(Hitbox::rectangle(200.0, 150.0).unwrap()));
        assert_eq!(piece.draw_height, Some(PLACED_DRAW_HEIGHT));
        assert_eq!(piece.kind(), EntityKind::LevelGeometry);

        // Mixed direction: right and up
        let id = world.place_level_rect(cart(10.0, 40.0), cart(30.0, 0.0)).unwrap();
        let pos = world.entities.get(id).unwrap().position.unwrap();
        assert_eq!((pos.x(), pos.y()), (10.0, 0.0));
    }

    #[test]
    fn test_circle_radius_is_drag_length() {
        let mut world = World::empty(1, Settings::without_spawner());
        let id = world.place_level_circle(cart(10.0, 10.0), cart(13.0, 14.0)).unwrap();
        let piece = world.entities.get(id).unwrap();
        let Some(Hitbox::Circle(circle)) = &piece.hitbox else {
            panic!("expected a circle hitbox");
        };
        assert!((circle.radius() - 5.0).abs() < 1e-9);
        let pos = piece.position.unwrap();
        assert_eq!((pos.x(), pos.y()), (10.0, 10.0));

        // A click without a drag has no radius
        assert!(matches!(
            world.place_level_circle(cart(1.0, 1.0), cart(1.0, 1.0)),
            Err(SimError::Geometry(_))
        ));
    }

    #[test]
    fn test_undo_stops_at_default_level() {
        let mut world = World::new(1, Settings::without_spawner()).unwrap();
        let first = world.place_level_rect(cart(100.0, 100.0), cart(150.0, 150.0)).unwrap();
        let second = world.place_level_circle(cart(400.0, 400.0), cart(420.0, 400.0)).unwrap();
        assert_eq!(world.entities.len(), 4);

        assert_eq!(world.undo_placement(), Some(second));
        // Debounced
        assert_eq!(world.undo_placement(), None);
        assert_eq!(world.undo_debounce, UNDO_DEBOUNCE);

        world.undo_debounce = 0;
        assert_eq!(world.undo_placement(), Some(first));
        world.undo_debounce = 0;
        assert_eq!(world.undo_placement(), None);
        assert_eq!(world.entities.len(), 2);
        assert!(world.player_id().is_some());
    }

    #[test]
    fn test_undo_skips_pieces_already_gone() {
        let mut world = World::empty(1, Settings::without_spawner());
        let first = world.place_level_rect(cart(0.0, 0.0), cart(5.0, 5.0)).unwrap();
        let second = world.place_level_rect(cart(10.0, 0.0), cart(15.0, 5.0)).unwrap();
        world.despawn(second).unwrap();
        assert_eq!(world.undo_placement(), Some(first));
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_events_drain() {
        let mut world = World::new(1, Settings::default()).unwrap();
        let events = world.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], GameEvent::Spawned { kind: EntityKind::Player, .. }));
        assert!(world.events().is_empty());
    }
}
