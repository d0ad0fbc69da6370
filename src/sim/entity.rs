//! Entities: identity, placement, hitbox and per-kind state

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

use super::SimError;
use super::collision::{Contact, first_contact};
use crate::Settings;
use crate::geom::{
    BoundingBoxCalculator, Bounds, Component, ComponentFlattener, GeometryError, Hitbox, Vector,
};
use crate::normalize_angle;

/// Registry-unique entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    LevelGeometry,
    Projectile,
}

/// Mutable player state
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Pixels per tick at full input
    pub speed: f64,
    pub hitpoints: i32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    pub projectiles_in_flight: u32,
}

/// Mutable enemy state
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyState {
    pub velocity: Vector,
    pub hitpoints: i32,
    /// Ticks until the enemy may hurt the player again
    pub contact_cooldown: i32,
}

/// Mutable projectile state
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileState {
    /// Entity whose in-flight counter this projectile occupies
    pub owner: EntityId,
    pub owner_kind: EntityKind,
    pub velocity: Vector,
    /// Ticks left before the projectile burns out
    pub fuse: u32,
}

/// Per-kind state, one variant per [`EntityKind`]
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Player(PlayerState),
    Enemy(EnemyState),
    LevelGeometry,
    Projectile(ProjectileState),
}

impl Behavior {
    pub fn kind(&self) -> EntityKind {
        match self {
            Behavior::Player(_) => EntityKind::Player,
            Behavior::Enemy(_) => EntityKind::Enemy,
            Behavior::LevelGeometry => EntityKind::LevelGeometry,
            Behavior::Projectile(_) => EntityKind::Projectile,
        }
    }
}

/// Spawn configuration record
///
/// `position`, `orientation`, `scale` and `hitbox` are needed for anything
/// collidable or drawable; some kinds fix a few of them regardless.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    pub id: Option<EntityId>,
    pub position: Option<Vector>,
    pub orientation: Option<f64>,
    pub scale: Option<f64>,
    pub hitbox: Option<Hitbox>,
    /// Sprite path handed to the render sink
    pub sprite: Option<String>,
    pub draw_height: Option<f64>,
}

impl SpawnParams {
    pub fn at(position: Vector) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_hitbox(mut self, hitbox: Hitbox) -> Self {
        self.hitbox = Some(hitbox);
        self
    }

    pub fn with_orientation(mut self, orientation: f64) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn with_draw_height(mut self, draw_height: f64) -> Self {
        self.draw_height = Some(draw_height);
        self
    }
}

/// Who is doing the hitting, as seen by [`Entity::hit_by`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Striker {
    pub kind: EntityKind,
    /// Set for projectiles
    pub owner_kind: Option<EntityKind>,
}

impl Striker {
    pub fn of(entity: &Entity) -> Self {
        let owner_kind = match &entity.behavior {
            Behavior::Projectile(p) => Some(p.owner_kind),
            _ => None,
        };
        Self {
            kind: entity.kind(),
            owner_kind,
        }
    }
}

/// Result of a hit on an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Unaffected,
    /// Lost hitpoints, with what remains
    Damaged(i32),
    /// Hitpoints fell below 1
    Destroyed,
}

/// A live (or about to be live) game object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Absent means not in the world: never collides, never drawn
    pub position: Option<Vector>,
    /// Radians in [0, 2π)
    pub orientation: f64,
    pub scale: f64,
    pub hitbox: Option<Hitbox>,
    pub sprite: Option<String>,
    /// Paint order, lowest first
    pub draw_height: Option<f64>,
    pub behavior: Behavior,
}

impl Entity {
    /// Validate `params` and build an entity with the given behavior
    pub fn new(id: EntityId, params: SpawnParams, behavior: Behavior) -> Result<Self, SimError> {
        let orientation = params.orientation.unwrap_or(0.0);
        if !orientation.is_finite() {
            return Err(SimError::InvalidSpawn(format!(
                "orientation must be finite: {orientation}"
            )));
        }
        let scale = params.scale.unwrap_or(1.0);
        if !(scale > 0.0) || !scale.is_finite() {
            return Err(SimError::InvalidSpawn(format!(
                "scale must be finite and greater than 0: {scale}"
            )));
        }
        if let Some(height) = params.draw_height {
            if !height.is_finite() {
                return Err(SimError::InvalidSpawn(format!(
                    "draw height must be finite: {height}"
                )));
            }
        }

        Ok(Self {
            id,
            position: params.position,
            orientation: normalize_angle(orientation),
            scale,
            hitbox: params.hitbox,
            sprite: params.sprite,
            draw_height: params.draw_height,
            behavior,
        })
    }

    /// The player, with fresh hitpoints and an empty magazine
    pub fn player(
        id: EntityId,
        params: SpawnParams,
        settings: &Settings,
    ) -> Result<Self, SimError> {
        let state = PlayerState {
            speed: settings.player_speed,
            hitpoints: settings.player_hitpoints,
            fire_cooldown: 0,
            projectiles_in_flight: 0,
        };
        Self::new(id, params, Behavior::Player(state))
    }

    /// An enemy flying left with a square hitbox
    pub fn enemy(
        id: EntityId,
        mut params: SpawnParams,
        hitpoints: i32,
        settings: &Settings,
    ) -> Result<Self, SimError> {
        params.orientation = Some(PI);
        params.scale = Some(1.0);
        params.hitbox = Some(Hitbox::rectangle(settings.enemy_size, settings.enemy_size)?);
        params.draw_height = Some(crate::consts::ACTOR_DRAW_HEIGHT);
        let state = EnemyState {
            velocity: Vector::polar(settings.enemy_speed, PI)?,
            hitpoints,
            contact_cooldown: 0,
        };
        Self::new(id, params, Behavior::Enemy(state))
    }

    /// Static wall or obstacle
    pub fn level_geometry(id: EntityId, mut params: SpawnParams) -> Result<Self, SimError> {
        params.orientation = Some(0.0);
        params.scale = Some(1.0);
        Self::new(id, params, Behavior::LevelGeometry)
    }

    /// A round shot travelling along `params.orientation`
    pub fn projectile(
        id: EntityId,
        mut params: SpawnParams,
        owner: &Entity,
        settings: &Settings,
    ) -> Result<Self, SimError> {
        params.hitbox = Some(Hitbox::circle(settings.projectile_radius)?);
        let orientation = params.orientation.unwrap_or(0.0);
        let state = ProjectileState {
            owner: owner.id,
            owner_kind: owner.kind(),
            velocity: Vector::polar(settings.projectile_speed, orientation)?,
            fuse: settings.projectile_fuse,
        };
        Self::new(id, params, Behavior::Projectile(state))
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.behavior.kind()
    }

    /// Current hitpoints for kinds that have them
    pub fn hitpoints(&self) -> Option<i32> {
        match &self.behavior {
            Behavior::Player(p) => Some(p.hitpoints),
            Behavior::Enemy(e) => Some(e.hitpoints),
            _ => None,
        }
    }

    /// Whether this entity takes part in collisions
    pub fn is_collidable(&self) -> bool {
        self.position.is_some() && self.hitbox.is_some()
    }

    /// Flattened hitbox at the world position, `None` when not in the world
    pub fn components(&self) -> Result<Option<Vec<Component>>, GeometryError> {
        match (&self.position, &self.hitbox) {
            (Some(position), Some(hitbox)) => {
                ComponentFlattener::flatten_at(*position, hitbox).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// World-space bounding box of the hitbox
    pub fn bounds(&self) -> Result<Option<Bounds>, GeometryError> {
        match (&self.position, &self.hitbox) {
            (Some(position), Some(hitbox)) => BoundingBoxCalculator::bounds_at(*position, hitbox),
            _ => Ok(None),
        }
    }

    /// First contact between the two entities' components, if they collide
    ///
    /// Entities without a position or hitbox never collide.
    pub fn colliding_with(&self, other: &Entity) -> Result<Option<Contact>, GeometryError> {
        let (Some(ours), Some(theirs)) = (self.components()?, other.components()?) else {
            return Ok(None);
        };
        Ok(first_contact(&ours, &theirs))
    }

    /// Apply the reaction of this entity to being struck
    ///
    /// Players lose a hitpoint to enemies; enemies lose one to player
    /// projectiles. Everything else shrugs it off.
    pub fn hit_by(&mut self, striker: Striker) -> HitOutcome {
        let hitpoints = match (&mut self.behavior, striker.kind) {
            (Behavior::Player(player), EntityKind::Enemy) => &mut player.hitpoints,
            (Behavior::Enemy(enemy), EntityKind::Projectile)
                if striker.owner_kind == Some(EntityKind::Player) =>
            {
                &mut enemy.hitpoints
            }
            _ => return HitOutcome::Unaffected,
        };
        *hitpoints -= 1;
        if *hitpoints < 1 {
            HitOutcome::Destroyed
        } else {
            HitOutcome::Damaged(*hitpoints)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> SpawnParams {
        SpawnParams::at(Vector::cartesian(x, y).unwrap())
    }

    fn wall(id: u32, x: f64, y: f64) -> Entity {
        let params = at(x, y).with_hitbox(Hitbox::rectangle(10.0, 10.0).unwrap());
        Entity::level_geometry(EntityId(id), params).unwrap()
    }

    #[test]
    fn test_spawn_validation() {
        let settings = Settings::default();
        let bad_scale = at(0.0, 0.0).with_scale(0.0);
        assert!(matches!(
            Entity::player(EntityId(1), bad_scale, &settings),
            Err(SimError::InvalidSpawn(_))
        ));
        let bad_height = at(0.0, 0.0).with_draw_height(f64::NAN);
        assert!(Entity::player(EntityId(1), bad_height, &settings).is_err());
    }

    #[test]
    fn test_orientation_normalized() {
        let params = at(0.0, 0.0).with_orientation(-PI / 2.0);
        let player = Entity::player(EntityId(1), params, &Settings::default()).unwrap();
        assert!((player.orientation - 1.5 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_enemy_fixed_shape() {
        let settings = Settings::default();
        let enemy = Entity::enemy(EntityId(3), at(100.0, 40.0), 2, &settings).unwrap();
        assert_eq!(enemy.hitbox, Some(Hitbox::rectangle(50.0, 50.0).unwrap()));
        assert_eq!(enemy.hitpoints(), Some(2));
        let Behavior::Enemy(state) = &enemy.behavior else {
            panic!("expected enemy behavior");
        };
        assert!((state.velocity.x() + settings.enemy_speed).abs() < 1e-9);
        assert!(state.velocity.y().abs() < 1e-9);
    }

    #[test]
    fn test_colliding_with() {
        assert!(wall(1, 0.0, 0.0).colliding_with(&wall(2, 5.0, 5.0)).unwrap().is_some());
        assert!(wall(1, 0.0, 0.0).colliding_with(&wall(2, 50.0, 5.0)).unwrap().is_none());
    }

    #[test]
    fn test_absent_position_never_collides() {
        let mut ghost = wall(2, 0.0, 0.0);
        ghost.position = None;
        assert!(wall(1, 0.0, 0.0).colliding_with(&ghost).unwrap().is_none());
        assert!(ghost.components().unwrap().is_none());
        assert!(!ghost.is_collidable());
        assert!(wall(1, 0.0, 0.0).is_collidable());
    }

    #[test]
    fn test_hit_reactions() {
        let settings = Settings::default();
        let mut player = Entity::player(EntityId(1), at(0.0, 0.0), &settings).unwrap();
        let mut enemy = Entity::enemy(EntityId(2), at(0.0, 0.0), 2, &settings).unwrap();
        let shot = Entity::projectile(EntityId(3), at(0.0, 0.0), &player, &settings).unwrap();
        let stray = Entity::projectile(EntityId(4), at(0.0, 0.0), &enemy, &settings).unwrap();

        assert_eq!(player.hit_by(Striker::of(&enemy)), HitOutcome::Damaged(2));
        assert_eq!(player.hit_by(Striker::of(&shot)), HitOutcome::Unaffected);

        assert_eq!(enemy.hit_by(Striker::of(&stray)), HitOutcome::Unaffected);
        assert_eq!(enemy.hit_by(Striker::of(&shot)), HitOutcome::Damaged(1));
        assert_eq!(enemy.hit_by(Striker::of(&shot)), HitOutcome::Destroyed);

        let mut level = wall(5, 0.0, 0.0);
        assert_eq!(level.hit_by(Striker::of(&shot)), HitOutcome::Unaffected);
    }

    #[test]
    fn test_spawn_params_from_json() {
        let json = r#"{
            "position": {"x": 50.0, "y": 359.0},
            "scale": 0.5,
            "hitbox": {"rectangle": {"width": 50.0, "height": 50.0}},
            "sprite": "./Player.png",
            "draw_height": 998.0
        }"#;
        let params: SpawnParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.scale, Some(0.5));
        assert_eq!(params.sprite.as_deref(), Some("./Player.png"));
        assert!(params.orientation.is_none());
    }
}
