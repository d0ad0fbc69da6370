//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - One update pass per frame, in painter's order
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod registry;
pub mod state;
pub mod tick;

pub use collision::{Contact, any_collision, components_collide, first_contact};
pub use entity::{
    Behavior, EnemyState, Entity, EntityId, EntityKind, HitOutcome, PlayerState, ProjectileState,
    SpawnParams, Striker,
};
pub use registry::{Collision, EntityRegistry};
pub use state::{GameEvent, GamePhase, World};
pub use tick::{Key, TickInput, tick};

use crate::geom::GeometryError;

/// Simulation errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Shape or vector construction failed mid-simulation
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A collision query named an id that is not in the registry
    #[error("{0} is not a live entity")]
    NotAnEntity(EntityId),

    /// Tried to register a second entity under an existing id
    #[error("entity id {0} is already in use")]
    DuplicateEntity(EntityId),

    /// Spawn parameters failed validation
    #[error("invalid spawn parameters: {0}")]
    InvalidSpawn(String),
}
