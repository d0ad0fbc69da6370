//! The ordered collection of live entities

use std::cmp::Ordering;

use super::SimError;
use super::collision::Contact;
use super::entity::{Entity, EntityId, EntityKind};

/// One entry of a collision scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub other: EntityId,
    pub other_kind: EntityKind,
    pub contact: Contact,
}

/// Live entities in insertion order
///
/// The registry is the sole owner of every entity; removing one drops it.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Append an entity; ids must be unique
    pub fn insert(&mut self, entity: Entity) -> Result<(), SimError> {
        if self.contains(entity.id) {
            return Err(SimError::DuplicateEntity(entity.id));
        }
        self.entities.push(entity);
        Ok(())
    }

    /// Remove by identity, keeping the order of the rest
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// First entity of the given kind
    pub fn first_of_kind(&self, kind: EntityKind) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind() == kind)
    }

    /// Snapshot of ids in ascending draw height (painter's order)
    ///
    /// The sort is stable, so equal heights keep insertion order. Entities
    /// without a draw height go first.
    pub fn paint_order(&self) -> Vec<EntityId> {
        let mut ordered: Vec<&Entity> = self.entities.iter().collect();
        ordered.sort_by(|a, b| compare_heights(a.draw_height, b.draw_height));
        ordered.into_iter().map(|e| e.id).collect()
    }

    /// Collision between two registered entities
    pub fn colliding_with(
        &self,
        id: EntityId,
        other: EntityId,
    ) -> Result<Option<Contact>, SimError> {
        let this = self.get(id).ok_or(SimError::NotAnEntity(id))?;
        let that = self.get(other).ok_or(SimError::NotAnEntity(other))?;
        Ok(this.colliding_with(that)?)
    }

    /// Every other entity `id` currently overlaps, in registry order, with
    /// the first contact found for each
    pub fn collisions_of(&self, id: EntityId) -> Result<Vec<Collision>, SimError> {
        let this = self.get(id).ok_or(SimError::NotAnEntity(id))?;
        let Some(ours) = this.components()? else {
            return Ok(Vec::new());
        };

        let mut collisions = Vec::new();
        for other in self.entities.iter().filter(|e| e.id != id && e.is_collidable()) {
            let Some(theirs) = other.components()? else {
                continue;
            };
            if let Some(contact) = super::collision::first_contact(&ours, &theirs) {
                collisions.push(Collision {
                    other: other.id,
                    other_kind: other.kind(),
                    contact,
                });
            }
        }
        log::trace!("{id} overlaps {} entities", collisions.len());
        Ok(collisions)
    }
}

fn compare_heights(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Hitbox, Vector};
    use crate::sim::entity::SpawnParams;

    fn block(id: u32, x: f64, height: Option<f64>) -> Entity {
        let mut params = SpawnParams::at(Vector::cartesian(x, 0.0).unwrap())
            .with_hitbox(Hitbox::rectangle(10.0, 10.0).unwrap());
        params.draw_height = height;
        Entity::level_geometry(EntityId(id), params).unwrap()
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = EntityRegistry::new();
        registry.insert(block(1, 0.0, None)).unwrap();
        assert_eq!(
            registry.insert(block(1, 50.0, None)),
            Err(SimError::DuplicateEntity(EntityId(1)))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut registry = EntityRegistry::new();
        for id in 1..=4 {
            registry.insert(block(id, id as f64 * 100.0, None)).unwrap();
        }
        assert!(registry.remove(EntityId(2)).is_some());
        assert!(registry.remove(EntityId(2)).is_none());
        let ids: Vec<_> = registry.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_paint_order_is_stable() {
        let mut registry = EntityRegistry::new();
        registry.insert(block(1, 0.0, Some(1000.0))).unwrap();
        registry.insert(block(2, 0.0, Some(500.0))).unwrap();
        registry.insert(block(3, 0.0, None)).unwrap();
        registry.insert(block(4, 0.0, Some(500.0))).unwrap();
        let order: Vec<_> = registry.paint_order().into_iter().map(|id| id.0).collect();
        assert_eq!(order, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_collisions_exclude_self() {
        let mut registry = EntityRegistry::new();
        registry.insert(block(1, 0.0, None)).unwrap();
        registry.insert(block(2, 5.0, None)).unwrap();
        registry.insert(block(3, 500.0, None)).unwrap();
        let hits = registry.collisions_of(EntityId(1)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].other, EntityId(2));
        assert_eq!(hits[0].other_kind, EntityKind::LevelGeometry);
    }

    #[test]
    fn test_unknown_ids_are_not_entities() {
        let mut registry = EntityRegistry::new();
        registry.insert(block(1, 0.0, None)).unwrap();
        assert_eq!(
            registry.colliding_with(EntityId(1), EntityId(9)),
            Err(SimError::NotAnEntity(EntityId(9)))
        );
        assert!(matches!(registry.collisions_of(EntityId(7)), Err(SimError::NotAnEntity(_))));
    }
}
