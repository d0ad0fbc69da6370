//! Pairwise collision tests between flattened hitbox components
//!
//! Each entity's hitbox is flattened into absolutely positioned primitives;
//! two entities collide when any pair of their primitives intersects. Touching
//! counts for rectangle pairs but not for circles.

use glam::DVec2;

use crate::geom::{Circle, Component, Primitive, Rectangle};

/// The first pair of components found intersecting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Component of the entity that asked
    pub ours: Component,
    /// Component of the entity it hit
    pub theirs: Component,
}

/// Circles overlap when their centres are strictly closer than the radius sum
#[inline]
pub fn circle_circle_collision(a_center: DVec2, a: &Circle, b_center: DVec2, b: &Circle) -> bool {
    a_center.distance(b_center) < a.radius() + b.radius()
}

/// Axis-aligned overlap, edges touching included
///
/// The combined span along each axis must not exceed the summed extents.
pub fn rect_rect_collision(a_pos: DVec2, a: &Rectangle, b_pos: DVec2, b: &Rectangle) -> bool {
    let left = a_pos.x.min(b_pos.x);
    let right = (a_pos.x + a.width()).max(b_pos.x + b.width());
    if right - left > a.width() + b.width() {
        return false;
    }

    let top = a_pos.y.min(b_pos.y);
    let bottom = (a_pos.y + a.height()).max(b_pos.y + b.height());
    bottom - top <= a.height() + b.height()
}

/// Circle against rectangle via the closest point of the rectangle
///
/// A centre inside the rectangle (edges included) always collides.
pub fn circle_rect_collision(
    center: DVec2,
    circle: &Circle,
    corner: DVec2,
    rect: &Rectangle,
) -> bool {
    let far = corner + DVec2::new(rect.width(), rect.height());
    let closest = center.clamp(corner, far);
    if closest == center {
        return true;
    }
    center.distance(closest) < circle.radius()
}

/// Dispatch on the primitive pair
pub fn components_collide(a: &Component, b: &Component) -> bool {
    let (a_pos, b_pos) = (a.position.to_dvec2(), b.position.to_dvec2());
    match (&a.shape, &b.shape) {
        (Primitive::Circle(ca), Primitive::Circle(cb)) => {
            circle_circle_collision(a_pos, ca, b_pos, cb)
        }
        (Primitive::Rectangle(ra), Primitive::Rectangle(rb)) => {
            rect_rect_collision(a_pos, ra, b_pos, rb)
        }
        (Primitive::Circle(c), Primitive::Rectangle(r)) => {
            circle_rect_collision(a_pos, c, b_pos, r)
        }
        (Primitive::Rectangle(r), Primitive::Circle(c)) => {
            circle_rect_collision(b_pos, c, a_pos, r)
        }
    }
}

/// First intersecting pair in list order (ours outer, theirs inner)
///
/// Not the nearest contact and not all of them; callers wanting every
/// contact should scan with [`components_collide`].
pub fn first_contact(ours: &[Component], theirs: &[Component]) -> Option<Contact> {
    ours.iter().find_map(|a| {
        theirs
            .iter()
            .find(|b| components_collide(a, b))
            .map(|b| Contact { ours: *a, theirs: *b })
    })
}

/// Whether any pair intersects
#[inline]
pub fn any_collision(ours: &[Component], theirs: &[Component]) -> bool {
    first_contact(ours, theirs).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{ComponentFlattener, Hitbox, Vector};

    fn component(x: f64, y: f64, hitbox: Hitbox) -> Component {
        let origin = Vector::cartesian(x, y).unwrap();
        let components = ComponentFlattener::flatten_at(origin, &hitbox).unwrap();
        components[0]
    }

    fn circle(x: f64, y: f64, r: f64) -> Component {
        component(x, y, Hitbox::circle(r).unwrap())
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Component {
        component(x, y, Hitbox::rectangle(w, h).unwrap())
    }

    #[test]
    fn test_circle_circle_strict() {
        assert!(components_collide(&circle(0.0, 0.0, 5.0), &circle(9.0, 0.0, 5.0)));
        // Exactly touching is not a hit
        assert!(!components_collide(&circle(0.0, 0.0, 5.0), &circle(10.0, 0.0, 5.0)));
    }

    #[test]
    fn test_rect_rect_touching_counts() {
        assert!(components_collide(&rect(0.0, 0.0, 10.0, 10.0), &rect(10.0, 0.0, 10.0, 10.0)));
        assert!(components_collide(&rect(0.0, 0.0, 10.0, 10.0), &rect(5.0, 5.0, 10.0, 10.0)));
        assert!(!components_collide(&rect(0.0, 0.0, 10.0, 10.0), &rect(10.5, 0.0, 10.0, 10.0)));
        // Overlapping in x alone is not enough
        assert!(!components_collide(&rect(0.0, 0.0, 10.0, 10.0), &rect(0.0, 11.0, 10.0, 10.0)));
    }

    #[test]
    fn test_circle_rect_closest_point() {
        // Closest point (10, 10) is √200 away
        assert!(!components_collide(&circle(0.0, 0.0, 5.0), &rect(10.0, 10.0, 10.0, 10.0)));
        // Closest point (3, 3) is √18 ≈ 4.24 away
        assert!(components_collide(&circle(0.0, 0.0, 5.0), &rect(3.0, 3.0, 10.0, 10.0)));
        // Argument order does not matter
        assert!(components_collide(&rect(3.0, 3.0, 10.0, 10.0), &circle(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_circle_center_inside_rect() {
        // Tiny circle deep inside a big rectangle
        assert!(components_collide(&circle(50.0, 50.0, 0.1), &rect(-3.0, -3.0, 100.0, 100.0)));
        // Centre exactly on an edge counts as inside
        assert!(components_collide(&circle(0.0, 5.0, 0.1), &rect(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_circle_beside_rect_edge() {
        // Straight out from the right edge: distance 4 < 5
        assert!(components_collide(&circle(14.0, 5.0, 5.0), &rect(0.0, 0.0, 10.0, 10.0)));
        assert!(!components_collide(&circle(15.0, 5.0, 5.0), &rect(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_first_contact_is_list_order() {
        let ours = [rect(0.0, 0.0, 10.0, 10.0), circle(100.0, 100.0, 5.0)];
        let theirs = [circle(103.0, 100.0, 5.0), rect(5.0, 5.0, 2.0, 2.0)];
        let contact = first_contact(&ours, &theirs).unwrap();
        // Outer loop is ours, so the rectangle pairing is found first
        assert_eq!(contact.ours, ours[0]);
        assert_eq!(contact.theirs, theirs[1]);
    }

    #[test]
    fn test_no_components_no_collision() {
        assert!(!any_collision(&[], &[rect(0.0, 0.0, 1.0, 1.0)]));
        assert!(first_contact(&[circle(0.0, 0.0, 1.0)], &[]).is_none());
    }
}
