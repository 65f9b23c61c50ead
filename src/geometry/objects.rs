//! Solid objects the fluid collides with.
//!
//! Objects only answer contact queries: given a particle position, report
//! how deep it sits inside the object and which way is out.

use bevy::prelude::*;
use indexmap::IndexMap;

use crate::error::{SolverError, SolverResult};
use crate::math::Real;

/// Penetration of a point into a solid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Unit outward surface normal at the closest surface point
    pub normal: Vec3,
    /// Distance to move along `normal` to reach the surface (> 0)
    pub depth: Real,
}

pub trait SolidObject: Send + Sync {
    /// `None` when `position` is outside the object.
    fn contact(&self, position: Vec3) -> Option<Contact>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct SphereObject {
    pub center: Vec3,
    pub radius: Real,
}

impl SphereObject {
    pub fn new(center: Vec3, radius: Real) -> Self {
        Self { center, radius }
    }
}

impl SolidObject for SphereObject {
    fn contact(&self, position: Vec3) -> Option<Contact> {
        let offset = position - self.center;
        let distance = offset.length();
        if distance >= self.radius {
            return None;
        }
        // Dead center has no preferred direction; push up.
        let normal = offset.try_normalize().unwrap_or(Vec3::Y);
        Some(Contact {
            normal,
            depth: self.radius - distance,
        })
    }
}

/// Axis-aligned box.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxObject {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl BoxObject {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn cube(center: Vec3, half_size: Real) -> Self {
        Self::new(center, Vec3::splat(half_size))
    }
}

impl SolidObject for BoxObject {
    fn contact(&self, position: Vec3) -> Option<Contact> {
        let local = position - self.center;
        // Per-axis distance to the nearest face; all positive means inside.
        let gap = self.half_extents - local.abs();
        if gap.min_element() <= 0.0 {
            return None;
        }
        // Exit through the closest face.
        let axis = if gap.x <= gap.y && gap.x <= gap.z {
            0
        } else if gap.y <= gap.z {
            1
        } else {
            2
        };
        let mut normal = Vec3::ZERO;
        normal[axis] = if local[axis] < 0.0 { -1.0 } else { 1.0 };
        Some(Contact {
            normal,
            depth: gap[axis],
        })
    }
}

/// Cloneable description of an object, for configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectShape {
    Sphere(SphereObject),
    Box(BoxObject),
}

impl ObjectShape {
    pub fn into_object(self) -> Box<dyn SolidObject> {
        match self {
            Self::Sphere(sphere) => Box::new(sphere),
            Self::Box(cube) => Box::new(cube),
        }
    }
}

/// Named objects, resolved in registration order.
#[derive(Default)]
pub struct ObjectSet {
    objects: IndexMap<String, Box<dyn SolidObject>>,
}

impl ObjectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object; re-using a name replaces the old object in place.
    pub fn insert(&mut self, name: impl Into<String>, object: Box<dyn SolidObject>) {
        self.objects.insert(name.into(), object);
    }

    pub fn remove(&mut self, name: &str) -> SolverResult<Box<dyn SolidObject>> {
        self.objects
            .shift_remove(name)
            .ok_or_else(|| SolverError::UnknownObject(name.to_owned()))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SolidObject> {
        self.objects.values().map(|object| object.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_reports_outward_normal() {
        let sphere = SphereObject::new(Vec3::ZERO, 1.0);
        let contact = sphere.contact(Vec3::new(0.0, 0.0, 0.75)).unwrap();
        assert_eq!(contact.normal, Vec3::Z);
        assert!((contact.depth - 0.25).abs() < 1e-6);
        assert!(sphere.contact(Vec3::new(2.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn box_exits_through_nearest_face() {
        let cube = BoxObject::cube(Vec3::splat(0.5), 0.1);
        let contact = cube.contact(Vec3::new(0.5, 0.45, 0.58)).unwrap();
        assert_eq!(contact.normal, Vec3::Z);
        assert!((contact.depth - 0.02).abs() < 1e-5);
        assert!(cube.contact(Vec3::new(0.5, 0.7, 0.5)).is_none());
    }

    #[test]
    fn set_keeps_registration_order_and_reports_unknown_names() {
        let mut set = ObjectSet::new();
        set.insert("b", Box::new(SphereObject::new(Vec3::ZERO, 1.0)));
        set.insert("a", ObjectShape::Box(BoxObject::cube(Vec3::ONE, 0.5)).into_object());
        assert_eq!(set.names().collect::<Vec<_>>(), ["b", "a"]);

        assert!(set.remove("b").is_ok());
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.remove("missing").err(),
            Some(SolverError::UnknownObject("missing".into()))
        );
    }
}
