//! Wall conditions and solid object coupling.

use bevy::prelude::*;
use rayon::prelude::*;

use crate::core::{ParticleSet, UniformGrid};
use crate::geometry::ObjectSet;
use crate::math::Real;

/// Inelastic walls at the ghost-cell margin of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallConditions {
    /// Positions at or below this are clamped, per axis
    pub lower: Vec3,
    /// Positions at or above this are clamped, per axis
    pub upper: Vec3,
}

impl WallConditions {
    pub fn new(grid: &UniformGrid) -> Self {
        let margin = grid.wall_margin();
        Self {
            lower: grid.min() + margin,
            upper: grid.max() - margin,
        }
    }

    /// Push `position` one ulp inside the walls; any axis that was clamped
    /// loses its velocity component. Returns whether anything was clamped.
    #[inline]
    pub fn clamp_position_and_velocity(&self, position: &mut Vec3, velocity: &mut Vec3) -> bool {
        let mut clamped = false;
        for axis in 0..3 {
            if position[axis] <= self.lower[axis] {
                position[axis] = self.lower[axis].next_up();
                velocity[axis] = 0.0;
                clamped = true;
            } else if position[axis] >= self.upper[axis] {
                position[axis] = self.upper[axis].next_down();
                velocity[axis] = 0.0;
                clamped = true;
            }
        }
        clamped
    }

    /// Whether `position` lies within the walls, bounds included.
    pub fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.lower).all() && position.cmple(self.upper).all()
    }

    /// Whether a sphere fits entirely within the walls.
    pub fn contains_sphere(&self, center: Vec3, radius: Real) -> bool {
        self.contains(center - Vec3::splat(radius)) && self.contains(center + Vec3::splat(radius))
    }
}

/// Resolve object contacts, then clamp against the walls.
///
/// Each particle's external force accumulator is cleared and refilled with
/// the penalty force `contact_stiffness * mass * depth * normal` of every
/// object it penetrates. The position is projected back to the surface and
/// any velocity into the surface is removed.
pub fn couple_with_objects(
    particles: &mut ParticleSet,
    objects: &ObjectSet,
    walls: &WallConditions,
    mass: Real,
    contact_stiffness: Real,
) {
    let ParticleSet {
        positions,
        velocities,
        forces,
        ..
    } = particles;

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .zip(forces.par_iter_mut())
        .for_each(|((position, velocity), force)| {
            *force = Vec3::ZERO;
            for object in objects.iter() {
                let Some(contact) = object.contact(*position) else {
                    continue;
                };
                *position += contact.normal * contact.depth;
                let normal_speed = velocity.dot(contact.normal);
                if normal_speed < 0.0 {
                    *velocity -= normal_speed * contact.normal;
                }
                *force += contact_stiffness * mass * contact.depth * contact.normal;
            }
            walls.clamp_position_and_velocity(position, velocity);
        });
}
