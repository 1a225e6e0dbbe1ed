//! Kinematic body integration: gravity, velocity and box collision.
//!
//! A body moves one axis at a time (X, then Z, then Y). A horizontal move
//! that would push it into a solid collider is cancelled and that velocity
//! component zeroed. A vertical move that would do so snaps the body onto
//! the top (falling) or against the underside (rising) of the collider.
//! A body that landed this step loses horizontal speed to ground friction.

use super::ColliderWorld;
use crate::settings::Settings;
use bevy::prelude::*;

/// Velocity state of a simulated body.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Body {
    /// Current velocity in world units per second.
    pub velocity: Vec3,
    /// Whether gravity accelerates this body.
    pub use_gravity: bool,
    /// Half size of the body's collision box.
    pub half_extents: Vec3,
}

impl Body {
    #[must_use]
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            velocity: Vec3::ZERO,
            use_gravity: true,
            half_extents,
        }
    }
}

/// Advance one body by `dt` seconds against the colliders in `world`.
///
/// Extracted helper so the system, tests and benchmarks share the same
/// stepping logic.
pub fn body_step(position: &mut Vec3, body: &mut Body, world: &ColliderWorld, gravity: f32, friction: f32, dt: f32) {
    if body.use_gravity {
        body.velocity.y += gravity * dt;
    }

    let delta = body.velocity * dt;
    let half = body.half_extents;
    let mut p = *position;

    p.x += delta.x;
    if world.overlapping_solids(p, half).next().is_some() {
        p.x = position.x;
        body.velocity.x = 0.0;
    }

    p.z += delta.z;
    if world.overlapping_solids(p, half).next().is_some() {
        p.z = position.z;
        body.velocity.z = 0.0;
    }

    p.y += delta.y;
    let mut supported = false;
    if delta.y < 0.0 {
        let landing = world.overlapping_solids(p, half).map(super::ColliderEntry::top).reduce(f32::max);
        if let Some(top) = landing {
            p.y = top + half.y;
            body.velocity.y = 0.0;
            supported = true;
        }
    } else if delta.y > 0.0 {
        let ceiling = world
            .overlapping_solids(p, half)
            .map(|e| e.min().y)
            .reduce(f32::min);
        if let Some(bottom) = ceiling {
            p.y = bottom - half.y;
            body.velocity.y = 0.0;
        }
    }

    *position = p;

    if supported {
        apply_ground_friction(&mut body.velocity, friction, dt);
    }
}

/// Slow horizontal velocity by `friction * dt`, stopping rather than
/// reversing.
fn apply_ground_friction(velocity: &mut Vec3, friction: f32, dt: f32) {
    let horizontal = Vec2::new(velocity.x, velocity.z);
    let speed = horizontal.length();
    let loss = friction.max(0.0) * dt;
    let kept = if speed > loss { horizontal * ((speed - loss) / speed) } else { Vec2::ZERO };
    velocity.x = kept.x;
    velocity.z = kept.y;
}

/// Integrate every [`Body`] for one fixed tick.
#[allow(clippy::needless_pass_by_value)]
pub fn integrate_bodies(
    time: Res<Time>,
    world: Res<ColliderWorld>,
    settings: Res<Settings>,
    mut bodies: Query<(&mut Transform, &mut Body)>,
) {
    let dt = time.delta_seconds();
    for (mut transform, mut body) in &mut bodies {
        let physics = &settings.physics;
        body_step(&mut transform.translation, &mut body, &world, physics.gravity, physics.ground_friction, dt);
    }
}
