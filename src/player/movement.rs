//! Input to velocity mapping for both movement variants.

use super::{MovementMode, PlayerInput};
use crate::settings::{MovementSettings, MovementVariant};
use bevy::prelude::*;

/// Apply one tick of movement input to `velocity`.
///
/// `grounded` is only evaluated when a jump is actually possible, so the
/// sphere probe behind it is skipped on most ticks.
pub fn apply_movement(
    input: &PlayerInput,
    mode: MovementMode,
    grounded: impl FnOnce() -> bool,
    velocity: &mut Vec3,
    settings: &MovementSettings,
    dt: f32,
) {
    match settings.variant {
        MovementVariant::Force => apply_force(input, mode, velocity, settings, dt),
        MovementVariant::VelocitySet => apply_velocity_set(input, mode, velocity, settings),
    }

    if input.jump && mode == MovementMode::SideScroll && grounded() {
        velocity.y = settings.jump_speed;
    }
}

/// Accelerate along the held axis while cancelling drift on the other
/// horizontal axis, then cap each horizontal component.
fn apply_force(input: &PlayerInput, mode: MovementMode, velocity: &mut Vec3, settings: &MovementSettings, dt: f32) {
    let v0 = *velocity;
    let force = settings.move_force;
    let mut accel = Vec3::ZERO;

    if input.left {
        accel += Vec3::new(-force, 0.0, -2.0 * v0.z);
    }
    if input.right {
        accel += Vec3::new(force, 0.0, -2.0 * v0.z);
    }
    if mode == MovementMode::TopDown {
        if input.forward {
            accel += Vec3::new(-2.0 * v0.x, 0.0, force);
        }
        if input.back {
            accel += Vec3::new(-2.0 * v0.x, 0.0, -force);
        }
    }

    *velocity += accel * dt;

    let max = settings.max_speed;
    let dir = Vec2::new(velocity.x, velocity.z).normalize_or_zero();
    if velocity.x.abs() > max {
        velocity.x = max * dir.x;
    }
    if velocity.z.abs() > max {
        velocity.z = max * dir.y;
    }
}

fn apply_velocity_set(input: &PlayerInput, mode: MovementMode, velocity: &mut Vec3, settings: &MovementSettings) {
    let speed = settings.move_speed;
    let top_down = mode == MovementMode::TopDown;
    let mut moved = false;

    if input.left {
        velocity.x = -speed;
        moved = true;
    }
    if input.right {
        velocity.x = speed;
        moved = true;
    }
    if top_down && input.forward {
        velocity.z = speed;
        moved = true;
    }
    if top_down && input.back {
        velocity.z = -speed;
        moved = true;
    }

    if !moved {
        velocity.x = 0.0;
        velocity.z = 0.0;
    }
}
