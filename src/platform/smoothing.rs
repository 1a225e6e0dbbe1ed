//! Critically damped smoothing toward a moving target.

use bevy::math::Vec3;

/// Move `current` toward `target` like a critically damped spring that
/// settles in roughly `smooth_time` seconds.
///
/// `velocity` carries the spring state between calls and must be kept by
/// the caller. The result never overshoots the target; when it would, it
/// lands on the target with zero velocity. A zero `dt` returns `current`.
#[must_use]
pub fn smooth_damp(current: Vec3, target: Vec3, velocity: &mut Vec3, smooth_time: f32, dt: f32) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Polynomial fit of exp(-x), accurate for the small x a fixed tick gives.
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = Vec3::ZERO;
    }

    output
}
