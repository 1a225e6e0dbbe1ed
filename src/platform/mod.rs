//! Raisable platforms.
//!
//! Each platform remembers where it was spawned. Entering top-down mode
//! sinks every platform until its top is flush with the ground below it;
//! entering side-scroll mode brings them all back. The player controller
//! never touches platforms directly: it emits a [`PlatformCommand`] and
//! [`apply_platform_commands`] fans it out to every [`Platform`].
//!
//! # Example:
//!
//! ```
//! use bevy::math::Vec3;
//! use planeshift::platform::Platform;
//!
//! let mut platform = Platform::new(Vec3::new(2.0, 3.0, 0.0));
//! let mut position = Vec3::new(2.0, 0.0, 0.0);
//! platform.raise();
//! for _ in 0..200 {
//!     platform.advance(&mut position, 0.05, 1e-3, 0.02);
//! }
//! assert_eq!(position, Vec3::new(2.0, 3.0, 0.0));
//! assert!(platform.is_idle());
//! ```

pub mod smoothing;

pub use smoothing::smooth_damp;

use crate::physics::{Collider, ColliderWorld, LayerMask, PhysicsQuery};
use crate::settings::Settings;
use bevy::prelude::*;

/// Length of the downward probe used to find the ground under a platform.
const GROUND_PROBE_DISTANCE: f32 = 100.0;

/// Broadcast to every platform when the player switches modes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCommand {
    LowerAll,
    RaiseAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformState {
    #[default]
    Idle,
    Moving,
}

/// A platform that can be lowered into the ground and raised back.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Platform {
    /// Spawn position; the raise target.
    pub original_position: Vec3,
    pub target_position: Vec3,
    /// Smoothing state carried between ticks.
    pub velocity: Vec3,
    pub state: PlatformState,
}

impl Platform {
    #[must_use]
    pub fn new(spawn: Vec3) -> Self {
        Self {
            original_position: spawn,
            target_position: spawn,
            velocity: Vec3::ZERO,
            state: PlatformState::Idle,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == PlatformState::Idle
    }

    /// Head back to the spawn position.
    pub fn raise(&mut self) {
        self.retarget(self.original_position);
    }

    /// Sink until the platform's top is flush with `ground_top`.
    pub fn lower(&mut self, ground_top: f32, half_height: f32) {
        let target = Vec3::new(
            self.original_position.x,
            ground_top - half_height,
            self.original_position.z,
        );
        self.retarget(target);
    }

    fn retarget(&mut self, target: Vec3) {
        self.target_position = target;
        self.state = PlatformState::Moving;
    }

    /// Move `position` one tick toward the target.
    ///
    /// The platform idles once within `arrival_epsilon` of the target, at
    /// which point `position` is set to the target exactly. An epsilon of
    /// `0.0` only idles on exact equality.
    pub fn advance(&mut self, position: &mut Vec3, smooth_time: f32, arrival_epsilon: f32, dt: f32) {
        if self.is_idle() {
            return;
        }

        *position = smooth_damp(*position, self.target_position, &mut self.velocity, smooth_time, dt);

        let arrived = if arrival_epsilon > 0.0 {
            position.distance(self.target_position) <= arrival_epsilon
        } else {
            *position == self.target_position
        };
        if arrived {
            *position = self.target_position;
            self.velocity = Vec3::ZERO;
            self.state = PlatformState::Idle;
        }
    }
}

/// Top of the ground directly below `platform`'s spawn position.
#[must_use]
pub fn ground_top_below(platform: &Platform, physics: &dyn PhysicsQuery) -> Option<f32> {
    physics
        .raycast(platform.original_position, Vec3::NEG_Y, GROUND_PROBE_DISTANCE, LayerMask::GROUND)
        .map(|hit| hit.surface_top)
}

/// Sink every platform. Platforms with no ground beneath them keep their
/// current target.
pub fn lower_all<'a>(platforms: impl IntoIterator<Item = (&'a mut Platform, f32)>, physics: &dyn PhysicsQuery) {
    for (platform, half_height) in platforms {
        match ground_top_below(platform, physics) {
            Some(top) => platform.lower(top, half_height),
            None => debug!("platform at {:?} has no ground below; not lowering", platform.original_position),
        }
    }
}

/// Send every platform back to its spawn position.
pub fn raise_all<'a>(platforms: impl IntoIterator<Item = &'a mut Platform>) {
    for platform in platforms {
        platform.raise();
    }
}

/// Apply this tick's commands in order; the last one wins.
#[allow(clippy::needless_pass_by_value)]
pub fn apply_platform_commands(
    mut commands: EventReader<PlatformCommand>,
    world: Res<ColliderWorld>,
    mut platforms: Query<(&mut Platform, &Collider)>,
) {
    for command in commands.read() {
        info!("platforms: {command:?}");
        match command {
            PlatformCommand::LowerAll => lower_all(
                platforms.iter_mut().map(|(p, c)| (p.into_inner(), c.half_extents.y)),
                &*world,
            ),
            PlatformCommand::RaiseAll => raise_all(platforms.iter_mut().map(|(p, _)| p.into_inner())),
        }
    }
}

/// Advance every moving platform by one fixed tick.
#[allow(clippy::needless_pass_by_value)]
pub fn advance_platforms(
    time: Res<Time>,
    settings: Res<Settings>,
    mut platforms: Query<(&mut Platform, &mut Transform)>,
) {
    let dt = time.delta_seconds();
    let cfg = &settings.platforms;
    for (mut platform, mut transform) in &mut platforms {
        if platform.is_idle() {
            continue;
        }
        platform.advance(&mut transform.translation, cfg.smooth_time, cfg.arrival_epsilon, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Collider, PhysicsLayer};

    fn ground() -> ColliderWorld {
        let mut world = ColliderWorld::new();
        world.insert(
            Vec3::new(0.0, -0.5, 0.0),
            Collider::cuboid(Vec3::new(20.0, 0.5, 5.0)).on_layer(PhysicsLayer::Ground),
        );
        world
    }

    fn run(platform: &mut Platform, position: &mut Vec3, epsilon: f32, ticks: usize) {
        for _ in 0..ticks {
            platform.advance(position, 0.05, epsilon, 0.02);
        }
    }

    #[test]
    fn new_platform_is_idle_at_spawn() {
        let p = Platform::new(Vec3::new(1.0, 2.0, 3.0));
        assert!(p.is_idle());
        assert_eq!(p.target_position, p.original_position);
    }

    #[test]
    fn lower_targets_flush_with_ground() {
        let world = ground();
        let mut p = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        lower_all([(&mut p, 0.5)], &world);

        assert_eq!(p.state, PlatformState::Moving);
        assert_eq!(p.target_position, Vec3::new(3.0, -0.5, 0.0));
    }

    #[test]
    fn lower_without_ground_keeps_target() {
        let world = ColliderWorld::new();
        let mut p = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        lower_all([(&mut p, 0.5)], &world);

        assert!(p.is_idle());
        assert_eq!(p.target_position, p.original_position);
    }

    #[test]
    fn lowered_platform_settles_and_idles() {
        let world = ground();
        let mut p = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        let mut pos = p.original_position;
        lower_all([(&mut p, 0.5)], &world);
        run(&mut p, &mut pos, 1e-3, 100);

        assert!(p.is_idle());
        assert_eq!(pos, p.target_position);
        assert_eq!(p.velocity, Vec3::ZERO);
    }

    #[test]
    fn raise_returns_to_original_position() {
        let mut p = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        let mut pos = Vec3::new(3.0, -0.5, 0.0);
        raise_all([&mut p]);
        run(&mut p, &mut pos, 1e-3, 100);

        assert!(p.is_idle());
        assert_eq!(pos, Vec3::new(3.0, 2.0, 0.0));
    }

    #[test]
    fn last_command_wins() {
        let world = ground();
        let mut p = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        lower_all([(&mut p, 0.5)], &world);
        raise_all([&mut p]);
        assert_eq!(p.target_position, p.original_position);
        assert_eq!(p.state, PlatformState::Moving);
    }

    #[test]
    fn idle_platform_does_not_move() {
        let mut p = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        let mut pos = Vec3::new(7.0, 7.0, 7.0);
        run(&mut p, &mut pos, 1e-3, 10);
        assert_eq!(pos, Vec3::new(7.0, 7.0, 7.0));
    }

    #[test]
    fn threshold_arrival_idles_sooner_than_exact() {
        let mut loose = Platform::new(Vec3::new(0.0, 2.0, 0.0));
        let mut exact = loose.clone();
        let mut loose_pos = Vec3::ZERO;
        let mut exact_pos = Vec3::ZERO;
        loose.raise();
        exact.raise();

        let mut loose_ticks = None;
        let mut exact_ticks = None;
        for tick in 1..=500 {
            loose.advance(&mut loose_pos, 0.05, 1e-3, 0.02);
            exact.advance(&mut exact_pos, 0.05, 0.0, 0.02);
            if loose.is_idle() && loose_ticks.is_none() {
                loose_ticks = Some(tick);
            }
            if exact.is_idle() && exact_ticks.is_none() {
                exact_ticks = Some(tick);
            }
        }

        let loose_ticks = loose_ticks.expect("threshold arrival");
        if let Some(exact_ticks) = exact_ticks {
            assert!(loose_ticks <= exact_ticks);
            assert_eq!(exact_pos, exact.target_position);
        } else {
            assert!(!exact.is_idle());
        }
    }
}
