//! Playing out a mode switch.
//!
//! A switch freezes the player immediately. The [`ModeTransition`] added
//! alongside counts down while the platforms move; when it runs out the
//! player is seated on the ground (entering top-down) or on the platform
//! under them (entering side-scroll) and unfrozen.

use super::{MovementMode, PlayerController};
use crate::physics::{Body, ColliderWorld, PhysicsQuery};
use crate::settings::Settings;
use crate::time::TimeState;
use bevy::prelude::*;

/// Emitted on the tick a switch starts.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitched {
    pub entity: Entity,
    pub mode: MovementMode,
}

/// Emitted once the player has been re-seated and unfrozen.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeTransitionFinished {
    pub entity: Entity,
    pub mode: MovementMode,
}

/// Pending end of a mode switch.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ModeTransition {
    pub entering: MovementMode,
    /// Seconds left before the player is released.
    pub remaining: f32,
}

impl ModeTransition {
    #[must_use]
    pub fn new(entering: MovementMode, duration_secs: f32) -> Self {
        Self {
            entering,
            remaining: duration_secs.max(0.0),
        }
    }

    /// Count down by `dt`; returns whether the transition is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// Start playing out a switch into `entering`.
///
/// Rising platforms would pass through the frozen player, so when
/// entering side-scroll the player is lifted to the resting height of the
/// platform under them right away; [`finish_transition`] seats them again
/// at the end.
pub fn begin_transition(
    entering: MovementMode,
    controller: &PlayerController,
    body: &Body,
    position: &mut Vec3,
    physics: &dyn PhysicsQuery,
    settings: &Settings,
) -> ModeTransition {
    if entering == MovementMode::SideScroll {
        controller.snap_to_platform_height(position, body, physics, &settings.probes);
    }
    ModeTransition::new(entering, settings.transition.duration_secs)
}

/// Seat the player for the mode just entered and release them. Returns
/// whether the alignment probe found something to stand on.
pub fn finish_transition(
    entering: MovementMode,
    controller: &mut PlayerController,
    body: &mut Body,
    position: &mut Vec3,
    time: &mut TimeState,
    physics: &dyn PhysicsQuery,
    settings: &Settings,
) -> bool {
    let seated = match entering {
        MovementMode::TopDown => controller.snap_to_ground(position, body, physics, &settings.probes),
        MovementMode::SideScroll => controller.snap_to_platform_height(position, body, physics, &settings.probes),
    };
    if !seated {
        debug!("nothing below the player after switching to {entering:?}");
    }
    controller.unfreeze(body, time);
    seated
}

/// Count down pending transitions and finish the ones that are due.
#[allow(clippy::needless_pass_by_value, clippy::type_complexity)]
pub fn advance_mode_transitions(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<Settings>,
    world: Res<ColliderWorld>,
    mut clock: ResMut<TimeState>,
    mut transitions: Query<(Entity, &mut ModeTransition, &mut PlayerController, &mut Body, &mut Transform)>,
    mut finished: EventWriter<ModeTransitionFinished>,
) {
    let dt = time.delta_seconds();
    for (entity, mut transition, mut controller, mut body, mut transform) in &mut transitions {
        if !transition.tick(dt) {
            continue;
        }
        let mode = transition.entering;
        finish_transition(
            mode,
            &mut controller,
            &mut body,
            &mut transform.translation,
            &mut clock,
            &*world,
            &settings,
        );
        commands.entity(entity).remove::<ModeTransition>();
        info!("switch to {mode:?} finished");
        finished.send(ModeTransitionFinished { entity, mode });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{Collider, PhysicsLayer, SurfaceTag};

    fn level() -> ColliderWorld {
        let mut world = ColliderWorld::new();
        world.insert(
            Vec3::new(0.0, -0.5, 0.0),
            Collider::cuboid(Vec3::new(20.0, 0.5, 5.0)).on_layer(PhysicsLayer::Ground),
        );
        // Lowered flush with the ground, resting with its top at 2.
        world.insert_platform(
            Vec3::new(4.0, -0.5, 0.0),
            Vec3::new(4.0, 1.5, 0.0),
            Collider::cuboid(Vec3::new(1.0, 0.5, 1.0))
                .on_layer(PhysicsLayer::Platform)
                .tagged(SurfaceTag::Passable)
                .in_group("Tier2"),
        );
        world
    }

    fn frozen(controller: &mut PlayerController, body: &mut Body, clock: &mut TimeState) {
        body.velocity = Vec3::new(2.0, 0.0, 0.0);
        controller.freeze(body, clock);
    }

    #[test]
    fn countdown_reaches_zero() {
        let mut t = ModeTransition::new(MovementMode::TopDown, 0.05);
        assert!(!t.tick(0.02));
        assert!(!t.tick(0.02));
        assert!(t.tick(0.02));
        assert!(ModeTransition::new(MovementMode::TopDown, 0.0).tick(0.02));
    }

    #[test]
    fn entering_top_down_lands_on_ground_and_unfreezes() {
        let world = level();
        let settings = Settings::default();
        let mut controller = PlayerController::default();
        let mut body = Body::new(Vec3::splat(0.5));
        let mut clock = TimeState::default();
        frozen(&mut controller, &mut body, &mut clock);
        let mut pos = Vec3::new(-3.0, 2.5, 0.0);

        assert!(finish_transition(
            MovementMode::TopDown,
            &mut controller,
            &mut body,
            &mut pos,
            &mut clock,
            &world,
            &settings
        ));

        assert!((pos.y - 0.5).abs() < 1e-6);
        assert!(!clock.stopped);
        assert_eq!(body.velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn entering_side_scroll_lifts_to_resting_platform_top() {
        let world = level();
        let settings = Settings::default();
        let controller = PlayerController::default();
        let body = Body::new(Vec3::splat(0.5));
        let mut pos = Vec3::new(4.0, 0.5, 0.0);

        let transition = begin_transition(MovementMode::SideScroll, &controller, &body, &mut pos, &world, &settings);

        assert!((pos.y - 2.5).abs() < 1e-6);
        assert_eq!(transition.entering, MovementMode::SideScroll);
        assert_eq!(transition.remaining, settings.transition.duration_secs);
    }

    #[test]
    fn entering_top_down_does_not_move_player_at_start() {
        let world = level();
        let settings = Settings::default();
        let controller = PlayerController::default();
        let body = Body::new(Vec3::splat(0.5));
        let mut pos = Vec3::new(4.0, 3.0, 0.0);

        begin_transition(MovementMode::TopDown, &controller, &body, &mut pos, &world, &settings);

        assert_eq!(pos, Vec3::new(4.0, 3.0, 0.0));
    }

    #[test]
    fn unfreezes_even_when_nothing_is_below() {
        let world = ColliderWorld::new();
        let settings = Settings::default();
        let mut controller = PlayerController::default();
        let mut body = Body::new(Vec3::splat(0.5));
        let mut clock = TimeState::default();
        frozen(&mut controller, &mut body, &mut clock);
        let mut pos = Vec3::new(0.0, 9.0, 0.0);

        let seated = finish_transition(
            MovementMode::SideScroll,
            &mut controller,
            &mut body,
            &mut pos,
            &mut clock,
            &world,
            &settings,
        );

        assert!(!seated);
        assert_eq!(pos.y, 9.0);
        assert!(!clock.stopped);
        assert!(body.use_gravity);
    }
}
