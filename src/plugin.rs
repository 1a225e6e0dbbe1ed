//! Bevy wiring for the gameplay core.
//!
//! [`PlaneshiftPlugin`] holds every system that does not need a window or
//! a renderer, so tests can run it on top of `MinimalPlugins`. Rendering,
//! the camera and the debug UI are added by the binary.

use crate::physics::{ColliderWorld, integrate_bodies, refresh_collider_world};
use crate::platform::{PlatformCommand, advance_platforms, apply_platform_commands};
use crate::player::{Keybinds, ModeSwitched, ModeTransitionFinished, advance_mode_transitions, player_tick, refresh_keybinds};
use crate::settings::Settings;
use crate::time::TimeState;
use bevy::prelude::*;

/// Ordered phases of one fixed tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Snapshot collider positions for this tick's casts.
    Collect,
    /// Eligibility, mode transitions and movement input.
    Player,
    /// Finish switches whose countdown ran out.
    Transition,
    /// Retarget and move platforms.
    Platforms,
    /// Gravity, velocity and collision for every body.
    Integrate,
}

pub struct PlaneshiftPlugin;

impl Plugin for PlaneshiftPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Settings>();
        let tick_hz = app.world().resource::<Settings>().physics.tick_hz;
        app.insert_resource(Time::<Fixed>::from_hz(tick_hz));

        let keybinds = Keybinds::from_settings(&app.world().resource::<Settings>().controls);
        app.insert_resource(keybinds)
            .init_resource::<TimeState>()
            .init_resource::<ColliderWorld>()
            .init_resource::<ButtonInput<KeyCode>>();

        app.add_event::<PlatformCommand>()
            .add_event::<ModeSwitched>()
            .add_event::<ModeTransitionFinished>();

        app.configure_sets(
            FixedUpdate,
            (
                TickSet::Collect,
                TickSet::Player,
                TickSet::Transition,
                TickSet::Platforms,
                TickSet::Integrate,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                refresh_collider_world.in_set(TickSet::Collect),
                player_tick.in_set(TickSet::Player),
                advance_mode_transitions.in_set(TickSet::Transition),
                (apply_platform_commands, advance_platforms)
                    .chain()
                    .in_set(TickSet::Platforms),
                integrate_bodies.in_set(TickSet::Integrate),
            ),
        );

        app.add_systems(PreUpdate, refresh_keybinds);
    }
}
