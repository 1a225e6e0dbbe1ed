//! Debug overlay and collider gizmos.
//!
//! The overlay (F1 by default) shows frame timing and the player's mode
//! state, refreshed a few times a second. F2 (by default) draws every collider box,
//! coloured by how it affects mode switching, plus the eligibility probe.

use crate::physics::{Body, ColliderWorld, PhysicsLayer, SurfaceTag, group_tier};
use crate::player::{Action, Keybinds, ModeTransition, Player, PlayerController};
use crate::settings::Settings;
use crate::time::TimeState;
use bevy::diagnostic::{Diagnostic, DiagnosticPath, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

/// State for the debug overlay visibility.
#[derive(Resource, Default)]
pub struct DebugOverlayState {
    pub visible: bool,
}

#[derive(Resource, Default)]
pub struct DebugOverlayTimer(pub Timer);

#[derive(Resource, Default)]
pub struct ColliderGizmosVisible(pub bool);

#[derive(Component)]
pub struct DebugOverlayText;

/// Insert the overlay resources.
pub fn setup_debug_overlay(mut commands: Commands) {
    commands.insert_resource(DebugOverlayTimer(Timer::from_seconds(0.25, TimerMode::Repeating)));
    commands.insert_resource(DebugOverlayState::default());
    commands.insert_resource(ColliderGizmosVisible::default());
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_debug_overlay(
    mut state: ResMut<DebugOverlayState>,
    keybinds: Res<Keybinds>,
    input: Res<ButtonInput<KeyCode>>,
) {
    if keybinds.just_pressed(Action::ToggleDebug, &input) {
        state.visible = !state.visible;
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn toggle_collider_gizmos(
    mut visible: ResMut<ColliderGizmosVisible>,
    keybinds: Res<Keybinds>,
    input: Res<ButtonInput<KeyCode>>,
) {
    if keybinds.just_pressed(Action::ToggleGizmos, &input) {
        visible.0 = !visible.0;
    }
}

/// What the overlay shows about the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayReadout {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    pub stopped: bool,
    pub pending: Option<f32>,
}

/// Overlay body text.
#[must_use]
pub fn overlay_text(controller: &PlayerController, r: &OverlayReadout) -> String {
    let switch = match r.pending {
        Some(left) => format!("switching ({left:.2}s)"),
        None if controller.can_switch_modes => "allowed".to_string(),
        None => "blocked".to_string(),
    };
    format!(
        "FPS: {:.1}\nFrame Time: {:.2} ms\nMode: {:?}\nSwitch: {}\nFrozen: {}\nGrounded: {}\nPos: ({:.2}, {:.2}, {:.2})\nVel: ({:.2}, {:.2}, {:.2})",
        r.fps,
        r.frame_time_ms,
        controller.mode,
        switch,
        r.stopped,
        r.grounded,
        r.position.x,
        r.position.y,
        r.position.z,
        r.velocity.x,
        r.velocity.y,
        r.velocity.z,
    )
}

#[derive(bevy::ecs::system::SystemParam)]
pub struct DebugOverlayCtx<'w, 's> {
    pub diagnostics: Option<Res<'w, DiagnosticsStore>>,
    pub state: Res<'w, DebugOverlayState>,
    pub settings: Res<'w, Settings>,
    pub colliders: Res<'w, ColliderWorld>,
    pub clock: Res<'w, TimeState>,
    pub time: Res<'w, Time>,
    pub timer: ResMut<'w, DebugOverlayTimer>,
    pub query: Query<'w, 's, &'static mut Text, With<DebugOverlayText>>,
    pub player_query: Query<
        'w,
        's,
        (&'static Transform, &'static Body, &'static PlayerController, Option<&'static ModeTransition>),
        With<Player>,
    >,
}

/// Refresh the overlay text on the overlay timer.
pub fn update_debug_overlay(mut ctx: DebugOverlayCtx<'_, '_>) {
    if !ctx.timer.0.tick(ctx.time.delta()).just_finished() {
        return;
    }

    let Ok(mut text) = ctx.query.get_single_mut() else { return };

    if !ctx.state.visible {
        text.sections[0].value = String::new();
        return;
    }

    let smoothed = |key: &DiagnosticPath| {
        ctx.diagnostics
            .as_ref()
            .and_then(|d| d.get(key))
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0)
    };
    let fps = smoothed(&FrameTimeDiagnosticsPlugin::FPS);
    let frame_time_ms = smoothed(&FrameTimeDiagnosticsPlugin::FRAME_TIME);

    let Ok((transform, body, controller, transition)) = ctx.player_query.get_single() else {
        text.sections[0].value = format!("FPS: {fps:.1}\nPlayer: N/A");
        return;
    };

    let readout = OverlayReadout {
        fps,
        frame_time_ms,
        position: transform.translation,
        velocity: body.velocity,
        grounded: controller.is_grounded(transform.translation, body, &*ctx.colliders, &ctx.settings.probes),
        stopped: ctx.clock.stopped,
        pending: transition.map(|t| t.remaining.max(0.0)),
    };
    text.sections[0].value = overlay_text(controller, &readout);
}

pub fn spawn_debug_overlay(mut commands: Commands) {
    commands.spawn((
        TextBundle {
            text: Text::from_section(
                "",
                TextStyle {
                    font_size: 18.0,
                    color: Color::srgb(1.0, 1.0, 0.0),
                    ..default()
                },
            ),
            style: Style {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                ..default()
            },
            ..default()
        },
        DebugOverlayText,
    ));
}

/// Gizmo colour for a collider.
#[must_use]
pub fn collider_colour(layer: PhysicsLayer, tag: SurfaceTag, group: Option<&str>, blocked_tier: &str) -> Color {
    match (layer, tag) {
        (PhysicsLayer::Ground, _) => Color::srgb(0.6, 0.6, 0.6),
        (_, SurfaceTag::Impassable) => Color::srgb(1.0, 0.1, 0.1),
        (_, SurfaceTag::Passable) if group.and_then(group_tier) == Some(blocked_tier) => Color::srgb(1.0, 0.6, 0.0),
        _ => Color::srgb(0.0, 1.0, 0.0),
    }
}

/// Draw collider boxes and the player's eligibility probe.
#[allow(clippy::needless_pass_by_value)]
pub fn render_collider_gizmos(
    visible: Res<ColliderGizmosVisible>,
    mut gizmos: Gizmos,
    colliders: Res<ColliderWorld>,
    settings: Res<Settings>,
    player: Query<(&Transform, &PlayerController), With<Player>>,
) {
    if !visible.0 {
        return;
    }

    let blocked = settings.probes.blocked_tier.as_str();
    for entry in colliders.iter() {
        let c = &entry.collider;
        let colour = collider_colour(c.layer, c.tag, c.group.as_deref(), blocked);
        gizmos.cuboid(
            Transform::from_translation(entry.center).with_scale(c.half_extents * 2.0),
            colour,
        );
    }

    if let Ok((transform, controller)) = player.get_single() {
        let anchor = controller.anchor(transform.translation);
        let colour = if controller.can_switch_modes {
            Color::srgb(0.2, 0.4, 1.0)
        } else {
            Color::srgb(1.0, 0.1, 0.1)
        };
        gizmos.line(anchor, anchor - Vec3::Y * settings.probes.eligibility_distance, colour);
    }
}
