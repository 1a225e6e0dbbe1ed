//! The player's fixed-tick check chain.
//!
//! Every tick runs [`TICK_STEPS`] in order over one [`TickContext`]. The
//! order is part of the contract: eligibility is probed before either
//! transition reads it, and movement runs after the transitions so a
//! switch made this tick already suppresses it.

use super::{MovementMode, PlayerController, PlayerInput, apply_movement};
use super::{AnimatorFlags, Keybinds, ModeSwitched, Player, begin_transition};
use crate::physics::{Body, ColliderWorld, PhysicsQuery};
use crate::platform::PlatformCommand;
use crate::settings::Settings;
use crate::time::TimeState;
use bevy::prelude::*;

/// Side effects a tick asks the app to carry out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub switched_to: Option<MovementMode>,
    pub platform_commands: Vec<PlatformCommand>,
}

/// Everything one player tick reads and writes.
pub struct TickContext<'a> {
    pub controller: &'a mut PlayerController,
    pub body: &'a mut Body,
    pub position: Vec3,
    pub input: PlayerInput,
    pub time: &'a mut TimeState,
    pub physics: &'a dyn PhysicsQuery,
    pub settings: &'a Settings,
    pub dt: f32,
    pub outcome: TickOutcome,
}

impl<'a> TickContext<'a> {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        controller: &'a mut PlayerController,
        body: &'a mut Body,
        position: Vec3,
        input: PlayerInput,
        time: &'a mut TimeState,
        physics: &'a dyn PhysicsQuery,
        settings: &'a Settings,
        dt: f32,
    ) -> Self {
        Self {
            controller,
            body,
            position,
            input,
            time,
            physics,
            settings,
            dt,
            outcome: TickOutcome::default(),
        }
    }
}

pub type TickStep = fn(&mut TickContext);

pub const TICK_STEPS: [TickStep; 4] = [
    check_current_platform,
    check_to_top_down,
    check_to_side_scroll,
    check_movement,
];

/// Run every step of the chain once.
pub fn run_tick(ctx: &mut TickContext) {
    for step in TICK_STEPS {
        step(ctx);
    }
}

/// Recompute `can_switch_modes` from what is under the player.
pub fn check_current_platform(ctx: &mut TickContext) {
    ctx.controller.can_switch_modes = !ctx.settings.movement.gate_switch_on_platform
        || ctx.controller.probe_eligibility(ctx.position, ctx.physics, &ctx.settings.probes);
}

pub fn check_to_top_down(ctx: &mut TickContext) {
    if ctx.input.enter_top_down && ctx.controller.mode == MovementMode::SideScroll {
        switch_mode(ctx, MovementMode::TopDown, PlatformCommand::LowerAll);
    }
}

pub fn check_to_side_scroll(ctx: &mut TickContext) {
    if ctx.input.enter_side_scroll && ctx.controller.mode == MovementMode::TopDown {
        switch_mode(ctx, MovementMode::SideScroll, PlatformCommand::RaiseAll);
    }
}

fn switch_mode(ctx: &mut TickContext, mode: MovementMode, command: PlatformCommand) {
    if !ctx.controller.can_switch_modes {
        debug!("switch to {mode:?} refused: surface below blocks it");
        return;
    }
    // A switch is still playing out.
    if ctx.time.stopped {
        return;
    }

    ctx.controller.freeze(ctx.body, ctx.time);
    ctx.controller.mode = mode;
    ctx.outcome.switched_to = Some(mode);
    ctx.outcome.platform_commands.push(command);
}

/// Turn held keys into velocity. Does nothing while the player is frozen.
pub fn check_movement(ctx: &mut TickContext) {
    if ctx.time.stopped {
        return;
    }

    let controller = &*ctx.controller;
    let (position, physics, probes) = (ctx.position, ctx.physics, &ctx.settings.probes);
    let body = &*ctx.body;
    let grounded = || controller.is_grounded(position, body, physics, probes);

    let mut velocity = body.velocity;
    apply_movement(
        &ctx.input,
        controller.mode,
        grounded,
        &mut velocity,
        &ctx.settings.movement,
        ctx.dt,
    );
    ctx.body.velocity = velocity;
}

/// Fixed-tick system driving the player's check chain.
#[allow(clippy::needless_pass_by_value, clippy::too_many_arguments)]
pub fn player_tick(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<Settings>,
    keybinds: Res<Keybinds>,
    keys: Res<ButtonInput<KeyCode>>,
    world: Res<ColliderWorld>,
    mut clock: ResMut<TimeState>,
    mut player: Query<
        (Entity, &mut PlayerController, &mut Body, &mut Transform, &mut AnimatorFlags),
        With<Player>,
    >,
    mut platform_commands: EventWriter<PlatformCommand>,
    mut switched: EventWriter<ModeSwitched>,
) {
    let Ok((entity, mut controller, mut body, mut transform, mut flags)) = player.get_single_mut() else {
        return;
    };

    let input = PlayerInput::poll(&keybinds, &keys);
    let mut ctx = TickContext::new(
        &mut controller,
        &mut body,
        transform.translation,
        input,
        &mut clock,
        &*world,
        &settings,
        time.delta_seconds(),
    );
    run_tick(&mut ctx);
    let outcome = ctx.outcome;

    for command in outcome.platform_commands {
        platform_commands.send(command);
    }

    if let Some(mode) = outcome.switched_to {
        info!("player switching to {mode:?}");
        *flags = mode.into();
        let transition = begin_transition(
            mode,
            &controller,
            &body,
            &mut transform.translation,
            &*world,
            &settings,
        );
        commands.entity(entity).insert(transition);
        switched.send(ModeSwitched { entity, mode });
    }
}
