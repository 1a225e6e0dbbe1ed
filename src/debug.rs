//! Debug dump (F3 by default): writes frame timings, process memory and the
//! full player, clock and platform state to a timestamped text file in
//! `./debug-dumps/`.
//!
//! Handy for capturing the state around a bad mode switch without attaching
//! a debugger.
use crate::physics::Body;
use crate::platform::Platform;
use crate::player::{Action, Keybinds, ModeTransition, Player, PlayerController};
use crate::time::TimeState;
use bevy::diagnostic::{Diagnostic, DiagnosticPath, DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::fmt::Write;
use std::fs;
use sysinfo::{Pid, ProcessExt, System, SystemExt};

/// Directory dumps are written to, relative to the working directory.
pub const DUMP_DIR: &str = "debug-dumps";

pub struct DebugDumpPlugin;

impl Plugin for DebugDumpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, debug_input_system);
    }
}

fn bytes_to_mb(bytes: u64) -> String {
    format!("{:.2} MB", (bytes as f64) / (1024.0 * 1024.0))
}

/// Player fields captured for a dump.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec3,
    pub velocity: Vec3,
    pub use_gravity: bool,
    pub controller: PlayerController,
    pub transition: Option<ModeTransition>,
}

/// Platform fields captured for a dump.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSnapshot {
    pub position: Vec3,
    pub platform: Platform,
}

/// Render the gameplay part of a dump.
#[must_use]
pub fn format_state(clock: &TimeState, player: Option<&PlayerSnapshot>, platforms: &[PlatformSnapshot]) -> String {
    let mut out = String::new();
    writeln!(out, "Time stopped: {}", clock.stopped).ok();

    match player {
        Some(p) => {
            writeln!(out, "Player:").ok();
            writeln!(out, "  mode: {:?}", p.controller.mode).ok();
            writeln!(out, "  can switch modes: {}", p.controller.can_switch_modes).ok();
            writeln!(out, "  position: ({:.3}, {:.3}, {:.3})", p.position.x, p.position.y, p.position.z).ok();
            writeln!(out, "  velocity: ({:.3}, {:.3}, {:.3})", p.velocity.x, p.velocity.y, p.velocity.z).ok();
            writeln!(out, "  gravity: {}", p.use_gravity).ok();
            match p.controller.snapshot() {
                Some(v) => writeln!(out, "  frozen velocity: ({:.3}, {:.3}, {:.3})", v.x, v.y, v.z).ok(),
                None => writeln!(out, "  frozen velocity: none").ok(),
            };
            if let Some(t) = &p.transition {
                writeln!(out, "  switching to {:?}, {:.3}s left", t.entering, t.remaining).ok();
            }
        }
        None => {
            writeln!(out, "Player: (none)").ok();
        }
    }

    writeln!(out, "Platforms: {}", platforms.len()).ok();
    for (i, p) in platforms.iter().enumerate() {
        writeln!(
            out,
            "  #{i} {:?} at ({:.3}, {:.3}, {:.3}) -> ({:.3}, {:.3}, {:.3}), rest y {:.3}",
            p.platform.state,
            p.position.x,
            p.position.y,
            p.position.z,
            p.platform.target_position.x,
            p.platform.target_position.y,
            p.platform.target_position.z,
            p.platform.original_position.y,
        )
        .ok();
    }
    out
}

/// Listens for the dump key and writes a dump file.
#[allow(clippy::needless_pass_by_value, clippy::type_complexity)]
fn debug_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    keybinds: Res<Keybinds>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    clock: Res<TimeState>,
    query_entities: Query<Entity>,
    player: Query<(&Transform, &Body, &PlayerController, Option<&ModeTransition>), With<Player>>,
    platforms: Query<(&Transform, &Platform)>,
) {
    if !keybinds.just_pressed(Action::DumpDebug, &keys) {
        return;
    }

    let now: DateTime<Utc> = Utc::now();
    let ts_secs = now.timestamp();
    let human_ts = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let fname = format!("{DUMP_DIR}/debug-{ts_secs}.txt");

    let smoothed = |key: &DiagnosticPath| {
        diagnostics
            .as_ref()
            .and_then(|d| d.get(key))
            .and_then(Diagnostic::smoothed)
            .unwrap_or(0.0)
    };
    let fps = smoothed(&FrameTimeDiagnosticsPlugin::FPS);
    let frame_time = smoothed(&FrameTimeDiagnosticsPlugin::FRAME_TIME);

    let mut sys = System::new_all();
    sys.refresh_all();
    let proc = sys.process(Pid::from(std::process::id() as usize));
    let proc_mem = proc.map(|p| p.memory()).unwrap_or(0);
    let proc_virt = proc.map(|p| p.virtual_memory()).unwrap_or(0);

    let player = player.get_single().ok().map(|(t, body, controller, transition)| PlayerSnapshot {
        position: t.translation,
        velocity: body.velocity,
        use_gravity: body.use_gravity,
        controller: controller.clone(),
        transition: transition.copied(),
    });
    let platforms: Vec<_> = platforms
        .iter()
        .map(|(t, p)| PlatformSnapshot { position: t.translation, platform: p.clone() })
        .collect();

    let mut out = String::new();
    writeln!(out, "Debug dump: {ts_secs}").ok();
    writeln!(out, "Timestamp: {human_ts} (epoch secs: {ts_secs})").ok();
    writeln!(out, "FPS: {:.1}, frame_time: {:.4} ms", fps, frame_time).ok();
    writeln!(out, "Entities: {}", query_entities.iter().count()).ok();
    writeln!(out, "Process memory: {} (virtual {})", bytes_to_mb(proc_mem), bytes_to_mb(proc_virt)).ok();
    writeln!(out).ok();
    out.push_str(&format_state(&clock, player.as_ref(), &platforms));

    if let Err(e) = fs::create_dir_all(DUMP_DIR) {
        error!("debug dump: failed to create dir '{DUMP_DIR}': {e}");
        return;
    }
    if let Err(e) = fs::write(&fname, out) {
        error!("debug dump: failed to write {fname}: {e}");
    } else {
        info!("wrote debug dump: {fname}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MovementMode;

    #[test]
    fn state_lists_player_and_platforms() {
        let mut controller = PlayerController::default();
        controller.mode = MovementMode::TopDown;
        let player = PlayerSnapshot {
            position: Vec3::new(1.0, 0.5, 0.0),
            velocity: Vec3::ZERO,
            use_gravity: false,
            controller,
            transition: Some(ModeTransition::new(MovementMode::TopDown, 0.25)),
        };
        let mut platform = Platform::new(Vec3::new(3.0, 2.0, 0.0));
        platform.lower(0.0, 0.5);
        let platforms = [PlatformSnapshot { position: Vec3::new(3.0, 2.0, 0.0), platform }];

        let text = format_state(&TimeState { stopped: true }, Some(&player), &platforms);

        assert!(text.contains("Time stopped: true"));
        assert!(text.contains("mode: TopDown"));
        assert!(text.contains("switching to TopDown, 0.250s left"));
        assert!(text.contains("Platforms: 1"));
        assert!(text.contains("#0 Moving"));
    }

    #[test]
    fn state_without_player() {
        let text = format_state(&TimeState::default(), None, &[]);
        assert!(text.contains("Player: (none)"));
        assert!(text.contains("Platforms: 0"));
    }

    #[test]
    fn memory_is_reported_in_megabytes() {
        assert_eq!(bytes_to_mb(2 * 1024 * 1024), "2.00 MB");
    }
}
