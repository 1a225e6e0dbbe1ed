use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowPlugin};
use planeshift::camera::follow_player;
use planeshift::debug::DebugDumpPlugin;
use planeshift::plugin::PlaneshiftPlugin;
use planeshift::settings::loader as settings_loader;
use planeshift::ui::{
    render_collider_gizmos, setup_debug_overlay, spawn_debug_overlay, toggle_collider_gizmos,
    toggle_debug_overlay, update_debug_overlay,
};

mod app;
use app::{present_mode, setup, sync_vsync_settings, tint_player_by_mode};

fn main() {
    let settings = settings_loader::load_settings_from_dir(settings_loader::SETTINGS_DIR);
    let settings_watcher = settings_loader::setup_settings_watcher(settings_loader::SETTINGS_DIR)
        .unwrap_or_else(|e| {
            eprintln!("settings hot reload disabled: {e}");
            settings_loader::SettingsWatcher::stub()
        });

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "planeshift".into(),
            position: WindowPosition::Centered(MonitorSelection::Primary),
            present_mode: present_mode(settings.graphics.vsync),
            ..default()
        }),
        ..default()
    }))
    .add_plugins(FrameTimeDiagnosticsPlugin);

    // Settings go in first: the core plugin reads the tick rate from them.
    app.insert_resource(settings);
    app.insert_resource(settings_watcher);
    app.add_plugins(PlaneshiftPlugin).add_plugins(DebugDumpPlugin);

    app.add_systems(Startup, (setup_debug_overlay, spawn_debug_overlay, setup));
    app.add_systems(
        Update,
        (
            settings_loader::check_settings_changes,
            sync_vsync_settings,
            follow_player,
            tint_player_by_mode,
            toggle_debug_overlay,
            toggle_collider_gizmos,
            update_debug_overlay,
            render_collider_gizmos,
        ),
    );

    app.run();
}
