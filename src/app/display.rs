//! Display-related systems, such as syncing vsync
//! settings from the main `Settings` resource to the primary window's present mode.
use bevy::prelude::*;
use bevy::window::{PresentMode, PrimaryWindow};
use planeshift::settings::Settings;

/// Present mode matching the vsync preference.
pub fn present_mode(vsync: bool) -> PresentMode {
    if vsync { PresentMode::Fifo } else { PresentMode::AutoNoVsync }
}

/// Sync `Settings.graphics.vsync` into the present mode of the primary window
/// so vsync can be toggled by editing the settings file while running.
#[allow(clippy::needless_pass_by_value)]
pub fn sync_vsync_settings(
    settings: Res<Settings>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut last: Local<Option<bool>>,
) {
    let desired = settings.graphics.vsync;
    if *last == Some(desired) {
        return;
    }

    for mut w in &mut windows {
        w.present_mode = present_mode(desired);
    }
    *last = Some(desired);
}
