//! Settings loading and hot-reloading.
//!
//! Settings are loaded from RON files in the `data/settings` directory. If multiple
//! RON files are present, the first one (by file name) that parses is used.
//! If no RON files are found or none parse, default settings are used.
use crate::ron_loader::{load_ron_files, setup_ron_watcher};
use crate::settings::Settings;
use bevy::prelude::{Res, ResMut, Resource, info};

/// Directory the game reads its settings from.
pub const SETTINGS_DIR: &str = "data/settings";

#[derive(Resource)]
pub struct SettingsWatcher(pub crate::ron::RonWatcher);

/// Load settings from `path` (directory), falling back to `Settings::defaults()`.
///
/// # Example
/// ```
/// let settings = planeshift::settings::loader::load_settings_from_dir("data/settings");
/// assert!(settings.probes.eligibility_distance > 0.0);
/// ```
#[must_use]
pub fn load_settings_from_dir(path: &str) -> Settings {
    let items: Vec<Settings> = load_ron_files(path);
    items.into_iter().next().unwrap_or_else(|| {
        info!("no settings found in {path}; using defaults");
        Settings::defaults()
    })
}

/// Create a watcher for the settings directory (hot-reload).
///
/// # Errors
/// Propagates the `notify::Error` raised when the directory cannot be watched.
pub fn setup_settings_watcher(path: &str) -> Result<SettingsWatcher, notify::Error> {
    setup_ron_watcher(path).map(SettingsWatcher)
}

/// Check for changes and reload the settings resource when files change.
///
/// # Example
/// ```ignore
/// app.add_systems(Update, planeshift::settings::loader::check_settings_changes);
/// ```
#[allow(clippy::needless_pass_by_value)]
pub fn check_settings_changes(watcher: Res<SettingsWatcher>, mut settings: ResMut<Settings>) {
    if watcher.0.take_changed() {
        info!("settings changed, reloading");
        *settings = load_settings_from_dir(SETTINGS_DIR);
    }
}

impl SettingsWatcher {
    #[must_use]
    pub fn stub() -> Self {
        SettingsWatcher(crate::ron::RonWatcher::stub())
    }
}
