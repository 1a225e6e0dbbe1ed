//! Keyboard bindings and the per-tick input snapshot.
//!
//! Input is polled, not queued: each fixed tick the controller sees which
//! bound keys are held at that moment.

use crate::settings::{ControlsSettings, Settings};
use bevy::prelude::*;
use std::collections::HashMap;

/// Every action a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Forward,
    Back,
    Jump,
    TopDown,
    SideScroll,
    ToggleDebug,
    ToggleGizmos,
    DumpDebug,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Left,
        Action::Right,
        Action::Forward,
        Action::Back,
        Action::Jump,
        Action::TopDown,
        Action::SideScroll,
        Action::ToggleDebug,
        Action::ToggleGizmos,
        Action::DumpDebug,
    ];

    /// Key used for this action in `controls.keybinds`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Forward => "forward",
            Action::Back => "back",
            Action::Jump => "jump",
            Action::TopDown => "top_down",
            Action::SideScroll => "side_scroll",
            Action::ToggleDebug => "toggle_debug",
            Action::ToggleGizmos => "toggle_gizmos",
            Action::DumpDebug => "dump_debug",
        }
    }
}

/// Key codes resolved from the settings' key names.
#[derive(Resource, Debug, Clone)]
pub struct Keybinds {
    keys: HashMap<Action, Vec<KeyCode>>,
}

impl Keybinds {
    /// Resolve every action's key names. Unknown names are dropped with a
    /// warning rather than failing the whole binding set.
    #[must_use]
    pub fn from_settings(controls: &ControlsSettings) -> Self {
        let keys = Action::ALL
            .into_iter()
            .map(|action| {
                let codes = controls
                    .keys_for(action.name())
                    .iter()
                    .filter_map(|name| {
                        let code = Settings::keycode_from_str(name);
                        if code.is_none() {
                            warn!("unknown key {name:?} bound to {}", action.name());
                        }
                        code
                    })
                    .collect();
                (action, codes)
            })
            .collect();
        Self { keys }
    }

    #[must_use]
    pub fn keys(&self, action: Action) -> &[KeyCode] {
        self.keys.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn pressed(&self, action: Action, input: &ButtonInput<KeyCode>) -> bool {
        input.any_pressed(self.keys(action).iter().copied())
    }

    #[must_use]
    pub fn just_pressed(&self, action: Action, input: &ButtonInput<KeyCode>) -> bool {
        input.any_just_pressed(self.keys(action).iter().copied())
    }
}

impl Default for Keybinds {
    fn default() -> Self {
        Self::from_settings(&ControlsSettings::default())
    }
}

/// Which gameplay actions are held this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub forward: bool,
    pub back: bool,
    pub jump: bool,
    pub enter_top_down: bool,
    pub enter_side_scroll: bool,
}

impl PlayerInput {
    #[must_use]
    pub fn poll(keybinds: &Keybinds, input: &ButtonInput<KeyCode>) -> Self {
        Self {
            left: keybinds.pressed(Action::Left, input),
            right: keybinds.pressed(Action::Right, input),
            forward: keybinds.pressed(Action::Forward, input),
            back: keybinds.pressed(Action::Back, input),
            jump: keybinds.pressed(Action::Jump, input),
            enter_top_down: keybinds.pressed(Action::TopDown, input),
            enter_side_scroll: keybinds.pressed(Action::SideScroll, input),
        }
    }
}

/// Re-resolve key codes after the settings were (re)loaded.
#[allow(clippy::needless_pass_by_value)]
pub fn refresh_keybinds(settings: Res<Settings>, mut keybinds: ResMut<Keybinds>) {
    if settings.is_changed() {
        *keybinds = Keybinds::from_settings(&settings.controls);
    }
}
