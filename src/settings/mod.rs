//! Settings, types and defaults.
//!
//! Settings are stored as a RON file under `data/settings/` and are hot-reloadable
//! using the RON watcher utilities (see `ron::setup_ron_watcher`). Every field
//! has a serde default, so a settings file only needs the values it changes.
use bevy::prelude::{KeyCode, Resource};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsSettings {
    #[serde(default = "GraphicsSettings::default_vsync")]
    pub vsync: bool, // Enable vertical sync to cap FPS to the display refresh rate.
}

impl GraphicsSettings {
    fn default_vsync() -> bool { true }
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self { vsync: Self::default_vsync() }
    }
}

/// Controls / input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlsSettings {
    #[serde(default = "ControlsSettings::default_keybinds")]
    pub keybinds: HashMap<String, Vec<String>>, // Map of action names to the keys that trigger them
}

impl ControlsSettings {
    fn default_keybinds() -> HashMap<String, Vec<String>> {
        let binds: [(&str, &[&str]); 10] = [
            ("left", &["Left", "A"]),
            ("right", &["Right", "D"]),
            ("forward", &["Up", "W"]),
            ("back", &["Down", "S"]),
            ("jump", &["Space"]),
            ("top_down", &["Z"]),
            ("side_scroll", &["X"]),
            ("toggle_debug", &["F1"]),
            ("toggle_gizmos", &["F2"]),
            ("dump_debug", &["F3"]),
        ];
        binds
            .into_iter()
            .map(|(action, keys)| (action.to_string(), keys.iter().map(|k| (*k).to_string()).collect()))
            .collect()
    }

    /// Key names bound to `action`, falling back to the built-in binding
    /// when the settings file does not mention it.
    #[must_use]
    pub fn keys_for(&self, action: &str) -> Vec<String> {
        self.keybinds
            .get(action)
            .cloned()
            .or_else(|| Self::default_keybinds().remove(action))
            .unwrap_or_default()
    }
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { keybinds: Self::default_keybinds() }
    }
}

/// How directional input turns into body motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementVariant {
    /// Keys add acceleration and damp the cross axis; speed is clamped.
    #[default]
    Force,
    /// Keys assign axis velocity directly; releasing every key stops the player.
    VelocitySet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    #[serde(default)]
    pub variant: MovementVariant, // Force (accelerate + clamp) or velocity_set (assign speed directly).
    #[serde(default = "MovementSettings::default_move_force")]
    pub move_force: f32, // Acceleration applied per held key by the force variant (units/s^2).
    #[serde(default = "MovementSettings::default_move_speed")]
    pub move_speed: f32, // Axis speed assigned by the velocity_set variant (units/s).
    #[serde(default = "MovementSettings::default_max_speed")]
    pub max_speed: f32, // Per-axis horizontal speed cap for the force variant.
    #[serde(default = "MovementSettings::default_jump_speed")]
    pub jump_speed: f32, // Upward speed given by a jump.
    #[serde(default = "MovementSettings::default_gate_switch")]
    pub gate_switch_on_platform: bool, // Refuse mode switches over impassable / blocked-tier platforms.
}

impl MovementSettings {
    fn default_move_force() -> f32 { 40.0 }
    fn default_move_speed() -> f32 { 6.0 }
    fn default_max_speed() -> f32 { 6.0 }
    fn default_jump_speed() -> f32 { 7.0 }
    fn default_gate_switch() -> bool { true }
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            variant: MovementVariant::default(),
            move_force: Self::default_move_force(),
            move_speed: Self::default_move_speed(),
            max_speed: Self::default_max_speed(),
            jump_speed: Self::default_jump_speed(),
            gate_switch_on_platform: Self::default_gate_switch(),
        }
    }
}

/// Ranges and sizes of the downward probes the player runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    #[serde(default = "ProbeSettings::default_eligibility_distance")]
    pub eligibility_distance: f32, // How far below the player platforms can block a mode switch.
    #[serde(default = "ProbeSettings::default_ground_snap_distance")]
    pub ground_snap_distance: f32, // Range of the snap-to-ground probe.
    #[serde(default = "ProbeSettings::default_platform_snap_distance")]
    pub platform_snap_distance: f32, // Range of the snap-to-platform probe.
    #[serde(default = "ProbeSettings::default_ground_probe_radius")]
    pub ground_probe_radius: f32, // Radius of the grounded sphere probe.
    #[serde(default = "ProbeSettings::default_ground_probe_distance")]
    pub ground_probe_distance: f32, // Length of the grounded sphere probe.
    #[serde(default = "ProbeSettings::default_blocked_tier")]
    pub blocked_tier: String, // Passable platform tier that blocks mode switches.
}

impl ProbeSettings {
    fn default_eligibility_distance() -> f32 { 10.0 }
    fn default_ground_snap_distance() -> f32 { 10.0 }
    fn default_platform_snap_distance() -> f32 { 3.0 }
    fn default_ground_probe_radius() -> f32 { 0.4 }
    fn default_ground_probe_distance() -> f32 { 0.07 }
    fn default_blocked_tier() -> String { "6".to_string() }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            eligibility_distance: Self::default_eligibility_distance(),
            ground_snap_distance: Self::default_ground_snap_distance(),
            platform_snap_distance: Self::default_platform_snap_distance(),
            ground_probe_radius: Self::default_ground_probe_radius(),
            ground_probe_distance: Self::default_ground_probe_distance(),
            blocked_tier: Self::default_blocked_tier(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    #[serde(default = "PlatformSettings::default_smooth_time")]
    pub smooth_time: f32, // Approximate seconds a platform takes to settle on its target.
    #[serde(default = "PlatformSettings::default_arrival_epsilon")]
    pub arrival_epsilon: f32, // Distance at which a platform counts as arrived (0 = exact equality).
}

impl PlatformSettings {
    fn default_smooth_time() -> f32 { 0.05 }
    fn default_arrival_epsilon() -> f32 { 1e-3 }
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            smooth_time: Self::default_smooth_time(),
            arrival_epsilon: Self::default_arrival_epsilon(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSettings {
    #[serde(default = "TransitionSettings::default_duration")]
    pub duration_secs: f32, // How long the player stays frozen after a mode switch.
}

impl TransitionSettings {
    fn default_duration() -> f32 { 0.5 }
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self { duration_secs: Self::default_duration() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsSettings {
    #[serde(default = "PhysicsSettings::default_gravity")]
    pub gravity: f32, // Vertical acceleration applied to bodies using gravity.
    #[serde(default = "PhysicsSettings::default_ground_friction")]
    pub ground_friction: f32, // Horizontal deceleration of a body resting on a surface (units/s^2).
    #[serde(default = "PhysicsSettings::default_tick_hz")]
    pub tick_hz: f64, // Fixed simulation rate (requires a restart).
}

impl PhysicsSettings {
    fn default_gravity() -> f32 { -9.81 }
    fn default_ground_friction() -> f32 { 20.0 }
    fn default_tick_hz() -> f64 { 50.0 }
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            ground_friction: Self::default_ground_friction(),
            tick_hz: Self::default_tick_hz(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    #[serde(default = "CameraSettings::default_distance")]
    pub distance_from_player: f32, // Side-scroll distance between camera and player.
    #[serde(default = "CameraSettings::default_top_down_height")]
    pub top_down_height: f32, // Height of the camera above the player in top-down mode.
    #[serde(default = "CameraSettings::default_follow_sharpness")]
    pub follow_sharpness: f32, // How quickly the camera catches up with its target pose.
}

impl CameraSettings {
    fn default_distance() -> f32 { 12.0 }
    fn default_top_down_height() -> f32 { 16.0 }
    fn default_follow_sharpness() -> f32 { 8.0 }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            distance_from_player: Self::default_distance(),
            top_down_height: Self::default_top_down_height(),
            follow_sharpness: Self::default_follow_sharpness(),
        }
    }
}

/// Top-level Settings
#[derive(Resource, Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub graphics: GraphicsSettings,
    #[serde(default)]
    pub controls: ControlsSettings,
    #[serde(default)]
    pub movement: MovementSettings,
    #[serde(default)]
    pub probes: ProbeSettings,
    #[serde(default)]
    pub platforms: PlatformSettings,
    #[serde(default)]
    pub transition: TransitionSettings,
    #[serde(default)]
    pub physics: PhysicsSettings,
    #[serde(default)]
    pub camera: CameraSettings,
}

impl Settings {
    #[must_use]
    pub fn defaults() -> Self { Settings::default() }

    /// Describe each setting field so users know what changing it does.
    ///
    /// # Return
    /// A nested `HashMap` where the first level keys are section names (e.g. "movement")
    /// and the second level maps setting field names to their descriptions.
    #[must_use]
    pub fn field_descriptions() -> HashMap<&'static str, HashMap<&'static str, &'static str>> {
        let sections: [(&str, &[(&str, &str)]); 8] = [
            ("graphics", &[
                ("vsync", "Enable vertical sync to cap FPS to the display refresh rate."),
            ]),
            ("controls", &[
                ("keybinds", "Map of action names (left, right, forward, back, jump, top_down, side_scroll, toggle_debug, toggle_gizmos, dump_debug) to lists of key names."),
            ]),
            ("movement", &[
                ("variant", "force: keys accelerate the player and speed is clamped; velocity_set: keys set speed directly."),
                ("move_force", "Acceleration applied per held direction key by the force variant."),
                ("move_speed", "Speed assigned per held direction key by the velocity_set variant."),
                ("max_speed", "Per-axis horizontal speed cap used by the force variant."),
                ("jump_speed", "Upward speed given by a jump (side-scroll only, must be grounded)."),
                ("gate_switch_on_platform", "Refuse mode switches while above impassable or blocked-tier platforms."),
            ]),
            ("probes", &[
                ("eligibility_distance", "How far below the player a platform can block a mode switch."),
                ("ground_snap_distance", "Range of the probe that snaps the player onto the ground."),
                ("platform_snap_distance", "Range of the probe that lifts the player onto a platform."),
                ("ground_probe_radius", "Radius of the sphere used to decide whether the player is grounded."),
                ("ground_probe_distance", "How far the grounded sphere is swept downward."),
                ("blocked_tier", "Tier of passable platforms that blocks mode switches (trailing digits of the group name)."),
            ]),
            ("platforms", &[
                ("smooth_time", "Approximate seconds a platform takes to reach its new height."),
                ("arrival_epsilon", "Distance at which a moving platform counts as arrived; 0 requires exact equality."),
            ]),
            ("transition", &[
                ("duration_secs", "Seconds the player stays frozen after switching modes."),
            ]),
            ("physics", &[
                ("gravity", "Vertical acceleration applied to bodies (negative is down)."),
                ("ground_friction", "Horizontal deceleration applied to bodies standing on a surface; 0 disables it."),
                ("tick_hz", "Fixed simulation rate in ticks per second (restart required)."),
            ]),
            ("camera", &[
                ("distance_from_player", "Distance of the side-scroll camera from the player."),
                ("top_down_height", "Height of the top-down camera above the player."),
                ("follow_sharpness", "How quickly the camera eases toward its target pose."),
            ]),
        ];

        sections
            .into_iter()
            .map(|(section, fields)| (section, fields.iter().copied().collect()))
            .collect()
    }

    /// Convert a string key identifier (e.g., from `controls.keybinds`) into a `KeyCode` that
    /// can be used with Bevy's input system.
    ///
    /// # Arguments
    /// * `name` - The string key identifier to convert (e.g., "W", "Space", "F1").
    ///
    /// # Returns
    /// An `Option<KeyCode>` corresponding to the provided string, or `None` if the string
    /// does not match any known key.
    #[must_use]
    pub fn keycode_from_str(name: &str) -> Option<KeyCode> {
        const LETTERS: [KeyCode; 26] = [
            KeyCode::KeyA, KeyCode::KeyB, KeyCode::KeyC, KeyCode::KeyD, KeyCode::KeyE,
            KeyCode::KeyF, KeyCode::KeyG, KeyCode::KeyH, KeyCode::KeyI, KeyCode::KeyJ,
            KeyCode::KeyK, KeyCode::KeyL, KeyCode::KeyM, KeyCode::KeyN, KeyCode::KeyO,
            KeyCode::KeyP, KeyCode::KeyQ, KeyCode::KeyR, KeyCode::KeyS, KeyCode::KeyT,
            KeyCode::KeyU, KeyCode::KeyV, KeyCode::KeyW, KeyCode::KeyX, KeyCode::KeyY,
            KeyCode::KeyZ,
        ];
        const DIGITS: [KeyCode; 10] = [
            KeyCode::Digit0, KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4,
            KeyCode::Digit5, KeyCode::Digit6, KeyCode::Digit7, KeyCode::Digit8, KeyCode::Digit9,
        ];
        const FUNCTION: [KeyCode; 12] = [
            KeyCode::F1, KeyCode::F2, KeyCode::F3, KeyCode::F4, KeyCode::F5, KeyCode::F6,
            KeyCode::F7, KeyCode::F8, KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12,
        ];

        let s = name.trim().to_ascii_uppercase();
        if let [c] = s.as_bytes() {
            return match c {
                b'A'..=b'Z' => Some(LETTERS[usize::from(c - b'A')]),
                b'0'..=b'9' => Some(DIGITS[usize::from(c - b'0')]),
                _ => None,
            };
        }
        if let Some(n) = s.strip_prefix('F').and_then(|n| n.parse::<usize>().ok()) {
            return n.checked_sub(1).and_then(|i| FUNCTION.get(i)).copied();
        }

        Some(match s.as_str() {
            // Arrows / navigation
            "LEFT" | "ARROWLEFT" => KeyCode::ArrowLeft,
            "RIGHT" | "ARROWRIGHT" => KeyCode::ArrowRight,
            "UP" | "ARROWUP" => KeyCode::ArrowUp,
            "DOWN" | "ARROWDOWN" => KeyCode::ArrowDown,
            "HOME" => KeyCode::Home,
            "END" => KeyCode::End,
            "PAGEUP" => KeyCode::PageUp,
            "PAGEDOWN" => KeyCode::PageDown,

            // Whitespace / control
            "ESC" | "ESCAPE" => KeyCode::Escape,
            "SPACE" => KeyCode::Space,
            "TAB" => KeyCode::Tab,
            "ENTER" | "RETURN" => KeyCode::Enter,
            "BACKSPACE" => KeyCode::Backspace,

            // Modifiers
            "LSHIFT" | "SHIFT" => KeyCode::ShiftLeft,
            "RSHIFT" => KeyCode::ShiftRight,
            "LCTRL" | "CTRL" | "CONTROL" => KeyCode::ControlLeft,
            "RCTRL" => KeyCode::ControlRight,
            "LALT" | "ALT" => KeyCode::AltLeft,
            "RALT" => KeyCode::AltRight,

            // Numpad
            "NUMPAD0" => KeyCode::Numpad0,
            "NUMPAD1" => KeyCode::Numpad1,
            "NUMPAD2" => KeyCode::Numpad2,
            "NUMPAD3" => KeyCode::Numpad3,
            "NUMPAD4" => KeyCode::Numpad4,
            "NUMPAD5" => KeyCode::Numpad5,
            "NUMPAD6" => KeyCode::Numpad6,
            "NUMPAD7" => KeyCode::Numpad7,
            "NUMPAD8" => KeyCode::Numpad8,
            "NUMPAD9" => KeyCode::Numpad9,

            // Punctuation
            "," | "COMMA" => KeyCode::Comma,
            "." | "PERIOD" => KeyCode::Period,
            "/" | "SLASH" => KeyCode::Slash,
            ";" | "SEMICOLON" => KeyCode::Semicolon,

            _ => return None,
        })
    }
}

pub mod loader;
