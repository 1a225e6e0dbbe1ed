//! The player and its two movement modes.
//!
//! In side-scroll mode the player runs along X and can jump; in top-down
//! mode they move on the X/Z plane and cannot. Switching freezes the
//! player's body, sinks or raises the platforms and, once the switch has
//! played out, re-seats the player on whatever is beneath them.
//!
//! The per-tick logic lives in plain functions over a [`TickContext`] so
//! it can be driven without an `App`:
//!
//! ```
//! use bevy::math::Vec3;
//! use planeshift::physics::{Body, ColliderWorld};
//! use planeshift::player::{MovementMode, PlayerController, PlayerInput, TickContext, run_tick};
//! use planeshift::settings::Settings;
//! use planeshift::time::TimeState;
//!
//! let world = ColliderWorld::new();
//! let settings = Settings::default();
//! let mut controller = PlayerController::default();
//! let mut body = Body::new(Vec3::splat(0.5));
//! let mut clock = TimeState::default();
//! let input = PlayerInput { enter_top_down: true, ..Default::default() };
//!
//! let mut ctx = TickContext::new(&mut controller, &mut body, Vec3::ZERO, input, &mut clock, &world, &settings, 0.02);
//! run_tick(&mut ctx);
//! assert_eq!(controller.mode, MovementMode::TopDown);
//! assert!(clock.stopped);
//! ```

pub mod freeze;
pub mod input;
pub mod movement;
pub mod probes;
pub mod tick;
pub mod transition;

pub use input::*;
pub use movement::*;
pub use probes::*;
pub use tick::*;
pub use transition::*;

use bevy::prelude::*;

/// Marks the entity driven by keyboard input.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// The player's current movement scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    #[default]
    SideScroll,
    TopDown,
}

impl MovementMode {
    /// Animator flags describing this mode.
    #[must_use]
    pub fn animator_flags(self) -> AnimatorFlags {
        AnimatorFlags {
            in_top_down: self == MovementMode::TopDown,
            in_side_scroll: self == MovementMode::SideScroll,
        }
    }
}

/// Boolean flags mirrored to whatever animates the mode change.
///
/// Always derived from [`MovementMode`]; never written on its own.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimatorFlags {
    pub in_top_down: bool,
    pub in_side_scroll: bool,
}

impl From<MovementMode> for AnimatorFlags {
    fn from(mode: MovementMode) -> Self {
        mode.animator_flags()
    }
}

impl Default for AnimatorFlags {
    fn default() -> Self {
        MovementMode::default().animator_flags()
    }
}

/// Mode state of the player entity.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PlayerController {
    pub mode: MovementMode,
    /// Result of this tick's eligibility probe.
    pub can_switch_modes: bool,
    /// Offset of the collision anchor from the entity's translation. Probes
    /// start at the anchor.
    pub anchor_offset: Vec3,
    /// Velocity captured by the last freeze, consumed by the next unfreeze.
    snapshot: Option<Vec3>,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            mode: MovementMode::SideScroll,
            can_switch_modes: true,
            anchor_offset: Vec3::ZERO,
            snapshot: None,
        }
    }
}

impl PlayerController {
    #[must_use]
    pub fn with_anchor_offset(mut self, offset: Vec3) -> Self {
        self.anchor_offset = offset;
        self
    }

    /// World position of the collision anchor for a player at `position`.
    #[must_use]
    pub fn anchor(&self, position: Vec3) -> Vec3 {
        position + self.anchor_offset
    }

    /// Velocity stored by the pending freeze, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec3> {
        self.snapshot
    }
}
