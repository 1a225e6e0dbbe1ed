//! The player's clock.
//!
//! Switching movement modes freezes the player body while the rest of the
//! level keeps simulating, so this is a flag rather than a change to Bevy's
//! virtual time scale.
use bevy::prelude::Resource;

/// Single authoritative "is the player's clock frozen" flag.
///
/// Only `PlayerController::freeze` and `PlayerController::unfreeze` write
/// it; everything else reads.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeState {
    pub stopped: bool,
}
