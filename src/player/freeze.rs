//! Freezing the player's own clock.
//!
//! Only the player body stops; platforms and every other body keep
//! simulating, which is why this does not touch Bevy's time scale.

use super::PlayerController;
use crate::physics::Body;
use crate::time::TimeState;
use bevy::prelude::*;

impl PlayerController {
    /// Stop the player in place, remembering their velocity.
    ///
    /// Does nothing if the clock is already stopped, so a second freeze
    /// cannot overwrite the stored velocity with zero. Returns whether the
    /// call froze the player.
    pub fn freeze(&mut self, body: &mut Body, time: &mut TimeState) -> bool {
        if time.stopped {
            return false;
        }
        self.snapshot = Some(body.velocity);
        body.velocity = Vec3::ZERO;
        body.use_gravity = false;
        time.stopped = true;
        true
    }

    /// Resume the player with the velocity captured by [`freeze`].
    ///
    /// A no-op while the clock is running. The snapshot is consumed; if
    /// none was stored the player resumes from rest.
    ///
    /// [`freeze`]: PlayerController::freeze
    pub fn unfreeze(&mut self, body: &mut Body, time: &mut TimeState) -> bool {
        if !time.stopped {
            return false;
        }
        body.velocity = self.snapshot.take().unwrap_or(Vec3::ZERO);
        body.use_gravity = true;
        time.stopped = false;
        true
    }
}
