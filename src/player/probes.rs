//! Downward probes: mode-switch eligibility, grounded check and the two
//! alignment snaps used when a mode switch completes.
//!
//! A probe that hits nothing is never an error. Eligibility defaults to
//! allowed, grounded to false, and the snaps leave the player where they are.

use super::PlayerController;
use crate::physics::{Body, LayerMask, PhysicsQuery, RayHit, SurfaceTag};
use crate::settings::ProbeSettings;
use bevy::prelude::*;

/// Whether the surface under the player allows a mode switch.
///
/// Impassable platforms always block. Passable ones block only when their
/// group's tier is `blocked_tier`.
///
/// ```
/// use planeshift::player::eligibility_from_hit;
/// assert!(eligibility_from_hit(None, "6"));
/// ```
#[must_use]
pub fn eligibility_from_hit(hit: Option<&RayHit>, blocked_tier: &str) -> bool {
    match hit {
        Some(hit) if hit.tag == SurfaceTag::Impassable => false,
        Some(hit) if hit.tag == SurfaceTag::Passable && hit.tier() == Some(blocked_tier) => false,
        _ => true,
    }
}

impl PlayerController {
    /// Cast down from the anchor against the platform layer and decide
    /// whether a switch is allowed from here.
    #[must_use]
    pub fn probe_eligibility(&self, position: Vec3, physics: &dyn PhysicsQuery, probes: &ProbeSettings) -> bool {
        let hit = physics.raycast(
            self.anchor(position),
            Vec3::NEG_Y,
            probes.eligibility_distance,
            LayerMask::PLATFORM,
        );
        eligibility_from_hit(hit.as_ref(), &probes.blocked_tier)
    }

    /// Whether the body is standing on ground or a platform.
    ///
    /// Sweeps a sphere down from one radius above the bottom of the body,
    /// measured from the anchor. Surfaces only touched from the side do
    /// not count.
    #[must_use]
    pub fn is_grounded(&self, position: Vec3, body: &Body, physics: &dyn PhysicsQuery, probes: &ProbeSettings) -> bool {
        let radius = probes.ground_probe_radius;
        let origin = self.anchor(position) - Vec3::Y * (body.half_extents.y - radius);
        physics.spherecast(
            origin,
            radius,
            Vec3::NEG_Y,
            probes.ground_probe_distance,
            LayerMask::GROUND | LayerMask::PLATFORM,
        )
    }

    /// Stand the player on the ground below them. Returns whether ground was
    /// found.
    pub fn snap_to_ground(
        &self,
        position: &mut Vec3,
        body: &Body,
        physics: &dyn PhysicsQuery,
        probes: &ProbeSettings,
    ) -> bool {
        let Some(hit) = physics.raycast(
            self.anchor(*position),
            Vec3::NEG_Y,
            probes.ground_snap_distance,
            LayerMask::GROUND,
        ) else {
            return false;
        };
        position.y = hit.surface_top + body.half_extents.y;
        true
    }

    /// Stand the player where the top of the platform below them will be
    /// once it is back at rest. Returns whether a platform was found.
    pub fn snap_to_platform_height(
        &self,
        position: &mut Vec3,
        body: &Body,
        physics: &dyn PhysicsQuery,
        probes: &ProbeSettings,
    ) -> bool {
        let Some(hit) = physics.raycast(
            self.anchor(*position),
            Vec3::NEG_Y,
            probes.platform_snap_distance,
            LayerMask::PLATFORM,
        ) else {
            return false;
        };
        position.y = hit.resting_top.unwrap_or(hit.surface_top) + body.half_extents.y;
        true
    }
}
