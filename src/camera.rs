//! Mode-aware follow camera.
//!
//! In side-scroll mode the camera sits `distance_from_player` away from the
//! player on the line from the level centre through the player, looking
//! back at them. In top-down mode it hovers `top_down_height` above the
//! player looking straight down.

use crate::player::{MovementMode, Player, PlayerController};
use crate::settings::{CameraSettings, Settings};
use bevy::prelude::*;

/// Marks the camera that follows the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FollowCamera;

/// Point the side-scroll camera looks away from.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct LevelCentre(pub Vec3);

impl Default for LevelCentre {
    fn default() -> Self {
        LevelCentre(Vec3::new(0.0, 0.0, -200.0))
    }
}

/// Where the camera wants to be for a player at `player` in `mode`.
///
/// ```
/// use bevy::math::Vec3;
/// use planeshift::camera::camera_pose;
/// use planeshift::player::MovementMode;
/// use planeshift::settings::CameraSettings;
///
/// let cfg = CameraSettings::default();
/// let pose = camera_pose(MovementMode::TopDown, Vec3::new(1.0, 0.5, 2.0), Vec3::ZERO, &cfg);
/// assert_eq!(pose.translation, Vec3::new(1.0, 0.5 + cfg.top_down_height, 2.0));
/// ```
#[must_use]
pub fn camera_pose(mode: MovementMode, player: Vec3, level_centre: Vec3, cfg: &CameraSettings) -> Transform {
    match mode {
        MovementMode::SideScroll => {
            let away = (player - level_centre).try_normalize().unwrap_or(Vec3::Z);
            Transform::from_translation(player + away * cfg.distance_from_player).looking_at(player, Vec3::Y)
        }
        MovementMode::TopDown => {
            Transform::from_translation(player + Vec3::Y * cfg.top_down_height).looking_at(player, Vec3::NEG_Z)
        }
    }
}

/// Move `current` part of the way toward `target`. A sharpness of zero or
/// less jumps straight there.
pub fn ease_toward(current: &mut Transform, target: &Transform, sharpness: f32, dt: f32) {
    let t = if sharpness > 0.0 { 1.0 - (-sharpness * dt).exp() } else { 1.0 };
    current.translation = current.translation.lerp(target.translation, t);
    current.rotation = current.rotation.slerp(target.rotation, t);
}

#[allow(clippy::needless_pass_by_value)]
pub fn follow_player(
    time: Res<Time>,
    settings: Res<Settings>,
    centre: Res<LevelCentre>,
    player: Query<(&Transform, &PlayerController), (With<Player>, Without<FollowCamera>)>,
    mut cameras: Query<&mut Transform, With<FollowCamera>>,
) {
    let Ok((player_transform, controller)) = player.get_single() else {
        return;
    };
    let target = camera_pose(controller.mode, player_transform.translation, centre.0, &settings.camera);
    for mut camera in &mut cameras {
        ease_toward(&mut camera, &target, settings.camera.follow_sharpness, time.delta_seconds());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_scroll_sits_on_the_far_side_of_the_player() {
        let cfg = CameraSettings::default();
        let pose = camera_pose(MovementMode::SideScroll, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -10.0), &cfg);

        assert!(pose.translation.abs_diff_eq(Vec3::new(0.0, 1.0, cfg.distance_from_player), 1e-5));
        assert!(pose.forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn side_scroll_falls_back_when_player_is_at_the_centre() {
        let cfg = CameraSettings::default();
        let pose = camera_pose(MovementMode::SideScroll, Vec3::ONE, Vec3::ONE, &cfg);
        assert!(pose.translation.abs_diff_eq(Vec3::ONE + Vec3::Z * cfg.distance_from_player, 1e-5));
    }

    #[test]
    fn top_down_looks_straight_down() {
        let cfg = CameraSettings::default();
        let pose = camera_pose(MovementMode::TopDown, Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0), &cfg);
        assert!(pose.forward().abs_diff_eq(Vec3::NEG_Y, 1e-5));
    }

    #[test]
    fn easing_converges() {
        let target = Transform::from_xyz(4.0, 2.0, 0.0);
        let mut camera = Transform::IDENTITY;
        for _ in 0..200 {
            ease_toward(&mut camera, &target, 8.0, 0.02);
        }
        assert!(camera.translation.abs_diff_eq(target.translation, 1e-3));

        let mut snapped = Transform::IDENTITY;
        ease_toward(&mut snapped, &target, 0.0, 0.02);
        assert_eq!(snapped.translation, target.translation);
    }
}
