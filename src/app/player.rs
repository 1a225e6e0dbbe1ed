//! Player-related small systems.
use bevy::prelude::*;
use planeshift::player::{AnimatorFlags, Player};

const SIDE_SCROLL_TINT: Color = Color::srgb(1.0, 1.0, 1.0);
const TOP_DOWN_TINT: Color = Color::srgb(0.55, 0.85, 1.0);

/// Tint the player's material from its animator flags whenever they change.
#[allow(clippy::needless_pass_by_value)]
pub fn tint_player_by_mode(
    players: Query<(&AnimatorFlags, &Handle<StandardMaterial>), (With<Player>, Changed<AnimatorFlags>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (flags, handle) in &players {
        if let Some(material) = materials.get_mut(handle) {
            material.base_color = if flags.in_top_down { TOP_DOWN_TINT } else { SIDE_SCROLL_TINT };
        }
    }
}
