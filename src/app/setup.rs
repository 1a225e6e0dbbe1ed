//! Startup system building the test level.
//!
//! A long ground slab, a staircase of passable platforms in groups
//! `Tier1` to `Tier6`, one impassable platform, the player, the follow
//! camera and lights.
use bevy::prelude::*;
use planeshift::camera::{FollowCamera, LevelCentre, camera_pose};
use planeshift::physics::{Body, Collider, PhysicsLayer, SurfaceTag};
use planeshift::platform::Platform;
use planeshift::player::{AnimatorFlags, MovementMode, Player, PlayerController};
use planeshift::settings::Settings;

const GROUND_HALF: Vec3 = Vec3::new(40.0, 0.5, 6.0);
const PLATFORM_HALF: Vec3 = Vec3::new(1.25, 0.25, 1.5);
const PLAYER_HALF: Vec3 = Vec3::new(0.4, 0.5, 0.4);
const PLAYER_SPAWN: Vec3 = Vec3::new(-2.0, 0.5, 0.0);

/// Resting centre of the platform for `tier` (1-based): each tier sits a
/// step higher and further right than the last.
#[allow(clippy::cast_precision_loss)]
fn tier_position(tier: u32) -> Vec3 {
    Vec3::new(2.0 + tier as f32 * 3.5, 0.5 + tier as f32 * 0.75, 0.0)
}

#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    let level_centre = LevelCentre::default();
    commands.insert_resource(level_centre);

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::from_size(GROUND_HALF * 2.0)),
            material: materials.add(Color::srgb(0.35, 0.45, 0.3)),
            transform: Transform::from_xyz(0.0, -GROUND_HALF.y, 0.0),
            ..default()
        },
        Collider::cuboid(GROUND_HALF).on_layer(PhysicsLayer::Ground),
        Name::new("Ground"),
    ));

    let platform_mesh = meshes.add(Cuboid::from_size(PLATFORM_HALF * 2.0));
    let passable = materials.add(Color::srgb(0.3, 0.5, 0.9));
    let blocked = materials.add(Color::srgb(0.9, 0.6, 0.2));
    for tier in 1..=6 {
        let group = format!("Tier{tier}");
        let material = if planeshift::physics::group_tier(&group) == Some(settings.probes.blocked_tier.as_str()) {
            blocked.clone()
        } else {
            passable.clone()
        };
        let rest = tier_position(tier);
        commands.spawn((
            PbrBundle {
                mesh: platform_mesh.clone(),
                material,
                transform: Transform::from_translation(rest),
                ..default()
            },
            Collider::cuboid(PLATFORM_HALF)
                .on_layer(PhysicsLayer::Platform)
                .tagged(SurfaceTag::Passable)
                .in_group(group.clone()),
            Platform::new(rest),
            Name::new(group),
        ));
    }

    let wall = Vec3::new(-7.0, 1.25, 0.0);
    commands.spawn((
        PbrBundle {
            mesh: platform_mesh,
            material: materials.add(Color::srgb(0.8, 0.15, 0.15)),
            transform: Transform::from_translation(wall),
            ..default()
        },
        Collider::cuboid(PLATFORM_HALF)
            .on_layer(PhysicsLayer::Platform)
            .tagged(SurfaceTag::Impassable),
        Platform::new(wall),
        Name::new("Impassable"),
    ));

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Cuboid::from_size(PLAYER_HALF * 2.0)),
            material: materials.add(Color::WHITE),
            transform: Transform::from_translation(PLAYER_SPAWN),
            ..default()
        },
        Player,
        PlayerController::default(),
        Body::new(PLAYER_HALF),
        AnimatorFlags::default(),
        Name::new("Player"),
    ));

    commands.spawn((
        Camera3dBundle {
            transform: camera_pose(MovementMode::SideScroll, PLAYER_SPAWN, level_centre.0, &settings.camera),
            ..default()
        },
        FollowCamera,
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        transform: Transform::from_xyz(4.0, 12.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
    });
}
