//! Headless runs of the full fixed-tick pipeline.
//!
//! Each `app.update()` advances time by exactly one fixed step, so one
//! update is one tick of the gameplay core.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use planeshift::physics::{Body, Collider, PhysicsLayer, SurfaceTag};
use planeshift::platform::Platform;
use planeshift::player::{AnimatorFlags, ModeSwitched, ModeTransition, MovementMode, Player, PlayerController};
use planeshift::plugin::PlaneshiftPlugin;
use planeshift::settings::Settings;
use planeshift::time::TimeState;
use std::time::Duration;

const PLATFORM_HALF: Vec3 = Vec3::new(1.0, 0.25, 1.0);
const PLATFORM_REST: Vec3 = Vec3::new(4.0, 1.25, 0.0);
/// Enough ticks for a default-length switch and the platforms to settle.
const SETTLE_TICKS: usize = 60;

struct TestApp {
    app: App,
    player: Entity,
    platform: Entity,
}

impl TestApp {
    fn new(player_at: Vec3, platform_group: &str, platform_tag: SurfaceTag) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(Settings::default());
        app.add_plugins(PlaneshiftPlugin);
        let step = Duration::from_secs_f64(1.0 / Settings::default().physics.tick_hz);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(step));

        let world = app.world_mut();
        world.spawn((
            Transform::from_xyz(0.0, -0.5, 0.0),
            Collider::cuboid(Vec3::new(20.0, 0.5, 5.0)).on_layer(PhysicsLayer::Ground),
        ));
        let platform = world
            .spawn((
                Transform::from_translation(PLATFORM_REST),
                Collider::cuboid(PLATFORM_HALF)
                    .on_layer(PhysicsLayer::Platform)
                    .tagged(platform_tag)
                    .in_group(platform_group),
                Platform::new(PLATFORM_REST),
            ))
            .id();
        let player = world
            .spawn((
                Transform::from_translation(player_at),
                Player,
                PlayerController::default(),
                Body::new(Vec3::splat(0.5)),
                AnimatorFlags::default(),
            ))
            .id();

        // The first update only starts the clock.
        app.update();
        Self { app, player, platform }
    }

    fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Hold `key` for exactly one tick.
    fn tap(&mut self, key: KeyCode) {
        self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        self.app.update();
        self.app.world_mut().resource_mut::<ButtonInput<KeyCode>>().release(key);
    }

    fn controller(&self) -> &PlayerController {
        self.app.world().get::<PlayerController>(self.player).expect("player")
    }

    fn player_position(&self) -> Vec3 {
        self.app.world().get::<Transform>(self.player).expect("player").translation
    }

    fn platform_position(&self) -> Vec3 {
        self.app.world().get::<Transform>(self.platform).expect("platform").translation
    }

    fn stopped(&self) -> bool {
        self.app.world().resource::<TimeState>().stopped
    }

    fn transition(&self) -> Option<ModeTransition> {
        self.app.world().get::<ModeTransition>(self.player).copied()
    }
}

fn near(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn switching_to_top_down_freezes_then_lowers_platforms_and_releases() {
    let mut t = TestApp::new(Vec3::new(0.0, 0.5, 0.0), "Tier3", SurfaceTag::Passable);

    t.tap(KeyCode::KeyZ);

    assert_eq!(t.controller().mode, MovementMode::TopDown);
    assert!(t.stopped());
    assert!(t.transition().is_some());
    assert_eq!(
        *t.app.world().get::<AnimatorFlags>(t.player).expect("flags"),
        AnimatorFlags { in_top_down: true, in_side_scroll: false }
    );
    assert_eq!(t.app.world().resource::<Events<ModeSwitched>>().len(), 1);

    t.ticks(SETTLE_TICKS);

    assert!(!t.stopped());
    assert!(t.transition().is_none());
    assert!(near(t.player_position().y, 0.5), "player at {:?}", t.player_position());
    let platform = t.app.world().get::<Platform>(t.platform).expect("platform");
    assert!(platform.is_idle());
    assert!(near(t.platform_position().y, -PLATFORM_HALF.y), "platform at {:?}", t.platform_position());
}

#[test]
fn switching_back_raises_platforms() {
    let mut t = TestApp::new(Vec3::new(0.0, 0.5, 0.0), "Tier3", SurfaceTag::Passable);
    t.tap(KeyCode::KeyZ);
    t.ticks(SETTLE_TICKS);

    t.tap(KeyCode::KeyX);
    assert_eq!(t.controller().mode, MovementMode::SideScroll);
    assert!(t.stopped());

    t.ticks(SETTLE_TICKS);

    assert!(!t.stopped());
    assert!(near(t.platform_position().y, PLATFORM_REST.y));
}

#[test]
fn player_on_a_platform_rides_the_round_trip() {
    let on_platform = Vec3::new(PLATFORM_REST.x, PLATFORM_REST.y + PLATFORM_HALF.y + 0.5, 0.0);
    let mut t = TestApp::new(on_platform, "Tier3", SurfaceTag::Passable);

    t.tap(KeyCode::KeyZ);
    t.ticks(SETTLE_TICKS);
    assert!(near(t.player_position().y, 0.5), "player at {:?}", t.player_position());

    t.tap(KeyCode::KeyX);
    t.ticks(SETTLE_TICKS);
    assert_eq!(t.controller().mode, MovementMode::SideScroll);
    assert!(near(t.player_position().y, on_platform.y), "player at {:?}", t.player_position());
}

#[test]
fn blocked_tier_keeps_the_player_in_side_scroll() {
    let on_platform = Vec3::new(PLATFORM_REST.x, PLATFORM_REST.y + PLATFORM_HALF.y + 0.5, 0.0);
    let mut t = TestApp::new(on_platform, "Tier6", SurfaceTag::Passable);

    t.tap(KeyCode::KeyZ);

    assert!(!t.controller().can_switch_modes);
    assert_eq!(t.controller().mode, MovementMode::SideScroll);
    assert!(!t.stopped());
    assert!(t.transition().is_none());
}

#[test]
fn impassable_platform_blocks_switching() {
    let on_platform = Vec3::new(PLATFORM_REST.x, PLATFORM_REST.y + PLATFORM_HALF.y + 0.5, 0.0);
    let mut t = TestApp::new(on_platform, "Tier1", SurfaceTag::Impassable);

    t.tap(KeyCode::KeyZ);

    assert_eq!(t.controller().mode, MovementMode::SideScroll);
    assert!(!t.stopped());
}

#[test]
fn held_jump_leaves_the_ground_in_side_scroll() {
    let mut t = TestApp::new(Vec3::new(0.0, 0.5, 0.0), "Tier3", SurfaceTag::Passable);

    t.tap(KeyCode::Space);

    assert!(t.player_position().y > 0.5);
    assert!(t.app.world().get::<Body>(t.player).expect("body").velocity.y > 0.0);
}

#[test]
fn released_player_slows_to_a_stop() {
    let mut t = TestApp::new(Vec3::new(-4.0, 0.5, 0.0), "Tier3", SurfaceTag::Passable);

    t.app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(KeyCode::KeyD);
    t.ticks(10);
    t.app.world_mut().resource_mut::<ButtonInput<KeyCode>>().release(KeyCode::KeyD);
    assert!(t.app.world().get::<Body>(t.player).expect("body").velocity.x > 0.0);

    t.ticks(100);
    let resting = t.player_position();
    assert_eq!(t.app.world().get::<Body>(t.player).expect("body").velocity.x, 0.0);

    t.ticks(10);
    assert_eq!(t.player_position(), resting);
}
