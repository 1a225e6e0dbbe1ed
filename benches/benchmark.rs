use bevy::math::Vec3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use planeshift::camera::camera_pose;
use planeshift::physics::{body_step, Body, Collider, ColliderWorld, LayerMask, PhysicsLayer, PhysicsQuery, SurfaceTag};
use planeshift::platform::{smooth_damp, Platform};
use planeshift::player::{run_tick, MovementMode, PlayerController, PlayerInput, TickContext};
use planeshift::settings::Settings;
use planeshift::time::TimeState;

const DT: f32 = 0.02;

/// Ground plus a staircase of tiered platforms, roughly the demo level.
fn staircase(tiers: usize) -> ColliderWorld {
    let mut world = ColliderWorld::new();
    world.insert(
        Vec3::new(0.0, -0.5, 0.0),
        Collider::cuboid(Vec3::new(200.0, 0.5, 6.0)).on_layer(PhysicsLayer::Ground),
    );
    for i in 0..tiers {
        let rest = Vec3::new(2.0 + i as f32 * 3.5, 0.5 + (i % 6) as f32 * 0.75, 0.0);
        world.insert_platform(
            rest,
            rest,
            Collider::cuboid(Vec3::new(1.25, 0.25, 1.5))
                .on_layer(PhysicsLayer::Platform)
                .tagged(SurfaceTag::Passable)
                .in_group(format!("Tier{}", i % 6 + 1)),
        );
    }
    world
}

/// Downward eligibility-style rays sweeping across the level
fn bench_raycast_sweep(c: &mut Criterion) {
    let world = staircase(50);
    c.bench_function("raycast_sweep", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for i in 0..1_000usize {
                let origin = Vec3::new(i as f32 * 0.18, 8.0, 0.0);
                if world.raycast(black_box(origin), Vec3::NEG_Y, 10.0, LayerMask::PLATFORM).is_some() {
                    hits += 1;
                }
            }
            black_box(hits);
        })
    });
}

/// Short ground-check sphere casts, the per-tick jump probe
fn bench_spherecast_ground(c: &mut Criterion) {
    let world = staircase(50);
    let mask = LayerMask::GROUND | LayerMask::PLATFORM;
    c.bench_function("spherecast_ground", |b| {
        b.iter(|| {
            let mut grounded = 0usize;
            for i in 0..1_000usize {
                let origin = Vec3::new(i as f32 * 0.18, 0.4 + (i % 4) as f32 * 0.03, 0.0);
                if world.spherecast(black_box(origin), 0.4, Vec3::NEG_Y, 0.07, mask) {
                    grounded += 1;
                }
            }
            black_box(grounded);
        })
    });
}

/// A body falling onto the staircase and running along it
fn bench_body_steps(c: &mut Criterion) {
    let world = staircase(50);
    c.bench_function("body_many_steps", |b| {
        b.iter(|| {
            let mut body = Body::new(Vec3::new(0.4, 0.5, 0.4));
            body.velocity.x = 6.0;
            let mut pos = Vec3::new(-2.0, 5.0, 0.0);
            for _ in 0..5_000 {
                body_step(&mut pos, &mut body, &world, -9.81, 20.0, DT);
            }
            black_box((pos, body.velocity));
        })
    });
}

/// Platforms easing down to the ground and back up
fn bench_platform_round_trip(c: &mut Criterion) {
    c.bench_function("platform_round_trip", |b| {
        b.iter(|| {
            let mut settled = 0usize;
            for i in 0..100usize {
                let rest = Vec3::new(i as f32, 0.5 + (i % 6) as f32 * 0.75, 0.0);
                let mut platform = Platform::new(rest);
                let mut pos = rest;
                platform.lower(0.0, 0.25);
                while !platform.is_idle() {
                    platform.advance(&mut pos, 0.05, 1e-3, DT);
                }
                platform.raise();
                while !platform.is_idle() {
                    platform.advance(&mut pos, 0.05, 1e-3, DT);
                }
                settled += usize::from(pos == rest);
            }
            black_box(settled);
        })
    });
}

fn bench_smooth_damp(c: &mut Criterion) {
    c.bench_function("smooth_damp", |b| {
        b.iter(|| {
            let mut pos = Vec3::new(0.0, 5.0, 0.0);
            let mut vel = Vec3::ZERO;
            for _ in 0..1_000 {
                pos = smooth_damp(black_box(pos), Vec3::ZERO, &mut vel, 0.05, DT);
            }
            black_box(pos);
        })
    });
}

/// Full controller ticks alternating between the two modes
fn bench_controller_ticks(c: &mut Criterion) {
    let world = staircase(50);
    let settings = Settings::default();
    c.bench_function("controller_ticks", |b| {
        b.iter(|| {
            let mut controller = PlayerController::default();
            let mut body = Body::new(Vec3::new(0.4, 0.5, 0.4));
            let mut clock = TimeState::default();
            let mut pos = Vec3::new(-2.0, 0.5, 0.0);
            for i in 0..1_000usize {
                let input = PlayerInput {
                    right: true,
                    forward: i % 3 == 0,
                    jump: i % 50 == 0,
                    enter_top_down: i % 200 == 100,
                    enter_side_scroll: i % 200 == 0,
                    ..Default::default()
                };
                let mut ctx = TickContext::new(&mut controller, &mut body, pos, input, &mut clock, &world, &settings, DT);
                run_tick(&mut ctx);
                // Nothing finishes the switch here; thaw the clock by hand.
                if clock.stopped {
                    controller.unfreeze(&mut body, &mut clock);
                }
                pos += body.velocity * DT;
            }
            black_box((pos, controller.mode));
        })
    });
}

fn bench_camera_pose(c: &mut Criterion) {
    let cfg = Settings::default().camera;
    let centre = Vec3::new(0.0, 0.0, -200.0);
    c.bench_function("camera_pose", |b| {
        b.iter(|| {
            for i in 0..1_000usize {
                let mode = if i % 2 == 0 { MovementMode::SideScroll } else { MovementMode::TopDown };
                let player = Vec3::new(i as f32 * 0.1, 1.0, (i % 7) as f32);
                black_box(camera_pose(mode, black_box(player), centre, &cfg));
            }
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(200);
    targets =
        bench_raycast_sweep,
        bench_spherecast_ground,
        bench_body_steps,
        bench_platform_round_trip,
        bench_smooth_damp,
        bench_controller_ticks,
        bench_camera_pose
}
criterion_main!(benches);
