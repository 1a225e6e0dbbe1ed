//! Box intersection helpers.
//!
//! Every collider in the level is an axis-aligned box, so the casts reduce
//! to the slab test: a ray enters the box at the latest of the per-axis
//! entry times and leaves at the earliest of the exit times.

use bevy::math::Vec3;

/// Penetration depth below which two boxes count as touching rather than
/// overlapping. Keeps a body resting on a surface free to slide along it.
pub const CONTACT_SKIN: f32 = 1e-4;

/// Entry and exit distances of a ray through a box, `None` when the ray
/// misses or the box lies entirely behind the origin.
///
/// `dir` is expected to be normalized; the returned values are then world
/// distances. `t_enter` is negative when the origin is inside the box.
#[must_use]
pub fn ray_aabb_span(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<(f32, f32)> {
    let inv = |d: f32| if d.abs() > 1e-10 { 1.0 / d } else { f32::MAX * d.signum() };
    let inv_dir = Vec3::new(inv(dir.x), inv(dir.y), inv(dir.z));

    let t1 = (min - origin) * inv_dir;
    let t2 = (max - origin) * inv_dir;

    let t_enter = t1.min(t2).max_element();
    let t_exit = t1.max(t2).min_element();

    (t_exit >= t_enter && t_exit >= 0.0).then_some((t_enter, t_exit))
}

/// Distance at which a ray starting outside the box first touches it.
///
/// Origins inside (or on the inner side of) a box do not report that box,
/// matching how the level probes expect to ignore whatever they start in.
#[must_use]
pub fn ray_aabb_entry(origin: Vec3, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    ray_aabb_span(origin, dir, min, max).and_then(|(t_enter, _)| (t_enter >= 0.0).then_some(t_enter))
}

/// Sweep a sphere along `dir` and report the distance of first contact.
///
/// The sphere/box Minkowski sum is approximated by the box grown by
/// `radius` on every axis, which is exact on faces and slightly generous at
/// edges and corners.
///
/// A sphere that starts in contact only reports the box when the contact
/// lies ahead along `dir`, at the distance still separating the two.
/// Brushing a box side-on while sweeping past it is not a hit.
#[must_use]
pub fn sphere_aabb_sweep(origin: Vec3, radius: f32, dir: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let radius = radius.max(0.0);
    let grow = Vec3::splat(radius);
    let (t_enter, _) = ray_aabb_span(origin, dir, min - grow, max + grow)?;
    if t_enter > 0.0 {
        return Some(t_enter);
    }

    let to_box = origin.clamp(min, max) - origin;
    (to_box.dot(dir) > CONTACT_SKIN).then(|| (to_box.length() - radius).max(0.0))
}

/// Whether two boxes given as centre and half extents interpenetrate by
/// more than [`CONTACT_SKIN`] on every axis.
#[must_use]
pub fn boxes_overlap(a_center: Vec3, a_half: Vec3, b_center: Vec3, b_half: Vec3) -> bool {
    let gap = (a_center - b_center).abs() - (a_half + b_half);
    gap.max_element() < -CONTACT_SKIN
}
