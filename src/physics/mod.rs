//! Layered box colliders and the queries the player controller runs
//! against them.
//!
//! Colliders are plain entities carrying a [`Collider`] and a `Transform`.
//! Once per fixed tick [`refresh_collider_world`] copies them into the
//! [`ColliderWorld`] resource, a flat snapshot that answers ray and sphere
//! casts. Gameplay code only sees the [`PhysicsQuery`] trait, so tests can
//! build a `ColliderWorld` by hand without an `App`.
//!
//! # Example:
//!
//! ```
//! use bevy::math::Vec3;
//! use planeshift::physics::{Collider, ColliderWorld, LayerMask, PhysicsLayer, PhysicsQuery};
//!
//! let mut world = ColliderWorld::new();
//! world.insert(Vec3::new(0.0, -0.5, 0.0), Collider::cuboid(Vec3::new(10.0, 0.5, 10.0)).on_layer(PhysicsLayer::Ground));
//! let hit = world.raycast(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y, 10.0, LayerMask::GROUND).unwrap();
//! assert_eq!(hit.surface_top, 0.0);
//! ```

pub mod body;
pub mod collision;

pub use body::*;

use crate::platform::Platform;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Collision layer a collider lives on. Probes filter by [`LayerMask`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhysicsLayer {
    #[default]
    Default,
    Ground,
    Platform,
}

impl PhysicsLayer {
    #[must_use]
    pub const fn mask(self) -> LayerMask {
        LayerMask(1 << self as u32)
    }
}

/// Bit set of [`PhysicsLayer`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const GROUND: LayerMask = PhysicsLayer::Ground.mask();
    pub const PLATFORM: LayerMask = PhysicsLayer::Platform.mask();

    #[must_use]
    pub const fn contains(self, layer: PhysicsLayer) -> bool {
        self.0 & layer.mask().0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

/// Tag read by the mode-switch eligibility probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceTag {
    #[default]
    Untagged,
    Passable,
    Impassable,
}

/// Axis-aligned box collider. The box is centred on the entity's
/// `Transform::translation`; rotation and scale are ignored.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Collider {
    pub half_extents: Vec3,
    pub layer: PhysicsLayer,
    pub tag: SurfaceTag,
    /// Name of the group the collider belongs to. Passable platforms encode
    /// their tier as the trailing digits, e.g. `"Tier6"`.
    pub group: Option<String>,
    /// Whether bodies are blocked by this collider. Non-solid colliders
    /// still answer casts.
    pub solid: bool,
}

impl Collider {
    #[must_use]
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            layer: PhysicsLayer::Default,
            tag: SurfaceTag::Untagged,
            group: None,
            solid: true,
        }
    }

    #[must_use]
    pub fn on_layer(mut self, layer: PhysicsLayer) -> Self {
        self.layer = layer;
        self
    }

    #[must_use]
    pub fn tagged(mut self, tag: SurfaceTag) -> Self {
        self.tag = tag;
        self
    }

    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn non_solid(mut self) -> Self {
        self.solid = false;
        self
    }
}

/// Tier encoded in a group name: its trailing run of ASCII digits.
///
/// ```
/// use planeshift::physics::group_tier;
/// assert_eq!(group_tier("Tier6"), Some("6"));
/// assert_eq!(group_tier("Tier16"), Some("16"));
/// assert_eq!(group_tier("Ground"), None);
/// ```
#[must_use]
pub fn group_tier(group: &str) -> Option<&str> {
    let digits = group.bytes().rev().take_while(u8::is_ascii_digit).count();
    (digits > 0).then(|| &group[group.len() - digits..])
}

/// Result of a successful [`PhysicsQuery::raycast`].
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub entity: Option<Entity>,
    pub layer: PhysicsLayer,
    pub tag: SurfaceTag,
    pub group: Option<String>,
    /// World-space Y of the top face of the hit collider.
    pub surface_top: f32,
    /// Top face of the hit collider at its resting position, for platforms
    /// that may currently be displaced.
    pub resting_top: Option<f32>,
}

impl RayHit {
    #[must_use]
    pub fn tier(&self) -> Option<&str> {
        self.group.as_deref().and_then(group_tier)
    }
}

/// Point-in-time collision queries against the current collider state.
pub trait PhysicsQuery {
    /// Nearest collider on `mask` hit by the ray within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit>;

    /// Whether a sphere swept along `direction` touches any collider on
    /// `mask` within `max_distance`.
    fn spherecast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool;
}

/// One collider captured in a [`ColliderWorld`] snapshot.
#[derive(Debug, Clone)]
pub struct ColliderEntry {
    pub entity: Option<Entity>,
    pub center: Vec3,
    pub collider: Collider,
    /// Centre the collider rests at when it is not being animated.
    pub resting_center: Option<Vec3>,
}

impl ColliderEntry {
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.center - self.collider.half_extents
    }

    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.center + self.collider.half_extents
    }

    #[must_use]
    pub fn top(&self) -> f32 {
        self.center.y + self.collider.half_extents.y
    }
}

/// Snapshot of every collider in the level, rebuilt once per fixed tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderWorld {
    entries: Vec<ColliderEntry>,
}

impl ColliderWorld {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Add a collider that belongs to no entity (tests, benches).
    pub fn insert(&mut self, center: Vec3, collider: Collider) {
        self.entries.push(ColliderEntry {
            entity: None,
            center,
            collider,
            resting_center: None,
        });
    }

    /// Add a platform collider currently at `center` that rests at
    /// `resting_center`.
    pub fn insert_platform(&mut self, center: Vec3, resting_center: Vec3, collider: Collider) {
        self.entries.push(ColliderEntry {
            entity: None,
            center,
            collider,
            resting_center: Some(resting_center),
        });
    }

    pub fn push(&mut self, entry: ColliderEntry) {
        self.entries.push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColliderEntry> {
        self.entries.iter()
    }

    /// Solid colliders that a box at `center` with `half_extents` would
    /// interpenetrate.
    pub fn overlapping_solids(&self, center: Vec3, half_extents: Vec3) -> impl Iterator<Item = &ColliderEntry> {
        self.entries.iter().filter(move |e| {
            e.collider.solid && collision::boxes_overlap(center, half_extents, e.center, e.collider.half_extents)
        })
    }
}

impl PhysicsQuery for ColliderWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: LayerMask) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let (entry, distance) = self
            .entries
            .iter()
            .filter(|e| mask.contains(e.collider.layer))
            .filter_map(|e| collision::ray_aabb_entry(origin, dir, e.min(), e.max()).map(|t| (e, t)))
            .filter(|(_, t)| *t <= max_distance)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))?;

        Some(RayHit {
            point: origin + dir * distance,
            distance,
            entity: entry.entity,
            layer: entry.collider.layer,
            tag: entry.collider.tag,
            group: entry.collider.group.clone(),
            surface_top: entry.top(),
            resting_top: entry.resting_center.map(|c| c.y + entry.collider.half_extents.y),
        })
    }

    fn spherecast(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32, mask: LayerMask) -> bool {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return false;
        }

        self.entries
            .iter()
            .filter(|e| mask.contains(e.collider.layer))
            .filter_map(|e| collision::sphere_aabb_sweep(origin, radius, dir, e.min(), e.max()))
            .any(|t| t <= max_distance)
    }
}

/// Rebuild the [`ColliderWorld`] snapshot from collider entities.
///
/// Platforms contribute their original position as the resting centre so
/// alignment probes can ignore the animated offset.
#[allow(clippy::needless_pass_by_value)]
pub fn refresh_collider_world(
    mut world: ResMut<ColliderWorld>,
    colliders: Query<(Entity, &Collider, &Transform, Option<&Platform>)>,
) {
    world.clear();
    for (entity, collider, transform, platform) in &colliders {
        world.push(ColliderEntry {
            entity: Some(entity),
            center: transform.translation,
            collider: collider.clone(),
            resting_center: platform.map(|p| p.original_position),
        });
    }
}
