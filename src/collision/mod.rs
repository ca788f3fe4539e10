//! Axis-aligned collision world used by the avatar and pushable bodies.
//!
//! Solids are boxes rebuilt from [`Collider`] components. Movement is swept
//! one axis at a time so a box slides along walls and reports which faces it
//! touched through [`CollisionFlags`].

use std::ops::BitOr;

use bevy::math::bounding::{Aabb3d, BoundingVolume, RayCast3d};
use bevy::math::{Dir3A, Vec3A};
use bevy::prelude::*;

/// Gap left between a swept box and the solid it stopped against.
pub const CONTACT_SKIN: f32 = 1e-3;

/// Faces touched during a swept move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CollisionFlags(u8);

impl CollisionFlags {
    /// Nothing touched.
    pub const NONE: Self = Self(0);
    /// Blocked along X or Z.
    pub const SIDES: Self = Self(1);
    /// Blocked while moving up.
    pub const ABOVE: Self = Self(1 << 1);
    /// Blocked while moving down.
    pub const BELOW: Self = Self(1 << 2);

    /// Returns `true` when every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Returns `true` when no face was touched.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Box collider attached to an entity.
///
/// The box centre sits at the entity translation plus `offset`.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    /// Half size of the box along each axis.
    pub half_extents: Vec3,
    /// Offset of the box centre from the entity origin.
    pub offset: Vec3,
}

impl Collider {
    /// Box centred on the entity origin.
    #[must_use]
    pub const fn cuboid(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            offset: Vec3::ZERO,
        }
    }

    /// Upright box whose base sits on the entity origin.
    #[must_use]
    pub fn standing(radius: f32, height: f32) -> Self {
        Self {
            half_extents: Vec3::new(radius, height * 0.5, radius),
            offset: Vec3::new(0.0, height * 0.5, 0.0),
        }
    }

    /// World-space centre of the box for an entity at `translation`.
    #[must_use]
    pub fn center(&self, translation: Vec3) -> Vec3 {
        translation + self.offset
    }
}

/// Marks a collider that never moves, such as floors and walls.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct StaticSolid;

/// Result of a swept move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Resolved box centre.
    pub center: Vec3,
    /// Faces touched on the way.
    pub flags: CollisionFlags,
}

/// Closest surface found by [`CollisionWorld::raycast`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Outward normal of the face that was hit.
    pub normal: Vec3,
    /// Distance from the ray origin.
    pub distance: f32,
    /// Entity owning the collider.
    pub owner: Entity,
}

#[derive(Clone, Copy, Debug)]
struct Solid {
    owner: Entity,
    bounds: Aabb3d,
}

/// Resolves swept box movement against the world.
#[cfg_attr(test, mockall::automock)]
pub trait MovementResolver {
    /// Moves a box centred at `center` by `displacement`, skipping solids
    /// owned by any entity in `ignore`.
    fn resolve(
        &self,
        center: Vec3,
        half_extents: Vec3,
        displacement: Vec3,
        ignore: &[Entity],
    ) -> MoveOutcome;
}

/// Every solid box in the active scene.
#[derive(Resource, Debug, Default)]
pub struct CollisionWorld {
    solids: Vec<Solid>,
}

fn strictly_overlaps(a: &Aabb3d, b: &Aabb3d, axis: usize) -> bool {
    (0..3)
        .filter(|other| *other != axis)
        .all(|i| a.min[i] < b.max[i] - CONTACT_SKIN && a.max[i] > b.min[i] + CONTACT_SKIN)
}

fn face_normal(bounds: &Aabb3d, point: Vec3A) -> Vec3 {
    let faces = [
        ((point.x - bounds.min.x).abs(), Vec3::NEG_X),
        ((point.x - bounds.max.x).abs(), Vec3::X),
        ((point.y - bounds.min.y).abs(), Vec3::NEG_Y),
        ((point.y - bounds.max.y).abs(), Vec3::Y),
        ((point.z - bounds.min.z).abs(), Vec3::NEG_Z),
        ((point.z - bounds.max.z).abs(), Vec3::Z),
    ];
    faces
        .into_iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or(Vec3::Y, |(_, normal)| normal)
}

impl CollisionWorld {
    /// Removes every solid.
    pub fn clear(&mut self) {
        self.solids.clear();
    }

    /// Number of registered solids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` when the world holds no solids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }

    /// Registers a box centred at `center`.
    pub fn add_box(&mut self, owner: Entity, center: Vec3, half_extents: Vec3) {
        self.solids.push(Solid {
            owner,
            bounds: Aabb3d::new(center, half_extents),
        });
    }

    /// Moves every box owned by `owner` so it is centred at `center`.
    pub fn update_box(&mut self, owner: Entity, center: Vec3) {
        for solid in self.solids.iter_mut().filter(|s| s.owner == owner) {
            let half = solid.bounds.half_size();
            solid.bounds = Aabb3d::new(center, half);
        }
    }

    fn candidates<'a>(&'a self, ignore: &'a [Entity]) -> impl Iterator<Item = &'a Solid> + 'a {
        self.solids.iter().filter(move |s| !ignore.contains(&s.owner))
    }

    fn sweep_axis(
        &self,
        center: &mut Vec3,
        half_extents: Vec3,
        axis: usize,
        delta: f32,
        ignore: &[Entity],
    ) -> bool {
        if delta == 0.0 {
            return false;
        }
        let start = Aabb3d::new(*center, half_extents);
        let mut allowed = delta;
        let mut blocked = false;
        for solid in self.candidates(ignore) {
            if !strictly_overlaps(&start, &solid.bounds, axis) {
                continue;
            }
            if delta > 0.0 {
                let gap = solid.bounds.min[axis] - start.max[axis];
                if gap >= -CONTACT_SKIN && gap - CONTACT_SKIN < allowed {
                    allowed = (gap - CONTACT_SKIN).max(0.0);
                    blocked = true;
                }
            } else {
                let gap = start.min[axis] - solid.bounds.max[axis];
                if gap >= -CONTACT_SKIN && -(gap - CONTACT_SKIN) > allowed {
                    allowed = -(gap - CONTACT_SKIN).max(0.0);
                    blocked = true;
                }
            }
        }
        center[axis] += allowed;
        blocked
    }

    /// Casts a ray and returns the nearest hit within `max_distance`.
    ///
    /// Solids that already contain `origin` are skipped, as are those owned
    /// by entities in `ignore`.
    #[must_use]
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: &[Entity],
    ) -> Option<RayHit> {
        let dir = Dir3A::new(Vec3A::from(direction)).ok()?;
        let ray = RayCast3d::new(origin, dir, max_distance);
        let origin_a = Vec3A::from(origin);
        self.candidates(ignore)
            .filter(|solid| {
                let b = &solid.bounds;
                !(origin_a.cmpge(b.min).all() && origin_a.cmple(b.max).all())
            })
            .filter_map(|solid| {
                ray.aabb_intersection_at(&solid.bounds)
                    .map(|distance| (solid, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(solid, distance)| {
                let point = origin_a + Vec3A::from(direction.normalize()) * distance;
                RayHit {
                    point: Vec3::from(point),
                    normal: face_normal(&solid.bounds, point),
                    distance,
                    owner: solid.owner,
                }
            })
    }
}

impl MovementResolver for CollisionWorld {
    fn resolve(
        &self,
        center: Vec3,
        half_extents: Vec3,
        displacement: Vec3,
        ignore: &[Entity],
    ) -> MoveOutcome {
        let mut resolved = center;
        let mut flags = CollisionFlags::NONE;
        if self.sweep_axis(&mut resolved, half_extents, 1, displacement.y, ignore) {
            flags = flags
                | if displacement.y > 0.0 {
                    CollisionFlags::ABOVE
                } else {
                    CollisionFlags::BELOW
                };
        }
        for axis in [0, 2] {
            if self.sweep_axis(&mut resolved, half_extents, axis, displacement[axis], ignore) {
                flags = flags | CollisionFlags::SIDES;
            }
        }
        MoveOutcome {
            center: resolved,
            flags,
        }
    }
}

/// Rebuilds the collision world from every collider in the scene.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn sync_collision_world(
    mut world: ResMut<CollisionWorld>,
    colliders: Query<(Entity, &Collider, &Transform)>,
) {
    world.clear();
    for (entity, collider, transform) in &colliders {
        world.add_box(
            entity,
            collider.center(transform.translation),
            collider.half_extents,
        );
    }
}
