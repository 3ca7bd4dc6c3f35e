//! Level world - static geometry plus character hit-volumes on Rapier

use crate::collider::{HitVolumeDesc, StaticDesc, VolumeId};
use crate::config::PhysicsConfig;
use crate::error::{PhysicsError, Result};
use crate::events::{Contact, ContactListener, ShapeTag};
use crate::layers::{CollisionGroups, CollisionMatrix, ShapeCategory};
use crate::query::{BodyPose, RaycastHit, WorldQuery};
use destroyer_math::{Segment, Vec3};
use rapier3d::parry::query as parry_query;
use rapier3d::parry::shape::Shape;
use rapier3d::prelude as rapier;
use std::collections::{BTreeMap, HashMap};

/// One side of a tracked contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PairSide {
    Static(usize),
    Volume(VolumeId),
}

/// Key of a tracked contact pair; the second side is always a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PairKey {
    first: PairSide,
    second: VolumeId,
}

impl PairKey {
    fn involves(&self, volume: VolumeId) -> bool {
        self.second == volume || self.first == PairSide::Volume(volume)
    }
}

/// A hit-volume attached to a character
struct HitVolume {
    owner: u64,
    tag: ShapeTag,
    offset: [f32; 3],
    shape: rapier::SharedShape,
    pose: rapier::Isometry<f32>,
}

/// The level as the simulation sees it.
///
/// Static geometry lives in a Rapier collider set behind a query pipeline.
/// Character hit-volumes are kinematic: they are placed every frame by
/// [`WorldQuery::sync_bodies`] and tested against the level and each other
/// by [`WorldQuery::step_contacts`].
pub struct LevelWorld {
    /// Configuration
    config: PhysicsConfig,

    /// Which categories report contacts
    matrix: CollisionMatrix,

    /// Query pipeline over the static colliders
    query_pipeline: rapier::QueryPipeline,

    /// Required by the query API; the level has no rigid bodies
    bodies: rapier::RigidBodySet,

    /// Static colliders
    colliders: rapier::ColliderSet,

    /// Static collider handle -> insertion index
    static_index: HashMap<rapier::ColliderHandle, usize>,

    /// Character hit-volumes, ordered for deterministic reporting
    volumes: BTreeMap<VolumeId, HitVolume>,

    /// Owner -> attached volumes
    owners: HashMap<u64, Vec<VolumeId>>,

    /// Pairs touching at the end of the last step
    active: BTreeMap<PairKey, Contact>,

    /// Next volume id
    next_volume: u64,
}

impl LevelWorld {
    /// Create an empty level
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            matrix: CollisionMatrix::default(),
            query_pipeline: rapier::QueryPipeline::new(),
            bodies: rapier::RigidBodySet::new(),
            colliders: rapier::ColliderSet::new(),
            static_index: HashMap::new(),
            volumes: BTreeMap::new(),
            owners: HashMap::new(),
            active: BTreeMap::new(),
            next_volume: 1,
        }
    }

    /// Create a level from a set of static shapes
    pub fn with_statics<'a>(
        config: PhysicsConfig,
        statics: impl IntoIterator<Item = &'a StaticDesc>,
    ) -> Result<Self> {
        config.validate()?;
        let mut world = Self::new(config);
        for desc in statics {
            world.add_static(desc)?;
        }
        Ok(world)
    }

    /// Get the physics configuration
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replace the collision matrix
    pub fn set_collision_matrix(&mut self, matrix: CollisionMatrix) {
        self.matrix = matrix;
    }

    // ==================== Static geometry ====================

    /// Add a piece of static level geometry. Raycasts see it immediately.
    pub fn add_static(&mut self, desc: &StaticDesc) -> Result<()> {
        desc.shape.validate()?;

        let groups = self.matrix.groups(ShapeCategory::Wall);
        let builder = rapier::ColliderBuilder::new(desc.shape.to_rapier())
            .translation(rapier::Vector::new(
                desc.position[0],
                desc.position[1],
                desc.position[2],
            ))
            .collision_groups(interaction_groups(groups))
            .user_data(ShapeTag::WALL.to_user_data());

        let handle = self.colliders.insert(builder);
        let index = self.static_index.len();
        self.static_index.insert(handle, index);

        self.sync_query_pipeline();
        Ok(())
    }

    /// Manually sync the query pipeline with current colliders.
    pub fn sync_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    // ==================== Debug ====================

    /// Number of static colliders
    pub fn static_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of attached hit-volumes
    pub fn volume_count(&self) -> usize {
        self.volumes.len()
    }

    /// Number of pairs currently touching
    pub fn active_contact_count(&self) -> usize {
        self.active.len()
    }

    /// World position of a volume's center
    pub fn volume_position(&self, id: VolumeId) -> Result<Vec3> {
        self.volumes
            .get(&id)
            .map(|v| {
                let t = v.pose.translation.vector;
                Vec3::new(t.x, t.y, t.z)
            })
            .ok_or(PhysicsError::VolumeNotFound(id))
    }

    // ==================== Internals ====================

    /// Overlap depth and separating normal (from shape 1 towards shape 2)
    fn penetration(
        &self,
        pos1: &rapier::Isometry<f32>,
        shape1: &dyn Shape,
        pos2: &rapier::Isometry<f32>,
        shape2: &dyn Shape,
    ) -> Option<(f32, Vec3)> {
        let prediction = self.config.contact_prediction;

        match parry_query::contact(pos1, shape1, pos2, shape2, prediction) {
            Ok(Some(contact)) if contact.dist <= prediction => {
                let mut depth = (-contact.dist).max(0.0);
                if depth < self.config.min_penetration {
                    depth = 0.0;
                }
                let n = contact.normal1;
                Some((depth, Vec3::new(n.x, n.y, n.z)))
            }
            Ok(_) => None,
            Err(_) => {
                log::warn!("Unsupported shape pair in contact query, skipping");
                None
            }
        }
    }

    /// Contacts between every volume and the level
    fn collect_static_contacts(&self, current: &mut BTreeMap<PairKey, Contact>) {
        let filter = rapier::QueryFilter::new()
            .groups(interaction_groups(ShapeCategory::Wall.query_groups()));

        for (id, volume) in &self.volumes {
            if !self.matrix.categories_collide(volume.tag.category, ShapeCategory::Wall) {
                continue;
            }

            let mut touching = Vec::new();
            self.query_pipeline.intersections_with_shape(
                &self.bodies,
                &self.colliders,
                &volume.pose,
                volume.shape.as_ref(),
                filter,
                |handle| {
                    touching.push(handle);
                    true // Continue
                },
            );

            for handle in touching {
                let (Some(collider), Some(&index)) =
                    (self.colliders.get(handle), self.static_index.get(&handle))
                else {
                    continue;
                };

                let Some((penetration, normal)) = self.penetration(
                    collider.position(),
                    collider.shape(),
                    &volume.pose,
                    volume.shape.as_ref(),
                ) else {
                    continue;
                };

                let tag = ShapeTag::from_user_data(collider.user_data).unwrap_or(ShapeTag::WALL);
                current.insert(
                    PairKey {
                        first: PairSide::Static(index),
                        second: *id,
                    },
                    Contact {
                        a: tag,
                        b: volume.tag,
                        penetration,
                        normal,
                    },
                );
            }
        }
    }

    /// Contacts between volumes of different owners
    fn collect_volume_contacts(&self, current: &mut BTreeMap<PairKey, Contact>) {
        let ids: Vec<VolumeId> = self.volumes.keys().copied().collect();

        for (i, first_id) in ids.iter().enumerate() {
            for second_id in &ids[i + 1..] {
                let (first, second) = (&self.volumes[first_id], &self.volumes[second_id]);
                if first.owner == second.owner
                    || !self.matrix.categories_collide(first.tag.category, second.tag.category)
                {
                    continue;
                }

                if let Some((penetration, normal)) = self.penetration(
                    &first.pose,
                    first.shape.as_ref(),
                    &second.pose,
                    second.shape.as_ref(),
                ) {
                    current.insert(
                        PairKey {
                            first: PairSide::Volume(*first_id),
                            second: *second_id,
                        },
                        Contact {
                            a: first.tag,
                            b: second.tag,
                            penetration,
                            normal,
                        },
                    );
                }
            }
        }
    }
}

impl WorldQuery for LevelWorld {
    fn raycast(&self, segment: Segment, filter: CollisionGroups) -> Option<RaycastHit> {
        if !segment.is_valid() {
            return None;
        }

        let delta = segment.delta();
        let ray = rapier::Ray::new(
            rapier::Point::new(segment.start.x, segment.start.y, segment.start.z),
            rapier::Vector::new(delta.x, delta.y, delta.z),
        );
        let filter = rapier::QueryFilter::new().groups(interaction_groups(filter));

        // The ray direction is the whole segment, so a time of impact in
        // [0, 1] is the fraction along it.
        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.bodies,
                &self.colliders,
                &ray,
                1.0,
                self.config.solid_raycasts,
                filter,
            )
            .and_then(|(handle, intersection)| {
                let collider = self.colliders.get(handle)?;
                let point = ray.point_at(intersection.time_of_impact);
                let normal = intersection.normal;

                Some(RaycastHit {
                    tag: ShapeTag::from_user_data(collider.user_data).unwrap_or(ShapeTag::WALL),
                    point: Vec3::new(point.x, point.y, point.z),
                    normal: Vec3::new(normal.x, normal.y, normal.z),
                    fraction: intersection.time_of_impact,
                })
            })
    }

    fn attach_volume(&mut self, owner: u64, desc: &HitVolumeDesc) -> Result<VolumeId> {
        desc.shape.validate()?;

        let id = VolumeId(self.next_volume);
        self.next_volume += 1;

        self.volumes.insert(
            id,
            HitVolume {
                owner,
                tag: ShapeTag::owned(owner, desc.category),
                offset: desc.offset,
                shape: desc.shape.to_rapier(),
                pose: rapier::Isometry::translation(desc.offset[0], desc.offset[1], desc.offset[2]),
            },
        );
        self.owners.entry(owner).or_default().push(id);

        log::debug!("Attached {:?} volume {:?} to owner {}", desc.category, id, owner);
        Ok(id)
    }

    fn detach_owner(&mut self, owner: u64) {
        let Some(ids) = self.owners.remove(&owner) else {
            return;
        };

        for id in ids {
            self.volumes.remove(&id);
            self.active.retain(|key, _| !key.involves(id));
        }
    }

    fn sync_bodies(&mut self, poses: &[BodyPose]) {
        for pose in poses {
            let Some(ids) = self.owners.get(&pose.owner) else {
                continue;
            };

            let body = rapier::Isometry::new(
                rapier::Vector::new(pose.position.x, pose.position.y, pose.position.z),
                rapier::Vector::new(0.0, pose.yaw, 0.0),
            );

            for id in ids {
                if let Some(volume) = self.volumes.get_mut(id) {
                    let o = volume.offset;
                    volume.pose = body * rapier::Isometry::translation(o[0], o[1], o[2]);
                }
            }
        }
    }

    fn step_contacts(&mut self, listener: &mut dyn ContactListener) {
        let mut current = BTreeMap::new();
        self.collect_static_contacts(&mut current);
        if self.config.volume_contacts {
            self.collect_volume_contacts(&mut current);
        }

        for (key, contact) in &current {
            if self.active.contains_key(key) {
                listener.update_contact(contact);
            } else {
                listener.begin_contact(contact);
            }
        }

        for (key, previous) in &self.active {
            if !current.contains_key(key) {
                listener.end_contact(&Contact {
                    penetration: 0.0,
                    ..*previous
                });
            }
        }

        self.active = current;
    }
}

impl Default for LevelWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

fn interaction_groups(groups: CollisionGroups) -> rapier::InteractionGroups {
    rapier::InteractionGroups::new(
        rapier::Group::from_bits_truncate(groups.memberships),
        rapier::Group::from_bits_truncate(groups.filter),
    )
}
