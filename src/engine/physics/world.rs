use glam::Vec2;
use rapier2d::parry::query;
use rapier2d::prelude::*;

use super::collision::CategorySet;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a mutable reference to a collider
    pub fn get_collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.collider_set.get_mut(handle)
    }

    /// Number of rigid bodies currently in the world
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Translation of a body as a glam vector
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let t = body.translation();
            Vec2::new(t.x, t.y)
        })
    }

    /// Whether a body exists and is currently enabled
    pub fn is_body_enabled(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map_or(false, |body| body.is_enabled())
    }

    /// Toggle a body's participation in the simulation and in contact queries
    pub fn set_body_enabled(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_enabled(enabled);
        }
    }

    /// Teleport a body and clear all of its motion
    pub fn teleport(&mut self, handle: RigidBodyHandle, position: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![position.x, position.y], true);
            body.set_linvel(Vector::zeros(), true);
            body.set_angvel(0.0, true);
        }
    }

    /// Linear velocity of a body as a glam vector
    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.rigid_body_set.get(handle).map(|body| {
            let v = body.linvel();
            Vec2::new(v.x, v.y)
        })
    }

    /// Overwrite a body's linear velocity
    pub fn set_linear_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    /// Apply an impulse at a body's center of mass
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    /// Collect every enabled body touching `handle` whose categories intersect `mask`
    ///
    /// Colliders are placed from their parent body's current position rather
    /// than the position cached by the last step, so a body moved this tick is
    /// tested where it is now. Each touching body is reported once.
    pub fn touching_bodies(
        &self,
        handle: RigidBodyHandle,
        mask: CategorySet,
    ) -> Vec<RigidBodyHandle> {
        let mut touching = Vec::new();
        let Some(body) = self.rigid_body_set.get(handle) else {
            return touching;
        };
        let mask = mask.to_group();

        for &own_collider in body.colliders() {
            let Some(own) = self.collider_set.get(own_collider) else {
                continue;
            };
            let own_position = self.world_position(own);

            for (_, other) in self.collider_set.iter() {
                let Some(other_parent) = other.parent() else {
                    continue;
                };
                if other_parent == handle || touching.contains(&other_parent) {
                    continue;
                }
                if !other.is_enabled() || !self.is_body_enabled(other_parent) {
                    continue;
                }
                if !mask.intersects(other.collision_groups().memberships) {
                    continue;
                }

                let other_position = self.world_position(other);
                let hit = query::intersection_test(
                    &own_position,
                    own.shape(),
                    &other_position,
                    other.shape(),
                )
                .unwrap_or(false);

                if hit {
                    touching.push(other_parent);
                }
            }
        }

        touching
    }

    fn world_position(&self, collider: &Collider) -> Isometry<Real> {
        let parent = collider
            .parent()
            .and_then(|parent| self.rigid_body_set.get(parent));

        match (parent, collider.position_wrt_parent()) {
            (Some(body), Some(relative)) => body.position() * relative,
            _ => *collider.position(),
        }
    }

    /// Get current gravity
    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::{presets, ColliderBuilder2D};
    use crate::engine::physics::collision::{hitbox_groups, hurtbox_groups, CollisionCategory};

    fn add_box(
        world: &mut PhysicsWorld,
        body: RigidBody,
        groups: InteractionGroups,
    ) -> RigidBodyHandle {
        let handle = world.add_rigid_body(body);
        let collider = ColliderBuilder2D::box_shape(0.5, 0.5)
            .collision_groups(groups)
            .build();
        world.add_collider(collider, handle);
        handle
    }

    #[test]
    fn test_touching_respects_mask_and_enabled_state() {
        let mut world = PhysicsWorld::new();
        let p1 = CollisionCategory::Player1;
        let p2 = CollisionCategory::Player2;

        let hitbox = add_box(
            &mut world,
            presets::hitbox_body(),
            hitbox_groups(p1, CategorySet::opponents_of(p1)),
        );
        let victim = add_box(&mut world, presets::character_body(0.2, 0.0), hurtbox_groups(p2));
        let own = add_box(&mut world, presets::character_body(-0.2, 0.0), hurtbox_groups(p1));

        world.set_body_enabled(hitbox, true);
        let hits = world.touching_bodies(hitbox, CategorySet::opponents_of(p1));
        assert_eq!(hits, vec![victim]);
        assert!(!hits.contains(&own));

        world.set_body_enabled(victim, false);
        let hits = world.touching_bodies(hitbox, CategorySet::opponents_of(p1));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_touching_uses_current_body_position() {
        let mut world = PhysicsWorld::new();
        let p1 = CollisionCategory::Player1;
        let p2 = CollisionCategory::Player2;

        let hitbox = add_box(
            &mut world,
            presets::hitbox_body(),
            hitbox_groups(p1, CategorySet::opponents_of(p1)),
        );
        let victim = add_box(&mut world, presets::character_body(5.0, 0.0), hurtbox_groups(p2));
        world.set_body_enabled(hitbox, true);

        assert!(world.touching_bodies(hitbox, CategorySet::opponents_of(p1)).is_empty());

        world.teleport(hitbox, Vec2::new(5.3, 0.0));
        assert_eq!(
            world.touching_bodies(hitbox, CategorySet::opponents_of(p1)),
            vec![victim]
        );
    }

    #[test]
    fn test_teleport_clears_velocity() {
        let mut world = PhysicsWorld::new();
        let body = world.add_rigid_body(presets::character_body(0.0, 0.0));
        world.get_rigid_body_mut(body).unwrap().set_linvel(vector![3.0, 4.0], true);

        world.teleport(body, Vec2::new(1.0, 2.0));

        let rb = world.get_rigid_body(body).unwrap();
        assert_eq!(world.body_position(body), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(rb.linvel().norm(), 0.0);
        assert_eq!(rb.angvel(), 0.0);
    }

    #[test]
    fn test_velocity_accessors() {
        let mut world = PhysicsWorld::new();
        let body = world.add_rigid_body(presets::character_body(0.0, 0.0));

        world.set_linear_velocity(body, Vec2::new(2.0, -1.0));
        assert_eq!(world.linear_velocity(body), Some(Vec2::new(2.0, -1.0)));

        world.apply_impulse(body, Vec2::ZERO);
        assert_eq!(world.linear_velocity(body), Some(Vec2::new(2.0, -1.0)));
    }

    #[test]
    fn test_remove_body() {
        let mut world = PhysicsWorld::new();
        let body = world.add_rigid_body(presets::platform_body(0.0, 0.0));
        assert_eq!(world.body_count(), 1);
        world.remove_rigid_body(body);
        assert_eq!(world.body_count(), 0);
    }
}
