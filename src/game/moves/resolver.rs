// Hitbox contact window
//
// A hitbox body is only ever enabled between `open` and `close` of a single
// resolver pass, so at most one hitbox is live in the world at any moment and
// a disabled body never reports contacts.

use crate::engine::physics::{CategorySet, PhysicsWorld, RigidBodyHandle};
use glam::Vec2;

/// Place a hitbox at `position`, collect the opposing bodies it touches and disable it again
///
/// The returned set only holds enabled bodies whose category is in `mask`.
pub fn resolve_contacts(
    world: &mut PhysicsWorld,
    hitbox: RigidBodyHandle,
    position: Vec2,
    mask: CategorySet,
) -> Vec<RigidBodyHandle> {
    world.teleport(hitbox, position);
    world.set_body_enabled(hitbox, true);
    let contacts = query_contacts(world, hitbox, mask);
    world.set_body_enabled(hitbox, false);

    contacts
}

/// Contacts of a hitbox that is currently enabled
///
/// # Panics
///
/// Panics if the hitbox is disabled. Querying outside the contact window
/// means the enable/query/disable ordering was broken.
pub fn query_contacts(
    world: &PhysicsWorld,
    hitbox: RigidBodyHandle,
    mask: CategorySet,
) -> Vec<RigidBodyHandle> {
    assert!(
        world.is_body_enabled(hitbox),
        "contact query on disabled hitbox {:?}",
        hitbox
    );
    world.touching_bodies(hitbox, mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use crate::engine::physics::collision::{hitbox_groups, hurtbox_groups};
    use crate::engine::physics::{ColliderBuilder2D, CollisionCategory};

    struct Scene {
        world: PhysicsWorld,
        hitbox: RigidBodyHandle,
        victim: RigidBodyHandle,
        mask: CategorySet,
    }

    fn scene() -> Scene {
        let mut world = PhysicsWorld::new();
        let own = CollisionCategory::Player1;
        let mask = CategorySet::opponents_of(own);

        let hitbox = world.add_rigid_body(presets::hitbox_body());
        let collider = ColliderBuilder2D::box_shape(0.5, 0.5)
            .collision_groups(hitbox_groups(own, mask))
            .sensor(true)
            .build();
        world.add_collider(collider, hitbox);

        let victim = world.add_rigid_body(presets::character_body(3.0, 0.0));
        let collider = ColliderBuilder2D::box_shape(0.5, 1.0)
            .collision_groups(hurtbox_groups(CollisionCategory::Player2))
            .build();
        world.add_collider(collider, victim);

        Scene {
            world,
            hitbox,
            victim,
            mask,
        }
    }

    #[test]
    fn test_overlapping_opponent_is_reported() {
        let mut scene = scene();
        let at = Vec2::new(2.6, 0.0);
        let hits = resolve_contacts(&mut scene.world, scene.hitbox, at, scene.mask);
        assert_eq!(hits, vec![scene.victim]);
    }

    #[test]
    fn test_hitbox_closed_after_resolve() {
        let mut scene = scene();
        resolve_contacts(&mut scene.world, scene.hitbox, Vec2::new(2.6, 0.0), scene.mask);
        assert!(!scene.world.is_body_enabled(scene.hitbox));
    }

    #[test]
    fn test_disabled_opponent_is_excluded() {
        let mut scene = scene();
        scene.world.set_body_enabled(scene.victim, false);
        let at = Vec2::new(3.0, 0.0);
        let hits = resolve_contacts(&mut scene.world, scene.hitbox, at, scene.mask);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_out_of_reach_opponent_is_missed() {
        let mut scene = scene();
        let at = Vec2::new(-3.0, 0.0);
        let hits = resolve_contacts(&mut scene.world, scene.hitbox, at, scene.mask);
        assert!(hits.is_empty());
    }

    #[test]
    #[should_panic(expected = "contact query on disabled hitbox")]
    fn test_query_outside_window_panics() {
        let scene = scene();
        query_contacts(&scene.world, scene.hitbox, scene.mask);
    }
}
