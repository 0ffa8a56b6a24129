// Physics system using rapier2d

pub mod body;
pub mod collision;
mod world;

pub use body::{BodyBuilder, ColliderBuilder2D, ColliderHandle, RigidBodyHandle};
pub use collision::{CategorySet, CollisionCategory};
pub use world::PhysicsWorld;

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{vector, InteractionGroups, Real, SharedShape, Vector};
