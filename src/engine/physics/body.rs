use glam::Vec2;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
    enabled: bool,
}

impl BodyBuilder {
    fn with_type(body_type: RigidBodyType, gravity_scale: Real) -> Self {
        Self {
            body_type,
            position: Isometry::identity(),
            gravity_scale,
            can_sleep: body_type == RigidBodyType::Dynamic,
            locked_axes: LockedAxes::empty(),
            enabled: true,
        }
    }

    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self::with_type(RigidBodyType::Dynamic, 1.0)
    }

    /// Create a new kinematic position-based body (not affected by forces)
    pub fn new_kinematic_position_based() -> Self {
        Self::with_type(RigidBodyType::KinematicPositionBased, 0.0)
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self::with_type(RigidBodyType::Fixed, 0.0)
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation (useful for player characters)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Start the body disabled; it takes no part in the simulation until enabled
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        let mut body = RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build();

        if self.body_type == RigidBodyType::Dynamic {
            body.set_linear_damping(0.5); // Some air resistance
        }
        body.set_enabled(self.enabled);

        body
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: InteractionGroups,
    is_sensor: bool,
    friction: Real,
    restitution: Real,
    mass: Option<Real>,
}

impl ColliderBuilder2D {
    fn from_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: InteractionGroups::all(),
            is_sensor: false,
            friction: 0.5,
            restitution: 0.0,
            mass: None,
        }
    }

    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::from_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Create a capsule-shaped collider (good for characters)
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        let a = point![0.0, -half_height];
        let b = point![0.0, half_height];
        Self::from_shape(SharedShape::capsule(a, b, radius))
    }

    /// Create a collider from an already built shape
    pub fn shape(shape: SharedShape) -> Self {
        Self::from_shape(shape)
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: InteractionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects collisions but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set mass directly
    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let mut builder = rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups)
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution);

        if let Some(mass) = self.mass {
            builder = builder.mass(mass);
        }

        builder.build()
    }
}

/// Build one compound shape out of convex polygons
///
/// Returns `None` when no polygon yields a valid convex shape.
pub fn compound_from_polygons<'a, I>(polygons: I) -> Option<SharedShape>
where
    I: IntoIterator<Item = &'a [Vec2]>,
{
    let parts: Vec<(Isometry<Real>, SharedShape)> = polygons
        .into_iter()
        .filter_map(|points| {
            let points: Vec<Point<Real>> = points.iter().map(|p| point![p.x, p.y]).collect();
            SharedShape::convex_hull(&points)
        })
        .map(|shape| (Isometry::identity(), shape))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(SharedShape::compound(parts))
    }
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Create a character hurtbox body (dynamic, rotation locked, never sleeps)
    pub fn character_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Fallback capsule for characters whose idle sprite has no opaque pixels
    pub fn character_capsule(width: Real, height: Real) -> ColliderBuilder2D {
        let radius = width / 2.0;
        let half_height = ((height / 2.0) - radius).max(0.0);
        ColliderBuilder2D::capsule(half_height, radius)
    }

    /// Create a hitbox body: kinematic, disabled until its query window opens
    pub fn hitbox_body() -> RigidBody {
        BodyBuilder::new_kinematic_position_based()
            .can_sleep(false)
            .disabled()
            .build()
    }

    /// Create a platform body (fixed/static)
    pub fn platform_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Create a platform collider (box shape)
    pub fn platform_collider(width: Real, height: Real, groups: InteractionGroups) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(groups)
            .friction(0.3)
            .restitution(0.0)
            .build()
    }
}
