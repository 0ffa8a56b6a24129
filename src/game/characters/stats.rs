// Character physical properties and shared tuning constants
// Templates differ in their moves; these numbers only shape how a body moves

/// Stick deflection below this (per axis) counts as neutral
pub const STICK_DEADZONE: f32 = 0.2;

/// Sprite pixels per simulation unit
pub const PIXELS_PER_UNIT: f32 = 32.0;

/// Physical properties of a character's hurtbox
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStats {
    // Physics
    /// Hurtbox mass
    pub mass: f32,
    /// Friction coefficient against the stage
    pub friction: f32,
    /// Bounciness (0.0 = no bounce)
    pub restitution: f32,

    // Movement
    /// Horizontal speed while walking (units/second)
    pub walk_speed: f32,
    /// Upward speed given by a jump
    pub jump_speed: f32,

    // Dimensions (for the fallback collider)
    /// Character width in world units
    pub width: f32,
    /// Character height in world units
    pub height: f32,
}

/// Stats used when a template does not override them
pub const BASE_STATS: CharacterStats = CharacterStats {
    mass: 1.0,
    friction: 0.7,
    restitution: 0.0,

    walk_speed: 4.0,
    jump_speed: 7.0,

    width: 1.0,
    height: 2.0,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    /// Heavier, slower variant
    pub fn heavy() -> Self {
        Self {
            mass: 1.6,
            walk_speed: 3.0,
            jump_speed: 6.0,
            ..BASE_STATS
        }
    }
}
