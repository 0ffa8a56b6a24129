// Move engine
//
// Everything one character can do:
// - `slot`: The eight canonical moves
// - `polygon`: Hitbox geometry extracted from sprite alpha
// - `animation`: Sprite-sheet clips and their playback clock
// - `asset`: Move templates and per-player move instances
// - `resolver`: The enable/query/disable contact window
// - `set`: The eight moves of one character and the selection state machine

pub mod animation;
pub mod asset;
pub mod polygon;
pub mod resolver;
pub mod set;
pub mod slot;

pub use animation::{AnimationClip, AnimationClock};
pub use asset::{EffectInput, MoveAsset, MoveEffect, MoveTemplate, TickContext};
pub use polygon::{extract_polygons, HitboxGeometry, Polygon};
pub use set::MoveSet;
pub use slot::MoveSlot;

/// Horizontal direction a character faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, 1.0 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Direction of a horizontal axis value; `None` at exactly zero
    pub fn from_axis(x: f32) -> Option<Facing> {
        if x > 0.0 {
            Some(Facing::Right)
        } else if x < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}
