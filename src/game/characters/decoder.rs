// Controller snapshot to desired move

use super::stats::STICK_DEADZONE;
use crate::core::math::apply_deadzone;
use crate::engine::input::{Button, InputSnapshot};
use crate::game::moves::{Facing, MoveSlot};

/// Button that triggers a jump
pub const JUMP_BUTTON: Button = Button::A;
/// Button that triggers specials
pub const SPECIAL_BUTTON: Button = Button::B;
/// Button that triggers the basic attack
pub const BASIC_BUTTON: Button = Button::X;

/// Intent flags derived from one snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFlags {
    pub side: bool,
    pub up: bool,
    pub down: bool,
    pub special: bool,
    pub jump: bool,
    pub basic: bool,
}

impl InputFlags {
    /// Read the flags, ignoring stick deflection inside `deadzone`
    pub fn from_snapshot(snapshot: &InputSnapshot, deadzone: f32) -> Self {
        let x = apply_deadzone(snapshot.left_stick.x, deadzone);
        let y = apply_deadzone(snapshot.left_stick.y, deadzone);

        Self {
            side: x != 0.0,
            up: y > 0.0,
            down: y < 0.0,
            special: snapshot.is_down(SPECIAL_BUTTON),
            jump: snapshot.is_down(JUMP_BUTTON),
            basic: snapshot.is_down(BASIC_BUTTON),
        }
    }

    /// Resolve to exactly one move
    ///
    /// Order matters: a special with a direction beats a plain special, any
    /// special beats walking, walking beats jumping, jumping beats the basic
    /// attack.
    pub fn desired_move(self) -> MoveSlot {
        if self.special && self.side {
            MoveSlot::SideSpecial
        } else if self.special && self.down {
            MoveSlot::DownSpecial
        } else if self.special && self.up {
            MoveSlot::UpSpecial
        } else if self.special {
            MoveSlot::Special
        } else if self.side {
            MoveSlot::Walk
        } else if self.jump || self.up {
            MoveSlot::Jump
        } else if self.basic {
            MoveSlot::Basic
        } else {
            MoveSlot::Idle
        }
    }
}

/// Turns snapshots into desired moves and remembers facing
#[derive(Debug, Clone)]
pub struct InputDecoder {
    deadzone: f32,
    facing: Facing,
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new(STICK_DEADZONE)
    }
}

impl InputDecoder {
    pub fn new(deadzone: f32) -> Self {
        Self {
            deadzone,
            facing: Facing::Right,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Decode one tick of input
    ///
    /// Facing follows the stick only when the desired move is directional
    /// and the stick is pushed sideways past the deadzone; otherwise the
    /// previous facing is kept.
    pub fn decode(&mut self, snapshot: &InputSnapshot) -> MoveSlot {
        let desired = InputFlags::from_snapshot(snapshot, self.deadzone).desired_move();

        if desired.is_directional() {
            let x = apply_deadzone(snapshot.left_stick.x, self.deadzone);
            if let Some(facing) = Facing::from_axis(x) {
                self.facing = facing;
            }
        }

        desired
    }
}
