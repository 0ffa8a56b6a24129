// The eight canonical move slots every character defines

use crate::game::ConfigurationError;

/// One of the fixed action categories of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveSlot {
    #[default]
    Idle,
    Walk,
    Jump,
    Special,
    SideSpecial,
    UpSpecial,
    DownSpecial,
    Basic,
}

impl MoveSlot {
    /// Number of canonical slots
    pub const COUNT: usize = 8;

    /// All slots in index order
    pub const ALL: [MoveSlot; MoveSlot::COUNT] = [
        MoveSlot::Idle,
        MoveSlot::Walk,
        MoveSlot::Jump,
        MoveSlot::Special,
        MoveSlot::SideSpecial,
        MoveSlot::UpSpecial,
        MoveSlot::DownSpecial,
        MoveSlot::Basic,
    ];

    /// Position of this slot in a move table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Idle and Jump may restart while already active
    pub fn is_reenterable(self) -> bool {
        matches!(self, MoveSlot::Idle | MoveSlot::Jump)
    }

    /// Whether selecting this move updates the facing direction
    pub fn is_directional(self) -> bool {
        !matches!(self, MoveSlot::Idle | MoveSlot::Jump)
    }

    /// Locomotion moves act on the character's own body instead of a hitbox
    pub fn acts_on_own_body(self) -> bool {
        matches!(self, MoveSlot::Idle | MoveSlot::Walk | MoveSlot::Jump)
    }

    /// Short lowercase name, used for asset file names
    pub fn name(self) -> &'static str {
        match self {
            MoveSlot::Idle => "idle",
            MoveSlot::Walk => "walk",
            MoveSlot::Jump => "jump",
            MoveSlot::Special => "special",
            MoveSlot::SideSpecial => "side_special",
            MoveSlot::UpSpecial => "up_special",
            MoveSlot::DownSpecial => "down_special",
            MoveSlot::Basic => "basic",
        }
    }
}

impl TryFrom<usize> for MoveSlot {
    type Error = ConfigurationError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        MoveSlot::ALL
            .get(index)
            .copied()
            .ok_or(ConfigurationError::SlotOutOfRange(index))
    }
}
