// Gameplay: moves, characters and the arena that runs a match

pub mod arena;
pub mod characters;
pub mod moves;

use moves::MoveSlot;

/// Errors in character template data
///
/// These are raised while registering templates, before any match starts;
/// a registered template cannot produce them mid-match.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Template '{template}' does not define the {slot:?} move")]
    MissingMove { template: String, slot: MoveSlot },

    #[error("Template '{template}' has no effect for the {slot:?} move")]
    MissingEffect { template: String, slot: MoveSlot },

    #[error("Move slot index {0} is out of range (0-7)")]
    SlotOutOfRange(usize),

    #[error("Player slot {0} is out of range (0-3)")]
    PlayerOutOfRange(usize),

    #[error("Template '{0}' is already registered")]
    DuplicateTemplate(String),

    #[error("Template '{0}' is not registered")]
    UnknownTemplate(String),
}
