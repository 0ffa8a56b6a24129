// Character system
//
// This module contains everything related to playable characters:
// - The character rig (hurtbox, moves, lifecycle)
// - Input decoding into desired moves
// - Physical properties and tuning constants
// - The template roster and the built-in characters

mod builtin;
pub mod character;
pub mod decoder;
pub mod roster;
pub mod stats;

// Re-export commonly used types
pub use character::{CharacterRig, SaveRecord};
pub use decoder::{InputDecoder, InputFlags};
pub use roster::{CharacterTemplate, Roster, SheetLayout};
pub use stats::{CharacterStats, PIXELS_PER_UNIT, STICK_DEADZONE};
