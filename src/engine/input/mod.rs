// Input handling system
//
// The move engine reads one `InputSnapshot` per controller slot per tick.
// Keyboards are folded into the same snapshot shape so every character is
// driven the same way regardless of device.
//
// ## Architecture
//
// - `snapshot`: Controller state handed to characters each tick
// - `action`: Keyboard actions and default key bindings
// - `player`: Per-player keyboard state
// - `manager`: Routes winit key events to players and builds snapshots

pub mod action;
pub mod manager;
pub mod player;
pub mod snapshot;

// Re-export commonly used types
pub use action::{Action, InputSource};
pub use manager::{InputManager, MAX_PLAYERS};
pub use player::PlayerInput;
pub use snapshot::{Button, InputSnapshot};
