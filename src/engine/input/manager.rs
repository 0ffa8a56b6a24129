// Input manager - turns keyboard events into per-slot controller snapshots

use super::action::{default_bindings, Action, InputSource};
use super::player::PlayerInput;
use super::snapshot::InputSnapshot;
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::PhysicalKey;

/// Number of controller slots the game supports
pub const MAX_PLAYERS: usize = 4;

/// Main input manager that coordinates all input for all players
pub struct InputManager {
    /// Which player and action each key drives
    bindings: HashMap<InputSource, (usize, Action)>,

    /// Input state for each player
    players: Vec<PlayerInput>,
}

impl InputManager {
    /// Create an input manager with the default keyboard layout
    pub fn new() -> Self {
        let mut manager = Self {
            bindings: HashMap::new(),
            players: (0..MAX_PLAYERS).map(PlayerInput::new).collect(),
        };

        for player_id in 0..MAX_PLAYERS {
            for (source, action) in default_bindings(player_id) {
                manager.bind(player_id, source, action);
            }
        }

        manager
    }

    /// Bind a source to a player's action, replacing any previous binding of that source
    pub fn bind(&mut self, player_id: usize, source: InputSource, action: Action) {
        if player_id < MAX_PLAYERS {
            self.bindings.insert(source, (player_id, action));
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.apply(InputSource::key(key_code), event.state);
        }
    }

    fn apply(&mut self, source: InputSource, state: ElementState) {
        let Some(&(player_id, action)) = self.bindings.get(&source) else {
            return;
        };
        let Some(player) = self.players.get_mut(player_id) else {
            return;
        };

        match state {
            ElementState::Pressed => player.press(action),
            ElementState::Released => player.release(action),
        }
    }

    /// Get input state for a specific player
    pub fn player(&self, player_id: usize) -> Option<&PlayerInput> {
        self.players.get(player_id)
    }

    /// Snapshot every slot, in player order
    pub fn snapshots(&self) -> [InputSnapshot; MAX_PLAYERS] {
        std::array::from_fn(|slot| self.players[slot].snapshot())
    }

    /// Check if any player is holding an action
    pub fn any_player_pressed(&self, action: Action) -> bool {
        self.players.iter().any(|p| p.is_pressed(action))
    }

    /// Reset all player input states (e.g. on focus loss)
    pub fn reset_all(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
