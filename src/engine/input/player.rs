// Per-player keyboard state

use super::action::Action;
use super::snapshot::InputSnapshot;
use glam::Vec2;
use std::collections::HashSet;

/// Keyboard-driven input state for a single player
#[derive(Debug)]
pub struct PlayerInput {
    /// Player ID (0-3 for up to 4 players)
    player_id: usize,

    /// Actions that are currently held
    pressed: HashSet<Action>,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            pressed: HashSet::new(),
        }
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub(crate) fn press(&mut self, action: Action) {
        self.pressed.insert(action);
    }

    pub(crate) fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
    }

    /// Digital directions folded into a stick vector (-1.0 to 1.0, +y up)
    pub fn stick(&self) -> Vec2 {
        let mut stick = Vec2::ZERO;

        if self.is_pressed(Action::MoveLeft) {
            stick.x -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            stick.x += 1.0;
        }
        if self.is_pressed(Action::MoveDown) {
            stick.y -= 1.0;
        }
        if self.is_pressed(Action::MoveUp) {
            stick.y += 1.0;
        }

        stick
    }

    /// Controller snapshot equivalent to the keys currently held
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            left_stick: self.stick(),
            buttons: self.pressed.iter().filter_map(|a| a.button()).collect(),
            ..InputSnapshot::default()
        }
    }
}
