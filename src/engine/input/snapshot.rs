// Controller state for one player slot, sampled once per tick

use glam::Vec2;
use std::collections::HashSet;

/// Buttons of a standard twin-stick controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
    LeftShoulder,
    RightShoulder,
    Start,
}

/// Everything a character reads from its controller in one tick
///
/// Stick axes range over -1.0..=1.0 with +y pointing up; triggers range over
/// 0.0..=1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    pub left_trigger: f32,
    pub right_trigger: f32,
    pub buttons: HashSet<Button>,
}

impl InputSnapshot {
    /// Snapshot with nothing pressed
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Check if a button is held this tick
    pub fn is_down(&self, button: Button) -> bool {
        self.buttons.contains(&button)
    }

    /// Builder helper: set the left stick
    pub fn with_stick(mut self, x: f32, y: f32) -> Self {
        self.left_stick = Vec2::new(x, y);
        self
    }

    /// Builder helper: hold a button
    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons.insert(button);
        self
    }
}
