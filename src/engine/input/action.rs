// Game action definitions and keyboard mappings

use super::snapshot::Button;
use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement (emulate the left stick)
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,

    // Face buttons
    Jump,
    Special,
    Basic,

    // Meta actions
    Pause,
}

impl Action {
    /// Controller button this action stands in for, if any
    pub fn button(self) -> Option<Button> {
        match self {
            Action::Jump => Some(Button::A),
            Action::Special => Some(Button::B),
            Action::Basic => Some(Button::X),
            Action::Pause => Some(Button::Start),
            Action::MoveLeft | Action::MoveRight | Action::MoveUp | Action::MoveDown => None,
        }
    }
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings for a player slot
///
/// Two players can share one keyboard; slots 2 and 3 expect controllers.
pub fn default_bindings(player_id: usize) -> Vec<(InputSource, Action)> {
    match player_id {
        0 => vec![
            (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
            (InputSource::key(KeyCode::KeyD), Action::MoveRight),
            (InputSource::key(KeyCode::KeyW), Action::MoveUp),
            (InputSource::key(KeyCode::KeyS), Action::MoveDown),
            (InputSource::key(KeyCode::Space), Action::Jump),
            (InputSource::key(KeyCode::KeyJ), Action::Basic),
            (InputSource::key(KeyCode::KeyK), Action::Special),
            (InputSource::key(KeyCode::Escape), Action::Pause),
        ],
        1 => vec![
            (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
            (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
            (InputSource::key(KeyCode::ArrowUp), Action::MoveUp),
            (InputSource::key(KeyCode::ArrowDown), Action::MoveDown),
            (InputSource::key(KeyCode::Numpad0), Action::Jump),
            (InputSource::key(KeyCode::Numpad1), Action::Basic),
            (InputSource::key(KeyCode::Numpad2), Action::Special),
        ],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_buttons_map_to_controller() {
        assert_eq!(Action::Jump.button(), Some(Button::A));
        assert_eq!(Action::Special.button(), Some(Button::B));
        assert_eq!(Action::Basic.button(), Some(Button::X));
        assert_eq!(Action::MoveLeft.button(), None);
    }

    #[test]
    fn test_keyboard_players_have_bindings() {
        assert!(!default_bindings(0).is_empty());
        assert!(!default_bindings(1).is_empty());
        assert!(default_bindings(2).is_empty());
    }

    #[test]
    fn test_no_shared_keys_between_players() {
        let mut seen_sources = std::collections::HashSet::new();
        for player in 0..2 {
            for (source, _) in default_bindings(player) {
                assert!(
                    seen_sources.insert(source),
                    "Duplicate input source found in keyboard bindings"
                );
            }
        }
    }
}
