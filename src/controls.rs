//! Keyboard controls.
//!
//! | Key               | Command                      |
//! |-------------------|------------------------------|
//! | `Space`, `Enter`  | Toggle sphere / dispersed    |
//! | `1` to `4`        | Orb, Snow, Petal, Star       |
//! | `C` / `Shift+C`   | Next / previous preset color |
//! | `F`, `F11`        | Toggle fullscreen            |
//! | `Escape`          | Exit                         |

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::visuals::ParticleShape;

/// A user command produced by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    ToggleExpansion,
    SelectShape(ParticleShape),
    NextColor,
    PreviousColor,
    ToggleFullscreen,
    Exit,
}

/// Map a pressed key to a command.
pub fn command_for_key(key: KeyCode, shift: bool) -> Option<ControlCommand> {
    let command = match key {
        KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => ControlCommand::ToggleExpansion,
        KeyCode::Digit1 | KeyCode::Numpad1 => ControlCommand::SelectShape(ParticleShape::Sphere),
        KeyCode::Digit2 | KeyCode::Numpad2 => ControlCommand::SelectShape(ParticleShape::Snowflake),
        KeyCode::Digit3 | KeyCode::Numpad3 => ControlCommand::SelectShape(ParticleShape::Petal),
        KeyCode::Digit4 | KeyCode::Numpad4 => ControlCommand::SelectShape(ParticleShape::Star),
        KeyCode::KeyC if shift => ControlCommand::PreviousColor,
        KeyCode::KeyC => ControlCommand::NextColor,
        KeyCode::KeyF | KeyCode::F11 => ControlCommand::ToggleFullscreen,
        KeyCode::Escape => ControlCommand::Exit,
        _ => return None,
    };
    Some(command)
}

/// Tracks modifier state and turns key presses into commands.
#[derive(Debug, Default)]
pub struct Controls {
    shift: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit window event. Key repeats are ignored.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<ControlCommand> {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift = modifiers.state().shift_key();
                None
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return None;
                }
                match event.physical_key {
                    PhysicalKey::Code(key) => command_for_key(key, self.shift),
                    PhysicalKey::Unidentified(_) => None,
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_hotkeys_follow_shape_order() {
        let keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3, KeyCode::Digit4];
        for (key, shape) in keys.into_iter().zip(ParticleShape::ALL) {
            assert_eq!(command_for_key(key, false), Some(ControlCommand::SelectShape(shape)));
        }
    }

    #[test]
    fn test_shift_reverses_color_cycle() {
        assert_eq!(command_for_key(KeyCode::KeyC, false), Some(ControlCommand::NextColor));
        assert_eq!(command_for_key(KeyCode::KeyC, true), Some(ControlCommand::PreviousColor));
    }

    #[test]
    fn test_toggle_and_exit() {
        assert_eq!(command_for_key(KeyCode::Space, false), Some(ControlCommand::ToggleExpansion));
        assert_eq!(command_for_key(KeyCode::Enter, true), Some(ControlCommand::ToggleExpansion));
        assert_eq!(command_for_key(KeyCode::F11, false), Some(ControlCommand::ToggleFullscreen));
        assert_eq!(command_for_key(KeyCode::Escape, false), Some(ControlCommand::Exit));
        assert_eq!(command_for_key(KeyCode::KeyQ, false), None);
    }
}
