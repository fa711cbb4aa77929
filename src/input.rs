use glam::Vec3;
use winit::keyboard::Key;

/// Distance moved per key press, in scene units.
pub const STEP: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    CubeUp,
    CubeDown,
    CameraLeft,
    CameraRight,
}

impl KeyCommand {
    /// Maps W/A/S/D to commands, ignoring case.
    pub fn from_key(key: &Key) -> Option<Self> {
        let Key::Character(text) = key else {
            return None;
        };

        let mut chars = text.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        match c.to_ascii_lowercase() {
            'w' => Some(KeyCommand::CubeUp),
            's' => Some(KeyCommand::CubeDown),
            'a' => Some(KeyCommand::CameraLeft),
            'd' => Some(KeyCommand::CameraRight),
            _ => None,
        }
    }

    pub fn delta(self) -> Vec3 {
        match self {
            KeyCommand::CubeUp => Vec3::Y * STEP,
            KeyCommand::CubeDown => Vec3::NEG_Y * STEP,
            KeyCommand::CameraLeft => Vec3::NEG_X * STEP,
            KeyCommand::CameraRight => Vec3::X * STEP,
        }
    }

    pub fn moves_camera(self) -> bool {
        matches!(self, KeyCommand::CameraLeft | KeyCommand::CameraRight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NamedKey;

    fn character(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn wasd_in_either_case() {
        for (lower, upper, command) in [
            ("w", "W", KeyCommand::CubeUp),
            ("s", "S", KeyCommand::CubeDown),
            ("a", "A", KeyCommand::CameraLeft),
            ("d", "D", KeyCommand::CameraRight),
        ] {
            assert_eq!(KeyCommand::from_key(&character(lower)), Some(command));
            assert_eq!(KeyCommand::from_key(&character(upper)), Some(command));
        }
    }

    #[test]
    fn other_keys_do_nothing() {
        assert_eq!(KeyCommand::from_key(&character("q")), None);
        assert_eq!(KeyCommand::from_key(&character("wa")), None);
        assert_eq!(KeyCommand::from_key(&Key::Named(NamedKey::ArrowUp)), None);
    }

    #[test]
    fn deltas_are_single_steps() {
        assert_eq!(KeyCommand::CubeUp.delta(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(KeyCommand::CameraLeft.delta(), Vec3::new(-1.0, 0.0, 0.0));
        assert!(KeyCommand::CameraRight.moves_camera());
        assert!(!KeyCommand::CubeDown.moves_camera());
    }
}
